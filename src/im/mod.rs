pub mod core;
#[allow(unused_imports)]
pub use self::core::{index_to_xy, Gray8Im, Im, MaskIm, Rgb8Im, Rgba8Im, ValueIm};

pub mod tiff_io;
pub use self::tiff_io::{Compression, TiffOptions};

// Optional extras
// -----------------------------------------------------------------------------

#[cfg(feature = "im-io")]
pub mod io;
