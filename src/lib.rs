// Library crate root.
//
// The binary (src/main.rs) is a thin CLI over `convert::Converter`; everything
// else lives here so it can be tested and reused.

pub mod colormap;
pub mod convert;
pub mod desc;
pub mod error;
pub mod im;
pub mod records;
pub mod render;
pub mod scatter;

pub use convert::{ConvertOptions, ConvertReport, Converter};
pub use error::{ConvertError, ConvertResult};

#[cfg(test)]
pub mod test_helpers;
