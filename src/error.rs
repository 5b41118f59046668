use thiserror::Error;

/// Everything that can stop a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("invalid dimensions {w}x{h}: {reason}")]
    InvalidDimensions {
        w: usize,
        h: usize,
        reason: &'static str,
    },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("unknown colormap '{0}'")]
    UnknownColormap(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TIFF encoding error: {0}")]
    Tiff(#[from] tiff::TiffError),
    #[cfg(feature = "im-io")]
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type ConvertResult<T> = Result<T, ConvertError>;
