use super::core::Im;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use std::str::FromStr;
use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::compression::{
    Compression as TiffCompression, Deflate, Lzw, Packbits, Uncompressed,
};
use tiff::encoder::{Rational, TiffEncoder, TiffValue};
use tiff::tags::ResolutionUnit;
use tiff::TiffResult;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Lzw,
    Deflate,
    Packbits,
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Compression::None),
            "lzw" => Ok(Compression::Lzw),
            "deflate" => Ok(Compression::Deflate),
            "packbits" => Ok(Compression::Packbits),
            _ => Err(format!(
                "unknown compression '{s}', expected none, lzw, deflate or packbits"
            )),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TiffOptions {
    /// Written as X/Y resolution in pixels per inch.
    pub dpi: Option<u32>,
    pub compression: Compression,
}

fn encode<C, D>(
    path: &Path,
    w: usize,
    h: usize,
    data: &[C::Inner],
    compression: D,
    dpi: Option<u32>,
) -> TiffResult<()>
where
    C: ColorType,
    D: TiffCompression,
    [C::Inner]: TiffValue,
{
    let file = BufWriter::new(File::create(path)?);
    let mut encoder = TiffEncoder::new(file)?;
    let mut image =
        encoder.new_image_with_compression::<C, D>(w as u32, h as u32, compression)?;
    if let Some(dpi) = dpi {
        image.resolution(ResolutionUnit::Inch, Rational { n: dpi, d: 1 });
    }
    image.write_data(data)
}

fn write_tiff<C>(path: &Path, w: usize, h: usize, data: &[C::Inner], opts: &TiffOptions) -> TiffResult<()>
where
    C: ColorType,
    [C::Inner]: TiffValue,
{
    match opts.compression {
        Compression::None => encode::<C, _>(path, w, h, data, Uncompressed::default(), opts.dpi),
        Compression::Lzw => encode::<C, _>(path, w, h, data, Lzw::default(), opts.dpi),
        Compression::Deflate => encode::<C, _>(path, w, h, data, Deflate::default(), opts.dpi),
        Compression::Packbits => encode::<C, _>(path, w, h, data, Packbits::default(), opts.dpi),
    }
}

// TIFF output
// -----------------------------------------------------------------------------
impl Im<f32, 1> {
    /// Single-channel IEEE float samples. NaN cells are stored as NaN.
    pub fn save_tiff<P: AsRef<Path>>(&self, path: P, opts: &TiffOptions) -> TiffResult<()> {
        write_tiff::<colortype::Gray32Float>(path.as_ref(), self.w, self.h, &self.arr, opts)
    }
}

impl Im<u8, 1> {
    pub fn save_tiff<P: AsRef<Path>>(&self, path: P, opts: &TiffOptions) -> TiffResult<()> {
        write_tiff::<colortype::Gray8>(path.as_ref(), self.w, self.h, &self.arr, opts)
    }
}

impl Im<u8, 3> {
    pub fn save_tiff<P: AsRef<Path>>(&self, path: P, opts: &TiffOptions) -> TiffResult<()> {
        write_tiff::<colortype::RGB8>(path.as_ref(), self.w, self.h, &self.arr, opts)
    }
}

impl Im<u8, 4> {
    pub fn save_tiff<P: AsRef<Path>>(&self, path: P, opts: &TiffOptions) -> TiffResult<()> {
        write_tiff::<colortype::RGBA8>(path.as_ref(), self.w, self.h, &self.arr, opts)
    }
}
