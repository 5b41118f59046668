use crate::colormap::{Colormap, Normalize};
use crate::error::{ConvertError, ConvertResult};
use crate::im::{Gray8Im, MaskIm, Rgb8Im, Rgba8Im, TiffOptions, ValueIm};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Raw values as 32-bit float, background untouched.
    #[default]
    Float32,
    /// Normalized 8-bit gray.
    Gray8,
    /// Normalized values sampled through a colormap.
    Colormap,
}

impl RenderMode {
    pub fn name(self) -> &'static str {
        match self {
            RenderMode::Float32 => "float32",
            RenderMode::Gray8 => "gray8",
            RenderMode::Colormap => "colormap",
        }
    }
}

impl FromStr for RenderMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float32" | "float" => Ok(RenderMode::Float32),
            "gray8" | "gray" | "grey" => Ok(RenderMode::Gray8),
            "colormap" => Ok(RenderMode::Colormap),
            _ => Err(format!(
                "unknown mode '{s}', expected float32, gray8 or colormap"
            )),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub colormap: Colormap,
    /// Emit an alpha channel: 0 on unwritten cells, 255 on written ones.
    pub alpha: bool,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub levels: Option<usize>,
}

impl RenderOptions {
    pub fn validate(&self) -> ConvertResult<()> {
        if self.alpha && self.mode == RenderMode::Float32 {
            return Err(ConvertError::InvalidOption(
                "an alpha channel needs gray8 or colormap mode".to_string(),
            ));
        }
        if let Some(n) = self.levels {
            if n < 2 {
                return Err(ConvertError::InvalidOption(format!(
                    "levels must be at least 2, got {n}"
                )));
            }
        }
        if let (Some(lo), Some(hi)) = (self.vmin, self.vmax) {
            if !(lo < hi) {
                return Err(ConvertError::InvalidOption(format!(
                    "vmin ({lo}) must be below vmax ({hi})"
                )));
            }
        }
        Ok(())
    }
}

/// Background color of unwritten cells in opaque colormap output.
const FACE_RGB: [u8; 3] = [255, 255, 255];

#[derive(Debug, Clone)]
pub enum Raster {
    Float32(ValueIm),
    Gray8(Gray8Im),
    Rgb8(Rgb8Im),
    Rgba8(Rgba8Im),
}

impl Raster {
    pub fn w(&self) -> usize {
        match self {
            Raster::Float32(im) => im.w,
            Raster::Gray8(im) => im.w,
            Raster::Rgb8(im) => im.w,
            Raster::Rgba8(im) => im.w,
        }
    }

    pub fn h(&self) -> usize {
        match self {
            Raster::Float32(im) => im.h,
            Raster::Gray8(im) => im.h,
            Raster::Rgb8(im) => im.h,
            Raster::Rgba8(im) => im.h,
        }
    }

    pub fn save_tiff<P: AsRef<Path>>(&self, path: P, opts: &TiffOptions) -> ConvertResult<()> {
        match self {
            Raster::Float32(im) => im.save_tiff(path, opts)?,
            Raster::Gray8(im) => im.save_tiff(path, opts)?,
            Raster::Rgb8(im) => im.save_tiff(path, opts)?,
            Raster::Rgba8(im) => im.save_tiff(path, opts)?,
        }
        Ok(())
    }

    /// 8-bit PNG of the raster. Float rasters are stretched to gray over
    /// their finite values first.
    #[cfg(feature = "im-io")]
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> ConvertResult<()> {
        match self {
            Raster::Float32(im) => {
                let mut mask_im = MaskIm::new(im.w, im.h);
                for (m, v) in mask_im.arr.iter_mut().zip(&im.arr) {
                    if v.is_finite() {
                        *m = 255;
                    }
                }
                let norm = Normalize::from_data(im, &mask_im);
                gray8(im, &mask_im, &norm).save_png(path)?
            }
            Raster::Gray8(im) => im.save_png(path)?,
            Raster::Rgb8(im) => im.save_png(path)?,
            Raster::Rgba8(im) => im.save_png(path)?,
        }
        Ok(())
    }
}

/// What `render` produced, plus the normalization it used (if any).
#[derive(Debug, Clone)]
pub struct Rendered {
    pub raster: Raster,
    pub norm: Option<Normalize>,
}

/// Data min/max with any explicit bound layered on top. A single explicit
/// bound that crosses the other (data-derived) one is rejected.
fn resolve_norm(
    value_im: &ValueIm,
    mask_im: &MaskIm,
    opts: &RenderOptions,
) -> ConvertResult<Normalize> {
    let norm = Normalize::from_data(value_im, mask_im)
        .with_bounds(opts.vmin, opts.vmax)
        .with_levels(opts.levels);
    if norm.vmin > norm.vmax {
        return Err(ConvertError::InvalidOption(format!(
            "vmin ({}) must not exceed vmax ({})",
            norm.vmin, norm.vmax
        )));
    }
    debug!(
        "normalizing {} over [{}, {}]",
        opts.mode.name(),
        norm.vmin,
        norm.vmax
    );
    Ok(norm)
}

pub fn render(
    value_im: &ValueIm,
    mask_im: &MaskIm,
    opts: &RenderOptions,
) -> ConvertResult<Rendered> {
    opts.validate()?;

    let (raster, norm) = match opts.mode {
        RenderMode::Float32 => (Raster::Float32(value_im.clone()), None),
        RenderMode::Gray8 => {
            let norm = resolve_norm(value_im, mask_im, opts)?;
            let raster = if opts.alpha {
                Raster::Rgba8(rgba8(value_im, mask_im, &norm, Colormap::Gray))
            } else {
                Raster::Gray8(gray8(value_im, mask_im, &norm))
            };
            (raster, Some(norm))
        }
        RenderMode::Colormap => {
            let norm = resolve_norm(value_im, mask_im, opts)?;
            let raster = if opts.alpha {
                Raster::Rgba8(rgba8(value_im, mask_im, &norm, opts.colormap))
            } else {
                Raster::Rgb8(rgb8(value_im, mask_im, &norm, opts.colormap))
            };
            (raster, Some(norm))
        }
    };

    Ok(Rendered { raster, norm })
}

fn gray8(value_im: &ValueIm, mask_im: &MaskIm, norm: &Normalize) -> Gray8Im {
    let mut out = Gray8Im::new(value_im.w, value_im.h);
    for ((dst, v), m) in out.arr.iter_mut().zip(&value_im.arr).zip(&mask_im.arr) {
        if *m != 0 {
            *dst = (norm.t(*v as f64) * 255.0).round() as u8;
        }
    }
    out
}

fn rgb8(value_im: &ValueIm, mask_im: &MaskIm, norm: &Normalize, cmap: Colormap) -> Rgb8Im {
    let ramp = cmap.ramp();
    let mut out = Rgb8Im::new(value_im.w, value_im.h);
    for ((px, v), m) in out.arr.chunks_exact_mut(3).zip(&value_im.arr).zip(&mask_im.arr) {
        if *m != 0 {
            let rgba = ramp.rgba8(norm.t(*v as f64));
            px.copy_from_slice(&rgba[0..3]);
        } else {
            px.copy_from_slice(&FACE_RGB);
        }
    }
    out
}

fn rgba8(value_im: &ValueIm, mask_im: &MaskIm, norm: &Normalize, cmap: Colormap) -> Rgba8Im {
    let ramp = cmap.ramp();
    // Default is all zeros, i.e. transparent black.
    let mut out = Rgba8Im::new(value_im.w, value_im.h);
    for ((px, v), m) in out.arr.chunks_exact_mut(4).zip(&value_im.arr).zip(&mask_im.arr) {
        if *m != 0 {
            let mut rgba = ramp.rgba8(norm.t(*v as f64));
            rgba[3] = 255;
            px.copy_from_slice(&rgba);
        }
    }
    out
}
