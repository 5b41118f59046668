use crate::error::{ConvertError, ConvertResult};
use crate::im::{MaskIm, TiffOptions, ValueIm};
use crate::records::{read_records_from_path, CsvOptions, ReadStats};
use crate::render::{render, RenderOptions};
use crate::scatter::{scatter, ScatterStats};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub file: PathBuf,
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub csv: CsvOptions,
    /// Initial value of every cell before any record is written.
    pub background: f32,
    pub render: RenderOptions,
    pub tiff: TiffOptions,
    pub preview: Option<PathBuf>,
}

/// Summary of one run, printable as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConvertReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub width: usize,
    pub height: usize,
    pub mode: &'static str,
    pub read: ReadStats,
    pub scatter: ScatterStats,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub preview: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Converter {
    opts: ConvertOptions,
}

impl Converter {
    pub fn new(opts: ConvertOptions) -> ConvertResult<Self> {
        let (w, h) = (opts.width, opts.height);
        if w == 0 || h == 0 {
            return Err(ConvertError::InvalidDimensions {
                w,
                h,
                reason: "width and height must be positive",
            });
        }
        if w.checked_mul(h).is_none() {
            return Err(ConvertError::InvalidDimensions {
                w,
                h,
                reason: "pixel count overflows",
            });
        }
        if u32::try_from(w).is_err() || u32::try_from(h).is_err() {
            return Err(ConvertError::InvalidDimensions {
                w,
                h,
                reason: "TIFF dimensions are limited to 32 bits",
            });
        }
        if opts.csv.idx_column == opts.csv.value_column {
            return Err(ConvertError::InvalidOption(format!(
                "index and value columns must differ (both {})",
                opts.csv.idx_column
            )));
        }
        opts.render.validate()?;

        Ok(Self { opts })
    }

    /// Build the value raster and its written-cell mask without writing
    /// anything.
    pub fn rasterize(&self) -> ConvertResult<(ValueIm, MaskIm, ReadStats, ScatterStats)> {
        let opts = &self.opts;

        info!("reading {}", opts.file.display());
        let (records, read_stats) = read_records_from_path(&opts.file, &opts.csv)?;
        debug!("{} records kept of {} rows", records.len(), read_stats.rows);

        let mut value_im = ValueIm::new_filled(opts.width, opts.height, opts.background);
        let mut mask_im = MaskIm::new(opts.width, opts.height);
        let scatter_stats = scatter(&records, &mut value_im, &mut mask_im);
        debug!(
            "wrote {} cells ({} overwrites)",
            scatter_stats.written, scatter_stats.overwritten
        );

        Ok((value_im, mask_im, read_stats, scatter_stats))
    }

    pub fn convert(&self) -> ConvertResult<ConvertReport> {
        let opts = &self.opts;
        let (value_im, mask_im, read_stats, scatter_stats) = self.rasterize()?;

        let rendered = render(&value_im, &mask_im, &opts.render)?;

        info!(
            "writing {}x{} {} TIFF to {}",
            opts.width,
            opts.height,
            opts.render.mode.name(),
            opts.output.display()
        );
        rendered.raster.save_tiff(&opts.output, &opts.tiff)?;

        if let Some(preview) = &opts.preview {
            self.save_preview(&rendered.raster, preview)?;
        }

        Ok(ConvertReport {
            input: opts.file.clone(),
            output: opts.output.clone(),
            width: rendered.raster.w(),
            height: rendered.raster.h(),
            mode: opts.render.mode.name(),
            read: read_stats,
            scatter: scatter_stats,
            vmin: rendered.norm.map(|n| n.vmin),
            vmax: rendered.norm.map(|n| n.vmax),
            preview: opts.preview.clone(),
        })
    }

    #[cfg(feature = "im-io")]
    fn save_preview(&self, raster: &crate::render::Raster, path: &Path) -> ConvertResult<()> {
        info!("writing PNG preview to {}", path.display());
        raster.save_png(path)
    }

    #[cfg(not(feature = "im-io"))]
    fn save_preview(&self, _raster: &crate::render::Raster, _path: &Path) -> ConvertResult<()> {
        Err(ConvertError::InvalidOption(
            "PNG previews need the im-io feature".to_string(),
        ))
    }
}
