//! JSON description of a conversion, with every field optional.
//!
//! The CLI builds one of these from its flags and layers it over one parsed
//! from `--config`, so flags win over the file and the file wins over the
//! built-in defaults.

use crate::colormap::Colormap;
use crate::convert::ConvertOptions;
use crate::error::{ConvertError, ConvertResult};
use crate::im::{Compression, TiffOptions};
use crate::records::{parse_delimiter, CsvOptions};
use crate::render::{RenderMode, RenderOptions};
use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

pub const DEFAULT_OUTPUT: &str = "output.tiff";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertDesc {
    pub file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub width: Option<usize>,
    pub height: Option<usize>,
    pub header: Option<bool>,
    pub delimiter: Option<String>,
    pub idx_column: Option<usize>,
    pub value_column: Option<usize>,
    /// A number, or the string "nan".
    #[serde(deserialize_with = "de_background")]
    pub background: Option<f32>,
    pub mode: Option<RenderMode>,
    pub colormap: Option<String>,
    pub alpha: Option<bool>,
    pub vmin: Option<f64>,
    pub vmax: Option<f64>,
    pub levels: Option<usize>,
    pub dpi: Option<u32>,
    pub compression: Option<Compression>,
    pub preview: Option<PathBuf>,
}

pub fn parse_convert_json(json: &str) -> ConvertResult<ConvertDesc> {
    Ok(serde_json::from_str(json)?)
}

/// Parse a background value: a float or `nan` (any case).
pub fn parse_background(s: &str) -> Result<f32, String> {
    let t = s.trim();
    if t.eq_ignore_ascii_case("nan") {
        return Ok(f32::NAN);
    }
    t.parse::<f32>()
        .map_err(|e| format!("background must be a number or 'nan', got '{s}': {e}"))
}

fn de_background<'de, D>(deserializer: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Num(v)) => Ok(Some(v)),
        Some(Raw::Text(s)) => parse_background(&s).map(Some).map_err(serde::de::Error::custom),
    }
}

macro_rules! overlay_fields {
    ($base:ident, $top:ident, $($field:ident),* $(,)?) => {
        ConvertDesc {
            $($field: $top.$field.or($base.$field),)*
        }
    };
}

impl ConvertDesc {
    /// Fields set in `top` replace those in `self`.
    pub fn overlay(self, top: ConvertDesc) -> ConvertDesc {
        let base = self;
        overlay_fields!(
            base,
            top,
            file,
            output,
            width,
            height,
            header,
            delimiter,
            idx_column,
            value_column,
            background,
            mode,
            colormap,
            alpha,
            vmin,
            vmax,
            levels,
            dpi,
            compression,
            preview,
        )
    }

    /// Resolve into concrete options, applying defaults. `file`, `width` and
    /// `height` have no default.
    pub fn into_options(self) -> ConvertResult<ConvertOptions> {
        let missing = |name: &str| ConvertError::InvalidOption(format!("--{name} is required"));

        let file = self.file.ok_or_else(|| missing("file"))?;
        let width = self.width.ok_or_else(|| missing("width"))?;
        let height = self.height.ok_or_else(|| missing("height"))?;

        let csv_defaults = CsvOptions::default();
        let delimiter = match self.delimiter.as_deref() {
            Some(d) => parse_delimiter(d).map_err(ConvertError::InvalidOption)?,
            None => csv_defaults.delimiter,
        };
        let csv = CsvOptions {
            has_header: self.header.unwrap_or(csv_defaults.has_header),
            delimiter,
            idx_column: self.idx_column.unwrap_or(csv_defaults.idx_column),
            value_column: self.value_column.unwrap_or(csv_defaults.value_column),
        };

        let colormap = match self.colormap.as_deref() {
            Some(name) => name.parse::<Colormap>()?,
            None => Colormap::default(),
        };
        let render = RenderOptions {
            mode: self.mode.unwrap_or_default(),
            colormap,
            alpha: self.alpha.unwrap_or(false),
            vmin: self.vmin,
            vmax: self.vmax,
            levels: self.levels,
        };

        let tiff = TiffOptions {
            dpi: self.dpi,
            compression: self.compression.unwrap_or_default(),
        };

        Ok(ConvertOptions {
            file,
            output: self.output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            width,
            height,
            csv,
            background: self.background.unwrap_or(f32::NAN),
            render,
            tiff,
            preview: self.preview,
        })
    }
}
