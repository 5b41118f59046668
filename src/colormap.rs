//! Value normalization and color ramps for the colormap and grayscale modes.

use crate::error::ConvertError;
use crate::im::{MaskIm, ValueIm};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Colormap {
    /// Linear black to white.
    Gray,
    /// White to black.
    Greys,
    #[default]
    Viridis,
    Magma,
    Inferno,
    Plasma,
    Cividis,
    Turbo,
    Spectral,
    Rainbow,
    Sinebow,
}

impl Colormap {
    pub const ALL: [Colormap; 11] = [
        Colormap::Gray,
        Colormap::Greys,
        Colormap::Viridis,
        Colormap::Magma,
        Colormap::Inferno,
        Colormap::Plasma,
        Colormap::Cividis,
        Colormap::Turbo,
        Colormap::Spectral,
        Colormap::Rainbow,
        Colormap::Sinebow,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Colormap::Gray => "gray",
            Colormap::Greys => "greys",
            Colormap::Viridis => "viridis",
            Colormap::Magma => "magma",
            Colormap::Inferno => "inferno",
            Colormap::Plasma => "plasma",
            Colormap::Cividis => "cividis",
            Colormap::Turbo => "turbo",
            Colormap::Spectral => "spectral",
            Colormap::Rainbow => "rainbow",
            Colormap::Sinebow => "sinebow",
        }
    }

    fn gradient(self) -> Option<colorgrad::Gradient> {
        let g = match self {
            Colormap::Gray => return None,
            Colormap::Greys => colorgrad::greys(),
            Colormap::Viridis => colorgrad::viridis(),
            Colormap::Magma => colorgrad::magma(),
            Colormap::Inferno => colorgrad::inferno(),
            Colormap::Plasma => colorgrad::plasma(),
            Colormap::Cividis => colorgrad::cividis(),
            Colormap::Turbo => colorgrad::turbo(),
            Colormap::Spectral => colorgrad::spectral(),
            Colormap::Rainbow => colorgrad::rainbow(),
            Colormap::Sinebow => colorgrad::sinebow(),
        };
        Some(g)
    }

    /// Build a lookup ramp for repeated sampling.
    pub fn ramp(self) -> ColorRamp {
        ColorRamp {
            gradient: self.gradient(),
        }
    }
}

impl fmt::Display for Colormap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Colormap {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let lower = match lower.as_str() {
            "grey" | "greys_r" => "gray",
            "gray_r" | "grey_r" => "greys",
            other => other,
        };
        Colormap::ALL
            .into_iter()
            .find(|c| c.name() == lower)
            .ok_or_else(|| ConvertError::UnknownColormap(s.to_string()))
    }
}

pub struct ColorRamp {
    gradient: Option<colorgrad::Gradient>,
}

impl ColorRamp {
    /// Sample at `t`, clamped to [0, 1].
    pub fn rgba8(&self, t: f64) -> [u8; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match &self.gradient {
            None => {
                let v = (t * 255.0).round() as u8;
                [v, v, v, 255]
            }
            Some(g) => g.at(t).to_rgba8(),
        }
    }
}

/// Maps values onto [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalize {
    pub vmin: f64,
    pub vmax: f64,
    /// Quantize into this many equal bands (>= 2).
    pub levels: Option<usize>,
}

impl Normalize {
    /// Min/max over written cells. An empty raster gives [0, 1].
    pub fn from_data(value_im: &ValueIm, mask_im: &MaskIm) -> Self {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for (v, m) in value_im.arr.iter().zip(mask_im.arr.iter()) {
            if *m == 0 || !v.is_finite() {
                continue;
            }
            lo = lo.min(*v as f64);
            hi = hi.max(*v as f64);
        }
        if lo > hi {
            lo = 0.0;
            hi = 1.0;
        }
        Self {
            vmin: lo,
            vmax: hi,
            levels: None,
        }
    }

    /// Replace either bound when given.
    pub fn with_bounds(mut self, vmin: Option<f64>, vmax: Option<f64>) -> Self {
        if let Some(v) = vmin {
            self.vmin = v;
        }
        if let Some(v) = vmax {
            self.vmax = v;
        }
        self
    }

    pub fn with_levels(mut self, levels: Option<usize>) -> Self {
        self.levels = levels;
        self
    }

    pub fn t(&self, v: f64) -> f64 {
        let span = self.vmax - self.vmin;
        let t = if span > 0.0 {
            ((v - self.vmin) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        match self.levels {
            Some(n) if n >= 2 => {
                let band = ((t * n as f64).floor() as usize).min(n - 1);
                band as f64 / (n - 1) as f64
            }
            _ => t,
        }
    }
}
