//! Convert a CSV of (linear-index, value) pairs into a TIFF raster.

use anyhow::{Context, Result};
use clap::Parser;
use csv2tiff::desc::{parse_background, parse_convert_json, ConvertDesc};
use csv2tiff::im::Compression;
use csv2tiff::records::parse_delimiter;
use csv2tiff::render::RenderMode;
use csv2tiff::Converter;
use log::error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert CSV to TIFF")]
struct Args {
    /// CSV file to convert
    #[arg(long)]
    file: Option<PathBuf>,

    /// Output TIFF file name [default: output.tiff]
    #[arg(long)]
    output: Option<PathBuf>,

    /// Width of the output image
    #[arg(long)]
    width: Option<usize>,

    /// Height of the output image
    #[arg(long)]
    height: Option<usize>,

    /// Skip the first row as a header (the default)
    #[arg(long, overrides_with = "no_header")]
    header: bool,

    /// Treat the first row as data instead of a header
    #[arg(long, overrides_with = "header")]
    no_header: bool,

    /// Field delimiter: a single character, or tab/comma/semicolon/space/pipe
    #[arg(long, value_parser = parse_delimiter_arg)]
    delimiter: Option<String>,

    /// Zero-based column holding the linear index [default: 0]
    #[arg(long)]
    idx_column: Option<usize>,

    /// Zero-based column holding the value [default: 1]
    #[arg(long)]
    value_column: Option<usize>,

    /// Value of cells no row writes: a number or "nan" [default: nan]
    #[arg(long, value_parser = parse_background, allow_hyphen_values = true)]
    background: Option<f32>,

    /// How values become pixels: float32, gray8 or colormap [default: float32]
    #[arg(long)]
    mode: Option<RenderMode>,

    /// Colormap for colormap mode [default: viridis]
    #[arg(long)]
    colormap: Option<String>,

    /// Add an alpha channel, transparent where no row wrote
    #[arg(long, overrides_with = "no_alpha")]
    alpha: bool,

    /// Write no alpha channel, even if the config asks for one
    #[arg(long, overrides_with = "alpha")]
    no_alpha: bool,

    /// Lower bound for normalization (defaults to the data minimum)
    #[arg(long, allow_hyphen_values = true)]
    vmin: Option<f64>,

    /// Upper bound for normalization (defaults to the data maximum)
    #[arg(long, allow_hyphen_values = true)]
    vmax: Option<f64>,

    /// Quantize normalized values into this many discrete bands
    #[arg(long)]
    levels: Option<usize>,

    /// Resolution written into the TIFF, in dots per inch
    #[arg(long)]
    dpi: Option<u32>,

    /// TIFF compression: none, lzw, deflate or packbits [default: none]
    #[arg(long)]
    compression: Option<Compression>,

    /// Also write an 8-bit PNG preview here
    #[arg(long)]
    preview: Option<PathBuf>,

    /// JSON file with default options; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long, default_value_t = false)]
    report_json: bool,
}

fn parse_delimiter_arg(s: &str) -> Result<String, String> {
    parse_delimiter(s).map(|_| s.to_string())
}

/// `Some` only when one of a `--x`/`--no-x` pair was given.
fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl Args {
    fn to_desc(&self) -> ConvertDesc {
        ConvertDesc {
            file: self.file.clone(),
            output: self.output.clone(),
            width: self.width,
            height: self.height,
            header: flag_pair(self.header, self.no_header),
            delimiter: self.delimiter.clone(),
            idx_column: self.idx_column,
            value_column: self.value_column,
            background: self.background,
            mode: self.mode,
            colormap: self.colormap.clone(),
            alpha: flag_pair(self.alpha, self.no_alpha),
            vmin: self.vmin,
            vmax: self.vmax,
            levels: self.levels,
            dpi: self.dpi,
            compression: self.compression,
            preview: self.preview.clone(),
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let base = match &args.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            parse_convert_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => ConvertDesc::default(),
    };

    let opts = base.overlay(args.to_desc()).into_options()?;
    let converter = Converter::new(opts)?;
    let report = converter.convert()?;

    log::info!(
        "done: {} cells written, {} out of bounds, {} rows dropped",
        report.scatter.written,
        report.scatter.out_of_bounds,
        report.read.dropped_non_numeric + report.read.dropped_short
    );

    if args.report_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("conversion failed: {e:#}");
            println!("An error occurred: {e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("csv2tiff").chain(flags.iter().copied())).unwrap()
    }

    #[test]
    fn header_and_alpha_flags_are_tri_state() {
        let desc = parse(&[]).to_desc();
        assert_eq!((desc.header, desc.alpha), (None, None));

        let desc = parse(&["--header", "--no-alpha"]).to_desc();
        assert_eq!((desc.header, desc.alpha), (Some(true), Some(false)));

        let desc = parse(&["--no-header", "--alpha"]).to_desc();
        assert_eq!((desc.header, desc.alpha), (Some(false), Some(true)));
    }

    #[test]
    fn last_of_a_flag_pair_wins() {
        let desc = parse(&["--no-header", "--header", "--alpha", "--no-alpha"]).to_desc();
        assert_eq!((desc.header, desc.alpha), (Some(true), Some(false)));
    }

    #[test]
    fn mode_and_compression_use_library_names() {
        let desc = parse(&["--mode", "gray8", "--compression", "deflate"]).to_desc();
        assert_eq!(desc.mode, Some(RenderMode::Gray8));
        assert_eq!(desc.compression, Some(Compression::Deflate));

        assert!(Args::try_parse_from(["csv2tiff", "--mode", "rgb"]).is_err());
        assert!(Args::try_parse_from(["csv2tiff", "--compression", "zip"]).is_err());
    }
}
