//! Two-column `(linear-index, value)` CSV input.
//!
//! Rows are read as raw bytes and coerced field by field. A row whose index or
//! value column is missing, non-numeric, non-finite, or not valid UTF-8 is
//! dropped and counted rather than failing the whole file.

use crate::error::ConvertResult;
use log::{debug, warn};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Record {
    pub idx: i64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvOptions {
    pub has_header: bool,
    pub delimiter: u8,
    pub idx_column: usize,
    pub value_column: usize,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            has_header: true,
            delimiter: b',',
            idx_column: 0,
            value_column: 1,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReadStats {
    /// Data rows seen, header excluded.
    pub rows: usize,
    pub dropped_non_numeric: usize,
    /// Rows with fewer fields than the highest configured column.
    pub dropped_short: usize,
}

impl ReadStats {
    pub fn kept(&self) -> usize {
        self.rows - self.dropped_non_numeric - self.dropped_short
    }
}

fn parse_numeric(field: &[u8]) -> Option<f64> {
    let s = std::str::from_utf8(field).ok()?;
    let v: f64 = s.trim().parse().ok()?;
    v.is_finite().then_some(v)
}

pub fn read_records<R: Read>(
    reader: R,
    opts: &CsvOptions,
) -> ConvertResult<(Vec<Record>, ReadStats)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(opts.has_header)
        .delimiter(opts.delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let min_fields = opts.idx_column.max(opts.value_column) + 1;
    let mut records: Vec<Record> = Vec::new();
    let mut stats = ReadStats::default();
    let mut row = csv::ByteRecord::new();

    while rdr.read_byte_record(&mut row)? {
        stats.rows += 1;

        if row.len() < min_fields {
            stats.dropped_short += 1;
            continue;
        }

        let idx = parse_numeric(&row[opts.idx_column]);
        let value = parse_numeric(&row[opts.value_column]);
        match (idx, value) {
            (Some(idx), Some(value)) => {
                // Truncate toward zero; `as` saturates on huge magnitudes.
                records.push(Record {
                    idx: idx.trunc() as i64,
                    value,
                });
            }
            _ => {
                stats.dropped_non_numeric += 1;
                if stats.dropped_non_numeric == 1 {
                    let line = row.position().map(|p| p.line()).unwrap_or(0);
                    debug!("first non-numeric row at line {line}");
                }
            }
        }
    }

    let dropped = stats.dropped_non_numeric + stats.dropped_short;
    if dropped > 0 {
        warn!(
            "dropped {dropped} of {} rows ({} non-numeric, {} short)",
            stats.rows, stats.dropped_non_numeric, stats.dropped_short
        );
    }

    Ok((records, stats))
}

pub fn read_records_from_path<P: AsRef<Path>>(
    path: P,
    opts: &CsvOptions,
) -> ConvertResult<(Vec<Record>, ReadStats)> {
    let file = File::open(path)?;
    read_records(file, opts)
}

/// Parse a delimiter argument: a single ASCII character, `\t`, or one of the
/// names `tab`, `comma`, `semicolon`, `space`, `pipe`.
pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s.to_ascii_lowercase().as_str() {
        "\\t" | "tab" => return Ok(b'\t'),
        "comma" => return Ok(b','),
        "semicolon" => return Ok(b';'),
        "space" => return Ok(b' '),
        "pipe" => return Ok(b'|'),
        _ => {}
    }

    let bytes = s.as_bytes();
    if bytes.len() == 1 && bytes[0].is_ascii() {
        Ok(bytes[0])
    } else {
        Err(format!("delimiter must be a single ASCII character, got '{s}'"))
    }
}
