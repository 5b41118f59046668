use csv2tiff::colormap::Colormap;
use csv2tiff::desc::{parse_convert_json, ConvertDesc};
use csv2tiff::im::{Compression, TiffOptions};
use csv2tiff::records::CsvOptions;
use csv2tiff::render::{RenderMode, RenderOptions};
use csv2tiff::{ConvertOptions, Converter};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;

fn write_csv(dir: &TempDir, name: &str, text: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, text).unwrap();
    path
}

fn base_options(file: PathBuf, output: PathBuf, w: usize, h: usize) -> ConvertOptions {
    ConvertOptions {
        file,
        output,
        width: w,
        height: h,
        csv: CsvOptions::default(),
        background: f32::NAN,
        render: RenderOptions::default(),
        tiff: TiffOptions::default(),
        preview: None,
    }
}

fn decode(path: &Path) -> ((u32, u32), tiff::ColorType, DecodingResult) {
    let mut decoder = Decoder::new(File::open(path).unwrap()).unwrap();
    let dims = decoder.dimensions().unwrap();
    let color = decoder.colortype().unwrap();
    (dims, color, decoder.read_image().unwrap())
}

#[test]
fn float_tiff_has_values_at_divmod_positions_and_nan_elsewhere() {
    let dir = TempDir::new().unwrap();
    let file = write_csv(&dir, "classes.csv", "pixel,class\n0,3\n6,1\n11,2\n");
    let output = dir.path().join("classes.tiff");

    let converter = Converter::new(base_options(file, output.clone(), 4, 3)).unwrap();
    let report = converter.convert().unwrap();
    assert_eq!(report.scatter.written, 3);

    let (dims, color, data) = decode(&output);
    assert_eq!(dims, (4, 3));
    assert_eq!(color, tiff::ColorType::Gray(32));
    let DecodingResult::F32(px) = data else {
        panic!("expected f32 samples");
    };

    // 6 -> row 1, col 2; 11 -> row 2, col 3.
    assert_eq!(px[0], 3.0);
    assert_eq!(px[4 + 2], 1.0);
    assert_eq!(px[2 * 4 + 3], 2.0);
    let nan_count = px.iter().filter(|v| v.is_nan()).count();
    assert_eq!(nan_count, 12 - 3);
}

#[test]
fn colormap_with_alpha_and_dpi() {
    let dir = TempDir::new().unwrap();
    let file = write_csv(&dir, "classes.csv", "i;c\n0;0\n3;10\n");
    let output = dir.path().join("map.tiff");

    let mut opts = base_options(file, output.clone(), 2, 2);
    opts.csv.delimiter = b';';
    opts.render = RenderOptions {
        mode: RenderMode::Colormap,
        colormap: Colormap::Plasma,
        alpha: true,
        ..RenderOptions::default()
    };
    opts.tiff = TiffOptions {
        dpi: Some(72),
        compression: Compression::Deflate,
    };

    Converter::new(opts).unwrap().convert().unwrap();

    let (dims, color, data) = decode(&output);
    assert_eq!(dims, (2, 2));
    assert_eq!(color, tiff::ColorType::RGBA(8));
    let DecodingResult::U8(px) = data else {
        panic!("expected u8 samples");
    };
    let alphas: Vec<u8> = px.chunks_exact(4).map(|p| p[3]).collect();
    assert_eq!(alphas, vec![255, 0, 0, 255]);

    let ramp = Colormap::Plasma.ramp();
    assert_eq!(&px[0..3], &ramp.rgba8(0.0)[0..3]);
    assert_eq!(&px[12..15], &ramp.rgba8(1.0)[0..3]);

    let mut decoder = Decoder::new(File::open(&output).unwrap()).unwrap();
    let y_res = decoder.get_tag(Tag::YResolution).unwrap();
    let tiff::decoder::ifd::Value::Rational(n, d) = y_res else {
        panic!("expected rational y resolution, got {y_res:?}");
    };
    assert_eq!((n, d), (72, 1));
}

#[test]
fn headerless_gray8_output() {
    let dir = TempDir::new().unwrap();
    let file = write_csv(&dir, "raw.csv", "0,0\n1,50\n2,100\n");
    let output = dir.path().join("gray.tiff");

    let mut opts = base_options(file, output.clone(), 4, 1);
    opts.csv.has_header = false;
    opts.render.mode = RenderMode::Gray8;

    let report = Converter::new(opts).unwrap().convert().unwrap();
    assert_eq!(report.read.rows, 3);

    let (_, color, data) = decode(&output);
    assert_eq!(color, tiff::ColorType::Gray(8));
    let DecodingResult::U8(px) = data else {
        panic!("expected u8 samples");
    };
    assert_eq!(px, vec![0, 128, 255, 0]);
}

#[test]
fn config_file_options_with_flag_overlay() {
    let dir = TempDir::new().unwrap();
    let file = write_csv(&dir, "c.csv", "i,c\n1,4\n");
    let output = dir.path().join("cfg.tiff");

    let json = format!(
        r#"{{ "file": {:?}, "output": {:?}, "width": 9, "height": 1, "background": 0 }}"#,
        file.to_str().unwrap(),
        output.to_str().unwrap()
    );
    let base = parse_convert_json(&json).unwrap();
    let flags = ConvertDesc {
        width: Some(2),
        ..ConvertDesc::default()
    };

    let opts = base.overlay(flags).into_options().unwrap();
    Converter::new(opts).unwrap().convert().unwrap();

    let (dims, _, data) = decode(&output);
    assert_eq!(dims, (2, 1));
    let DecodingResult::F32(px) = data else {
        panic!("expected f32 samples");
    };
    assert_eq!(px, vec![0.0, 4.0]);
}

#[cfg(feature = "im-io")]
#[test]
fn preview_png_is_written_next_to_tiff() {
    let dir = TempDir::new().unwrap();
    let file = write_csv(&dir, "c.csv", "i,c\n0,1\n1,2\n");
    let output = dir.path().join("p.tiff");
    let preview = dir.path().join("p.png");

    let mut opts = base_options(file, output.clone(), 2, 1);
    opts.preview = Some(preview.clone());
    let report = Converter::new(opts).unwrap().convert().unwrap();

    assert!(output.exists());
    assert!(preview.exists());
    assert_eq!(report.preview, Some(preview));
}

#[test]
fn out_of_range_rows_do_not_fail_the_run() {
    let dir = TempDir::new().unwrap();
    let file = write_csv(&dir, "c.csv", "i,c\n-1,1\n4,1\nfoo,bar\n3,2\n");
    let output = dir.path().join("oob.tiff");

    let report = Converter::new(base_options(file, output, 2, 2))
        .unwrap()
        .convert()
        .unwrap();

    assert_eq!(report.read.rows, 4);
    assert_eq!(report.read.dropped_non_numeric, 1);
    assert_eq!(report.scatter.out_of_bounds, 2);
    assert_eq!(report.scatter.written, 1);
}
