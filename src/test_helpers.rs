use crate::im::{MaskIm, ValueIm};

/// Build a value raster from an ASCII grid.
/// `.` is an unwritten (NaN) cell, `0-9` and `A-Z` are the values 0..=35.
pub fn value_im_from_ascii(grid: &str) -> (ValueIm, MaskIm) {
    let rows: Vec<&str> = grid
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let h = rows.len();
    assert!(h > 0, "grid must have at least one non-empty row");
    let w = rows[0].len();
    assert!(w > 0, "grid rows must be non-empty");
    for r in &rows {
        assert_eq!(r.len(), w, "all rows must have equal length");
    }

    let mut value_im = ValueIm::new_filled(w, h, f32::NAN);
    let mut mask_im = MaskIm::new(w, h);
    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            if ch == '.' {
                continue;
            }
            let v = ch
                .to_digit(36)
                .unwrap_or_else(|| panic!("invalid value char '{ch}'"));
            value_im.arr[y * value_im.s + x] = v as f32;
            mask_im.arr[y * mask_im.s + x] = 255;
        }
    }
    (value_im, mask_im)
}

/// Inverse of `value_im_from_ascii`. Non-integral or out-of-range values print `*`.
pub fn value_im_to_ascii(im: &ValueIm) -> String {
    let mut out = String::new();
    for y in 0..im.h {
        for x in 0..im.w {
            let v = im.arr[y * im.s + x];
            let ch = if v.is_nan() {
                '.'
            } else if v.fract() == 0.0 && (0.0..36.0).contains(&v) {
                char::from_digit(v as u32, 36)
                    .map(|c| c.to_ascii_uppercase())
                    .unwrap_or('*')
            } else {
                '*'
            };
            out.push(ch);
        }
        out.push('\n');
    }
    out
}
