use crate::im::{index_to_xy, MaskIm, ValueIm};
use crate::records::Record;
use log::warn;
use serde::Serialize;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScatterStats {
    /// In-bounds writes, overwrites included.
    pub written: usize,
    pub out_of_bounds: usize,
    /// Writes that landed on an already-written cell.
    pub overwritten: usize,
}

/// Write each record's value at `(idx % w, idx / w)`.
///
/// The mask marks written cells with 255. Later records win on duplicate
/// indices. Out-of-range indices, negative ones included, are dropped.
pub fn scatter(records: &[Record], value_im: &mut ValueIm, mask_im: &mut MaskIm) -> ScatterStats {
    assert_eq!(value_im.w, mask_im.w, "width mismatch");
    assert_eq!(value_im.h, mask_im.h, "height mismatch");

    let mut stats = ScatterStats::default();
    for rec in records {
        let Some((x, y)) = index_to_xy(rec.idx, value_im.w, value_im.h) else {
            stats.out_of_bounds += 1;
            continue;
        };

        // SAFETY: index_to_xy only returns coordinates inside w x h.
        unsafe {
            let m = mask_im.get_unchecked_mut(x, y, 0);
            if *m != 0 {
                stats.overwritten += 1;
            }
            *m = 255;
            *value_im.get_unchecked_mut(x, y, 0) = rec.value as f32;
        }
        stats.written += 1;
    }

    if stats.out_of_bounds > 0 {
        warn!(
            "{} indices fell outside the {}x{} grid and were dropped",
            stats.out_of_bounds, value_im.w, value_im.h
        );
    }

    stats
}
