#[derive(Debug, Clone)]
pub struct Im<T, const N_CH: usize> {
    pub w: usize,
    pub h: usize,
    pub s: usize, // stride in elements (w * N_CH)
    pub arr: Vec<T>,
}

// Constructors
// -----------------------------------------------------------------------------
impl<T: Copy + Default, const N_CH: usize> Im<T, N_CH> {
    pub fn new(w: usize, h: usize) -> Self {
        let s = w * N_CH;
        let arr = vec![T::default(); s * h];
        Self { w, h, s, arr }
    }
}

impl<T: Copy, const N_CH: usize> Im<T, N_CH> {
    /// Allocate with every channel of every pixel set to `bg`.
    pub fn new_filled(w: usize, h: usize, bg: T) -> Self {
        let s = w * N_CH;
        let arr = vec![bg; s * h];
        Self { w, h, s, arr }
    }
}

// Access
// -----------------------------------------------------------------------------
impl<T, const N_CH: usize> Im<T, N_CH> {
    #[inline(always)]
    pub unsafe fn get_unchecked(&self, x: usize, y: usize, ch: usize) -> &T {
        unsafe { self.arr.get_unchecked(y * self.s + x * N_CH + ch) }
    }

    #[inline(always)]
    pub unsafe fn get_unchecked_mut(&mut self, x: usize, y: usize, ch: usize) -> &mut T {
        unsafe { self.arr.get_unchecked_mut(y * self.s + x * N_CH + ch) }
    }

    #[inline(always)]
    pub fn in_bounds(&self, x: usize, y: usize, ch: usize) -> bool {
        x < self.w && y < self.h && ch < N_CH
    }

    pub fn get(&self, x: usize, y: usize, ch: usize) -> Option<&T> {
        if !self.in_bounds(x, y, ch) {
            return None;
        }
        Some(unsafe { self.get_unchecked(x, y, ch) })
    }

    /// Returns false (and writes nothing) when out of bounds.
    pub fn set(&mut self, x: usize, y: usize, ch: usize, v: T) -> bool {
        if !self.in_bounds(x, y, ch) {
            return false;
        }
        unsafe {
            *self.get_unchecked_mut(x, y, ch) = v;
        }
        true
    }
}

/// Map a row-major linear index onto `(x, y)` for a `w` x `h` grid.
/// `y = idx / w`, `x = idx % w`. Negative or past-the-end indices give `None`.
pub fn index_to_xy(idx: i64, w: usize, h: usize) -> Option<(usize, usize)> {
    if idx < 0 || w == 0 {
        return None;
    }
    let idx = usize::try_from(idx).ok()?;
    let n = w.checked_mul(h)?;
    if idx >= n {
        return None;
    }
    Some((idx % w, idx / w))
}

pub type ValueIm = Im<f32, 1>;
pub type MaskIm = Im<u8, 1>;
pub type Gray8Im = Im<u8, 1>;
pub type Rgb8Im = Im<u8, 3>;
pub type Rgba8Im = Im<u8, 4>;
