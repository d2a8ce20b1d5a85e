//! Fixed-width binning over a known domain.

/// One histogram bin covering `[x0, x1)` (the last bin also includes `x1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Lower edge.
    pub x0: f32,
    /// Upper edge.
    pub x1: f32,
    /// Number of values in the bin.
    pub count: usize,
}

impl Bin {
    /// Midpoint of the bin.
    #[must_use]
    pub fn center(&self) -> f32 {
        (self.x0 + self.x1) / 2.0
    }
}

/// Count `values` into `bins` equal-width bins spanning `domain`.
///
/// Values outside the domain and non-finite values are ignored. A zero bin
/// count or an empty/inverted domain yields no bins.
#[must_use]
pub fn bin_counts<I>(values: I, domain: (f32, f32), bins: usize) -> Vec<Bin>
where
    I: IntoIterator<Item = f32>,
{
    let (lo, hi) = domain;
    if bins == 0 || !lo.is_finite() || !hi.is_finite() || hi <= lo {
        return Vec::new();
    }

    let width = (hi - lo) / bins as f32;
    let mut out: Vec<Bin> = (0..bins)
        .map(|i| {
            let x1 = if i + 1 == bins { hi } else { lo + width * (i + 1) as f32 };
            Bin { x0: lo + width * i as f32, x1, count: 0 }
        })
        .collect();

    for value in values {
        if !value.is_finite() || value < lo || value > hi {
            continue;
        }
        let idx = (((value - lo) / width).floor() as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

/// Smallest and largest bin count, or `(0, 0)` for no bins.
#[must_use]
pub fn count_extent(bins: &[Bin]) -> (usize, usize) {
    let min = bins.iter().map(|b| b.count).min().unwrap_or(0);
    let max = bins.iter().map(|b| b.count).max().unwrap_or(0);
    (min, max)
}
