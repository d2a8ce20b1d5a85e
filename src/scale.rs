//! Scale functions for data-to-visual mappings.
//!
//! Scales transform data values to visual properties (position, color).
//! Based on the Grammar of Graphics [Wilkinson 2005].

use std::collections::HashMap;
use std::hash::Hash;

use trueno::Vector;

use crate::color::{rainbow, Rgba};
use crate::error::{Error, Result};

/// Trait for scale functions that map domain values to range values.
pub trait Scale<D, R> {
    /// Transform a domain value to a range value.
    fn scale(&self, value: D) -> R;

    /// Get the domain extent.
    fn domain(&self) -> (D, D);

    /// Get the range extent.
    fn range(&self) -> (R, R);
}

/// Linear scale for continuous-to-continuous mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_min: f32,
    domain_max: f32,
    range_min: f32,
    range_max: f32,
}

impl LinearScale {
    /// Create a new linear scale.
    ///
    /// # Errors
    ///
    /// Returns an error if `domain_min` equals `domain_max` or either bound is not finite.
    pub fn new(domain: (f32, f32), range: (f32, f32)) -> Result<Self> {
        if !domain.0.is_finite() || !domain.1.is_finite() {
            return Err(Error::ScaleDomain("Domain bounds must be finite".to_string()));
        }
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }

        Ok(Self {
            domain_min: domain.0,
            domain_max: domain.1,
            range_min: range.0,
            range_max: range.1,
        })
    }

    /// Create a scale over the extent of the finite values in `data`.
    ///
    /// Non-finite values are ignored. An empty extent falls back to `[0, 1]` and a
    /// single-valued extent is widened by one unit on each side, so the result is
    /// always usable for layout.
    #[must_use]
    pub fn from_extent<I: IntoIterator<Item = f32>>(data: I, range: (f32, f32)) -> Self {
        let (min, max) = extent(data).unwrap_or((0.0, 1.0));
        let (min, max) =
            if (max - min).abs() < f32::EPSILON { (min - 1.0, max + 1.0) } else { (min, max) };
        Self { domain_min: min, domain_max: max, range_min: range.0, range_max: range.1 }
    }

    /// Extend the domain to round tick boundaries.
    #[must_use]
    pub fn nice(mut self, count: usize) -> Self {
        let reversed = self.domain_max < self.domain_min;
        let (mut start, mut stop) = if reversed {
            (f64::from(self.domain_max), f64::from(self.domain_min))
        } else {
            (f64::from(self.domain_min), f64::from(self.domain_max))
        };

        let mut previous = None;
        for _ in 0..10 {
            let step = tick_increment(start, stop, count);
            if previous == Some(step) {
                break;
            }
            if step > 0.0 {
                start = (start / step).floor() * step;
                stop = (stop / step).ceil() * step;
            } else if step < 0.0 {
                start = (start * step).ceil() / step;
                stop = (stop * step).floor() / step;
            } else {
                break;
            }
            previous = Some(step);
        }

        if reversed {
            self.domain_min = stop as f32;
            self.domain_max = start as f32;
        } else {
            self.domain_min = start as f32;
            self.domain_max = stop as f32;
        }
        self
    }

    /// Approximately `count` round tick values inside the domain.
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f32> {
        let lo = f64::from(self.domain_min.min(self.domain_max));
        let hi = f64::from(self.domain_min.max(self.domain_max));
        let step = tick_increment(lo, hi, count);
        if step == 0.0 || !step.is_finite() {
            return Vec::new();
        }

        let mut ticks = Vec::new();
        if step > 0.0 {
            let (first, last) = ((lo / step).ceil() as i64, (hi / step).floor() as i64);
            ticks.extend((first..=last).map(|i| (i as f64 * step) as f32));
        } else {
            let inc = -step;
            let (first, last) = ((lo * inc).ceil() as i64, (hi * inc).floor() as i64);
            ticks.extend((first..=last).map(|i| (i as f64 / inc) as f32));
        }
        ticks
    }

    /// Invert the scale (range to domain).
    #[must_use]
    pub fn invert(&self, value: f32) -> f32 {
        let t = (value - self.range_min) / (self.range_max - self.range_min);
        self.domain_min + t * (self.domain_max - self.domain_min)
    }

    /// Same domain, different output range.
    #[must_use]
    pub fn with_range(mut self, range: (f32, f32)) -> Self {
        self.range_min = range.0;
        self.range_max = range.1;
        self
    }
}

impl Scale<f32, f32> for LinearScale {
    fn scale(&self, value: f32) -> f32 {
        let t = (value - self.domain_min) / (self.domain_max - self.domain_min);
        self.range_min + t * (self.range_max - self.range_min)
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (f32, f32) {
        (self.range_min, self.range_max)
    }
}

/// Min and max of the finite values, or `None` if there are none.
#[must_use]
pub fn extent<I: IntoIterator<Item = f32>>(data: I) -> Option<(f32, f32)> {
    let finite: Vec<f32> = data.into_iter().filter(|v| v.is_finite()).collect();
    let first = *finite.first()?;
    let values = Vector::from_vec(finite);
    Some((values.min().unwrap_or(first), values.max().unwrap_or(first)))
}

/// Step between nice ticks; negative values encode `1 / step` for sub-unit steps.
fn tick_increment(start: f64, stop: f64, count: usize) -> f64 {
    let step = (stop - start) / count.max(1) as f64;
    if step <= 0.0 || !step.is_finite() {
        return 0.0;
    }
    let power = step.log10().floor();
    let error = step / 10f64.powf(power);
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    if power >= 0.0 {
        factor * 10f64.powf(power)
    } else {
        -(10f64.powf(-power)) / factor
    }
}

/// Band scale: maps discrete labels to evenly spaced bands of a continuous range.
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    labels: Vec<String>,
    range_min: f32,
    range_max: f32,
    padding_inner: f32,
    padding_outer: f32,
    align: f32,
}

impl BandScale {
    /// Create a band scale with no padding.
    #[must_use]
    pub fn new(labels: Vec<String>, range: (f32, f32)) -> Self {
        Self {
            labels,
            range_min: range.0,
            range_max: range.1,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
        }
    }

    /// Set both inner and outer padding (fraction of a step).
    #[must_use]
    pub fn padding(mut self, padding: f32) -> Self {
        let padding = padding.clamp(0.0, 1.0);
        self.padding_inner = padding;
        self.padding_outer = padding;
        self
    }

    /// Replace the label domain, keeping range and padding.
    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    /// The label domain in band order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Distance between the starts of adjacent bands.
    #[must_use]
    pub fn step(&self) -> f32 {
        let n = self.labels.len() as f32;
        let slots = (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        (self.range_max - self.range_min) / slots
    }

    /// Width of each band.
    #[must_use]
    pub fn bandwidth(&self) -> f32 {
        self.step() * (1.0 - self.padding_inner)
    }

    /// Start of the band for `label`, or `None` if the label is not in the domain.
    #[must_use]
    pub fn position(&self, label: &str) -> Option<f32> {
        let index = self.labels.iter().position(|l| l == label)?;
        Some(self.start() + self.step() * index as f32)
    }

    /// Center of the band for `label`.
    #[must_use]
    pub fn center(&self, label: &str) -> Option<f32> {
        self.position(label).map(|x| x + self.bandwidth() / 2.0)
    }

    fn start(&self) -> f32 {
        let n = self.labels.len() as f32;
        let step = self.step();
        let slack = self.range_max - self.range_min - step * (n - self.padding_inner);
        self.range_min + slack * self.align
    }
}

/// Ordinal scale assigning palette colors to keys in order of first appearance.
///
/// Keys outside the configured domain map as if appended to it, so lookups are
/// total and deterministic.
#[derive(Debug, Clone)]
pub struct OrdinalScale<K> {
    index: HashMap<K, usize>,
    palette: Vec<Rgba>,
}

impl<K: Eq + Hash + Clone> OrdinalScale<K> {
    /// Create a scale over `keys` (duplicates keep their first position).
    ///
    /// # Errors
    ///
    /// Returns an error if the palette is empty.
    pub fn new<I: IntoIterator<Item = K>>(keys: I, palette: &[Rgba]) -> Result<Self> {
        if palette.is_empty() {
            return Err(Error::ScaleDomain("Ordinal scale requires at least one color".to_string()));
        }
        let mut index = HashMap::new();
        for key in keys {
            let next = index.len();
            index.entry(key).or_insert(next);
        }
        Ok(Self { index, palette: palette.to_vec() })
    }

    /// Color for `key`.
    #[must_use]
    pub fn get(&self, key: &K) -> Rgba {
        let position = self.index.get(key).copied().unwrap_or(self.index.len());
        self.palette[position % self.palette.len()]
    }

    /// Number of keys in the domain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the domain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// Sequential color scale driven by the cyclical rainbow interpolator.
///
/// Values are normalized against the domain without clamping; the interpolator
/// wraps, so values past either end continue around the color cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CyclicalColorScale {
    domain_min: f32,
    domain_max: f32,
}

impl CyclicalColorScale {
    /// Create a new cyclical scale.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain is empty.
    pub fn new(domain: (f32, f32)) -> Result<Self> {
        if (domain.0 - domain.1).abs() < f32::EPSILON {
            return Err(Error::ScaleDomain("Domain min and max cannot be equal".to_string()));
        }
        Ok(Self { domain_min: domain.0, domain_max: domain.1 })
    }
}

impl Scale<f32, Rgba> for CyclicalColorScale {
    fn scale(&self, value: f32) -> Rgba {
        rainbow((value - self.domain_min) / (self.domain_max - self.domain_min))
    }

    fn domain(&self) -> (f32, f32) {
        (self.domain_min, self.domain_max)
    }

    fn range(&self) -> (Rgba, Rgba) {
        (rainbow(0.0), rainbow(1.0))
    }
}
