//! Histogram density overlay and data-driven bounds for range controls.

use super::{Interpolator1D, Method};

/// Peak height of the density curve relative to the bar height.
pub const DENSITY_GAIN: f64 = 0.9;

/// Methods tried in turn until one accepts the number of bins.
const DENSITY_METHODS: [Method; 3] = [Method::Akima, Method::Steffen, Method::Linear];

/// Bin centers and masses from an external supplier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HistogramBins {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl HistogramBins {
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Self {
        Self { x, y }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    /// Both sequences have the same, non-zero length.
    pub fn is_consistent(&self) -> bool {
        !self.x.is_empty() && self.x.len() == self.y.len()
    }

    /// Smallest and largest bin center.
    pub fn x_range(&self) -> Option<(f64, f64)> {
        let mut iter = self.x.iter().copied().filter(|v| !v.is_nan());
        let first = iter.next()?;
        Some(iter.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }

    pub fn y_max(&self) -> Option<f64> {
        self.y
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .reduce(f64::max)
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
    }
}

/// Bounds that cover the bins without dropping the current selection.
pub fn autorange_bounds(bins: &HistogramBins, value0: f64, value1: f64) -> Option<(f64, f64)> {
    let (xmin, xmax) = bins.x_range()?;
    Some((value0.min(xmin), value1.max(xmax)))
}

/// Normalized density heights at `samples` evenly spaced positions over
/// `[vmin, vmax]`.
///
/// Each height is `DENSITY_GAIN · f(v) / max(y)` clamped to `[0, 1]`. Positions
/// outside the bin domain are zero and never reach the interpolant.
pub fn density_profile(bins: &HistogramBins, vmin: f64, vmax: f64, samples: usize) -> Vec<f64> {
    let mut heights = vec![0.0; samples];
    if samples == 0 || !bins.is_consistent() {
        return heights;
    }
    let Some(bmax) = bins.y_max().filter(|m| *m > 0.0) else {
        return heights;
    };
    let Some(interp) = DENSITY_METHODS
        .iter()
        .find_map(|method| Interpolator1D::new(&bins.x, &bins.y, *method).ok())
    else {
        log::warn!("No interpolation method accepts {} bins", bins.len());
        return heights;
    };

    let step = if samples > 1 {
        1.0 / (samples - 1) as f64
    } else {
        0.0
    };
    for (k, height) in heights.iter_mut().enumerate() {
        let v = vmin + k as f64 * step * (vmax - vmin);
        if interp.contains(v) {
            *height = (DENSITY_GAIN * interp.eval(v) / bmax).clamp(0.0, 1.0);
        }
    }
    heights
}
