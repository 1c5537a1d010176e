//! Paired lower/upper values inside common bounds.

use serde::{Deserialize, Serialize};

/// Which of the two range values an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeHandle {
    Lower,
    Upper,
}

impl RangeHandle {
    pub fn other(self) -> Self {
        match self {
            Self::Lower => Self::Upper,
            Self::Upper => Self::Lower,
        }
    }
}

/// Whether setting one value is limited by the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RangeOrdering {
    /// `value0 <= value1` always holds after a set.
    #[default]
    Enforced,
    /// Each value is only clamped to the outer bounds and may cross the other.
    Relaxed,
}

/// An ordered pair `(value0, value1)` inside `[vmin, vmax]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeValue {
    value0: f64,
    value1: f64,
    vmin: f64,
    vmax: f64,
    init0: f64,
    init1: f64,
    ordering: RangeOrdering,
}

impl RangeValue {
    /// Create a range. Bounds are reordered if swapped and both values clamped.
    pub fn new(value0: f64, value1: f64, vmin: f64, vmax: f64) -> Self {
        let (vmin, vmax) = if vmin > vmax { (vmax, vmin) } else { (vmin, vmax) };
        let value0 = clamp_f64(value0, vmin, vmax);
        let value1 = clamp_f64(value1, vmin, vmax);
        Self {
            value0,
            value1,
            vmin,
            vmax,
            init0: value0,
            init1: value1,
            ordering: RangeOrdering::default(),
        }
    }

    /// Set the default ordering used by [`RangeValue::set`].
    pub fn with_ordering(mut self, ordering: RangeOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn ordering(&self) -> RangeOrdering {
        self.ordering
    }

    pub fn get(&self, handle: RangeHandle) -> f64 {
        match handle {
            RangeHandle::Lower => self.value0,
            RangeHandle::Upper => self.value1,
        }
    }

    pub fn value0(&self) -> f64 {
        self.value0
    }

    pub fn value1(&self) -> f64 {
        self.value1
    }

    pub fn vmin(&self) -> f64 {
        self.vmin
    }

    pub fn vmax(&self) -> f64 {
        self.vmax
    }

    pub fn init(&self) -> (f64, f64) {
        (self.init0, self.init1)
    }

    /// Set one value using the configured ordering.
    pub fn set(&mut self, handle: RangeHandle, value: f64) -> bool {
        self.set_with(handle, value, self.ordering)
    }

    /// Set one value with an explicit ordering for this call only.
    pub fn set_with(&mut self, handle: RangeHandle, value: f64, ordering: RangeOrdering) -> bool {
        if value.is_nan() {
            return false;
        }
        let (lo, hi) = match (ordering, handle) {
            (RangeOrdering::Relaxed, _) => (self.vmin, self.vmax),
            (RangeOrdering::Enforced, RangeHandle::Lower) => (self.vmin, self.value1),
            (RangeOrdering::Enforced, RangeHandle::Upper) => (self.value0, self.vmax),
        };
        let value = clamp_f64(value, lo, hi);
        let slot = match handle {
            RangeHandle::Lower => &mut self.value0,
            RangeHandle::Upper => &mut self.value1,
        };
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    /// Set both values against the outer bounds only. Returns true if either changed.
    pub fn force(&mut self, value0: f64, value1: f64) -> bool {
        let changed0 = self.set_with(RangeHandle::Lower, value0, RangeOrdering::Relaxed);
        let changed1 = self.set_with(RangeHandle::Upper, value1, RangeOrdering::Relaxed);
        changed0 || changed1
    }

    /// Replace the outer bounds and re-clamp both values into them.
    pub fn set_bounds(&mut self, vmin: f64, vmax: f64) -> bool {
        let (vmin, vmax) = if vmin > vmax { (vmax, vmin) } else { (vmin, vmax) };
        self.vmin = vmin;
        self.vmax = vmax;
        self.force(self.value0, self.value1)
    }

    /// Normalized positions of both values, `(0, 1)` for a degenerate range.
    pub fn fractions(&self) -> (f64, f64) {
        let span = self.vmax - self.vmin;
        if span > 0.0 && span.is_finite() {
            (
                (self.value0 - self.vmin) / span,
                (self.value1 - self.vmin) / span,
            )
        } else {
            (0.0, 1.0)
        }
    }
}

fn clamp_f64(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enforced_ordering_blocks_crossing() {
        let mut r = RangeValue::new(0.2, 0.6, 0.0, 1.0);
        r.set(RangeHandle::Lower, 0.9);
        assert!((r.value0() - 0.6).abs() < f64::EPSILON);
        r.set(RangeHandle::Upper, 0.1);
        assert!((r.value1() - 0.6).abs() < f64::EPSILON);
        assert!(r.value0() <= r.value1());
    }

    #[test]
    fn test_relaxed_ordering_allows_crossing() {
        let mut r = RangeValue::new(0.2, 0.6, 0.0, 1.0).with_ordering(RangeOrdering::Relaxed);
        assert!(r.set(RangeHandle::Lower, 0.9));
        assert!((r.value0() - 0.9).abs() < f64::EPSILON);
        assert!(r.value0() > r.value1());
        r.set(RangeHandle::Upper, -4.0);
        assert!(r.value1().abs() < f64::EPSILON);
    }

    #[test]
    fn test_per_call_override() {
        let mut r = RangeValue::new(0.2, 0.6, 0.0, 1.0);
        assert!(r.set_with(RangeHandle::Lower, 0.8, RangeOrdering::Relaxed));
        assert!((r.value0() - 0.8).abs() < f64::EPSILON);
        assert_eq!(r.ordering(), RangeOrdering::Enforced);
    }

    #[test]
    fn test_force_reports_either_change() {
        let mut r = RangeValue::new(0.2, 0.6, 0.0, 1.0);
        assert!(!r.force(0.2, 0.6));
        assert!(r.force(0.2, 0.7));
        assert!(r.force(0.0, 1.0));
        assert_eq!(r.init(), (0.2, 0.6));
    }

    #[test]
    fn test_set_bounds_reclamps() {
        let mut r = RangeValue::new(2.0, 8.0, 0.0, 10.0);
        assert!(r.set_bounds(3.0, 5.0));
        assert!((r.value0() - 3.0).abs() < f64::EPSILON);
        assert!((r.value1() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fractions() {
        let r = RangeValue::new(2.5, 7.5, 0.0, 10.0);
        let (a, b) = r.fractions();
        assert!((a - 0.25).abs() < 1e-12);
        assert!((b - 0.75).abs() < 1e-12);
        assert_eq!(RangeValue::new(1.0, 1.0, 1.0, 1.0).fractions(), (0.0, 1.0));
    }
}
