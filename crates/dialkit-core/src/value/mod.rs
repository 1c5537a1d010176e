//! Value models shared by every control: clamped scalars, ranges and history.

mod format;
mod history;
mod range;

pub use format::{DEFAULT_PRECISION, ELLIPSIS, truncate_label};
pub use history::{DEFAULT_HISTORY_CAPACITY, HistoryRing};
pub use range::{RangeHandle, RangeOrdering, RangeValue};

use std::fmt;

/// Numeric types a scalar control can edit.
pub trait Scalar: Copy + PartialOrd + fmt::Debug + fmt::Display {
    /// Smallest representable value, used as the "unbounded below" sentinel.
    const LOWEST: Self;
    /// Largest representable value, used as the "unbounded above" sentinel.
    const HIGHEST: Self;
    /// Whether the type only holds whole numbers.
    const INTEGRAL: bool;

    fn to_f64(self) -> f64;

    /// Convert back from the mapping space. Integers round to nearest and saturate.
    fn from_f64(value: f64) -> Self;

    /// Whether this value stands for an open end of the range.
    fn is_unbounded(self) -> bool;

    /// NaN never enters a model.
    fn is_nan(self) -> bool {
        false
    }

    /// Quantize a drag delta so accumulated motion lands on representable steps.
    fn quantize_delta(delta: f64) -> f64 {
        delta
    }

    /// Parse user text. Surrounding whitespace is ignored.
    fn parse_text(text: &str) -> Option<Self>;

    /// Display string with the given number of decimals.
    fn format(self, precision: usize) -> String;
}

impl Scalar for f64 {
    const LOWEST: Self = -f64::MAX;
    const HIGHEST: Self = f64::MAX;
    const INTEGRAL: bool = false;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }

    fn is_unbounded(self) -> bool {
        !self.is_finite() || self.abs() == f64::MAX
    }

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    fn parse_text(text: &str) -> Option<Self> {
        text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }

    fn format(self, precision: usize) -> String {
        format!("{:.*}", precision, self)
    }
}

impl Scalar for i64 {
    const LOWEST: Self = i64::MIN;
    const HIGHEST: Self = i64::MAX;
    const INTEGRAL: bool = true;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value.round() as i64
    }

    fn is_unbounded(self) -> bool {
        self == i64::MIN || self == i64::MAX
    }

    fn quantize_delta(delta: f64) -> f64 {
        delta.trunc()
    }

    fn parse_text(text: &str) -> Option<Self> {
        let text = text.trim();
        text.parse::<i64>()
            .ok()
            .or_else(|| text.parse::<f64>().ok().filter(|v| v.is_finite()).map(Self::from_f64))
    }

    fn format(self, _precision: usize) -> String {
        self.to_string()
    }
}

/// Clamp `value` into `[lo, hi]` without panicking on unordered input.
pub fn clamp<T: Scalar>(value: T, lo: T, hi: T) -> T {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

/// A value kept inside `[vmin, vmax]` at all times.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarValue<T: Scalar> {
    value: T,
    vmin: T,
    vmax: T,
    init: T,
}

impl<T: Scalar> ScalarValue<T> {
    /// Create a value. Swapped bounds are reordered and `init` is clamped.
    pub fn new(init: T, vmin: T, vmax: T) -> Self {
        let (vmin, vmax) = if vmin > vmax { (vmax, vmin) } else { (vmin, vmax) };
        let init = if init.is_nan() { vmin } else { clamp(init, vmin, vmax) };
        Self {
            value: init,
            vmin,
            vmax,
            init,
        }
    }

    /// Value with both ends open.
    pub fn unbounded(init: T) -> Self {
        Self::new(init, T::LOWEST, T::HIGHEST)
    }

    pub fn value(&self) -> T {
        self.value
    }

    pub fn vmin(&self) -> T {
        self.vmin
    }

    pub fn vmax(&self) -> T {
        self.vmax
    }

    pub fn init(&self) -> T {
        self.init
    }

    /// Clamp and store. Returns true when the stored value changed.
    pub fn set(&mut self, value: T) -> bool {
        if value.is_nan() {
            return false;
        }
        let value = clamp(value, self.vmin, self.vmax);
        if value == self.value {
            return false;
        }
        self.value = value;
        true
    }

    /// Restore the initial value.
    pub fn reset(&mut self) -> bool {
        self.set(self.init)
    }

    /// Both ends are finite.
    pub fn is_bounded(&self) -> bool {
        !self.vmin.is_unbounded() && !self.vmax.is_unbounded()
    }

    /// Position of the value inside a bounded, non-degenerate range.
    pub fn fraction(&self) -> Option<f64> {
        if !self.is_bounded() {
            return None;
        }
        let span = self.vmax.to_f64() - self.vmin.to_f64();
        (span > 0.0).then(|| (self.value.to_f64() - self.vmin.to_f64()) / span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clamps_to_bounds() {
        let mut v = ScalarValue::new(5.0, 0.0, 10.0);
        for input in [-3.0, 0.0, 4.5, 10.0, 12.0, f64::INFINITY, f64::NEG_INFINITY] {
            v.set(input);
            assert!((v.value() - input.clamp(0.0, 10.0)).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_set_reports_change() {
        let mut v = ScalarValue::new(5.0, 0.0, 10.0);
        assert!(!v.set(5.0));
        assert!(v.set(6.0));
        v.set(10.0);
        assert!(!v.set(11.0));
    }

    #[test]
    fn test_nan_is_rejected() {
        let mut v = ScalarValue::new(5.0, 0.0, 10.0);
        assert!(!v.set(f64::NAN));
        assert!((v.value() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_unbounded_sentinels() {
        let mut v = ScalarValue::unbounded(0.0);
        assert!(!v.is_bounded());
        assert!(v.fraction().is_none());
        v.set(1e300);
        assert!((v.value() - 1e300).abs() < f64::EPSILON);

        let ints = ScalarValue::new(3_i64, i64::MIN, 10);
        assert!(!ints.is_bounded());
    }

    #[test]
    fn test_swapped_bounds_and_init() {
        let v = ScalarValue::new(20, 10_i64, 0);
        assert_eq!(v.vmin(), 0);
        assert_eq!(v.vmax(), 10);
        assert_eq!(v.value(), 10);
        assert_eq!(v.init(), 10);
    }

    #[test]
    fn test_reset() {
        let mut v = ScalarValue::new(2.0, 0.0, 4.0);
        v.set(3.0);
        assert!(v.reset());
        assert!(!v.reset());
        assert!((v.value() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_fraction() {
        let v = ScalarValue::new(2.5, 0.0, 10.0);
        assert!((v.fraction().unwrap() - 0.25).abs() < 1e-12);
        assert!(ScalarValue::new(1.0, 1.0, 1.0).fraction().is_none());
    }

    #[test]
    fn test_parse_text() {
        assert_eq!(f64::parse_text(" 2.5 "), Some(2.5));
        assert_eq!(f64::parse_text("abc"), None);
        assert_eq!(f64::parse_text("NaN"), None);
        assert_eq!(i64::parse_text("7"), Some(7));
        assert_eq!(i64::parse_text("7.6"), Some(8));
        assert_eq!(i64::parse_text(""), None);
    }

    #[test]
    fn test_format() {
        assert_eq!(1.23456_f64.format(3), "1.235");
        assert_eq!(42_i64.format(3), "42");
    }

    #[test]
    fn test_integer_quantization() {
        assert!((i64::quantize_delta(2.9) - 2.0).abs() < f64::EPSILON);
        assert!((i64::quantize_delta(-2.9) + 2.0).abs() < f64::EPSILON);
        assert!((f64::quantize_delta(2.9) - 2.9).abs() < f64::EPSILON);
    }
}
