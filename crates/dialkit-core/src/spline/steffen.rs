//! Steffen's monotone cubic (A&A 239, 443-450, 1990).
//!
//! Knot slopes are limited so the curve never overshoots between samples.
//! End slopes use the adjacent interval secant.

use super::{Segment, hermite_segments};

pub(crate) fn segments(xs: &[f64], ys: &[f64]) -> Vec<Segment> {
    let n = xs.len();
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let s: Vec<f64> = ys
        .windows(2)
        .zip(&h)
        .map(|(w, h)| (w[1] - w[0]) / h)
        .collect();

    let mut slopes = vec![0.0; n];
    slopes[0] = s[0];
    slopes[n - 1] = s[n - 2];
    for i in 1..n - 1 {
        let p = (s[i - 1] * h[i] + s[i] * h[i - 1]) / (h[i - 1] + h[i]);
        let limit = s[i - 1].abs().min(s[i].abs()).min(0.5 * p.abs());
        slopes[i] = (1f64.copysign(s[i - 1]) + 1f64.copysign(s[i])) * limit;
    }

    hermite_segments(xs, ys, &slopes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extremum_gets_zero_slope() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 0.0];
        let segs = segments(&xs, &ys);
        // Slope at the peak is zero, so the peak is not exceeded.
        assert!(segs[1][1].abs() < 1e-12);
        assert!((segs[0][1] - 1.0).abs() < 1e-12);
    }
}
