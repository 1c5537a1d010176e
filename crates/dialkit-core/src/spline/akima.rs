//! Akima splines.
//!
//! The knot slope is a weighted mean of the neighbouring interval slopes, with
//! weights taken from how much the slopes on either side change. Two virtual
//! slopes are added past each end: extrapolated for the plain variant, wrapped
//! around for the periodic one.
//!
//! When both weights vanish (a corner between two straight runs) the knot
//! takes the mean of its two interval slopes, Akima's original rule. GSL
//! instead makes the following interval linear.

use super::{Segment, hermite_segments};

pub(crate) fn segments(xs: &[f64], ys: &[f64], periodic: bool) -> Vec<Segment> {
    let n = xs.len();
    let m: Vec<f64> = xs
        .windows(2)
        .zip(ys.windows(2))
        .map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0]))
        .collect();

    // Interval slope with virtual entries for k in -2..=n.
    let slope = |k: isize| -> f64 {
        let last = m.len() as isize - 1;
        if (0..=last).contains(&k) {
            return m[k as usize];
        }
        if periodic {
            let len = m.len() as isize;
            return m[k.rem_euclid(len) as usize];
        }
        match k {
            -1 => 2.0 * m[0] - m[1],
            -2 => 3.0 * m[0] - 2.0 * m[1],
            k if k == last + 1 => 2.0 * m[m.len() - 1] - m[m.len() - 2],
            _ => 3.0 * m[m.len() - 1] - 2.0 * m[m.len() - 2],
        }
    };

    let knot_slopes: Vec<f64> = (0..n as isize)
        .map(|i| {
            let (m_2, m_1, m0, m1) = (slope(i - 2), slope(i - 1), slope(i), slope(i + 1));
            let w1 = (m1 - m0).abs();
            let w2 = (m_1 - m_2).abs();
            if w1 + w2 == 0.0 {
                0.5 * (m_1 + m0)
            } else {
                (w1 * m_1 + w2 * m0) / (w1 + w2)
            }
        })
        .collect();

    hermite_segments(xs, ys, &knot_slopes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_plateau_stays_flat() {
        // Akima does not overshoot next to a constant run.
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let segs = segments(&xs, &ys, false);
        for seg in &segs[..2] {
            assert!(seg.iter().all(|c| c.abs() < 1e-12));
        }
    }

    #[test]
    fn test_corner_between_straight_runs_takes_mean_slope() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.0, 0.0, 0.0, 1.0, 2.0, 3.0];
        let segs = segments(&xs, &ys, false);
        // Knot 2 joins slope 0 and slope 1.
        assert!((segs[2][1] - 0.5).abs() < 1e-12);
        assert!(segs[0].iter().all(|c| c.abs() < 1e-12));
    }

    #[test]
    fn test_periodic_wraps_slopes() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let ys = [0.0, 1.0, 0.0, -1.0, 0.0];
        let segs = segments(&xs, &ys, true);
        let first_slope = segs[0][1];
        let [_, b, c, d] = segs[3];
        let end_slope = b + 2.0 * c + 3.0 * d;
        assert!((first_slope - end_slope).abs() < 1e-12);
    }
}
