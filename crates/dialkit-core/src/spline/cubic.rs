//! Cubic splines with natural or periodic end conditions.
//!
//! Both variants solve for the second derivatives `M_i` at the knots:
//!
//! `h_{i-1}·M_{i-1} + 2(h_{i-1} + h_i)·M_i + h_i·M_{i+1} = 6(s_i − s_{i-1})`
//!
//! where `h_i` is the interval width and `s_i` the interval slope.

use super::Segment;

/// Natural spline: `M_0 = M_{n-1} = 0`. Needs at least three knots.
pub(crate) fn natural(xs: &[f64], ys: &[f64]) -> Vec<Segment> {
    let n = xs.len();
    let (h, s) = widths_and_slopes(xs, ys);

    let mut m = vec![0.0; n];
    let interior = n - 2;
    if interior > 0 {
        let mut sub = vec![0.0; interior];
        let mut diag = vec![0.0; interior];
        let mut sup = vec![0.0; interior];
        let mut rhs = vec![0.0; interior];
        for k in 0..interior {
            let i = k + 1;
            sub[k] = h[i - 1];
            diag[k] = 2.0 * (h[i - 1] + h[i]);
            sup[k] = h[i];
            rhs[k] = 6.0 * (s[i] - s[i - 1]);
        }
        let solved = solve_tridiagonal(&sub, &diag, &sup, &rhs);
        m[1..=interior].copy_from_slice(&solved);
    }

    segments_from_curvature(xs, ys, &h, &m)
}

/// Periodic spline: values, slopes and curvatures match at both ends.
/// Needs at least two knots and `y_0 == y_{n-1}`.
pub(crate) fn periodic(xs: &[f64], ys: &[f64]) -> Vec<Segment> {
    let n = xs.len();
    let (h, s) = widths_and_slopes(xs, ys);

    // Unknowns M_0..M_{n-2}; M_{n-1} wraps to M_0.
    let count = n - 1;
    let prev = |i: usize| (i + count - 1) % count;

    let mut m_free = match count {
        1 => vec![0.0],
        2 => {
            // Both neighbours of each unknown are the other unknown.
            let diag = 2.0 * (h[0] + h[1]);
            let off = h[0] + h[1];
            let r0 = 6.0 * (s[0] - s[1]);
            let r1 = 6.0 * (s[1] - s[0]);
            let det = diag * diag - off * off;
            vec![(r0 * diag - off * r1) / det, (diag * r1 - off * r0) / det]
        }
        _ => {
            let mut sub = vec![0.0; count];
            let mut diag = vec![0.0; count];
            let mut sup = vec![0.0; count];
            let mut rhs = vec![0.0; count];
            for i in 0..count {
                let hp = h[prev(i)];
                sub[i] = hp;
                diag[i] = 2.0 * (hp + h[i]);
                sup[i] = h[i];
                rhs[i] = 6.0 * (s[i] - s[prev(i)]);
            }
            // Corners: row 0 couples to M_{count-1}, the last row to M_0.
            let corner = h[count - 1];
            solve_cyclic(&sub, &diag, &sup, corner, corner, &rhs)
        }
    };
    m_free.push(m_free[0]);

    segments_from_curvature(xs, ys, &h, &m_free)
}

fn widths_and_slopes(xs: &[f64], ys: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let h: Vec<f64> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let s: Vec<f64> = ys
        .windows(2)
        .zip(&h)
        .map(|(w, h)| (w[1] - w[0]) / h)
        .collect();
    (h, s)
}

fn segments_from_curvature(xs: &[f64], ys: &[f64], h: &[f64], m: &[f64]) -> Vec<Segment> {
    (0..xs.len() - 1)
        .map(|i| {
            let hi = h[i];
            let slope = (ys[i + 1] - ys[i]) / hi;
            [
                ys[i],
                slope - hi * (2.0 * m[i] + m[i + 1]) / 6.0,
                0.5 * m[i],
                (m[i + 1] - m[i]) / (6.0 * hi),
            ]
        })
        .collect()
}

/// Thomas algorithm. `sub[0]` and `sup[n-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = if i + 1 < n { sup[i] / denom } else { 0.0 };
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut x = vec![0.0; n];
    x[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        x[i] = d[i] - c[i] * x[i + 1];
    }
    x
}

/// Cyclic tridiagonal system via Sherman-Morrison. `bottom_left` is the
/// coefficient of `x_0` in the last row, `top_right` that of `x_{n-1}` in row 0.
/// Needs `n >= 3`.
fn solve_cyclic(
    sub: &[f64],
    diag: &[f64],
    sup: &[f64],
    bottom_left: f64,
    top_right: f64,
    rhs: &[f64],
) -> Vec<f64> {
    let n = diag.len();
    let gamma = -diag[0];

    let mut modified = diag.to_vec();
    modified[0] = diag[0] - gamma;
    modified[n - 1] = diag[n - 1] - bottom_left * top_right / gamma;

    let mut x = solve_tridiagonal(sub, &modified, sup, rhs);

    let mut u = vec![0.0; n];
    u[0] = gamma;
    u[n - 1] = bottom_left;
    let z = solve_tridiagonal(sub, &modified, sup, &u);

    let fact = (x[0] + top_right * x[n - 1] / gamma) / (1.0 + z[0] + top_right * z[n - 1] / gamma);
    for (xi, zi) in x.iter_mut().zip(&z) {
        *xi -= fact * zi;
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tridiagonal_solver() {
        // [2 1 0; 1 2 1; 0 1 2] x = [4 8 8] -> x = [1 2 3]
        let x = solve_tridiagonal(&[0.0, 1.0, 1.0], &[2.0, 2.0, 2.0], &[1.0, 1.0, 0.0], &[4.0, 8.0, 8.0]);
        for (got, want) in x.iter().zip([1.0, 2.0, 3.0]) {
            assert!((got - want).abs() < 1e-12);
        }
    }

    #[test]
    fn test_cyclic_solver() {
        // [4 1 1; 1 4 1; 1 1 4] x = [6 6 6] -> x = [1 1 1]
        let x = solve_cyclic(
            &[1.0, 1.0, 1.0],
            &[4.0, 4.0, 4.0],
            &[1.0, 1.0, 1.0],
            1.0,
            1.0,
            &[6.0, 6.0, 6.0],
        );
        for got in x {
            assert!((got - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_periodic_two_unknowns_continuity() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 1.0, 0.0];
        let segs = periodic(&xs, &ys);
        // Slope at the start equals slope at the end of the last interval.
        let [_, b0, _, _] = segs[0];
        let [_, b1, c1, d1] = segs[1];
        let t = 2.0;
        let end_slope = b1 + 2.0 * c1 * t + 3.0 * d1 * t * t;
        assert!((b0 - end_slope).abs() < 1e-12);
    }
}
