//! Single interpolating polynomial in Newton form.

/// Newton coefficients `c_k = f[x_0, ..., x_k]`.
pub(crate) fn divided_differences(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    let mut coeffs = ys.to_vec();
    for order in 1..n {
        for i in (order..n).rev() {
            coeffs[i] = (coeffs[i] - coeffs[i - 1]) / (xs[i] - xs[i - order]);
        }
    }
    coeffs
}

/// Value and first derivative at `x`, by nested multiplication.
pub(crate) fn eval(xs: &[f64], coeffs: &[f64], x: f64) -> (f64, f64) {
    let n = coeffs.len();
    let mut value = coeffs[n - 1];
    let mut deriv = 0.0;
    for k in (0..n - 1).rev() {
        deriv = deriv * (x - xs[k]) + value;
        value = value * (x - xs[k]) + coeffs[k];
    }
    (value, deriv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_through_four_points() {
        // y = x^3 - x
        let xs = [-1.0, 0.0, 1.0, 2.0];
        let ys: Vec<f64> = xs.iter().map(|x: &f64| x.powi(3) - x).collect();
        let coeffs = divided_differences(&xs, &ys);
        let (v, d) = eval(&xs, &coeffs, 0.5);
        assert!((v - (0.125 - 0.5)).abs() < 1e-12);
        assert!((d - (3.0 * 0.25 - 1.0)).abs() < 1e-12);
    }
}
