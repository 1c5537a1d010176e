//! One-dimensional interpolation over tabulated `(x, y)` samples.
//!
//! [`Interpolator1D`] builds a callable curve from strictly increasing x values.
//! Every method except [`Method::Linear`] and [`Method::Polynomial`] is stored
//! as a piecewise cubic, one `[a, b, c, d]` polynomial per interval:
//!
//! `y(x) = a + b·t + c·t² + d·t³` with `t = x − x_i`
//!
//! Querying outside `[x.first, x.last]` is an extrapolation. Callers are
//! expected to gate on [`Interpolator1D::domain`]. The interpolator itself clamps
//! the query to the domain, so it never extrapolates.

mod akima;
mod cubic;
mod density;
mod polynomial;
mod steffen;

pub use density::{DENSITY_GAIN, HistogramBins, autorange_bounds, density_profile};

use crate::error::{ConstructionError, ConstructionResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interpolation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Method {
    Linear,
    Polynomial,
    /// Natural cubic spline (zero curvature at both ends).
    Cubic,
    CubicPeriodic,
    #[default]
    Akima,
    AkimaPeriodic,
    /// Monotonicity-preserving cubic.
    Steffen,
}

impl Method {
    /// All methods, in the order a chooser lists them.
    pub const ALL: [Method; 7] = [
        Method::Linear,
        Method::Polynomial,
        Method::Cubic,
        Method::CubicPeriodic,
        Method::Akima,
        Method::AkimaPeriodic,
        Method::Steffen,
    ];

    /// Fewest samples the method accepts.
    pub fn min_points(&self) -> usize {
        match self {
            Method::Linear => 2,
            Method::Polynomial => 3,
            Method::Cubic => 3,
            Method::CubicPeriodic => 2,
            Method::Akima => 5,
            Method::AkimaPeriodic => 5,
            Method::Steffen => 3,
        }
    }

    /// The curve repeats: first and last y must agree.
    pub fn is_periodic(&self) -> bool {
        matches!(self, Method::CubicPeriodic | Method::AkimaPeriodic)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Method::Linear => "linear",
            Method::Polynomial => "polynomial",
            Method::Cubic => "cubic",
            Method::CubicPeriodic => "cubic-periodic",
            Method::Akima => "akima",
            Method::AkimaPeriodic => "akima-periodic",
            Method::Steffen => "steffen",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Coefficients of one cubic piece, relative to the interval start.
pub(crate) type Segment = [f64; 4];

#[derive(Debug, Clone, PartialEq)]
enum Kernel {
    Linear,
    /// Newton divided differences.
    Polynomial(Vec<f64>),
    Piecewise(Vec<Segment>),
}

/// Interpolating curve over fixed samples.
#[derive(Debug, Clone, PartialEq)]
pub struct Interpolator1D {
    method: Method,
    xs: Vec<f64>,
    ys: Vec<f64>,
    kernel: Kernel,
}

impl Interpolator1D {
    /// Build the interpolant. Fails on mismatched lengths, too few samples,
    /// non-increasing x, or mismatched end values for periodic methods.
    pub fn new(xs: &[f64], ys: &[f64], method: Method) -> ConstructionResult<Self> {
        validate(xs, ys, method)?;

        let kernel = match method {
            Method::Linear => Kernel::Linear,
            Method::Polynomial => Kernel::Polynomial(polynomial::divided_differences(xs, ys)),
            Method::Cubic => Kernel::Piecewise(cubic::natural(xs, ys)),
            Method::CubicPeriodic => Kernel::Piecewise(cubic::periodic(xs, ys)),
            Method::Akima => Kernel::Piecewise(akima::segments(xs, ys, false)),
            Method::AkimaPeriodic => Kernel::Piecewise(akima::segments(xs, ys, true)),
            Method::Steffen => Kernel::Piecewise(steffen::segments(xs, ys)),
        };

        log::trace!("Interpolator1D::new method={} points={}", method, xs.len());

        Ok(Self {
            method,
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            kernel,
        })
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Interval the samples cover.
    pub fn domain(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    pub fn contains(&self, x: f64) -> bool {
        let (lo, hi) = self.domain();
        x >= lo && x <= hi
    }

    /// Value at `x`, with `x` clamped into the domain.
    pub fn eval(&self, x: f64) -> f64 {
        let x = self.clamp_to_domain(x);
        match &self.kernel {
            Kernel::Linear => {
                let i = self.segment(x);
                let h = self.xs[i + 1] - self.xs[i];
                let u = (x - self.xs[i]) / h;
                self.ys[i] * (1.0 - u) + self.ys[i + 1] * u
            }
            Kernel::Polynomial(coeffs) => polynomial::eval(&self.xs, coeffs, x).0,
            Kernel::Piecewise(segments) => {
                let i = self.segment(x);
                let [a, b, c, d] = segments[i];
                let t = x - self.xs[i];
                a + t * (b + t * (c + t * d))
            }
        }
    }

    /// First derivative at `x`, with `x` clamped into the domain.
    pub fn eval_deriv(&self, x: f64) -> f64 {
        let x = self.clamp_to_domain(x);
        match &self.kernel {
            Kernel::Linear => {
                let i = self.segment(x);
                (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
            }
            Kernel::Polynomial(coeffs) => polynomial::eval(&self.xs, coeffs, x).1,
            Kernel::Piecewise(segments) => {
                let i = self.segment(x);
                let [_, b, c, d] = segments[i];
                let t = x - self.xs[i];
                b + t * (2.0 * c + t * 3.0 * d)
            }
        }
    }

    /// Evaluate at many points.
    pub fn eval_many(&self, xs: &[f64]) -> Vec<f64> {
        xs.iter().map(|&x| self.eval(x)).collect()
    }

    fn clamp_to_domain(&self, x: f64) -> f64 {
        let (lo, hi) = self.domain();
        x.max(lo).min(hi)
    }

    /// Index `i` of the interval `[x_i, x_{i+1}]` containing `x`.
    fn segment(&self, x: f64) -> usize {
        let upper = self.xs.partition_point(|&v| v <= x);
        upper.saturating_sub(1).min(self.xs.len() - 2)
    }
}

fn validate(xs: &[f64], ys: &[f64], method: Method) -> ConstructionResult<()> {
    if xs.len() != ys.len() {
        return Err(ConstructionError::LengthMismatch {
            x: xs.len(),
            y: ys.len(),
        });
    }
    let required = method.min_points();
    if xs.len() < required {
        return Err(ConstructionError::TooFewPoints {
            method,
            required,
            got: xs.len(),
        });
    }
    if let Some(index) = xs.windows(2).position(|w| !(w[1] > w[0])) {
        return Err(ConstructionError::NonIncreasing { index: index + 1 });
    }
    if method.is_periodic() {
        let (first, last) = (ys[0], ys[ys.len() - 1]);
        let scale = first.abs().max(last.abs()).max(1.0);
        if (first - last).abs() > 1e-9 * scale {
            return Err(ConstructionError::NotPeriodic);
        }
    }
    Ok(())
}

/// Piecewise cubic Hermite segments from knot values and knot slopes.
pub(crate) fn hermite_segments(xs: &[f64], ys: &[f64], slopes: &[f64]) -> Vec<Segment> {
    (0..xs.len() - 1)
        .map(|i| {
            let h = xs[i + 1] - xs[i];
            let s = (ys[i + 1] - ys[i]) / h;
            let (t0, t1) = (slopes[i], slopes[i + 1]);
            [
                ys[i],
                t0,
                (3.0 * s - 2.0 * t0 - t1) / h,
                (t0 + t1 - 2.0 * s) / (h * h),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const XS: [f64; 6] = [0.0, 1.0, 2.5, 3.0, 4.5, 6.0];
    const YS: [f64; 6] = [1.0, 3.0, 2.0, 2.5, 0.5, 1.0];

    #[test]
    fn test_knots_are_reproduced() {
        for method in Method::ALL {
            let ys: Vec<f64> = if method.is_periodic() {
                let mut ys = YS.to_vec();
                ys[5] = ys[0];
                ys
            } else {
                YS.to_vec()
            };
            let f = Interpolator1D::new(&XS, &ys, method).unwrap();
            for (x, y) in XS.iter().zip(&ys) {
                assert!(
                    (f.eval(*x) - y).abs() < 1e-9,
                    "{method} at x={x}: {} != {y}",
                    f.eval(*x)
                );
            }
        }
    }

    #[test]
    fn test_linear_data_is_exact() {
        let xs = [0.0, 0.5, 1.5, 2.0, 3.0, 4.0];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x - 1.0).collect();
        for method in [
            Method::Linear,
            Method::Polynomial,
            Method::Cubic,
            Method::Akima,
            Method::Steffen,
        ] {
            let f = Interpolator1D::new(&xs, &ys, method).unwrap();
            for k in 0..=40 {
                let x = k as f64 * 0.1;
                assert!((f.eval(x) - (2.0 * x - 1.0)).abs() < 1e-9, "{method} at {x}");
            }
        }
    }

    #[test]
    fn test_minimum_point_counts() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [0.0, 1.0, 0.0, 0.0];
        let err = Interpolator1D::new(&xs, &ys, Method::Akima).unwrap_err();
        assert_eq!(
            err,
            ConstructionError::TooFewPoints {
                method: Method::Akima,
                required: 5,
                got: 4
            }
        );
        assert!(Interpolator1D::new(&xs[..2], &ys[..2], Method::Linear).is_ok());
        assert!(Interpolator1D::new(&xs[..1], &ys[..1], Method::Linear).is_err());
        assert!(Interpolator1D::new(&xs[..2], &ys[..2], Method::Cubic).is_err());
        assert!(Interpolator1D::new(&xs[..3], &ys[..3], Method::Steffen).is_ok());
        assert!(Interpolator1D::new(&[0.0, 1.0], &[2.0, 2.0], Method::CubicPeriodic).is_ok());
    }

    #[test]
    fn test_invalid_samples() {
        assert!(matches!(
            Interpolator1D::new(&[0.0, 1.0, 2.0], &[0.0, 1.0], Method::Linear),
            Err(ConstructionError::LengthMismatch { x: 3, y: 2 })
        ));
        assert!(matches!(
            Interpolator1D::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0], Method::Linear),
            Err(ConstructionError::NonIncreasing { index: 2 })
        ));
        assert!(matches!(
            Interpolator1D::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], Method::CubicPeriodic),
            Err(ConstructionError::NotPeriodic)
        ));
    }

    #[test]
    fn test_no_extrapolation() {
        let f = Interpolator1D::new(&XS, &YS, Method::Cubic).unwrap();
        assert!((f.eval(-10.0) - YS[0]).abs() < 1e-12);
        assert!((f.eval(100.0) - YS[5]).abs() < 1e-12);
        assert!(!f.contains(-0.1));
        assert!(f.contains(6.0));
        assert_eq!(f.domain(), (0.0, 6.0));
    }

    #[test]
    fn test_steffen_is_monotone() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [0.0, 0.1, 0.15, 2.0, 2.05, 5.0];
        let f = Interpolator1D::new(&xs, &ys, Method::Steffen).unwrap();
        let mut prev = f.eval(0.0);
        for k in 1..=500 {
            let y = f.eval(k as f64 * 0.01);
            assert!(y >= prev - 1e-12);
            prev = y;
        }
    }

    #[test]
    fn test_periodic_end_slopes_match() {
        let xs: Vec<f64> = (0..8).map(|k| k as f64 * 0.5).collect();
        let ys: Vec<f64> = xs
            .iter()
            .map(|x| (x * std::f64::consts::PI / 1.75).sin())
            .collect();
        let mut ys = ys;
        ys[7] = ys[0];
        for method in [Method::CubicPeriodic, Method::AkimaPeriodic] {
            let f = Interpolator1D::new(&xs, &ys, method).unwrap();
            let (lo, hi) = f.domain();
            assert!(
                (f.eval_deriv(lo) - f.eval_deriv(hi)).abs() < 1e-9,
                "{method}: {} vs {}",
                f.eval_deriv(lo),
                f.eval_deriv(hi)
            );
        }
    }

    #[test]
    fn test_natural_spline_has_flat_curvature_at_ends() {
        let f = Interpolator1D::new(&XS, &YS, Method::Cubic).unwrap();
        let eps = 1e-4;
        let curvature = |x: f64| (f.eval_deriv(x + eps) - f.eval_deriv(x)) / eps;
        assert!(curvature(0.0).abs() < 1e-2);
        assert!(curvature(6.0 - eps).abs() < 1e-2);
    }

    #[test]
    fn test_polynomial_matches_quadratic() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [1.0, 2.0, 10.0]; // y = x^2 + 1
        let f = Interpolator1D::new(&xs, &ys, Method::Polynomial).unwrap();
        assert!((f.eval(2.0) - 5.0).abs() < 1e-12);
        assert!((f.eval_deriv(2.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_method_names() {
        assert_eq!(Method::AkimaPeriodic.to_string(), "akima-periodic");
        assert_eq!(Method::default(), Method::Akima);
    }
}
