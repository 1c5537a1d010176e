//! Errors raised when a control or numeric model is built from invalid parameters.

use crate::spline::Method;
use thiserror::Error;

/// Invalid parameters at creation time. The instance is never built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstructionError {
    #[error("Logarithmic range needs strictly positive bounds, got [{vmin}, {vmax}]")]
    InvalidLogRange { vmin: f64, vmax: f64 },
    #[error("{method} interpolation needs at least {required} points, got {got}")]
    TooFewPoints {
        method: Method,
        required: usize,
        got: usize,
    },
    #[error("Sample lengths differ: {x} x values, {y} y values")]
    LengthMismatch { x: usize, y: usize },
    #[error("x values must be strictly increasing (violated at index {index})")]
    NonIncreasing { index: usize },
    #[error("Periodic interpolation needs matching first and last y values")]
    NotPeriodic,
    #[error("Field data has {got} values, expected {expected}")]
    FieldSize { expected: usize, got: usize },
}

/// Result type for constructors.
pub type ConstructionResult<T> = Result<T, ConstructionError>;
