use nalgebra::{convert, RealField};
use thiserror::Error;

/// The base trait for [`Function`](super::function::Function).
pub trait Problem {
    /// Type of the scalar, usually f32 or f64.
    type Field: RealField + Copy;

    /// Number of variables of the problem.
    fn dim(&self) -> usize;
}

/// Error encountered while validating the problem definition or the settings
/// of the optimizer.
///
/// All of these are detected at construction time, never in the middle of the
/// iterative process.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The Hessian matrix has no elements.
    #[error("problem has zero dimension")]
    Empty,
    /// The Hessian matrix is not square.
    #[error("hessian matrix is not square ({rows}x{cols})")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },
    /// The Hessian matrix is not symmetric.
    #[error("hessian matrix is not symmetric")]
    NotSymmetric,
    /// A vector does not match the dimension of the Hessian matrix.
    #[error("invalid dimensionality (expected {expected}, got {actual})")]
    DimensionMismatch {
        /// Dimension of the problem.
        expected: usize,
        /// Length of the given vector.
        actual: usize,
    },
    /// Maximum number of iterations is zero.
    #[error("maximum number of iterations must be positive")]
    NoIterations,
    /// Tolerance is negative, infinite or NaN.
    #[error("tolerance must be finite and non-negative")]
    InvalidTolerance,
    /// Number of decimal places for rounding exceeds [`MAX_DECIMALS`].
    #[error("rounding precision {0} exceeds the maximum of {max} decimal places", max = MAX_DECIMALS)]
    InvalidPrecision(u32),
}

/// Largest number of decimal places accepted by the rounding options.
///
/// Larger precisions exceed the significant digits of `f64`.
pub const MAX_DECIMALS: u32 = 15;

/// Rounding used for reported values and for the step length.
pub trait RealFieldExt {
    /// Rounds the value to given number of decimal places, ties away from
    /// zero.
    fn round_to(self, decimals: u32) -> Self;
}

impl<T: RealField + Copy> RealFieldExt for T {
    fn round_to(self, decimals: u32) -> Self {
        let scale: T = convert(10f64.powi(decimals as i32));
        (self * scale).round() / scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_to_decimals() {
        assert_eq!(0.0858f64.round_to(3), 0.086);
        assert_eq!((-0.0858f64).round_to(3), -0.086);
        assert_eq!(10.000000000000005f64.round_to(3), 10.0);
        assert_eq!(3.187e-7f64.round_to(3), 0.0);
        assert_eq!(1.2345f64.round_to(0), 1.0);
        assert!((0.1234567f64.round_to(MAX_DECIMALS) - 0.1234567).abs() < 1e-15);
    }
}
