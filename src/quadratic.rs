//! Quadratic objective functions.
//!
//! The problem minimized by quadcg is a quadratic function
//!
//! ```text
//! F(x) = ½ xᵀAx + bᵀx + c
//! ```
//!
//! given by a symmetric Hessian matrix *A*, a vector of linear coefficients *b*
//! and a constant term *c*. The gradient is `A·x + b` and, since the Hessian is
//! constant, the minimum along any direction can be computed in closed form.
//!
//! The default problem is
//!
//! ```text
//! F(X1, X2) = 5X1² + X2² + 4X1X2 − 14X1 − 6X2 + 20
//! ```
//!
//! with the minimum `F(1, 1) = 10`.

use approx::relative_eq;
use nalgebra::{
    convert,
    storage::{Storage, StorageMut},
    DMatrix, DVector, Dyn, RealField, Vector,
};

use crate::core::{ConfigError, Function, Problem};

/// Quadratic function `½ xᵀAx + bᵀx + c`.
///
/// The definition is validated on construction and cannot be changed
/// afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadratic<T: RealField + Copy> {
    hessian: DMatrix<T>,
    linear: DVector<T>,
    constant: T,
}

impl<T: RealField + Copy> Quadratic<T> {
    /// Initializes the function, checking that the Hessian is a non-empty
    /// symmetric square matrix and that the linear coefficients have matching
    /// dimension.
    pub fn new(hessian: DMatrix<T>, linear: DVector<T>, constant: T) -> Result<Self, ConfigError> {
        let (rows, cols) = hessian.shape();

        if rows == 0 || cols == 0 {
            return Err(ConfigError::Empty);
        }

        if rows != cols {
            return Err(ConfigError::NotSquare { rows, cols });
        }

        let transposed = hessian.transpose();
        if !relative_eq!(hessian, transposed) {
            return Err(ConfigError::NotSymmetric);
        }

        if linear.len() != rows {
            return Err(ConfigError::DimensionMismatch {
                expected: rows,
                actual: linear.len(),
            });
        }

        Ok(Self {
            hessian,
            linear,
            constant,
        })
    }

    /// The Hessian matrix *A*.
    pub fn hessian(&self) -> &DMatrix<T> {
        &self.hessian
    }

    /// The linear coefficients *b*.
    pub fn linear(&self) -> &DVector<T> {
        &self.linear
    }

    /// The constant term *c*.
    pub fn constant(&self) -> T {
        self.constant
    }

    /// Curvature `pᵀAp` of the function along direction `p`.
    pub fn curvature<Sp>(&self, p: &Vector<T, Dyn, Sp>) -> T
    where
        Sp: Storage<T, Dyn>,
    {
        p.dot(&(&self.hessian * p))
    }
}

impl<T: RealField + Copy> Default for Quadratic<T> {
    fn default() -> Self {
        Self {
            hessian: default_hessian(),
            linear: default_linear(),
            constant: default_constant(),
        }
    }
}

pub(crate) fn default_hessian<T: RealField + Copy>() -> DMatrix<T> {
    DMatrix::from_row_slice(
        2,
        2,
        &[convert(10.0), convert(4.0), convert(4.0), convert(2.0)],
    )
}

pub(crate) fn default_linear<T: RealField + Copy>() -> DVector<T> {
    DVector::from_column_slice(&[convert(-14.0), convert(-6.0)])
}

pub(crate) fn default_constant<T: RealField + Copy>() -> T {
    convert(20.0)
}

impl<T: RealField + Copy> Problem for Quadratic<T> {
    type Field = T;

    fn dim(&self) -> usize {
        self.linear.len()
    }
}

impl<T: RealField + Copy> Function for Quadratic<T> {
    fn apply<Sx>(&self, x: &Vector<T, Dyn, Sx>) -> T
    where
        Sx: Storage<T, Dyn>,
    {
        let half: T = convert(0.5);
        half * self.curvature(x) + self.linear.dot(x) + self.constant
    }

    fn gradient<Sx, Sg>(&self, x: &Vector<T, Dyn, Sx>, grad: &mut Vector<T, Dyn, Sg>)
    where
        Sx: Storage<T, Dyn>,
        Sg: StorageMut<T, Dyn>,
    {
        grad.gemv(T::one(), &self.hessian, x, T::zero());
        grad.axpy(T::one(), &self.linear, T::one());
    }
}
