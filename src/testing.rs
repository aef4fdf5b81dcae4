//! Testing problems and utilities useful for benchmarking, debugging and smoke
//! testing.
//!
//! [`Bowl`] is the default two-dimensional problem and is recommended for
//! first tests. [`Diagonal`] and [`Tridiagonal`] scale to any dimension.
//! [`Saddle`] has an indefinite Hessian and is used for testing the failure
//! path.
//!
//! # References
//!
//! \[1\] [Numerical
//! Optimization](https://link.springer.com/book/10.1007/978-0-387-40065-5)
//!
//! \[2\] [An Introduction to the Conjugate Gradient Method Without the
//! Agonizing Pain](https://www.cs.cmu.edu/~quake-papers/painless-conjugate-gradient.pdf)

#![allow(unused)]

use nalgebra::{dmatrix, dvector, DMatrix, DVector};

use crate::{
    algo::conjugate_gradient::ConjugateGradientError,
    driver::{Minimum, OptimizerDriver},
    Quadratic,
};

/// A quadratic problem with additional information that is useful for testing
/// the optimizer.
pub trait TestProblem {
    /// The problem definition.
    fn problem(&self) -> Quadratic<f64>;

    /// Standard initial values for the problem. Using the same initial values is
    /// essential for fair comparison of settings.
    fn initials(&self) -> Vec<DVector<f64>>;

    /// The unique minimum, if the Hessian is positive definite.
    fn optimum(&self) -> Option<DVector<f64>> {
        let problem = self.problem();
        problem
            .hessian()
            .clone()
            .cholesky()
            .map(|chol| chol.solve(&-problem.linear()))
    }

    /// Test if given point is the minimum, given the tolerance `eps` on the
    /// maximum norm of the difference.
    fn is_optimum(&self, x: &DVector<f64>, eps: f64) -> bool {
        self.optimum()
            .map(|optimum| (x - optimum).amax() <= eps)
            .unwrap_or(false)
    }
}

/// The default problem `5X1² + X2² + 4X1X2 − 14X1 − 6X2 + 20`.
///
/// Minimum is at `[1, 1]` with value `10`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bowl;

impl TestProblem for Bowl {
    fn problem(&self) -> Quadratic<f64> {
        Quadratic::default()
    }

    fn initials(&self) -> Vec<DVector<f64>> {
        vec![
            dvector![0.0, 0.0],
            dvector![10.0, -10.0],
            dvector![-3.0, 5.0],
        ]
    }
}

/// Separable problem `Σ i/2 (xi − 1)² − i/2` with the Hessian `diag(1, ..., n)`.
///
/// Minimum is at `[1, ..., 1]`.
#[derive(Debug, Clone, Copy)]
pub struct Diagonal {
    n: usize,
}

impl Diagonal {
    /// Initializes the problem with given dimension.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "n must be greater than zero");
        Self { n }
    }
}

impl TestProblem for Diagonal {
    fn problem(&self) -> Quadratic<f64> {
        let weights = DVector::from_fn(self.n, |i, _| (i + 1) as f64);
        let hessian = DMatrix::from_diagonal(&weights);

        Quadratic::new(hessian, -weights, 0.0).expect("diagonal hessian is symmetric")
    }

    fn initials(&self) -> Vec<DVector<f64>> {
        vec![
            DVector::zeros(self.n),
            DVector::from_fn(self.n, |i, _| 2.0 * i as f64 - 5.0),
        ]
    }
}

/// Problem with the Hessian of the discretized one-dimensional Laplace operator
/// (`2` on the diagonal, `−1` next to it) and all linear coefficients `−1`.
#[derive(Debug, Clone, Copy)]
pub struct Tridiagonal {
    n: usize,
}

impl Tridiagonal {
    /// Initializes the problem with given dimension.
    pub fn new(n: usize) -> Self {
        assert!(n > 0, "n must be greater than zero");
        Self { n }
    }
}

impl TestProblem for Tridiagonal {
    fn problem(&self) -> Quadratic<f64> {
        let hessian = DMatrix::from_fn(self.n, self.n, |i, j| {
            if i == j {
                2.0
            } else if i.abs_diff(j) == 1 {
                -1.0
            } else {
                0.0
            }
        });

        Quadratic::new(hessian, DVector::from_element(self.n, -1.0), 0.0)
            .expect("tridiagonal hessian is symmetric")
    }

    fn initials(&self) -> Vec<DVector<f64>> {
        vec![
            DVector::zeros(self.n),
            DVector::from_element(self.n, 5.0),
            DVector::from_fn(self.n, |i, _| if i % 2 == 0 { 1.0 } else { -1.0 }),
        ]
    }
}

/// Problem `½ (x1² − x2²) − x1 − x2` with an indefinite Hessian.
///
/// The steepest descent direction from the origin has zero curvature.
#[derive(Debug, Clone, Copy, Default)]
pub struct Saddle;

impl TestProblem for Saddle {
    fn problem(&self) -> Quadratic<f64> {
        Quadratic::new(dmatrix![1.0, 0.0; 0.0, -1.0], dvector![-1.0, -1.0], 0.0)
            .expect("diagonal hessian is symmetric")
    }

    fn initials(&self) -> Vec<DVector<f64>> {
        vec![dvector![0.0, 0.0]]
    }
}

/// A simple optimizer driver that can be used in tests.
pub fn optimize(
    problem: &Quadratic<f64>,
    x0: DVector<f64>,
    max_iters: usize,
) -> Result<Minimum<f64>, ConjugateGradientError> {
    OptimizerDriver::builder()
        .with_problem(problem.clone())
        .with_initial(x0.as_slice().to_vec())
        .with_max_iters(max_iters)
        .build()
        .expect("valid test configuration")
        .execute()
}
