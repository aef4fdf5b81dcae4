//! Conjugate gradient method with exact line search.
//!
//! [Nonlinear conjugate
//! gradient](https://en.wikipedia.org/wiki/Nonlinear_conjugate_gradient_method)
//! method with Fletcher–Reeves update of the search direction. Because the
//! objective is a [quadratic function](crate::Quadratic), the minimum along a
//! search direction is found in closed form instead of by an iterative line
//! search.
//!
//! In iteration *k*, given the gradient `g_k` at the current point `x_k`:
//!
//! ```text
//! p_0 = −g_0
//! p_k = −g_k + β_k p_{k−1},   β_k = (g_k·g_k) / (g_{k−1}·g_{k−1})
//! α_k = −(g_k·p_k) / (p_kᵀ A p_k)
//! x_{k+1} = x_k + α_k p_k
//! ```
//!
//! By default, the step length is rounded to three decimal places before it is
//! used, which makes the iterates reproducible across platforms at the cost of
//! losing the finite termination property of the exact method. Setting
//! [`step_decimals`](ConjugateGradientOptions::set_step_decimals) to `None`
//! uses the exact step length.
//!
//! The state carried from one iteration to the next is an explicit
//! [`IterState`] value. A single iteration is a function from one state to the
//! next ([`ConjugateGradient::step`]).
//!
//! # References
//!
//! \[1\] [Numerical
//! Optimization](https://link.springer.com/book/10.1007/978-0-387-40065-5)
//!
//! \[2\] [Function minimization by conjugate
//! gradients](https://academic.oup.com/comjnl/article/7/2/149/335311)

use getset::{CopyGetters, Setters};
use log::debug;
use nalgebra::{convert, DVector, RealField};
use thiserror::Error;

use crate::{
    core::{Function, RealFieldExt},
    Quadratic,
};

/// Options for [`ConjugateGradient`] optimizer.
#[derive(Debug, Clone, CopyGetters, Setters)]
#[getset(get_copy = "pub", set = "pub")]
pub struct ConjugateGradientOptions<T: RealField + Copy> {
    /// Maximum number of iterations. Default: `10`.
    max_iters: usize,
    /// Threshold for the Euclidean norm of the gradient under which the point
    /// is considered a minimum. Default: `1e-6`.
    tolerance: T,
    /// Number of decimal places the step length is rounded to, or `None` for
    /// the exact step length. At most [`MAX_DECIMALS`](crate::MAX_DECIMALS).
    /// Default: `Some(3)`.
    step_decimals: Option<u32>,
    /// Number of decimal places of the reported function value and gradient
    /// norm. At most [`MAX_DECIMALS`](crate::MAX_DECIMALS). Default: `3`.
    report_decimals: u32,
}

impl<T: RealField + Copy> Default for ConjugateGradientOptions<T> {
    fn default() -> Self {
        Self {
            max_iters: 10,
            tolerance: convert(1e-6),
            step_decimals: Some(3),
            report_decimals: 3,
        }
    }
}

/// Conjugate gradient optimizer.
///
/// See [module](self) documentation for more details.
#[derive(Debug, Clone)]
pub struct ConjugateGradient<T: RealField + Copy> {
    options: ConjugateGradientOptions<T>,
}

impl<T: RealField + Copy> ConjugateGradient<T> {
    /// Name of the optimizer.
    pub const NAME: &'static str = "Conjugate gradient";

    /// Initializes the optimizer with default options.
    pub fn new() -> Self {
        Self::with_options(ConjugateGradientOptions::default())
    }

    /// Initializes the optimizer with given options.
    pub fn with_options(options: ConjugateGradientOptions<T>) -> Self {
        Self { options }
    }

    /// Returns the options of the optimizer.
    pub fn options(&self) -> &ConjugateGradientOptions<T> {
        &self.options
    }
}

impl<T: RealField + Copy> Default for ConjugateGradient<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Error returned from [`ConjugateGradient`] optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConjugateGradientError {
    /// The curvature `pᵀAp` along the search direction is zero, so the step
    /// length is not defined.
    #[error("search direction has zero curvature")]
    DegenerateDirection,
}

/// Search direction and gradient of the previous iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviousStep<T: RealField + Copy> {
    direction: DVector<T>,
    gradient: DVector<T>,
}

impl<T: RealField + Copy> PreviousStep<T> {
    /// Creates the record of a finished iteration from its search direction
    /// `p_{k−1}` and the gradient `g_{k−1}` at its starting point.
    pub fn new(direction: DVector<T>, gradient: DVector<T>) -> Self {
        Self {
            direction,
            gradient,
        }
    }

    /// Search direction `p_{k−1}`.
    pub fn direction(&self) -> &DVector<T> {
        &self.direction
    }

    /// Gradient `g_{k−1}`.
    pub fn gradient(&self) -> &DVector<T> {
        &self.gradient
    }
}

/// Result of the direction update.
#[derive(Debug, Clone, PartialEq)]
pub enum Direction<T: RealField + Copy> {
    /// Search direction for the next step.
    Descent(DVector<T>),
    /// The gradient in the previous iteration was zero, so the previous point
    /// was already stationary.
    Stationary,
}

/// Computes the search direction `p_k` from the current gradient and the
/// previous iteration, if any.
pub fn direction<T: RealField + Copy>(
    grad: &DVector<T>,
    prev: Option<&PreviousStep<T>>,
) -> Direction<T> {
    let prev = match prev {
        Some(prev) => prev,
        None => return Direction::Descent(-grad),
    };

    let prev_norm_sq = prev.gradient.norm_squared();
    if prev_norm_sq == T::zero() {
        return Direction::Stationary;
    }

    let beta = grad.norm_squared() / prev_norm_sq;
    debug!("beta = {}", beta);

    let mut p = -grad;
    p.axpy(beta, &prev.direction, T::one());
    Direction::Descent(p)
}

/// Computes the step length minimizing the quadratic function along direction
/// `p` from a point with gradient `grad`.
///
/// The ratio is rounded to `decimals` decimal places when given.
pub fn step_length<T: RealField + Copy>(
    f: &Quadratic<T>,
    grad: &DVector<T>,
    p: &DVector<T>,
    decimals: Option<u32>,
) -> Result<T, ConjugateGradientError> {
    let numerator = grad.dot(p);
    let denominator = f.curvature(p);

    if denominator == T::zero() {
        return Err(ConjugateGradientError::DegenerateDirection);
    }

    let ratio = numerator / denominator;
    let ratio = match decimals {
        Some(decimals) => ratio.round_to(decimals),
        None => ratio,
    };

    Ok(-ratio)
}

/// State of the iterative process between two iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct IterState<T: RealField + Copy> {
    x: DVector<T>,
    grad: DVector<T>,
    prev: Option<PreviousStep<T>>,
    alpha: Option<T>,
    iter: usize,
}

impl<T: RealField + Copy> IterState<T> {
    /// Initial state at point `x0`.
    pub fn new<F>(f: &F, x0: DVector<T>) -> Self
    where
        F: Function<Field = T>,
    {
        let mut grad = DVector::zeros(f.dim());
        f.gradient(&x0, &mut grad);

        Self {
            x: x0,
            grad,
            prev: None,
            alpha: None,
            iter: 0,
        }
    }

    /// Current point `x_k`.
    pub fn x(&self) -> &DVector<T> {
        &self.x
    }

    /// Gradient `g_k` at the current point.
    pub fn gradient(&self) -> &DVector<T> {
        &self.grad
    }

    /// Euclidean norm of the gradient at the current point.
    pub fn gradient_norm(&self) -> T {
        self.grad.norm()
    }

    /// The previous iteration, `None` in the initial state.
    pub fn previous(&self) -> Option<&PreviousStep<T>> {
        self.prev.as_ref()
    }

    /// Search direction that led to the current point.
    pub fn direction(&self) -> Option<&DVector<T>> {
        self.prev.as_ref().map(|prev| &prev.direction)
    }

    /// Step length that led to the current point.
    pub fn step_length(&self) -> Option<T> {
        self.alpha
    }

    /// Number of finished iterations.
    pub fn iter(&self) -> usize {
        self.iter
    }

    /// Consumes the state, returning the current point.
    pub fn into_x(self) -> DVector<T> {
        self.x
    }
}

/// Outcome of a single iteration.
#[derive(Debug, Clone, PartialEq)]
pub enum Step<T: RealField + Copy> {
    /// The point was updated.
    Advanced(IterState<T>),
    /// The previous point was stationary, the state is returned unchanged.
    Stationary(IterState<T>),
}

impl<T: RealField + Copy> ConjugateGradient<T> {
    /// Performs one iteration, consuming the current state and returning the
    /// next one.
    pub fn step(
        &self,
        f: &Quadratic<T>,
        state: IterState<T>,
    ) -> Result<Step<T>, ConjugateGradientError> {
        let p = match direction(&state.grad, state.prev.as_ref()) {
            Direction::Descent(p) => p,
            Direction::Stationary => {
                debug!("previous gradient is zero, point is stationary");
                return Ok(Step::Stationary(state));
            }
        };

        let alpha = step_length(f, &state.grad, &p, self.options.step_decimals)?;

        let IterState {
            mut x, grad, iter, ..
        } = state;

        debug!(
            "x{} = {:?} + {} * {:?}",
            iter + 1,
            x.as_slice(),
            alpha,
            p.as_slice()
        );

        x.axpy(alpha, &p, T::one());

        let mut next_grad = DVector::zeros(x.len());
        f.gradient(&x, &mut next_grad);

        Ok(Step::Advanced(IterState {
            x,
            grad: next_grad,
            prev: Some(PreviousStep::new(p, grad)),
            alpha: Some(alpha),
            iter: iter + 1,
        }))
    }
}
