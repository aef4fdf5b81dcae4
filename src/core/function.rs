use nalgebra::{
    storage::{Storage, StorageMut},
    Dyn, Vector,
};

use super::base::Problem;

/// The trait for defining differentiable objective functions.
///
/// ## Defining a function
///
/// A function is any type that implements [`Function`] and [`Problem`] traits.
/// The conjugate gradient iteration needs the function value for reporting
/// and the gradient for the search directions.
///
/// The optimizer itself only accepts [`Quadratic`](crate::Quadratic), which
/// implements this trait. Other implementations are useful for evaluating the
/// same objective in a different form, for example without storing the
/// Hessian matrix:
///
/// ```rust
/// use quadcg::nalgebra as na;
/// use quadcg::{Function, Problem, Quadratic};
/// use na::{dmatrix, dvector, storage::Storage, storage::StorageMut, Dyn, Vector};
///
/// // f(x) = |x - 1|² = ½ xᵀ(2I)x − 2·1ᵀx + 2 on two variables.
/// struct Shifted;
///
/// impl Problem for Shifted {
///     type Field = f64;
///
///     fn dim(&self) -> usize {
///         2
///     }
/// }
///
/// impl Function for Shifted {
///     fn apply<Sx>(&self, x: &Vector<f64, Dyn, Sx>) -> f64
///     where
///         Sx: Storage<f64, Dyn>,
///     {
///         x.iter().map(|xi| (xi - 1.0).powi(2)).sum()
///     }
///
///     fn gradient<Sx, Sg>(&self, x: &Vector<f64, Dyn, Sx>, grad: &mut Vector<f64, Dyn, Sg>)
///     where
///         Sx: Storage<f64, Dyn>,
///         Sg: StorageMut<f64, Dyn>,
///     {
///         grad.iter_mut()
///             .zip(x.iter())
///             .for_each(|(gi, xi)| *gi = 2.0 * (xi - 1.0));
///     }
/// }
///
/// let quadratic = Quadratic::new(dmatrix![2.0, 0.0; 0.0, 2.0], dvector![-2.0, -2.0], 2.0)
///     .expect("symmetric hessian");
///
/// let x = dvector![3.0, -0.5];
/// assert_eq!(Shifted.apply(&x), quadratic.apply(&x));
///
/// let mut expected = dvector![0.0, 0.0];
/// let mut actual = dvector![0.0, 0.0];
/// quadratic.gradient(&x, &mut expected);
/// Shifted.gradient(&x, &mut actual);
/// assert_eq!(actual, expected);
/// ```
pub trait Function: Problem {
    /// Calculate the function value given values of the variables.
    fn apply<Sx>(&self, x: &Vector<Self::Field, Dyn, Sx>) -> Self::Field
    where
        Sx: Storage<Self::Field, Dyn>;

    /// Calculate the gradient of the function at `x` and store it into `grad`.
    fn gradient<Sx, Sg>(
        &self,
        x: &Vector<Self::Field, Dyn, Sx>,
        grad: &mut Vector<Self::Field, Dyn, Sg>,
    ) where
        Sx: Storage<Self::Field, Dyn>,
        Sg: StorageMut<Self::Field, Dyn>;
}
