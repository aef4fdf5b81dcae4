//! High-level API for the optimization.
//!
//! The [`OptimizerDriver`] owns the problem definition, the options and the
//! initial point and runs the whole iterative process in
//! [`execute`](OptimizerDriver::execute).
//!
//! The simplest way of using the driver is to initialize it with the defaults,
//! which minimizes `5X1² + X2² + 4X1X2 − 14X1 − 6X2 + 20` starting from the
//! origin:
//!
//! ```rust
//! use quadcg::OptimizerDriver;
//!
//! let optimizer = OptimizerDriver::<f64>::new();
//! let (x, value, gradient_norm) = optimizer.execute().unwrap().into_parts();
//!
//! assert!((x[0] - 1.0).abs() < 1e-6 && (x[1] - 1.0).abs() < 1e-6);
//! assert_eq!(value, 10.0);
//! assert_eq!(gradient_norm, 0.0);
//! ```
//!
//! If you need to specify additional settings, use the builder:
//!
//! ```rust
//! use quadcg::nalgebra::{dmatrix, dvector};
//! use quadcg::OptimizerDriver;
//!
//! let optimizer = OptimizerDriver::builder()
//!     .with_hessian(dmatrix![4.0, 1.0; 1.0, 3.0])
//!     .with_linear(dvector![-1.0, -2.0])
//!     .with_constant(0.0)
//!     .with_initial(vec![2.0, 1.0])
//!     .with_max_iters(50)
//!     .build()
//!     .expect("valid configuration");
//!
//! let minimum = optimizer.execute().expect("positive definite hessian");
//! println!("x = {:?} after {} iterations", minimum.x().as_slice(), minimum.iters());
//! ```
//!
//! If you need to inspect the process, pass a callback that is called with
//! every state, including the initial one:
//!
//! ```rust
//! # use quadcg::OptimizerDriver;
//! let optimizer = OptimizerDriver::<f64>::new();
//!
//! optimizer
//!     .execute_with(|state| {
//!         println!(
//!             "iter = {}\t|| g || = {}\tx = {:?}",
//!             state.iter(),
//!             state.gradient_norm(),
//!             state.x().as_slice()
//!         );
//!     })
//!     .unwrap();
//! ```
//!
//! Exhausting the iteration budget is not an error: the last point is returned
//! and it is up to the caller to compare the gradient norm with the tolerance.

use getset::{CopyGetters, Getters};
use log::{debug, info};
use nalgebra::{DMatrix, DVector, RealField};

use crate::{
    algo::conjugate_gradient::{
        ConjugateGradient, ConjugateGradientError, ConjugateGradientOptions, IterState, Step,
    },
    core::{ConfigError, Function, Problem, RealFieldExt, MAX_DECIMALS},
    quadratic::{default_constant, default_hessian, default_linear, Quadratic},
};

/// Builder for the [`OptimizerDriver`].
pub struct OptimizerBuilder<T: RealField + Copy> {
    problem: Option<Quadratic<T>>,
    hessian: Option<DMatrix<T>>,
    linear: Option<DVector<T>>,
    constant: Option<T>,
    x0: Option<Vec<T>>,
    options: ConjugateGradientOptions<T>,
}

impl<T: RealField + Copy> OptimizerBuilder<T> {
    fn new() -> Self {
        Self {
            problem: None,
            hessian: None,
            linear: None,
            constant: None,
            x0: None,
            options: ConjugateGradientOptions::default(),
        }
    }

    /// Sets the whole problem definition. Takes precedence over
    /// [`with_hessian`](Self::with_hessian),
    /// [`with_linear`](Self::with_linear) and
    /// [`with_constant`](Self::with_constant).
    pub fn with_problem(mut self, problem: Quadratic<T>) -> Self {
        self.problem = Some(problem);
        self
    }

    /// Sets the Hessian matrix. Default: `[[10, 4], [4, 2]]`.
    pub fn with_hessian(mut self, hessian: DMatrix<T>) -> Self {
        self.hessian = Some(hessian);
        self
    }

    /// Sets the linear coefficients. Default: `[-14, -6]`.
    pub fn with_linear(mut self, linear: DVector<T>) -> Self {
        self.linear = Some(linear);
        self
    }

    /// Sets the constant term. Default: `20`.
    pub fn with_constant(mut self, constant: T) -> Self {
        self.constant = Some(constant);
        self
    }

    /// Sets the initial point from which the iterative process starts.
    /// Default: origin.
    pub fn with_initial(mut self, x0: Vec<T>) -> Self {
        self.x0 = Some(x0);
        self
    }

    /// Sets the maximum number of iterations.
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.options.set_max_iters(max_iters);
        self
    }

    /// Sets all options of the algorithm.
    pub fn with_options(mut self, options: ConjugateGradientOptions<T>) -> Self {
        self.options = options;
        self
    }

    /// Validates the configuration and builds the [`OptimizerDriver`].
    pub fn build(self) -> Result<OptimizerDriver<T>, ConfigError> {
        let Self {
            problem,
            hessian,
            linear,
            constant,
            x0,
            options,
        } = self;

        if options.max_iters() == 0 {
            return Err(ConfigError::NoIterations);
        }

        let tolerance = options.tolerance();
        if !tolerance.is_finite() || tolerance < T::zero() {
            return Err(ConfigError::InvalidTolerance);
        }

        for decimals in options
            .step_decimals()
            .into_iter()
            .chain(Some(options.report_decimals()))
        {
            if decimals > MAX_DECIMALS {
                return Err(ConfigError::InvalidPrecision(decimals));
            }
        }

        let problem = match problem {
            Some(problem) => problem,
            None => Quadratic::new(
                hessian.unwrap_or_else(default_hessian),
                linear.unwrap_or_else(default_linear),
                constant.unwrap_or_else(default_constant),
            )?,
        };

        let dim = problem.dim();
        let x0 = match x0 {
            Some(x0) if x0.len() != dim => {
                return Err(ConfigError::DimensionMismatch {
                    expected: dim,
                    actual: x0.len(),
                })
            }
            Some(x0) => DVector::from_vec(x0),
            None => DVector::zeros(dim),
        };

        Ok(OptimizerDriver {
            problem,
            algo: ConjugateGradient::with_options(options),
            x0,
        })
    }
}

/// The driver for the process of minimizing a quadratic function.
///
/// For default settings, use [`OptimizerDriver::new`]. For more flexibility,
/// use [`OptimizerDriver::builder`]. For the usage of the driver, see
/// [module](self) documentation.
#[derive(Debug, Clone)]
pub struct OptimizerDriver<T: RealField + Copy> {
    problem: Quadratic<T>,
    algo: ConjugateGradient<T>,
    x0: DVector<T>,
}

impl<T: RealField + Copy> OptimizerDriver<T> {
    /// Returns the builder for specifying additional settings.
    pub fn builder() -> OptimizerBuilder<T> {
        OptimizerBuilder::new()
    }

    /// Initializes the driver with the default settings.
    pub fn new() -> Self {
        let problem = Quadratic::default();
        let x0 = DVector::zeros(problem.dim());

        Self {
            problem,
            algo: ConjugateGradient::new(),
            x0,
        }
    }

    /// Returns reference to the problem definition.
    pub fn problem(&self) -> &Quadratic<T> {
        &self.problem
    }

    /// Returns reference to the options of the algorithm.
    pub fn options(&self) -> &ConjugateGradientOptions<T> {
        self.algo.options()
    }

    /// Returns reference to the initial point.
    pub fn initial(&self) -> &DVector<T> {
        &self.x0
    }

    /// Returns the function value at `x`, rounded to the reporting precision.
    pub fn objective(&self, x: &DVector<T>) -> T {
        self.problem
            .apply(x)
            .round_to(self.options().report_decimals())
    }

    /// Returns the gradient at `x`.
    pub fn gradient(&self, x: &DVector<T>) -> DVector<T> {
        let mut grad = DVector::zeros(self.problem.dim());
        self.problem.gradient(x, &mut grad);
        grad
    }

    /// Returns the name of the used algorithm.
    pub fn name(&self) -> &str {
        ConjugateGradient::<T>::NAME
    }

    /// Runs the iterative process until the gradient norm drops to the
    /// tolerance or the maximum number of iterations is reached.
    pub fn execute(&self) -> Result<Minimum<T>, ConjugateGradientError> {
        self.execute_with(|_| {})
    }

    /// The same as [`execute`](Self::execute), but calls `inspect` with the
    /// initial state and with the state after every iteration.
    pub fn execute_with<C>(&self, mut inspect: C) -> Result<Minimum<T>, ConjugateGradientError>
    where
        C: FnMut(&IterState<T>),
    {
        let options = self.options();
        let tolerance = options.tolerance();

        info!(
            "{} started (dim = {}, max_iters = {})",
            self.name(),
            self.problem.dim(),
            options.max_iters()
        );

        let mut state = IterState::new(&self.problem, self.x0.clone());
        inspect(&state);

        if state.gradient_norm() <= tolerance {
            info!("initial point satisfies the stopping condition");
        } else {
            for _ in 0..options.max_iters() {
                match self.algo.step(&self.problem, state)? {
                    Step::Advanced(next) => state = next,
                    Step::Stationary(last) => {
                        state = last;
                        break;
                    }
                }

                inspect(&state);

                let norm = state.gradient_norm();
                debug!(
                    "iter = {}\t|| g || = {}\tx = {:?}",
                    state.iter(),
                    norm,
                    state.x().as_slice()
                );

                if norm <= tolerance {
                    info!("stopping condition reached at iteration {}", state.iter());
                    break;
                }
            }
        }

        let minimum = self.finish(state);

        info!(
            "{} finished: x = {:?}, || g || = {}",
            self.name(),
            minimum.x.as_slice(),
            minimum.gradient_norm
        );

        Ok(minimum)
    }

    fn finish(&self, state: IterState<T>) -> Minimum<T> {
        let decimals = self.options().report_decimals();
        let gradient_norm = state.gradient_norm().round_to(decimals);
        let iters = state.iter();
        let x = state.into_x();
        let value = self.objective(&x);

        Minimum {
            x,
            value,
            gradient_norm,
            iters,
        }
    }
}

impl<T: RealField + Copy> Default for OptimizerDriver<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of the optimization.
///
/// Can be converted into the triple `(x, value, gradient_norm)`.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Minimum<T: RealField + Copy> {
    /// The last point of the process.
    #[getset(get = "pub")]
    x: DVector<T>,
    /// Function value at the point, rounded to the reporting precision.
    #[getset(get_copy = "pub")]
    value: T,
    /// Gradient norm at the point, rounded to the reporting precision.
    #[getset(get_copy = "pub")]
    gradient_norm: T,
    /// Number of performed iterations.
    #[getset(get_copy = "pub")]
    iters: usize,
}

impl<T: RealField + Copy> Minimum<T> {
    /// Consumes the result, returning the triple `(x, value, gradient_norm)`.
    pub fn into_parts(self) -> (DVector<T>, T, T) {
        (self.x, self.value, self.gradient_norm)
    }
}

impl<T: RealField + Copy> From<Minimum<T>> for (DVector<T>, T, T) {
    fn from(minimum: Minimum<T>) -> Self {
        minimum.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;
    use nalgebra::{dmatrix, dvector};

    use crate::testing::*;

    #[test]
    fn default_problem() {
        let minimum = OptimizerDriver::<f64>::new().execute().unwrap();

        assert_abs_diff_eq!(minimum.x(), &dvector![1.0, 1.0], epsilon = 1e-6);
        assert_eq!(minimum.value(), 10.0);
        assert_eq!(minimum.gradient_norm(), 0.0);
        assert!(minimum.iters() <= 10);
    }

    #[test]
    fn result_as_triple() {
        let minimum = OptimizerDriver::<f64>::new().execute().unwrap();
        let expected = minimum.clone();
        let (x, value, gradient_norm): (DVector<f64>, f64, f64) = minimum.into();

        assert_eq!(&x, expected.x());
        assert_eq!(value, expected.value());
        assert_eq!(gradient_norm, expected.gradient_norm());
    }

    #[test]
    fn builder_defaults_match_new() {
        let built = OptimizerDriver::<f64>::builder().build().unwrap();
        let default = OptimizerDriver::<f64>::new();

        assert_eq!(built.problem(), default.problem());
        assert_eq!(built.initial(), &dvector![0.0, 0.0]);
        assert_eq!(built.options().max_iters(), 10);
        assert_eq!(built.execute().unwrap(), default.execute().unwrap());
    }

    #[test]
    fn defaults_are_fresh_per_instance() {
        let custom = OptimizerDriver::builder()
            .with_hessian(dmatrix![2.0, 0.0; 0.0, 2.0])
            .build()
            .unwrap();
        let default = OptimizerDriver::<f64>::new();

        assert_eq!(custom.problem().linear(), &dvector![-14.0, -6.0]);
        assert_eq!(default.problem().hessian(), &dmatrix![10.0, 4.0; 4.0, 2.0]);
    }

    #[test]
    fn early_termination_at_minimum() {
        let optimizer = OptimizerDriver::builder()
            .with_initial(vec![1.0, 1.0])
            .build()
            .unwrap();

        let mut states = 0;
        let minimum = optimizer.execute_with(|_| states += 1).unwrap();

        assert_eq!(minimum.iters(), 0);
        assert_eq!(states, 1);
        assert_eq!(minimum.x(), &dvector![1.0, 1.0]);
        assert_eq!(minimum.value(), 10.0);
        assert_eq!(minimum.gradient_norm(), 0.0);
    }

    #[test]
    fn budget_exhaustion_returns_last_point() {
        let optimizer = OptimizerDriver::builder()
            .with_max_iters(1)
            .build()
            .unwrap();
        let minimum = optimizer.execute().unwrap();

        assert_eq!(minimum.iters(), 1);
        assert_abs_diff_eq!(minimum.x(), &dvector![1.204, 0.516], epsilon = 1e-12);
        assert!(minimum.gradient_norm() > 0.0);
    }

    #[test]
    fn objective_is_non_increasing() {
        let bowl = Bowl;

        for x0 in [vec![0.0, 0.0], vec![10.0, -10.0]] {
            let optimizer = OptimizerDriver::builder()
                .with_problem(bowl.problem())
                .with_initial(x0)
                .with_max_iters(100)
                .build()
                .unwrap();

            let mut values = Vec::new();
            optimizer
                .execute_with(|state| values.push(optimizer.problem().apply(state.x())))
                .unwrap();

            assert!(values.len() > 1);
            for pair in values.windows(2) {
                assert!(pair[1] <= pair[0] + 1e-12, "{} > {}", pair[1], pair[0]);
            }
        }
    }

    #[test]
    fn directions_are_conjugate_with_exact_line_search() {
        let mut options = ConjugateGradientOptions::default();
        options.set_step_decimals(None);

        let problems = [Bowl.problem(), Tridiagonal::new(4).problem(), Diagonal::new(3).problem()];

        for f in problems {
            let x0 = vec![1.0; f.dim()]
                .into_iter()
                .enumerate()
                .map(|(i, xi)| xi + 2.0 * i as f64)
                .collect();

            let optimizer = OptimizerDriver::builder()
                .with_problem(f.clone())
                .with_initial(x0)
                .with_options(options.clone())
                .build()
                .unwrap();

            let mut directions = Vec::new();
            let minimum = optimizer
                .execute_with(|state| directions.extend(state.direction().cloned()))
                .unwrap();

            assert!(minimum.iters() <= f.dim());
            assert!(directions.len() >= 2);

            for (j, pj) in directions.iter().enumerate() {
                for pi in &directions[..j] {
                    let scale = (f.curvature(pi) * f.curvature(pj)).sqrt();
                    let conjugacy = pi.dot(&(f.hessian() * pj));
                    assert!(conjugacy.abs() <= 1e-6 * scale, "{} vs {}", conjugacy, scale);
                }
            }
        }
    }

    #[test]
    fn test_problems_converge() {
        let problems: Vec<Box<dyn TestProblem>> = vec![
            Box::new(Bowl),
            Box::new(Diagonal::new(3)),
            Box::new(Diagonal::new(5)),
            Box::new(Tridiagonal::new(4)),
            Box::new(Tridiagonal::new(6)),
        ];

        for test in problems {
            for x0 in test.initials() {
                let minimum = optimize(&test.problem(), x0, 100).unwrap();
                assert!(test.is_optimum(minimum.x(), 1e-5));
            }
        }
    }

    #[test]
    fn degenerate_direction_aborts() {
        let optimizer = OptimizerDriver::builder()
            .with_problem(Saddle.problem())
            .build()
            .unwrap();

        assert_eq!(
            optimizer.execute(),
            Err(ConjugateGradientError::DegenerateDirection)
        );
    }

    #[test]
    fn objective_and_gradient_accessors() {
        let optimizer = OptimizerDriver::<f64>::new();

        assert_eq!(optimizer.objective(&dvector![1.204, 0.516]), 10.047);
        assert_eq!(optimizer.gradient(&dvector![0.0, 0.0]), dvector![-14.0, -6.0]);
        assert_eq!(optimizer.name(), "Conjugate gradient");
    }

    #[test]
    fn zero_iterations() {
        let result = OptimizerDriver::<f64>::builder().with_max_iters(0).build();
        assert_eq!(result.unwrap_err(), ConfigError::NoIterations);
    }

    #[test]
    fn invalid_tolerance() {
        for tolerance in [-1.0, f64::NAN, f64::INFINITY] {
            let mut options = ConjugateGradientOptions::default();
            options.set_tolerance(tolerance);

            let result = OptimizerDriver::builder().with_options(options).build();
            assert_eq!(result.unwrap_err(), ConfigError::InvalidTolerance);
        }
    }

    #[test]
    fn excessive_precision() {
        let mut options = ConjugateGradientOptions::default();
        options.set_report_decimals(400);
        let result = OptimizerDriver::<f64>::builder().with_options(options).build();
        assert_eq!(result.unwrap_err(), ConfigError::InvalidPrecision(400));

        let mut options = ConjugateGradientOptions::default();
        options.set_step_decimals(Some(16));
        let result = OptimizerDriver::<f64>::builder().with_options(options).build();
        assert_eq!(result.unwrap_err(), ConfigError::InvalidPrecision(16));

        let mut options = ConjugateGradientOptions::default();
        options.set_step_decimals(Some(MAX_DECIMALS));
        options.set_report_decimals(MAX_DECIMALS);
        let optimizer = OptimizerDriver::<f64>::builder()
            .with_options(options)
            .build()
            .unwrap();
        let minimum = optimizer.execute().unwrap();
        assert!(minimum.value().is_finite());
        assert_abs_diff_eq!(minimum.value(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn malformed_problem() {
        let result = OptimizerDriver::builder()
            .with_hessian(dmatrix![10.0, 4.0; 3.0, 2.0])
            .build();
        assert_eq!(result.unwrap_err(), ConfigError::NotSymmetric);

        let result = OptimizerDriver::builder()
            .with_hessian(dmatrix![1.0, 0.0, 0.0; 0.0, 1.0, 0.0; 0.0, 0.0, 1.0])
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DimensionMismatch {
                expected: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn mismatched_initial_point() {
        let result = OptimizerDriver::<f64>::builder()
            .with_initial(vec![0.0, 0.0, 0.0])
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        );
    }
}
