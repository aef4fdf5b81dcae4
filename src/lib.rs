#![allow(clippy::many_single_char_names)]
#![warn(missing_docs)]

//! # quadcg
//!
//! Minimization of convex quadratic functions by the conjugate gradient method
//! with exact line search.
//!
//! ## Problem
//!
//! The minimized function is
//!
//! ```text
//! F(x) = ½ xᵀAx + bᵀx + c
//! ```
//!
//! where *A* is a symmetric (and, for the convergence guarantees to hold,
//! positive definite) matrix. The problem is represented by [`Quadratic`],
//! which validates its definition on construction.
//!
//! ```rust
//! use quadcg::nalgebra::{dmatrix, dvector};
//! use quadcg::{Function, Quadratic};
//!
//! let f = Quadratic::new(
//!     dmatrix![10.0, 4.0; 4.0, 2.0],
//!     dvector![-14.0, -6.0],
//!     20.0,
//! )
//! .expect("symmetric hessian");
//!
//! assert_eq!(f.apply(&dvector![1.0, 1.0]), 10.0);
//! ```
//!
//! Non-quadratic objectives and constraints are out of the scope of this
//! library.
//!
//! ## Optimizing
//!
//! The [`OptimizerDriver`] owns the problem and runs the iterative process
//! until the norm of the gradient drops under the tolerance or the maximum
//! number of iterations is reached.
//!
//! ```rust
//! use quadcg::OptimizerDriver;
//!
//! let optimizer = OptimizerDriver::<f64>::builder()
//!     .with_max_iters(20)
//!     .build()
//!     .expect("valid configuration");
//!
//! let minimum = optimizer.execute().expect("optimizer encountered an error");
//!
//! if minimum.gradient_norm() <= optimizer.options().tolerance() {
//!     println!("minimum found at {:?}", minimum.x().as_slice());
//! } else {
//!     println!("maximum number of iterations exceeded");
//! }
//! ```
//!
//! For full control over the process, [`IterState`](algo::conjugate_gradient::IterState)
//! and [`ConjugateGradient::step`](algo::ConjugateGradient::step) can be used
//! directly. See the [algorithm](algo::conjugate_gradient) documentation.
//!
//! ## License
//!
//! Licensed under MIT.

pub mod algo;
mod core;
pub mod driver;
pub mod quadratic;

pub use core::*;
pub use driver::{Minimum, OptimizerDriver};
pub use quadratic::Quadratic;

#[cfg(feature = "testing")]
pub mod testing;

#[cfg(not(feature = "testing"))]
pub(crate) mod testing;

pub use nalgebra;
