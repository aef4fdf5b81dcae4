//! Core abstractions and types for quadcg.
//!
//! *Users* are mainly interested in the [`Quadratic`](crate::Quadratic)
//! problem and the [`ConfigError`] returned when its definition is malformed.
//! The [`Function`] trait describes what the conjugate gradient iteration
//! needs from an objective: its value and its gradient.

mod base;
mod function;

pub use base::*;
pub use function::*;
