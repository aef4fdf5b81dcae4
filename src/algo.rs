//! The collection of implemented algorithms.

pub mod conjugate_gradient;

pub use conjugate_gradient::ConjugateGradient;
