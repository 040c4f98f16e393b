//! Support for linear algebra.

pub mod aliasing;
pub mod matrix;
