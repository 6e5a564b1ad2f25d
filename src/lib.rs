//! Quadrature rules and low order finite element bases in one and two dimensions.

extern crate nalgebra as na;

pub mod error;
pub mod interval;
pub mod linalg;
pub mod quadrature;
pub mod stencil;
pub mod triangle;

pub use error::{Error, Result};

pub type Dim = usize;
