//! Element matrices of the degree `p` Lagrange element on the reference interval.
//!
//! The element nodes are the `p+1` Gauss-Lobatto points and the matrices are
//! integrated with the `p+1` point Gauss rule.

use crate::{
  error::{Error, Result},
  linalg::DMatrixExt,
  quadrature::QuadRule,
  stencil::fdvander,
};

/// Nodes of the degree `p` element together with its mass matrix
/// $M = B^T op("diag")(w) B$.
pub fn mass1(p: usize) -> Result<(na::DVector<f64>, na::DMatrix<f64>)> {
  elmat1(p, 0)
}

/// Nodes of the degree `p` element together with its stiffness matrix
/// $A = D^T op("diag")(w) D$, where `D` holds the basis derivatives.
pub fn stiffness1(p: usize) -> Result<(na::DVector<f64>, na::DMatrix<f64>)> {
  elmat1(p, 1)
}

fn elmat1(p: usize, deriv: usize) -> Result<(na::DVector<f64>, na::DMatrix<f64>)> {
  if p == 0 {
    return Err(Error::invalid("element degree must be at least 1"));
  }
  let x = QuadRule::lobatto(p + 1)?.points()?;
  let quad = QuadRule::gauss(p + 1)?;
  let q = quad.points()?;

  let b = fdvander(q.as_slice(), x.as_slice(), deriv)?;
  let elmat = b.weighted_gramian(quad.weights());
  tracing::debug!("built degree {p} interval element matrix of derivative order {deriv}");
  Ok((x, elmat))
}
