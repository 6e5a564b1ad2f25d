//! Finite difference stencils and the matrices built from them.

use crate::{
  error::{Error, Result},
  linalg::DMatrixExt,
};

use itertools::Itertools;

/// Generates finite difference weights.
pub trait StencilGenerator {
  /// Weights for approximating derivatives at `z` from values at `x`.
  ///
  /// Row `k` of the result holds the weights of the `k`-th derivative,
  /// for `k` in `0..x.len()`. Row 0 is Lagrange interpolation.
  fn stencil(&self, z: f64, x: &[f64]) -> Result<na::DMatrix<f64>>;
}

impl<F> StencilGenerator for F
where
  F: Fn(f64, &[f64]) -> Result<na::DMatrix<f64>>,
{
  fn stencil(&self, z: f64, x: &[f64]) -> Result<na::DMatrix<f64>> {
    self(z, x)
  }
}

/// Stencils from the inverse of the Taylor matrix
/// $A_(i j) = (x_j - z)^i / i!$.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaylorStencil;
impl StencilGenerator for TaylorStencil {
  fn stencil(&self, z: f64, x: &[f64]) -> Result<na::DMatrix<f64>> {
    if x.is_empty() {
      return Err(Error::invalid("stencil without nodes"));
    }
    if let Some((a, b)) = x
      .iter()
      .tuple_combinations()
      .find(|(a, b)| a == b)
    {
      return Err(Error::invalid(format!("duplicate stencil nodes {a} and {b}")));
    }

    let n = x.len();
    let mut taylor = na::DMatrix::zeros(n, n);
    for (j, &xj) in x.iter().enumerate() {
      let h = xj - z;
      let mut term = 1.0;
      for i in 0..n {
        taylor[(i, j)] = term;
        term *= h / (i + 1) as f64;
      }
    }

    // C A^T = I
    Ok(taylor.try_inverse_checked()?.transpose())
  }
}

/// Stencil evaluation matrix.
///
/// Row `i` holds the `deriv`-th derivative stencil on `x` at `q[i]`.
/// With `deriv = 0` this evaluates the Lagrange basis of `x` at `q`.
pub fn fdvander(q: &[f64], x: &[f64], deriv: usize) -> Result<na::DMatrix<f64>> {
  fdvander_with(&TaylorStencil, q, x, deriv)
}

pub fn fdvander_with<S>(generator: &S, q: &[f64], x: &[f64], deriv: usize) -> Result<na::DMatrix<f64>>
where
  S: StencilGenerator + ?Sized,
{
  if deriv >= x.len() {
    return Err(Error::invalid(format!(
      "derivative order {deriv} needs more than {} nodes",
      x.len()
    )));
  }

  let mut b = na::DMatrix::zeros(q.len(), x.len());
  for (mut row, &qi) in b.row_iter_mut().zip(q) {
    let stencil = generator.stencil(qi, x)?;
    row.copy_from(&stencil.row(deriv));
  }
  tracing::trace!("fdvander: {} points, {} nodes, derivative {deriv}", q.len(), x.len());
  Ok(b)
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::linalg::assert_mat_eq;

  #[test]
  fn centered_three_point() {
    let stencil = TaylorStencil.stencil(0.0, &[-1.0, 0.0, 1.0]).unwrap();
    let expected = na::dmatrix![
      0.0, 1.0, 0.0;
      -0.5, 0.0, 0.5;
      1.0, -2.0, 1.0
    ];
    assert_mat_eq(&stencil, &expected);
  }

  #[test]
  fn interpolation_reproduces_polynomials() {
    let x = [-1.0, -0.2, 0.5, 1.0];
    let q = [-0.9, 0.0, 0.3, 0.77];
    let b = fdvander(&q, &x, 0).unwrap();
    let d = fdvander(&q, &x, 1).unwrap();
    let f = |t: f64| 2.0 - t + 3.0 * t.powi(3);
    let df = |t: f64| -1.0 + 9.0 * t.powi(2);
    let fx = na::DVector::from_iterator(x.len(), x.iter().map(|&t| f(t)));
    let bf = &b * &fx;
    let df_q = &d * &fx;
    for (i, &t) in q.iter().enumerate() {
      assert!((bf[i] - f(t)).abs() < 1e-12);
      assert!((df_q[i] - df(t)).abs() < 1e-11);
    }
  }

  #[test]
  fn evaluation_at_nodes_is_identity() {
    let x = [-1.0, 0.0, 0.5, 1.0];
    let b = fdvander(&x, &x, 0).unwrap();
    assert_mat_eq(&b, &na::DMatrix::identity(4, 4));
  }

  #[test]
  fn degenerate_nodes_fail() {
    assert!(matches!(
      TaylorStencil.stencil(0.0, &[0.0, 1.0, 1.0]),
      Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
      fdvander(&[0.0], &[-1.0, 1.0], 2),
      Err(Error::InvalidArgument(_))
    ));
  }

  #[test]
  fn duplicate_nodes_fail_through_fdvander() {
    assert!(matches!(
      fdvander(&[0.0], &[0.0, 1.0, 1.0], 0),
      Err(Error::InvalidArgument(_))
    ));
  }

  #[test]
  fn generator_errors_pass_through_unchanged() {
    let failing = |_z: f64, _x: &[f64]| -> Result<na::DMatrix<f64>> {
      Err(Error::numeric("stencil generator gave up"))
    };
    let err = fdvander_with(&failing, &[0.0, 0.5], &[-1.0, 1.0], 0).unwrap_err();
    assert_eq!(err, Error::numeric("stencil generator gave up"));
  }

  #[test]
  fn closure_generators_are_used() {
    let constant = |_z: f64, x: &[f64]| -> Result<na::DMatrix<f64>> {
      Ok(na::DMatrix::from_element(x.len(), x.len(), 1.0))
    };
    let b = fdvander_with(&constant, &[0.0, 0.5], &[-1.0, 1.0], 1).unwrap();
    assert_mat_eq(&b, &na::DMatrix::from_element(2, 2, 1.0));
  }
}
