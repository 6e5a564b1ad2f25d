use crate::error::{Error, Result};

use itertools::Itertools;

const EIGEN_EPS: f64 = f64::EPSILON;
const EIGEN_MAX_ITER: usize = 10_000;

pub trait DMatrixExt {
  /// $B^T op("diag")(w) B$
  ///
  /// # Panics
  /// If `weights` does not have one entry per row of `self`.
  fn weighted_gramian(&self, weights: &na::DVector<f64>) -> Self;
  fn is_symmetric(&self, tol: f64) -> bool;
  fn try_inverse_checked(self) -> Result<na::DMatrix<f64>>;
  fn solve_checked(&self, rhs: &na::DVector<f64>) -> Result<na::DVector<f64>>;
}
impl DMatrixExt for na::DMatrix<f64> {
  fn weighted_gramian(&self, weights: &na::DVector<f64>) -> Self {
    assert_eq!(
      self.nrows(),
      weights.len(),
      "one weight per matrix row required"
    );
    let mut weighted = self.clone();
    for (mut row, &w) in weighted.row_iter_mut().zip(weights.iter()) {
      row *= w;
    }
    self.transpose() * weighted
  }

  fn is_symmetric(&self, tol: f64) -> bool {
    self.is_square() && (self - self.transpose()).norm() <= tol * self.norm().max(1.0)
  }

  fn try_inverse_checked(self) -> Result<na::DMatrix<f64>> {
    let n = self.nrows();
    if !self.is_square() {
      return Err(Error::numeric(format!(
        "cannot invert non-square {}x{} matrix",
        n,
        self.ncols()
      )));
    }
    let inv = self
      .try_inverse()
      .ok_or_else(|| Error::numeric(format!("{n}x{n} matrix is singular")))?;
    if inv.iter().all(|v| v.is_finite()) {
      Ok(inv)
    } else {
      Err(Error::numeric(format!("{n}x{n} matrix is numerically singular")))
    }
  }

  fn solve_checked(&self, rhs: &na::DVector<f64>) -> Result<na::DVector<f64>> {
    let x = self
      .clone()
      .lu()
      .solve(rhs)
      .ok_or_else(|| Error::numeric("linear solve with singular matrix"))?;
    if x.iter().all(|v| v.is_finite()) {
      Ok(x)
    } else {
      Err(Error::numeric("linear solve produced non-finite values"))
    }
  }
}

/// Builds a matrix from a list of (offset, entries) diagonals.
///
/// A positive offset refers to a superdiagonal, a negative one to a subdiagonal.
/// Each diagonal is filled from its first entry until either the matrix or
/// the supplied values run out.
pub fn matrix_from_diagonals<T>(
  diagonals: &[(isize, &[T])],
  nrows: usize,
  ncols: usize,
) -> na::DMatrix<T>
where
  T: num_traits::Zero + na::Scalar + Copy,
{
  let mut matrix = na::DMatrix::zeros(nrows, ncols);

  for &(offset, values) in diagonals {
    let [start_row, start_col] = if offset >= 0 {
      [0, offset as usize]
    } else {
      [(-offset) as usize, 0]
    };

    let mut r = start_row;
    let mut c = start_col;
    let mut values = values.iter();
    while r < nrows && c < ncols {
      let Some(&v) = values.next() else { break };
      matrix[(r, c)] = v;
      r += 1;
      c += 1;
    }
  }

  matrix
}

/// Symmetric eigendecomposition with eigenpairs sorted by ascending eigenvalue.
///
/// Column `i` of the returned matrix is the eigenvector of eigenvalue `i`.
pub fn sorted_symmetric_eigen(
  m: na::DMatrix<f64>,
) -> Result<(na::DVector<f64>, na::DMatrix<f64>)> {
  let n = m.nrows();
  let eigen = na::SymmetricEigen::try_new(m, EIGEN_EPS, EIGEN_MAX_ITER)
    .ok_or_else(|| Error::numeric(format!("symmetric eigensolve of size {n} did not converge")))?;

  let order = (0..n)
    .sorted_by(|&i, &j| eigen.eigenvalues[i].total_cmp(&eigen.eigenvalues[j]))
    .collect_vec();

  let eigenvals = na::DVector::from_iterator(n, order.iter().map(|&i| eigen.eigenvalues[i]));
  let eigenvecs = na::DMatrix::from_columns(
    &order
      .iter()
      .map(|&i| eigen.eigenvectors.column(i).into_owned())
      .collect_vec(),
  );

  if eigenvals.iter().chain(eigenvecs.iter()).all(|v| v.is_finite()) {
    Ok((eigenvals, eigenvecs))
  } else {
    Err(Error::numeric("symmetric eigensolve produced non-finite values"))
  }
}

pub fn assert_mat_eq(a: &na::DMatrix<f64>, b: &na::DMatrix<f64>) {
  const TOL: f64 = 10e-12;
  assert_eq!(a.shape(), b.shape(), "Matrix shapes differ.");
  let diff = a - b;
  let error = diff.norm();
  let equal = error <= TOL;
  if !equal {
    println!("Matrix a={a:.3}");
    println!("Matrix b={b:.3}");
    println!("a-b={diff:.3}");
    panic!("Matrices not equal.");
  }
}
