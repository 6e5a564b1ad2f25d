//! Quadrature rules on the reference interval and the reference triangle.

use crate::{
  error::{Error, Result},
  linalg::{matrix_from_diagonals, sorted_symmetric_eigen, DMatrixExt},
  Dim,
};

use std::sync::LazyLock;

/// A closed interval $[lo, hi]$ with $lo < hi$.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
  lo: f64,
  hi: f64,
}
impl Interval {
  pub const REFERENCE: Self = Self { lo: -1.0, hi: 1.0 };

  pub fn new(lo: f64, hi: f64) -> Result<Self> {
    if !(lo.is_finite() && hi.is_finite()) {
      return Err(Error::invalid(format!("interval [{lo}, {hi}] is not finite")));
    }
    if lo >= hi {
      return Err(Error::invalid(format!("interval [{lo}, {hi}] is empty")));
    }
    Ok(Self { lo, hi })
  }

  pub fn lo(&self) -> f64 {
    self.lo
  }
  pub fn hi(&self) -> f64 {
    self.hi
  }
  pub fn length(&self) -> f64 {
    self.hi - self.lo
  }

  /// Affine map from the reference interval onto `self`.
  pub fn map_from_reference(&self, x: f64) -> f64 {
    0.5 * ((self.hi + self.lo) + (self.hi - self.lo) * x)
  }
}
impl Default for Interval {
  fn default() -> Self {
    Self::REFERENCE
  }
}

/// Which endpoints of the interval are prescribed as nodes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum GaussKind {
  /// No prescribed nodes.
  #[default]
  Gauss,
  /// Right endpoint `hi` prescribed.
  Radau,
  /// Both endpoints prescribed.
  Lobatto,
}
impl GaussKind {
  pub fn from_flags(radau: bool, lobatto: bool) -> Result<Self> {
    match (radau, lobatto) {
      (false, false) => Ok(Self::Gauss),
      (true, false) => Ok(Self::Radau),
      (false, true) => Ok(Self::Lobatto),
      (true, true) => Err(Error::invalid("radau and lobatto are mutually exclusive")),
    }
  }

  pub fn min_points(self) -> usize {
    match self {
      Self::Gauss | Self::Radau => 1,
      Self::Lobatto => 2,
    }
  }

  /// Highest polynomial degree integrated exactly by `npoints` nodes.
  ///
  /// `None` if `npoints` is below [`Self::min_points`].
  pub fn exactness(self, npoints: usize) -> Option<usize> {
    if npoints < self.min_points() {
      return None;
    }
    let prescribed = match self {
      Self::Gauss => 1,
      Self::Radau => 2,
      Self::Lobatto => 3,
    };
    (2 * npoints).checked_sub(prescribed)
  }
}

/// A quadrature rule.
///
/// Nodes are stored as the columns of a `dim x npoints` matrix,
/// index-for-index paired with the weights.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadRule {
  nodes: na::DMatrix<f64>,
  weights: na::DVector<f64>,
}
impl QuadRule {
  pub fn new(nodes: na::DMatrix<f64>, weights: na::DVector<f64>) -> Result<Self> {
    if nodes.ncols() != weights.len() {
      return Err(Error::invalid(format!(
        "{} nodes but {} weights",
        nodes.ncols(),
        weights.len()
      )));
    }
    if nodes.ncols() == 0 {
      return Err(Error::invalid("quadrature rule without nodes"));
    }
    Ok(Self { nodes, weights })
  }

  pub fn dim(&self) -> Dim {
    self.nodes.nrows()
  }
  pub fn npoints(&self) -> usize {
    self.nodes.ncols()
  }
  pub fn nodes(&self) -> &na::DMatrix<f64> {
    &self.nodes
  }
  pub fn weights(&self) -> &na::DVector<f64> {
    &self.weights
  }
  pub fn weight_sum(&self) -> f64 {
    self.weights.sum()
  }

  /// Node coordinates of a one-dimensional rule.
  pub fn points(&self) -> Result<na::DVector<f64>> {
    if self.dim() != 1 {
      return Err(Error::invalid(format!(
        "points of a {}-dimensional rule are not scalars",
        self.dim()
      )));
    }
    Ok(self.nodes.row(0).transpose())
  }

  pub fn integrate<F>(&self, f: F) -> f64
  where
    F: Fn(na::DVectorView<f64>) -> f64,
  {
    self
      .nodes
      .column_iter()
      .zip(self.weights.iter())
      .map(|(n, w)| w * f(n))
      .sum()
  }

  /// `n`-point Gauss-Legendre rule on the reference interval.
  pub fn gauss(n: usize) -> Result<Self> {
    Self::golub_welsch(n, Interval::REFERENCE, GaussKind::Gauss)
  }

  /// `n`-point Gauss-Lobatto rule on the reference interval.
  pub fn lobatto(n: usize) -> Result<Self> {
    Self::golub_welsch(n, Interval::REFERENCE, GaussKind::Lobatto)
  }

  /// Flag based entry point, with `radau` and `lobatto` mutually exclusive.
  pub fn golub_welsch_flags(n: usize, lo: f64, hi: f64, radau: bool, lobatto: bool) -> Result<Self> {
    let kind = GaussKind::from_flags(radau, lobatto)?;
    Self::golub_welsch(n, Interval::new(lo, hi)?, kind)
  }

  /// Gauss type rule with `n` nodes on `interval`, sorted ascending.
  ///
  /// Nodes are the eigenvalues of the Legendre Jacobi matrix, modified to
  /// prescribe the endpoints required by `kind`; weights are twice the squared
  /// first eigenvector components. The rule is built on $[-1, 1]$ and then
  /// mapped affinely onto `interval`.
  pub fn golub_welsch(n: usize, interval: Interval, kind: GaussKind) -> Result<Self> {
    if n < kind.min_points() {
      return Err(Error::invalid(format!(
        "{kind:?} rule needs at least {} nodes, got {n}",
        kind.min_points()
      )));
    }

    let mut jacobi = legendre_jacobi_matrix(n);
    match kind {
      GaussKind::Gauss => {}
      GaussKind::Radau => prescribe_right_endpoint(&mut jacobi),
      GaussKind::Lobatto => prescribe_endpoints(&mut jacobi, -1.0, 1.0)?,
    }
    tracing::trace!("jacobi matrix: {jacobi:.6}");

    let (eigenvals, eigenvecs) = sorted_symmetric_eigen(jacobi)?;

    let scale = 0.5 * interval.length();
    let nodes = na::DMatrix::from_iterator(
      1,
      n,
      eigenvals.iter().map(|&x| interval.map_from_reference(x)),
    );
    let weights = na::DVector::from_iterator(
      n,
      eigenvecs.row(0).iter().map(|&v| scale * 2.0 * v * v),
    );

    tracing::debug!(
      "built {kind:?} rule with {n} nodes on [{}, {}]",
      interval.lo(),
      interval.hi()
    );
    Self::new(nodes, weights)
  }

  /// Symmetric 6-point rule on the reference triangle $(-1,1), (-1,-1), (1,-1)$.
  ///
  /// Exact for polynomials of total degree 4. Weights sum to the area 2.
  pub fn triangle_deg4() -> Self {
    TRIANGLE_DEG4.clone()
  }
}

static TRIANGLE_DEG4: LazyLock<QuadRule> = LazyLock::new(|| {
  let a = -0.10810301816807;
  let b = -0.78379396366386;
  let c = -0.816847572980458;
  let d = 0.633695145960917;
  let wa = 0.446763179356023;
  let wc = 0.219903487310644;

  #[rustfmt::skip]
  let nodes = na::DMatrix::from_column_slice(2, 6, &[
    a, b,
    b, a,
    a, a,
    c, d,
    d, c,
    c, c,
  ]);
  let weights = na::dvector![wa, wa, wa, wc, wc, wc];
  QuadRule { nodes, weights }
});

/// Symmetric tridiagonal Jacobi matrix of the Legendre weight, zero diagonal.
fn legendre_jacobi_matrix(n: usize) -> na::DMatrix<f64> {
  let beta: Vec<f64> = (1..n)
    .map(|k| 0.5 / (1.0 - (2.0 * k as f64).powi(-2)).sqrt())
    .collect();
  matrix_from_diagonals(&[(1, &beta[..]), (-1, &beta[..])], n, n)
}

/// Radau modification fixing a node at $+1$.
///
/// Last diagonal entry becomes $1 - 2m^2 / (2m(2m+1))$ with $m = n - 1$,
/// written in reduced form so that $m = 0$ is well defined.
fn prescribe_right_endpoint(jacobi: &mut na::DMatrix<f64>) {
  let n = jacobi.nrows();
  let m = (n - 1) as f64;
  jacobi[(n - 1, n - 1)] = 1.0 - m / (2.0 * m + 1.0);
}

/// Lobatto modification fixing nodes at `a` and `b`.
///
/// Solves $(T' - a I) gamma = e_(n-1)$ and $(T' - b I) mu = e_(n-1)$ on the
/// leading block $T'$, then the 2x2 system for the new last diagonal entry
/// and the square of the new last off-diagonal entry.
fn prescribe_endpoints(jacobi: &mut na::DMatrix<f64>, a: f64, b: f64) -> Result<()> {
  let n = jacobi.nrows();
  let lead = jacobi.view((0, 0), (n - 1, n - 1)).into_owned();
  let eye = na::DMatrix::identity(n - 1, n - 1);
  let mut e = na::DVector::zeros(n - 1);
  e[n - 2] = 1.0;

  let gamma = (&lead - &eye * a).solve_checked(&e)?;
  let mu = (&lead - &eye * b).solve_checked(&e)?;

  let system = na::dmatrix![
    1.0, -gamma[n - 2];
    1.0, -mu[n - 2]
  ];
  let y = system.solve_checked(&na::dvector![a, b])?;

  if y[1] <= 0.0 {
    tracing::warn!("lobatto update gave off-diagonal square {}", y[1]);
    return Err(Error::numeric(format!(
      "lobatto update gave non-positive off-diagonal square {}",
      y[1]
    )));
  }
  let offdiag = y[1].sqrt();
  jacobi[(n - 1, n - 1)] = y[0];
  jacobi[(n - 1, n - 2)] = offdiag;
  jacobi[(n - 2, n - 1)] = offdiag;
  Ok(())
}
