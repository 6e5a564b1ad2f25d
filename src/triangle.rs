//! Nodal Lagrange elements on the reference triangle $(-1,1), (-1,-1), (1,-1)$.
//!
//! The nodal basis is obtained from the monomials by inverting the
//! monomial Vandermonde matrix at the reference nodes.

use crate::{
  error::{Error, Result},
  linalg::DMatrixExt,
  quadrature::QuadRule,
};

use num_integer::binomial;

/// Exponents `(a, b)` of the monomials $x^a y^b$, ordered by total degree.
static MONOMIALS: [(i32, i32); 6] = [(0, 0), (1, 0), (0, 1), (2, 0), (1, 1), (0, 2)];

#[rustfmt::skip]
static REF_NODES: [[f64; 2]; 6] = [
  [-1.0, 1.0], [-1.0, -1.0], [1.0, -1.0],
  [-1.0, 0.0], [0.0, -1.0], [0.0, 0.0],
];

/// Polynomial degree of the element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degree {
  /// Vertex nodes, monomials $1, x, y$.
  Linear,
  /// Vertex and edge midpoint nodes, additionally $x^2, x y, y^2$.
  Quadratic,
}
impl Degree {
  pub fn order(self) -> usize {
    match self {
      Self::Linear => 1,
      Self::Quadratic => 2,
    }
  }

  /// Number of basis functions, equal to the number of nodes.
  pub fn nbasis(self) -> usize {
    binomial(self.order() + 2, 2)
  }

  fn monomials(self) -> &'static [(i32, i32)] {
    &MONOMIALS[..self.nbasis()]
  }

  /// Reference nodes as the columns of a `2 x nbasis` matrix.
  ///
  /// The vertices come first, followed by the edge midpoints.
  pub fn ref_nodes(self) -> na::DMatrix<f64> {
    let nodes = &REF_NODES[..self.nbasis()];
    na::DMatrix::from_iterator(2, nodes.len(), nodes.iter().flatten().copied())
  }
}
impl TryFrom<usize> for Degree {
  type Error = Error;

  fn try_from(p: usize) -> Result<Self> {
    match p {
      1 => Ok(Self::Linear),
      2 => Ok(Self::Quadratic),
      _ => Err(Error::invalid(format!(
        "triangle elements are available for degree 1 and 2, not {p}"
      ))),
    }
  }
}

/// Values and gradients of a family of functions at a set of points.
///
/// `values` is `npoints x nfuncs`; `grads[0]` and `grads[1]` are the
/// `x` and `y` derivatives with the same layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulation {
  pub values: na::DMatrix<f64>,
  pub grads: [na::DMatrix<f64>; 2],
}
impl Tabulation {
  fn transform(&self, coeffs: &na::DMatrix<f64>) -> Self {
    Self {
      values: &self.values * coeffs,
      grads: [&self.grads[0] * coeffs, &self.grads[1] * coeffs],
    }
  }
}

/// Nodal basis of degree 1 or 2, tabulated at the degree 4 triangle rule.
#[derive(Debug, Clone)]
pub struct TriangleBasis {
  degree: Degree,
  xref: na::DMatrix<f64>,
  quad: QuadRule,
  vinv: na::DMatrix<f64>,
  b: na::DMatrix<f64>,
  d: [na::DMatrix<f64>; 2],
}
impl TriangleBasis {
  pub fn new(p: usize) -> Result<Self> {
    Self::with_degree(Degree::try_from(p)?)
  }

  pub fn with_degree(degree: Degree) -> Result<Self> {
    let xref = degree.ref_nodes();
    let quad = QuadRule::triangle_deg4();

    let vandermonde = prime(degree, &xref).values;
    tracing::trace!("monomial vandermonde: {vandermonde:.3}");
    let vinv = vandermonde
      .try_inverse_checked()
      .map_err(|e| Error::invariant(format!("reference vandermonde of {degree:?} element: {e}")))?;

    let Tabulation { values: b, grads: d } = prime(degree, quad.nodes()).transform(&vinv);

    tracing::debug!(
      "built {degree:?} triangle basis with {} functions at {} quadrature points",
      degree.nbasis(),
      quad.npoints()
    );
    Ok(Self {
      degree,
      xref,
      quad,
      vinv,
      b,
      d,
    })
  }

  pub fn degree(&self) -> Degree {
    self.degree
  }
  pub fn nbasis(&self) -> usize {
    self.degree.nbasis()
  }
  /// Reference nodes, one column per basis function.
  pub fn xref(&self) -> &na::DMatrix<f64> {
    &self.xref
  }
  pub fn quad(&self) -> &QuadRule {
    &self.quad
  }
  pub fn vinv(&self) -> &na::DMatrix<f64> {
    &self.vinv
  }
  /// Basis values at the quadrature points, one column per basis function.
  pub fn b(&self) -> &na::DMatrix<f64> {
    &self.b
  }
  /// Basis `x` and `y` derivatives at the quadrature points.
  pub fn d(&self) -> &[na::DMatrix<f64>; 2] {
    &self.d
  }

  /// Monomials and their gradients at `points` (columns of a `2 x npoints` matrix).
  pub fn evaluate(&self, points: &na::DMatrix<f64>) -> Result<Tabulation> {
    check_points(points)?;
    Ok(prime(self.degree, points))
  }

  /// Nodal basis functions and their gradients at `points`.
  pub fn evaluate_basis(&self, points: &na::DMatrix<f64>) -> Result<Tabulation> {
    Ok(self.evaluate(points)?.transform(&self.vinv))
  }

  /// Reference element mass matrix $B^T op("diag")(w) B$.
  pub fn mass_matrix(&self) -> na::DMatrix<f64> {
    self.b.weighted_gramian(self.quad.weights())
  }

  /// Reference element stiffness matrix of the Laplacian.
  pub fn stiffness_matrix(&self) -> na::DMatrix<f64> {
    let w = self.quad.weights();
    self.d[0].weighted_gramian(w) + self.d[1].weighted_gramian(w)
  }
}

fn check_points(points: &na::DMatrix<f64>) -> Result<()> {
  if points.nrows() == 2 {
    Ok(())
  } else {
    Err(Error::invalid(format!(
      "triangle points must have 2 coordinates, got {}",
      points.nrows()
    )))
  }
}

/// Monomial Vandermonde matrix and its gradient at `points`.
fn prime(degree: Degree, points: &na::DMatrix<f64>) -> Tabulation {
  let monomials = degree.monomials();
  let npoints = points.ncols();
  let nbasis = monomials.len();

  let mut values = na::DMatrix::zeros(npoints, nbasis);
  let mut dx = na::DMatrix::zeros(npoints, nbasis);
  let mut dy = na::DMatrix::zeros(npoints, nbasis);
  for (i, point) in points.column_iter().enumerate() {
    let (x, y) = (point[0], point[1]);
    for (j, &(a, b)) in monomials.iter().enumerate() {
      values[(i, j)] = x.powi(a) * y.powi(b);
      if a > 0 {
        dx[(i, j)] = a as f64 * x.powi(a - 1) * y.powi(b);
      }
      if b > 0 {
        dy[(i, j)] = b as f64 * x.powi(a) * y.powi(b - 1);
      }
    }
  }
  Tabulation {
    values,
    grads: [dx, dy],
  }
}

/// `n x n` lattice of points covering the reference triangle.
///
/// Row `i` of the lattice sits at height $y_i$ of `n` equispaced levels in
/// $[-1, 1]$ and runs equispaced from $x = -1$ to $x = -y_i$.
pub fn reference_lattice(n: usize) -> Result<na::DMatrix<f64>> {
  if n < 2 {
    return Err(Error::invalid(format!("lattice needs at least 2 points per side, got {n}")));
  }
  let linspace = |lo: f64, hi: f64, k: usize| lo + (hi - lo) * k as f64 / (n - 1) as f64;

  let mut points = na::DMatrix::zeros(2, n * n);
  for i in 0..n {
    let y = linspace(-1.0, 1.0, i);
    for k in 0..n {
      let mut col = points.column_mut(i * n + k);
      col[0] = linspace(-1.0, -y, k);
      col[1] = y;
    }
  }
  Ok(points)
}
