extern crate nalgebra as na;

use approx::assert_abs_diff_eq;
use femtools::{
  interval::mass1,
  linalg::{assert_mat_eq, DMatrixExt},
  quadrature::{GaussKind, Interval, QuadRule},
  stencil::fdvander,
  triangle::TriangleBasis,
  Error,
};

const INTERVALS: [(f64, f64); 4] = [(-1.0, 1.0), (0.0, 1.0), (-3.5, -0.25), (2.0, 10.0)];

#[test]
fn gauss_weights_sum_to_length() {
  for (lo, hi) in INTERVALS {
    for n in 1..=12 {
      let rule = QuadRule::golub_welsch_flags(n, lo, hi, false, false).unwrap();
      assert_abs_diff_eq!(rule.weight_sum(), hi - lo, epsilon = 1e-10);
      assert!(rule.weights().iter().all(|&w| w > 0.0));
    }
  }
}

#[test]
fn lobatto_contains_endpoints() {
  for (lo, hi) in INTERVALS {
    for n in 2..=12 {
      let rule = QuadRule::golub_welsch_flags(n, lo, hi, false, true).unwrap();
      let points = rule.points().unwrap();
      assert_abs_diff_eq!(points.min(), lo, epsilon = 1e-10);
      assert_abs_diff_eq!(points.max(), hi, epsilon = 1e-10);
      assert_abs_diff_eq!(rule.weight_sum(), hi - lo, epsilon = 1e-10);
    }
  }
}

#[test]
fn conflicting_flags() {
  let err = QuadRule::golub_welsch_flags(4, -1.0, 1.0, true, true).unwrap_err();
  assert!(matches!(err, Error::InvalidArgument(_)));
  assert!(matches!(
    GaussKind::from_flags(true, true),
    Err(Error::InvalidArgument(_))
  ));
}

#[test]
fn gauss2_reference() {
  let rule = QuadRule::golub_welsch_flags(2, -1.0, 1.0, false, false).unwrap();
  let points = rule.points().unwrap();
  assert_abs_diff_eq!(points[0], -0.5773502691896258, epsilon = 1e-12);
  assert_abs_diff_eq!(points[1], 0.5773502691896258, epsilon = 1e-12);
  assert_abs_diff_eq!(rule.weights()[0], 1.0, epsilon = 1e-12);
  assert_abs_diff_eq!(rule.weights()[1], 1.0, epsilon = 1e-12);
}

#[test]
fn lobatto3_reference() {
  let rule = QuadRule::golub_welsch_flags(3, -1.0, 1.0, false, true).unwrap();
  let expected_points = [-1.0, 0.0, 1.0];
  let expected_weights = [1.0 / 3.0, 4.0 / 3.0, 1.0 / 3.0];
  for i in 0..3 {
    assert_abs_diff_eq!(rule.points().unwrap()[i], expected_points[i], epsilon = 1e-12);
    assert_abs_diff_eq!(rule.weights()[i], expected_weights[i], epsilon = 1e-12);
  }
}

#[test]
fn mass1_linear_is_spd() {
  let (x, m) = mass1(1).unwrap();
  assert_eq!(x.len(), 2);
  assert_abs_diff_eq!(x[0], -1.0, epsilon = 1e-12);
  assert_abs_diff_eq!(x[1], 1.0, epsilon = 1e-12);
  assert_eq!(m.shape(), (2, 2));
  assert!(m.is_symmetric(1e-12));
  assert!(m.clone().cholesky().is_some());
}

#[test]
fn mass1_is_spd_for_higher_degrees() {
  for p in 1..=8 {
    let (x, m) = mass1(p).unwrap();
    assert_eq!(x.len(), p + 1);
    assert!(m.is_symmetric(1e-10));
    assert!(m.cholesky().is_some(), "mass matrix of degree {p} not positive definite");
  }
}

#[test]
fn mass1_matches_fdvander_assembly() {
  let p = 3;
  let x = QuadRule::lobatto(p + 1).unwrap().points().unwrap();
  let quad = QuadRule::gauss(p + 1).unwrap();
  let b = fdvander(quad.points().unwrap().as_slice(), x.as_slice(), 0).unwrap();
  let expected = b.transpose() * na::DMatrix::from_diagonal(quad.weights()) * &b;
  let (_, computed) = mass1(p).unwrap();
  assert_mat_eq(&computed, &expected);
}

#[test]
fn triangle_weights_sum_to_area() {
  assert_abs_diff_eq!(QuadRule::triangle_deg4().weight_sum(), 2.0, epsilon = 1e-12);
}

#[test]
fn triangle_basis_kronecker_delta() {
  for p in 1..=2 {
    let basis = TriangleBasis::new(p).unwrap();
    let n = basis.nbasis();
    let v = basis.evaluate(basis.xref()).unwrap().values;
    assert_mat_eq(&(v * basis.vinv()), &na::DMatrix::identity(n, n));
  }
  assert!(matches!(TriangleBasis::new(3), Err(Error::InvalidArgument(_))));
}

#[test]
fn construction_is_deterministic() {
  for kind in [GaussKind::Gauss, GaussKind::Radau, GaussKind::Lobatto] {
    let interval = Interval::new(-2.0, 5.0).unwrap();
    let a = QuadRule::golub_welsch(9, interval, kind).unwrap();
    let b = QuadRule::golub_welsch(9, interval, kind).unwrap();
    assert_eq!(a, b);
  }
  assert_eq!(mass1(4).unwrap(), mass1(4).unwrap());

  let a = TriangleBasis::new(2).unwrap();
  let b = TriangleBasis::new(2).unwrap();
  assert_eq!(a.b(), b.b());
  assert_eq!(a.d(), b.d());
}
