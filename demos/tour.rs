extern crate nalgebra as na;

use femtools::{
  interval::{mass1, stiffness1},
  quadrature::{GaussKind, Interval, QuadRule},
  triangle::{reference_lattice, TriangleBasis},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::fmt::init();

  let interval = Interval::new(0.0, 1.0)?;
  for kind in [GaussKind::Gauss, GaussKind::Radau, GaussKind::Lobatto] {
    let rule = QuadRule::golub_welsch(5, interval, kind)?;
    println!("{kind:?} nodes={:.6}", rule.points()?.transpose());
    println!("{kind:?} weights={:.6}", rule.weights().transpose());
  }

  for p in 1..=3 {
    let (x, mass) = mass1(p)?;
    let (_, stiffness) = stiffness1(p)?;
    println!("p={p} nodes={:.4}", x.transpose());
    println!("mass={mass:.4}");
    println!("stiffness={stiffness:.4}");
  }

  let tri = QuadRule::triangle_deg4();
  println!("triangle quadrature nodes={:.6}", tri.nodes());

  let lattice = reference_lattice(6)?;
  for p in 1..=2 {
    let basis = TriangleBasis::new(p)?;
    println!("{:?} reference nodes={}", basis.degree(), basis.xref());
    println!("B={:.4}", basis.b());
    let values = basis.evaluate_basis(&lattice)?.values;
    let (min, max) = (values.min(), values.max());
    println!("basis range on lattice: [{min:.4}, {max:.4}]");
    println!("mass={:.4}", basis.mass_matrix());
  }

  Ok(())
}
