//! Small systems shared by the engine tests.

use super::config::EvaluatorOptions;
use super::evaluator::Evaluator;
use crate::core::forcefield::params::{CoefficientTable, Forcefield, ForcefieldSettings};
use crate::core::models::atom::Atom;
use crate::core::models::system::MolecularSystem;
use crate::core::utils::geometry::PeriodicBox;
use nalgebra::Point3;

/// One LJ type with sigma 3.5 and one harmonic bond type with k = 50, r0 = 4.
pub fn forcefield(extra_pair_settings: &str) -> Forcefield {
    let content = format!(
        r#"
        [globals]
        units = "real"

        [pair]
        style = "lj/cut"
        cutoff = 20.0
        {extra_pair_settings}

        [pair.coeffs]
        1 = {{ epsilon = 1.0, sigma = 3.5 }}

        [special-bonds]
        lj = [0.0, 0.0, 0.5]
        coul = [0.0, 0.0, 0.5]

        [bond]
        styles = ["harmonic", "morse"]

        [bond.coeffs]
        1 = {{ style = "harmonic", k = 50.0, r0 = 4.0 }}
        "#
    );
    resolve(&content)
}

fn resolve(content: &str) -> Forcefield {
    let settings: ForcefieldSettings = toml::from_str(content).unwrap();
    Forcefield::from_settings(&settings, &CoefficientTable::default()).unwrap()
}

fn cubic_box(length: f64) -> PeriodicBox {
    PeriodicBox::fully_periodic([0.0; 3], [length; 3]).unwrap()
}

fn build(system: MolecularSystem, forcefield: Forcefield) -> Evaluator {
    Evaluator::new(system, forcefield, EvaluatorOptions::default()).unwrap()
}

/// Two type-1 atoms `dist` apart along x in a 50 box, optionally joined by bond type 1.
pub fn two_atoms(dist: f64, bonded: bool) -> Evaluator {
    let mut system = MolecularSystem::new(cubic_box(50.0));
    system
        .add_atom(Atom::new(1, 1, Point3::new(10.0, 10.0, 10.0)))
        .unwrap();
    system
        .add_atom(Atom::new(2, 1, Point3::new(10.0 + dist, 10.0, 10.0)))
        .unwrap();
    if bonded {
        system.add_bond(1, 1, 1, 2).unwrap();
    }
    build(system, forcefield(""))
}

/// A bond whose atoms sit on opposite faces of the box.
pub fn wrapped_bond() -> Evaluator {
    let mut system = MolecularSystem::new(cubic_box(50.0));
    system
        .add_atom(Atom::new(1, 1, Point3::new(1.0, 25.0, 25.0)))
        .unwrap();
    system
        .add_atom(Atom::new(2, 1, Point3::new(49.0, 25.0, 25.0)))
        .unwrap();
    system.add_bond(1, 1, 1, 2).unwrap();
    build(system, forcefield(""))
}

/// Linear chain 1-2-3-4 bent into a square of side 4, so atoms 1 and 4 are 4 apart.
pub fn four_atom_chain() -> Evaluator {
    let mut system = MolecularSystem::new(cubic_box(50.0));
    let corners = [(10.0, 10.0), (14.0, 10.0), (14.0, 14.0), (10.0, 14.0)];
    for (index, (x, y)) in corners.into_iter().enumerate() {
        system
            .add_atom(Atom::new(index + 1, 1, Point3::new(x, y, 10.0)))
            .unwrap();
    }
    for serial in 1..=3 {
        system.add_bond(serial, 1, serial, serial + 1).unwrap();
    }
    build(system, forcefield(""))
}

/// `n`^3 charged atoms of two types on a jittered cubic lattice, strung into one chain
/// of alternating harmonic and Morse bonds.
pub fn lattice_chain(n: usize, spacing: f64) -> Evaluator {
    lattice_with_settings(n, spacing, "")
}

pub fn lattice_with_settings(n: usize, spacing: f64, extra_pair_settings: &str) -> Evaluator {
    let content = format!(
        r#"
        [pair]
        style = "lj/cut/coul/cut"
        cutoff = 5.0
        {extra_pair_settings}

        [pair.coeffs]
        1 = {{ epsilon = 0.2, sigma = 3.0 }}
        2 = {{ epsilon = 0.1, sigma = 3.3 }}

        [special-bonds]
        lj = [0.0, 0.0, 0.5]
        coul = [0.0, 0.0, 0.8333]

        [bond]
        styles = ["harmonic", "morse"]

        [bond.coeffs]
        1 = {{ style = "harmonic", k = 100.0, r0 = 3.3 }}
        2 = {{ style = "morse", d0 = 5.0, alpha = 1.5, r0 = 3.3 }}
        "#
    );

    let mut system = MolecularSystem::new(cubic_box(n as f64 * spacing));
    let mut serial = 0;
    for iz in 0..n {
        for iy in 0..n {
            for ix in 0..n {
                serial += 1;
                let jitter = |axis: usize| ((serial * 7 + axis * 3) % 11) as f64 * 0.02 - 0.1;
                let position = Point3::new(
                    (ix as f64 + 0.5) * spacing + jitter(0),
                    (iy as f64 + 0.5) * spacing + jitter(1),
                    (iz as f64 + 0.5) * spacing + jitter(2),
                );
                let mut atom = Atom::new(serial, 1 + serial % 2, position);
                atom.charge = if serial % 2 == 0 { 0.4 } else { -0.4 };
                system.add_atom(atom).unwrap();
            }
        }
    }
    for bond in 1..serial {
        system.add_bond(bond, 1 + bond % 2, bond, bond + 1).unwrap();
    }
    build(system, resolve(&content))
}

/// Copy of `system` with atom `serial` moved by `shift` along `axis`.
pub fn displaced(
    system: &MolecularSystem,
    serial: usize,
    axis: usize,
    shift: f64,
) -> MolecularSystem {
    let mut moved = MolecularSystem::new(*system.periodic_box());
    for id in system.atom_ids_by_serial() {
        let mut atom = system.atom(id).unwrap().clone();
        if atom.serial == serial {
            atom.position[axis] += shift;
        }
        moved.add_atom(atom).unwrap();
    }
    for bond in system.bonds_by_serial() {
        let a = system.atom(bond.atom1_id).unwrap().serial;
        let b = system.atom(bond.atom2_id).unwrap().serial;
        moved.add_bond(bond.serial, bond.bond_type, a, b).unwrap();
    }
    moved
}
