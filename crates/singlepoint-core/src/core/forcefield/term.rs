use std::iter::Sum;
use std::ops::{Add, AddAssign};

/// Potential energy split by interaction term.
///
/// Terms a configuration does not compute (angles, dihedrals, impropers, long-range)
/// stay at exactly `0.0` rather than being omitted.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EnergyTerm {
    pub bond: f64,
    pub angle: f64,
    pub dihedral: f64,
    pub improper: f64,
    pub vdw: f64,
    pub coulomb: f64,
    pub long_range: f64,
    pub tail: f64,
}

impl EnergyTerm {
    pub fn bonded(bond: f64) -> Self {
        Self {
            bond,
            ..Self::default()
        }
    }

    pub fn non_bonded(vdw: f64, coulomb: f64) -> Self {
        Self {
            vdw,
            coulomb,
            ..Self::default()
        }
    }

    /// All pairwise contributions, including the tail correction.
    #[inline]
    pub fn pair(&self) -> f64 {
        self.vdw + self.coulomb + self.long_range + self.tail
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.bond + self.angle + self.dihedral + self.improper + self.pair()
    }
}

impl Add for EnergyTerm {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            bond: self.bond + rhs.bond,
            angle: self.angle + rhs.angle,
            dihedral: self.dihedral + rhs.dihedral,
            improper: self.improper + rhs.improper,
            vdw: self.vdw + rhs.vdw,
            coulomb: self.coulomb + rhs.coulomb,
            long_range: self.long_range + rhs.long_range,
            tail: self.tail + rhs.tail,
        }
    }
}

impl AddAssign for EnergyTerm {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for EnergyTerm {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, term| acc + term)
    }
}
