use nalgebra::Point3;

/// Represents a single particle of the simulated system.
///
/// Atoms are identified externally by their `serial` (the id used in the data file),
/// which is unique and stable for the whole run. The `type_id` indexes the per-type
/// pair parameters of the force field. Positions are set once at load time and are not
/// modified by a single-point evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The user-facing atom id (1-based in data files).
    pub serial: usize,
    /// The molecule id for atom styles that carry one, `0` otherwise.
    pub molecule: usize,
    /// The atom type, starting at 1.
    pub type_id: usize,
    /// The partial charge in elementary charge units.
    pub charge: f64,
    /// Cartesian coordinates in the length unit of the active unit style.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new neutral atom outside any molecule.
    ///
    /// # Arguments
    ///
    /// * `serial` - The unique atom id.
    /// * `type_id` - The atom type used for pair parameter lookup.
    /// * `position` - The Cartesian position of the atom.
    pub fn new(serial: usize, type_id: usize, position: Point3<f64>) -> Self {
        Self {
            serial,
            molecule: 0,
            type_id,
            charge: 0.0,
            position,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_atom_has_expected_default_fields() {
        let atom = Atom::new(7, 2, Point3::new(1.0, 2.0, 3.0));

        assert_eq!(atom.serial, 7);
        assert_eq!(atom.type_id, 2);
        assert_eq!(atom.molecule, 0);
        assert_eq!(atom.charge, 0.0);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn atom_equality_and_clone_works() {
        let mut atom1 = Atom::new(1, 1, Point3::origin());
        atom1.charge = -0.5;
        atom1.molecule = 3;
        let atom2 = atom1.clone();
        assert_eq!(atom1, atom2);
    }
}
