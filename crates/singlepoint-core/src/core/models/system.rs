use super::atom::Atom;
use super::ids::AtomId;
use super::topology::Bond;
use crate::core::utils::geometry::PeriodicBox;
use slotmap::{SecondaryMap, SlotMap};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Duplicate atom id {0}")]
    DuplicateAtom(usize),
    #[error("Duplicate bond id {0}")]
    DuplicateBond(usize),
    #[error("Bond {bond} references nonexistent atom {atom}")]
    MissingBondAtom { bond: usize, atom: usize },
    #[error("Bond {bond} connects atom {atom} to itself")]
    SelfBond { bond: usize, atom: usize },
    #[error("Atom {serial} has invalid type {type_id} (types start at 1)")]
    InvalidAtomType { serial: usize, type_id: usize },
    #[error("Bond {serial} has invalid type {bond_type} (types start at 1)")]
    InvalidBondType { serial: usize, bond_type: usize },
}

/// Represents a complete periodic system of atoms and bonds.
///
/// This struct is the topology graph of the evaluation: it owns the atoms, the bond
/// records, the simulation box and a cached adjacency list used for bonded-neighbor
/// classification. Atoms are addressed internally by [`AtomId`] and externally by their
/// integer serial.
#[derive(Debug, Clone)]
pub struct MolecularSystem {
    /// Primary storage for atoms using a slot map for efficient ID management.
    atoms: SlotMap<AtomId, Atom>,
    /// List of all bond records, in insertion order.
    bonds: Vec<Bond>,
    /// Lookup from atom serial to internal ID, ordered by serial.
    serial_map: BTreeMap<usize, AtomId>,
    /// Serials of all bonds added so far.
    bond_serials: HashSet<usize>,
    /// Cached adjacency list for bond connectivity, indexed by atom ID.
    bond_adjacency: SecondaryMap<AtomId, Vec<AtomId>>,
    /// The simulation box all distances are measured in.
    periodic_box: PeriodicBox,
}

impl MolecularSystem {
    /// Creates a new, empty system inside the given box.
    pub fn new(periodic_box: PeriodicBox) -> Self {
        Self {
            atoms: SlotMap::with_key(),
            bonds: Vec::new(),
            serial_map: BTreeMap::new(),
            bond_serials: HashSet::new(),
            bond_adjacency: SecondaryMap::new(),
            periodic_box,
        }
    }

    pub fn periodic_box(&self) -> &PeriodicBox {
        &self.periodic_box
    }

    /// Replaces the per-axis periodic flags, keeping the box bounds.
    pub fn set_periodicity(&mut self, periodic: [bool; 3]) {
        self.periodic_box = self.periodic_box.with_periodicity(periodic);
    }

    /// Retrieves an immutable reference to an atom by its ID.
    ///
    /// # Return
    ///
    /// Returns `Some(&Atom)` if the atom exists, otherwise `None`.
    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    /// Returns an iterator over all atoms in the system, in storage order.
    pub fn atoms_iter(&self) -> impl Iterator<Item = (AtomId, &Atom)> {
        self.atoms.iter()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    /// Finds an atom ID by the atom's serial.
    pub fn find_atom_by_serial(&self, serial: usize) -> Option<AtomId> {
        self.serial_map.get(&serial).copied()
    }

    /// Returns all atom IDs sorted by ascending serial.
    ///
    /// This is the canonical iteration order of every evaluation pass.
    pub fn atom_ids_by_serial(&self) -> Vec<AtomId> {
        self.serial_map.values().copied().collect()
    }

    /// Returns a slice of all bonds in insertion order.
    pub fn bonds(&self) -> &[Bond] {
        &self.bonds
    }

    /// Returns the bonds sorted by ascending serial.
    pub fn bonds_by_serial(&self) -> Vec<&Bond> {
        let mut bonds: Vec<&Bond> = self.bonds.iter().collect();
        bonds.sort_by_key(|bond| bond.serial);
        bonds
    }

    /// Adds an atom to the system.
    ///
    /// # Errors
    ///
    /// Returns [`TopologyError::DuplicateAtom`] if an atom with the same serial exists,
    /// or [`TopologyError::InvalidAtomType`] for a zero type.
    pub fn add_atom(&mut self, atom: Atom) -> Result<AtomId, TopologyError> {
        if self.serial_map.contains_key(&atom.serial) {
            return Err(TopologyError::DuplicateAtom(atom.serial));
        }
        if atom.type_id == 0 {
            return Err(TopologyError::InvalidAtomType {
                serial: atom.serial,
                type_id: atom.type_id,
            });
        }

        let serial = atom.serial;
        let atom_id = self.atoms.insert(atom);
        self.serial_map.insert(serial, atom_id);
        self.bond_adjacency.insert(atom_id, Vec::new());
        Ok(atom_id)
    }

    /// Adds a bond between two atoms given by serial.
    ///
    /// Several bond records may connect the same pair; each contributes bond energy,
    /// but the adjacency list stores the connection only once.
    ///
    /// # Errors
    ///
    /// Fails for duplicate bond serials, zero bond types, self bonds and references to
    /// atoms that do not exist.
    pub fn add_bond(
        &mut self,
        serial: usize,
        bond_type: usize,
        atom1_serial: usize,
        atom2_serial: usize,
    ) -> Result<(), TopologyError> {
        if self.bond_serials.contains(&serial) {
            return Err(TopologyError::DuplicateBond(serial));
        }
        if bond_type == 0 {
            return Err(TopologyError::InvalidBondType { serial, bond_type });
        }
        if atom1_serial == atom2_serial {
            return Err(TopologyError::SelfBond {
                bond: serial,
                atom: atom1_serial,
            });
        }

        let lookup = |atom: usize| {
            self.find_atom_by_serial(atom)
                .ok_or(TopologyError::MissingBondAtom { bond: serial, atom })
        };
        let atom1_id = lookup(atom1_serial)?;
        let atom2_id = lookup(atom2_serial)?;

        self.bond_serials.insert(serial);
        self.bonds
            .push(Bond::new(serial, bond_type, atom1_id, atom2_id));

        if !self.bond_adjacency[atom1_id].contains(&atom2_id) {
            self.bond_adjacency[atom1_id].push(atom2_id);
            self.bond_adjacency[atom2_id].push(atom1_id);
        }
        Ok(())
    }

    /// Retrieves the bonded neighbors of an atom.
    ///
    /// # Return
    ///
    /// Returns `Some(&[AtomId])` if the atom exists, otherwise `None`.
    pub fn get_bonded_neighbors(&self, atom_id: AtomId) -> Option<&[AtomId]> {
        self.bond_adjacency.get(atom_id).map(|v| v.as_slice())
    }

    /// Returns the set of atom types present in the system.
    pub fn atom_types(&self) -> BTreeSet<usize> {
        self.atoms.values().map(|atom| atom.type_id).collect()
    }

    /// Returns the number of atoms of each type.
    pub fn type_counts(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for atom in self.atoms.values() {
            *counts.entry(atom.type_id).or_insert(0) += 1;
        }
        counts
    }

    /// Returns the set of bond types referenced by bond records.
    pub fn bond_types(&self) -> BTreeSet<usize> {
        self.bonds.iter().map(|bond| bond.bond_type).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn test_box() -> PeriodicBox {
        PeriodicBox::fully_periodic([0.0; 3], [50.0; 3]).unwrap()
    }

    fn create_chain_system() -> MolecularSystem {
        let mut system = MolecularSystem::new(test_box());
        for serial in [3, 1, 2] {
            system
                .add_atom(Atom::new(serial, 1, Point3::new(serial as f64, 0.0, 0.0)))
                .unwrap();
        }
        system.add_bond(2, 1, 2, 3).unwrap();
        system.add_bond(1, 1, 1, 2).unwrap();
        system
    }

    #[test]
    fn system_creation_and_access() {
        let system = create_chain_system();

        assert_eq!(system.atom_count(), 3);
        assert_eq!(system.bonds().len(), 2);
        let id = system.find_atom_by_serial(2).unwrap();
        assert_eq!(system.atom(id).unwrap().serial, 2);
        assert!(system.find_atom_by_serial(4).is_none());
    }

    #[test]
    fn set_periodicity_keeps_bounds() {
        let mut system = create_chain_system();
        system.set_periodicity([true, false, true]);
        let periodic_box = system.periodic_box();
        assert_eq!(periodic_box.periodicity(), [true, false, true]);
        assert_eq!(periodic_box.volume(), 50.0f64.powi(3));
    }

    #[test]
    fn atom_ids_by_serial_are_sorted() {
        let system = create_chain_system();
        let serials: Vec<usize> = system
            .atom_ids_by_serial()
            .into_iter()
            .map(|id| system.atom(id).unwrap().serial)
            .collect();
        assert_eq!(serials, vec![1, 2, 3]);
    }

    #[test]
    fn bonds_by_serial_are_sorted() {
        let system = create_chain_system();
        let serials: Vec<usize> = system.bonds_by_serial().iter().map(|b| b.serial).collect();
        assert_eq!(serials, vec![1, 2]);
    }

    #[test]
    fn get_bonded_neighbors_returns_correct_neighbors() {
        let system = create_chain_system();
        let a1 = system.find_atom_by_serial(1).unwrap();
        let a2 = system.find_atom_by_serial(2).unwrap();
        let a3 = system.find_atom_by_serial(3).unwrap();

        assert_eq!(system.get_bonded_neighbors(a1).unwrap(), &[a2]);
        let middle = system.get_bonded_neighbors(a2).unwrap();
        assert_eq!(middle.len(), 2);
        assert!(middle.contains(&a1));
        assert!(middle.contains(&a3));
    }

    #[test]
    fn duplicate_atom_serial_is_rejected() {
        let mut system = create_chain_system();
        let result = system.add_atom(Atom::new(2, 1, Point3::origin()));
        assert_eq!(result, Err(TopologyError::DuplicateAtom(2)));
    }

    #[test]
    fn zero_atom_type_is_rejected() {
        let mut system = MolecularSystem::new(test_box());
        let result = system.add_atom(Atom::new(1, 0, Point3::origin()));
        assert!(matches!(result, Err(TopologyError::InvalidAtomType { .. })));
    }

    #[test]
    fn bond_to_missing_atom_is_rejected() {
        let mut system = create_chain_system();
        let result = system.add_bond(3, 1, 1, 42);
        assert_eq!(
            result,
            Err(TopologyError::MissingBondAtom { bond: 3, atom: 42 })
        );
        assert_eq!(system.bonds().len(), 2);
    }

    #[test]
    fn duplicate_bond_serial_and_self_bond_are_rejected() {
        let mut system = create_chain_system();
        assert_eq!(
            system.add_bond(1, 1, 1, 3),
            Err(TopologyError::DuplicateBond(1))
        );
        assert_eq!(
            system.add_bond(5, 1, 3, 3),
            Err(TopologyError::SelfBond { bond: 5, atom: 3 })
        );
    }

    #[test]
    fn repeated_bond_between_same_atoms_keeps_adjacency_unique() {
        let mut system = create_chain_system();
        system.add_bond(7, 2, 2, 1).unwrap();

        assert_eq!(system.bonds().len(), 3);
        let a1 = system.find_atom_by_serial(1).unwrap();
        assert_eq!(system.get_bonded_neighbors(a1).unwrap().len(), 1);
        assert_eq!(system.bond_types(), BTreeSet::from([1, 2]));
    }

    #[test]
    fn type_counts_tally_atoms_per_type() {
        let mut system = create_chain_system();
        system
            .add_atom(Atom::new(10, 2, Point3::origin()))
            .unwrap();
        let counts = system.type_counts();
        assert_eq!(counts.get(&1), Some(&3));
        assert_eq!(counts.get(&2), Some(&1));
        assert_eq!(system.atom_types(), BTreeSet::from([1, 2]));
    }
}
