use super::ids::AtomId;

/// One bond record. Several records may join the same atom pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bond {
    pub serial: usize,
    /// Index into the bond-coefficient table, starting at 1.
    pub bond_type: usize,
    pub atom1_id: AtomId,
    pub atom2_id: AtomId,
}

impl Bond {
    pub fn new(serial: usize, bond_type: usize, atom1_id: AtomId, atom2_id: AtomId) -> Self {
        Self {
            serial,
            bond_type,
            atom1_id,
            atom2_id,
        }
    }

    /// Both endpoints in the order they were declared.
    pub fn atoms(&self) -> [AtomId; 2] {
        [self.atom1_id, self.atom2_id]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn endpoints_keep_declaration_order() {
        let mut ids: SlotMap<AtomId, ()> = SlotMap::with_key();
        let (first, second) = (ids.insert(()), ids.insert(()));

        let bond = Bond::new(4, 2, second, first);
        assert_eq!(bond.serial, 4);
        assert_eq!(bond.bond_type, 2);
        assert_eq!(bond.atoms(), [second, first]);
    }
}
