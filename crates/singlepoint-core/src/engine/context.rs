use super::progress::ProgressReporter;
use crate::core::forcefield::energy::PairCoeffTable;
use crate::core::forcefield::params::{ConfigurationError, Forcefield};
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::topology::special::SpecialTable;
use nalgebra::Point3;
use slotmap::SecondaryMap;

/// Flattened per-atom data in ascending serial order, the iteration order of every task.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomRecord {
    pub id: AtomId,
    pub serial: usize,
    pub type_id: usize,
    pub charge: f64,
    pub position: Point3<f64>,
}

pub fn atom_records(system: &MolecularSystem) -> Vec<AtomRecord> {
    system
        .atom_ids_by_serial()
        .into_iter()
        .filter_map(|id| {
            system.atom(id).map(|atom| AtomRecord {
                id,
                serial: atom.serial,
                type_id: atom.type_id,
                charge: atom.charge,
                position: atom.position,
            })
        })
        .collect()
}

/// Read-only view shared by the evaluation tasks.
#[derive(Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub system: &'a MolecularSystem,
    pub forcefield: &'a Forcefield,
    pub pair_table: &'a PairCoeffTable,
    pub special: &'a SpecialTable,
    pub atoms: &'a [AtomRecord],
    pub index_of: &'a SecondaryMap<AtomId, usize>,
    pub reporter: &'a ProgressReporter<'a>,
}

impl<'a> EvaluationContext<'a> {
    /// Names the type lacking coefficients for a pair with no table entry.
    pub fn missing_pair_type(&self, ti: usize, tj: usize) -> ConfigurationError {
        let type_id = if self.forcefield.pair_param(ti).is_none() {
            ti
        } else {
            tj
        };
        ConfigurationError::MissingTypeParameters(type_id)
    }
}
