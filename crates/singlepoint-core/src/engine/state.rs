use crate::core::forcefield::report::{EnergyGroups, ThermoReport};
use crate::core::forcefield::term::EnergyTerm;
use nalgebra::Vector3;
use std::collections::BTreeMap;

/// Outcome of one single-point evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    pub energy: EnergyTerm,
    pub report: ThermoReport,
    pub groups: EnergyGroups,
    /// Force on every atom keyed by serial, when requested.
    pub forces: Option<BTreeMap<usize, Vector3<f64>>>,
    /// Pairs inside the cutoff that were not fully excluded.
    pub pairs_evaluated: usize,
    pub bonds_evaluated: usize,
}

impl EvaluationResult {
    pub fn new(
        energy: EnergyTerm,
        forces: Option<BTreeMap<usize, Vector3<f64>>>,
        pairs_evaluated: usize,
        bonds_evaluated: usize,
    ) -> Self {
        Self {
            report: ThermoReport::from(&energy),
            groups: EnergyGroups::from(&energy),
            energy,
            forces,
            pairs_evaluated,
            bonds_evaluated,
        }
    }

    pub fn force_on(&self, serial: usize) -> Option<&Vector3<f64>> {
        self.forces.as_ref().and_then(|forces| forces.get(&serial))
    }

    /// Vector sum of all forces; zero up to rounding for an isolated system.
    pub fn net_force(&self) -> Option<Vector3<f64>> {
        self.forces
            .as_ref()
            .map(|forces| forces.values().fold(Vector3::zeros(), |acc, f| acc + f))
    }
}

/// Lifecycle of an evaluator.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EvaluatorState {
    /// Inputs are validated and the special-bonds table is built.
    #[default]
    Initialized,
    /// At least one pass completed; holds the most recent result.
    Evaluated(EvaluationResult),
}

impl EvaluatorState {
    pub fn result(&self) -> Option<&EvaluationResult> {
        match self {
            Self::Initialized => None,
            Self::Evaluated(result) => Some(result),
        }
    }
}
