use super::config::{EvaluatorOptions, NeighborStrategy};
use super::context::{AtomRecord, EvaluationContext, atom_records};
use super::error::EngineError;
use super::neighbor::NeighborCandidates;
use super::progress::ProgressReporter;
use super::state::{EvaluationResult, EvaluatorState};
use super::tasks::{bond_energy, pair_energy};
use crate::core::forcefield::energy::PairCoeffTable;
use crate::core::forcefield::params::Forcefield;
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::ids::AtomId;
use crate::core::models::system::MolecularSystem;
use crate::core::topology::special::SpecialTable;
use nalgebra::Vector3;
use slotmap::SecondaryMap;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Single-point evaluator owning a validated system snapshot.
///
/// Construction checks the force field against the system and precomputes the
/// special-bonds table and the mixed pair coefficients; the evaluator starts in
/// [`EvaluatorState::Initialized`]. Each call to [`Evaluator::evaluate`] recomputes
/// everything from the stored inputs and leaves the evaluator in
/// [`EvaluatorState::Evaluated`].
#[derive(Debug)]
pub struct Evaluator {
    system: MolecularSystem,
    forcefield: Forcefield,
    options: EvaluatorOptions,
    pair_table: PairCoeffTable,
    special: SpecialTable,
    atoms: Vec<AtomRecord>,
    index_of: SecondaryMap<AtomId, usize>,
    state: EvaluatorState,
}

impl Evaluator {
    #[instrument(skip_all, name = "evaluator_setup")]
    pub fn new(
        system: MolecularSystem,
        forcefield: Forcefield,
        options: EvaluatorOptions,
    ) -> Result<Self, EngineError> {
        forcefield.check_system(&system)?;

        let special = SpecialTable::build(&system);
        let [one_two, one_three, one_four] = special.counts();
        debug!(one_two, one_three, one_four, "Special-bonds table built");

        let pair_table = PairCoeffTable::build(&forcefield);
        debug!(entries = pair_table.n_entries(), "Mixed pair coefficients built");
        let atoms = atom_records(&system);
        let index_of = atoms
            .iter()
            .enumerate()
            .map(|(index, atom)| (atom.id, index))
            .collect();

        info!(
            atoms = system.atom_count(),
            bonds = system.bonds().len(),
            cutoff = forcefield.cutoff,
            "Evaluator initialized"
        );

        Ok(Self {
            system,
            forcefield,
            options,
            pair_table,
            special,
            atoms,
            index_of,
            state: EvaluatorState::Initialized,
        })
    }

    pub fn system(&self) -> &MolecularSystem {
        &self.system
    }

    pub fn forcefield(&self) -> &Forcefield {
        &self.forcefield
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    pub fn special_table(&self) -> &SpecialTable {
        &self.special
    }

    pub fn state(&self) -> &EvaluatorState {
        &self.state
    }

    pub fn result(&self) -> Option<&EvaluationResult> {
        self.state.result()
    }

    pub(crate) fn context<'a>(
        &'a self,
        reporter: &'a ProgressReporter<'a>,
    ) -> EvaluationContext<'a> {
        EvaluationContext {
            system: &self.system,
            forcefield: &self.forcefield,
            pair_table: &self.pair_table,
            special: &self.special,
            atoms: &self.atoms,
            index_of: &self.index_of,
            reporter,
        }
    }

    pub(crate) fn candidates(&self, strategy: NeighborStrategy) -> NeighborCandidates {
        let positions: Vec<_> = self.atoms.iter().map(|atom| atom.position).collect();
        NeighborCandidates::build(
            &positions,
            self.system.periodic_box(),
            self.forcefield.max_cutoff(),
            strategy,
        )
    }

    /// Runs one evaluation pass and stores its result.
    ///
    /// On error the previous state is kept.
    #[instrument(skip_all, name = "single_point_evaluation")]
    pub fn evaluate(
        &mut self,
        reporter: &ProgressReporter,
    ) -> Result<&EvaluationResult, EngineError> {
        let result = self.compute(reporter)?;
        self.state = EvaluatorState::Evaluated(result);
        self.state
            .result()
            .ok_or_else(|| EngineError::Internal("Evaluation result was not stored".to_string()))
    }

    fn compute(&self, reporter: &ProgressReporter) -> Result<EvaluationResult, EngineError> {
        let ctx = self.context(reporter);
        let want_forces = self.options.compute_forces;

        let candidates = reporter.phase("Building Neighbor Candidates", || {
            self.candidates(self.options.neighbor_strategy)
        });
        let pair = reporter.phase("Pair Interactions", || {
            pair_energy::run(&ctx, &candidates, want_forces)
        })?;
        let bond = reporter.phase("Bonded Interactions", || bond_energy::run(&ctx, want_forces))?;
        let tail = EnergyTerm {
            tail: pair_energy::tail_correction(&ctx),
            ..EnergyTerm::default()
        };

        let energy = pair.energy + bond.energy + tail;
        let forces = match (pair.forces, bond.forces) {
            (Some(pair_forces), Some(bond_forces)) => {
                Some(self.forces_by_serial(&pair_forces, &bond_forces))
            }
            _ => None,
        };

        info!(
            pe = energy.total(),
            evdwl = energy.vdw,
            ebond = energy.bond,
            pairs = pair.pairs_evaluated,
            "Single-point evaluation complete"
        );
        Ok(EvaluationResult::new(
            energy,
            forces,
            pair.pairs_evaluated,
            bond.bonds_evaluated,
        ))
    }

    fn forces_by_serial(
        &self,
        pair_forces: &[Vector3<f64>],
        bond_forces: &[Vector3<f64>],
    ) -> BTreeMap<usize, Vector3<f64>> {
        self.atoms
            .iter()
            .zip(pair_forces.iter().zip(bond_forces))
            .map(|(atom, (pair, bond))| (atom.serial, pair + bond))
            .collect()
    }
}
