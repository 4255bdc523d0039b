use crate::core::forcefield::params::{Forcefield, ForcefieldSettings};
use crate::core::io::data::{DataFile, DataMetadata};
use crate::core::io::traits::MolecularFile;
use crate::core::models::system::MolecularSystem;
use crate::engine::config::{EvaluationConfig, EvaluatorOptions};
use crate::engine::error::EngineError;
use crate::engine::evaluator::Evaluator;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::state::EvaluationResult;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct SinglePointResult {
    pub metadata: DataMetadata,
    pub result: EvaluationResult,
}

/// Loads both input files, resolves the force field and performs one evaluation.
///
/// Coefficients from the settings file take precedence over `Pair Coeffs` and
/// `Bond Coeffs` sections of the data file.
#[instrument(skip_all, name = "evaluate_workflow")]
pub fn run(
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<SinglePointResult, EngineError> {
    let (system, metadata, forcefield) = reporter.phase("Loading Inputs", || {
        load_inputs(config, reporter)
    })?;

    let result = run_system(system, forcefield, config.options, reporter)?;
    Ok(SinglePointResult { metadata, result })
}

fn load_inputs(
    config: &EvaluationConfig,
    reporter: &ProgressReporter,
) -> Result<(MolecularSystem, DataMetadata, Forcefield), EngineError> {
    info!(path = %config.data_path.display(), "Reading data file");
    let (mut system, metadata) = DataFile::read_from_path(&config.data_path)?;
    for section in &metadata.skipped_sections {
        reporter.report(Progress::Message(format!("Ignoring section '{}'", section)));
    }

    info!(path = %config.forcefield_path.display(), "Reading force-field settings");
    let settings = ForcefieldSettings::load(&config.forcefield_path)?;
    let forcefield = Forcefield::from_settings(&settings, &metadata.coefficients)?;
    system.set_periodicity(forcefield.periodicity);
    if metadata.counts.atom_types > forcefield.pair_coeffs.len() {
        warn!(
            declared = metadata.counts.atom_types,
            parameterized = forcefield.pair_coeffs.len(),
            "Data file declares more atom types than have pair coefficients"
        );
    }
    Ok((system, metadata, forcefield))
}

/// Evaluates an already assembled system.
pub fn run_system(
    system: MolecularSystem,
    forcefield: Forcefield,
    options: EvaluatorOptions,
    reporter: &ProgressReporter,
) -> Result<EvaluationResult, EngineError> {
    let mut evaluator = Evaluator::new(system, forcefield, options)?;
    evaluator.evaluate(reporter).cloned()
}
