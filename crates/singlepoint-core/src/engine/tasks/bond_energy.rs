use crate::core::forcefield::energy::EnergyCalculator;
use crate::core::forcefield::params::ConfigurationError;
use crate::core::forcefield::term::EnergyTerm;
use crate::core::models::topology::Bond;
use crate::engine::context::EvaluationContext;
use crate::engine::error::EngineError;
use crate::engine::progress::Progress;
use nalgebra::Vector3;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct BondOutput {
    pub energy: EnergyTerm,
    pub bonds_evaluated: usize,
    pub forces: Option<Vec<Vector3<f64>>>,
}

struct BondResult {
    energy: f64,
    atoms: (usize, usize),
    force: Vector3<f64>,
}

fn evaluate_bond(ctx: &EvaluationContext, bond: &Bond) -> Result<BondResult, EngineError> {
    let style = ctx
        .forcefield
        .bond_style(bond.bond_type)
        .ok_or(ConfigurationError::MissingBondCoefficients(bond.bond_type))?;
    let index = |id| {
        ctx.index_of.get(id).copied().ok_or_else(|| {
            EngineError::Internal(format!(
                "Bond {} references an atom missing from the evaluation order",
                bond.serial
            ))
        })
    };
    let [atom1, atom2] = bond.atoms();
    let (i, j) = (index(atom1)?, index(atom2)?);

    let delta = ctx
        .system
        .periodic_box()
        .minimum_image_delta(&ctx.atoms[i].position, &ctx.atoms[j].position);
    let (energy, fbond) = EnergyCalculator::calculate_bond(style, delta.norm());

    ctx.reporter.report(Progress::TaskIncrement);
    Ok(BondResult {
        energy,
        atoms: (i, j),
        force: delta * fbond,
    })
}

#[instrument(skip_all, name = "bond_energy_task")]
pub fn run(ctx: &EvaluationContext, want_forces: bool) -> Result<BondOutput, EngineError> {
    let bonds = ctx.system.bonds_by_serial();
    ctx.reporter.report(Progress::TaskStart {
        total_steps: bonds.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = bonds.iter();

    #[cfg(feature = "parallel")]
    let iterator = bonds.par_iter();

    let results = iterator
        .map(|bond| evaluate_bond(ctx, bond))
        .collect::<Result<Vec<_>, _>>()?;

    ctx.reporter.report(Progress::TaskFinish);

    let mut energy = 0.0;
    let mut forces = want_forces.then(|| vec![Vector3::zeros(); ctx.atoms.len()]);
    for result in &results {
        energy += result.energy;
        if let Some(forces) = forces.as_mut() {
            let (i, j) = result.atoms;
            forces[i] += result.force;
            forces[j] -= result.force;
        }
    }

    debug!(bonds = results.len(), energy, "Bond energy evaluated");
    Ok(BondOutput {
        energy: EnergyTerm::bonded(energy),
        bonds_evaluated: results.len(),
        forces,
    })
}
