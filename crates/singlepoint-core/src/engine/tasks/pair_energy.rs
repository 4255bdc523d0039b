use crate::core::forcefield::energy::EnergyCalculator;
use crate::core::forcefield::term::EnergyTerm;
use crate::engine::context::EvaluationContext;
use crate::engine::error::EngineError;
use crate::engine::neighbor::NeighborCandidates;
use crate::engine::progress::Progress;
use nalgebra::Vector3;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct PairOutput {
    pub energy: EnergyTerm,
    pub pairs_evaluated: usize,
    pub forces: Option<Vec<Vector3<f64>>>,
}

/// Contributions of all pairs `(i, j > i)` of one atom row, in ascending `j`.
#[derive(Debug, Default)]
struct RowResult {
    vdw: f64,
    coulomb: f64,
    pairs: usize,
    forces: Vec<(usize, Vector3<f64>)>,
}

fn evaluate_row(
    ctx: &EvaluationContext,
    candidates: &NeighborCandidates,
    i: usize,
    want_forces: bool,
) -> Result<RowResult, EngineError> {
    let periodic_box = ctx.system.periodic_box();
    let forcefield = ctx.forcefield;
    let max_cutoff = forcefield.max_cutoff();
    let atom_i = &ctx.atoms[i];
    let mut row = RowResult::default();

    for &j in candidates.row(i) {
        let atom_j = &ctx.atoms[j];
        let delta = periodic_box.minimum_image_delta(&atom_i.position, &atom_j.position);
        let dist = delta.norm();
        if dist > max_cutoff {
            continue;
        }

        let coeff = ctx
            .pair_table
            .get(atom_i.type_id, atom_j.type_id)
            .ok_or_else(|| ctx.missing_pair_type(atom_i.type_id, atom_j.type_id))?;
        let separation = ctx.special.separation(atom_i.id, atom_j.id);
        let Some(contribution) = EnergyCalculator::calculate_pair(
            forcefield,
            coeff,
            (atom_i.charge, atom_j.charge),
            dist,
            separation,
        ) else {
            continue;
        };

        row.vdw += contribution.vdw;
        row.coulomb += contribution.coulomb;
        row.pairs += 1;
        if want_forces {
            row.forces.push((j, delta * contribution.fpair));
        }
    }

    ctx.reporter.report(Progress::TaskIncrement);
    Ok(row)
}

/// Folds row results in ascending row order, independent of how they were computed.
fn reduce_rows(rows: Vec<RowResult>, n_atoms: usize, want_forces: bool) -> PairOutput {
    let mut vdw = 0.0;
    let mut coulomb = 0.0;
    let mut pairs_evaluated = 0;
    let mut forces = want_forces.then(|| vec![Vector3::zeros(); n_atoms]);

    for (i, row) in rows.into_iter().enumerate() {
        vdw += row.vdw;
        coulomb += row.coulomb;
        pairs_evaluated += row.pairs;
        if let Some(forces) = forces.as_mut() {
            for (j, force) in row.forces {
                forces[i] += force;
                forces[j] -= force;
            }
        }
    }

    PairOutput {
        energy: EnergyTerm::non_bonded(vdw, coulomb),
        pairs_evaluated,
        forces,
    }
}

#[instrument(skip_all, name = "pair_energy_task")]
pub fn run(
    ctx: &EvaluationContext,
    candidates: &NeighborCandidates,
    want_forces: bool,
) -> Result<PairOutput, EngineError> {
    let n_rows = candidates.n_rows();
    ctx.reporter.report(Progress::TaskStart {
        total_steps: n_rows as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = 0..n_rows;

    #[cfg(feature = "parallel")]
    let iterator = (0..n_rows).into_par_iter();

    let rows = iterator
        .map(|i| evaluate_row(ctx, candidates, i, want_forces))
        .collect::<Result<Vec<_>, _>>()?;

    ctx.reporter.report(Progress::TaskFinish);

    let output = reduce_rows(rows, ctx.atoms.len(), want_forces);
    debug!(
        candidates = candidates.n_candidates(),
        pairs = output.pairs_evaluated,
        "Pair energy evaluated"
    );
    Ok(output)
}

/// Analytic dispersion correction beyond the cutoff, or zero when disabled.
pub fn tail_correction(ctx: &EvaluationContext) -> f64 {
    let forcefield = ctx.forcefield;
    if !forcefield.tail {
        return 0.0;
    }
    ctx.pair_table.tail_energy(
        forcefield.cutoff,
        &ctx.system.type_counts(),
        ctx.system.periodic_box().volume(),
    )
}
