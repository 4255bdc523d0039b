use super::config::NeighborStrategy;
use crate::core::utils::geometry::PeriodicBox;
use itertools::iproduct;
use nalgebra::Point3;
use std::collections::HashMap;
use tracing::debug;

/// Fewest cells per axis for which the 27-cell stencil visits distinct cells.
const MIN_CELLS_PER_AXIS: usize = 3;

/// Candidate partners for every atom row.
///
/// Row `i` holds the indices `j > i` that may lie within the cutoff, in ascending
/// order. The exact cutoff test is left to the pair task, so every strategy yields the
/// same accepted pairs in the same order.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborCandidates {
    rows: Vec<Vec<usize>>,
}

impl NeighborCandidates {
    pub fn build(
        positions: &[Point3<f64>],
        periodic_box: &PeriodicBox,
        cutoff: f64,
        strategy: NeighborStrategy,
    ) -> Self {
        match strategy {
            NeighborStrategy::AllPairs => Self::all_pairs(positions.len()),
            NeighborStrategy::CellList => match CellGrid::new(periodic_box, cutoff) {
                Some(grid) => grid.candidates(positions, periodic_box),
                None => {
                    debug!("Box too small for a cell list; falling back to all pairs");
                    Self::all_pairs(positions.len())
                }
            },
        }
    }

    fn all_pairs(n_atoms: usize) -> Self {
        let rows = (0..n_atoms).map(|i| ((i + 1)..n_atoms).collect()).collect();
        Self { rows }
    }

    #[inline]
    pub fn row(&self, i: usize) -> &[usize] {
        &self.rows[i]
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_candidates(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

/// Orthogonal grid of cells whose edges are no shorter than the cutoff.
///
/// Only occupied cells are stored, so memory follows the atom count rather than the
/// box volume.
#[derive(Debug, Clone)]
struct CellGrid {
    n_cells: [i64; 3],
    cell_len: [f64; 3],
}

type CellKey = [i64; 3];

impl CellGrid {
    fn new(periodic_box: &PeriodicBox, cutoff: f64) -> Option<Self> {
        let lengths = periodic_box.lengths();
        let mut n_cells = [0; 3];
        let mut cell_len = [0.0; 3];
        for axis in 0..3 {
            let n = (lengths[axis] / cutoff).floor();
            if !(n >= MIN_CELLS_PER_AXIS as f64) || n > i64::MAX as f64 {
                return None;
            }
            n_cells[axis] = n as i64;
            cell_len[axis] = lengths[axis] / n;
        }
        Some(Self { n_cells, cell_len })
    }

    fn cell_of(&self, position: &Point3<f64>, periodic_box: &PeriodicBox) -> CellKey {
        let wrapped = periodic_box.wrap(position);
        let lo = periodic_box.lo();
        let mut key = [0; 3];
        for axis in 0..3 {
            let raw = ((wrapped[axis] - lo[axis]) / self.cell_len[axis]).floor();
            // Atoms outside a non-periodic axis land in the boundary cells.
            key[axis] = (raw.max(0.0) as i64).min(self.n_cells[axis] - 1);
        }
        key
    }

    fn neighbor_cell(
        &self,
        key: CellKey,
        offset: [i64; 3],
        periodic: [bool; 3],
    ) -> Option<CellKey> {
        let mut shifted = [0; 3];
        for axis in 0..3 {
            let n = self.n_cells[axis];
            let raw = key[axis] + offset[axis];
            shifted[axis] = if periodic[axis] {
                raw.rem_euclid(n)
            } else if (0..n).contains(&raw) {
                raw
            } else {
                return None;
            };
        }
        Some(shifted)
    }

    fn candidates(
        &self,
        positions: &[Point3<f64>],
        periodic_box: &PeriodicBox,
    ) -> NeighborCandidates {
        let cells: Vec<CellKey> = positions
            .iter()
            .map(|position| self.cell_of(position, periodic_box))
            .collect();
        let mut bins: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (atom, &cell) in cells.iter().enumerate() {
            bins.entry(cell).or_default().push(atom);
        }

        let periodic = periodic_box.periodicity();
        let rows = cells
            .iter()
            .enumerate()
            .map(|(i, &cell)| {
                let mut row: Vec<usize> = iproduct!(-1..=1, -1..=1, -1..=1)
                    .filter_map(|(dx, dy, dz)| self.neighbor_cell(cell, [dx, dy, dz], periodic))
                    .filter_map(|key| bins.get(&key))
                    .flat_map(|bin| bin.iter().copied())
                    .filter(|&j| j > i)
                    .collect();
                row.sort_unstable();
                row
            })
            .collect();

        debug!(
            occupied_cells = bins.len(),
            atoms = positions.len(),
            "Built cell list"
        );
        NeighborCandidates { rows }
    }
}
