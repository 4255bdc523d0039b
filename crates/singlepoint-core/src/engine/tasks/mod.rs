//! Computational passes of one evaluation.
//!
//! Each task walks its work items in a fixed order, reports progress per item and returns
//! an energy term plus optional per-atom forces indexed like the evaluator's atom records.

pub mod bond_energy;
pub mod pair_energy;
