//! # Engine Module
//!
//! This module implements the single-point evaluator: the stateful layer that turns a
//! validated [`MolecularSystem`](crate::core::models::system::MolecularSystem) and a
//! resolved [`Forcefield`](crate::core::forcefield::params::Forcefield) into an energy
//! report and per-atom forces.
//!
//! ## Architecture
//!
//! - **Evaluator** ([`evaluator`]) - Owns the inputs, the special-bonds table and the
//!   mixed pair coefficients; moves from `Initialized` to `Evaluated`
//! - **Configuration** ([`config`]) - Input paths and evaluator options
//! - **State Tracking** ([`state`]) - Evaluation results and the evaluator lifecycle
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for front ends
//! - **Error Handling** ([`error`]) - Engine-level error aggregation
//!
//! Pair and bond contributions are computed by internal tasks. Work may run in parallel
//! behind the `parallel` feature, but partial sums are always folded in ascending atom
//! and bond order, so repeated evaluations agree bit for bit.

pub mod config;
pub(crate) mod context;
pub mod error;
pub mod evaluator;
pub(crate) mod neighbor;
pub mod progress;
pub mod state;
pub(crate) mod tasks;

#[cfg(test)]
pub(crate) mod test_support;
