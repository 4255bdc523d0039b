//! # Workflows Module
//!
//! High-level entry points that run a complete single-point evaluation.
//!
//! A workflow loads the data file and the force-field settings, merges coefficients from
//! both sources, builds an [`Evaluator`](crate::engine::evaluator::Evaluator) and returns
//! the energy report together with the parsed file metadata.
//!
//! - **Evaluation Workflow** ([`evaluate`]) - File-driven or in-memory evaluation.

pub mod evaluate;
