//! # singlepoint Core Library
//!
//! A zero-step molecular-dynamics evaluator: given atom positions, types, bond topology
//! and force-field parameters in a periodic box, it computes the potential energy split
//! by term, along with per-atom forces, for one configuration.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`MolecularSystem`), the
//!   periodic box, pure potential functions, force-field settings and file I/O.
//!
//! - **[`engine`]: The Logic Core.** The stateful evaluator. It owns the system snapshot
//!   and the precomputed special-bonds table, builds neighbor candidates and runs the pair
//!   and bond tasks with a fixed reduction order so results are reproducible bit for bit.
//!
//! - **[`workflows`]: The Public API.** End-to-end entry points that load a data file and
//!   a force-field file, run one evaluation and return the report.

pub mod core;
pub mod engine;
pub mod workflows;
