//! # Core Module
//!
//! This module provides the stateless building blocks of a single-point energy
//! evaluation: the system model, the force field and its functional forms, and file I/O.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, bonds and the periodic system
//! - **Energy Calculations** ([`forcefield`]) - Parameters, potentials, mixing rules and the energy report
//! - **File I/O** ([`io`]) - LAMMPS-style data file reader
//! - **Bond Graph** ([`topology`]) - Classification of 1-2, 1-3 and 1-4 neighbors
//! - **Utilities** ([`utils`]) - Periodic box geometry and the minimum-image convention
//!
//! Nothing in this layer holds evaluation state; the [`crate::engine`] layer owns the
//! system snapshot and drives the calculation.

pub mod forcefield;
pub mod io;
pub mod models;
pub mod topology;
pub mod utils;
