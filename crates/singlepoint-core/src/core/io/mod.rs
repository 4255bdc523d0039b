//! Provides input functionality for molecular data files.
//!
//! This module contains a reader for LAMMPS-style data files and the trait-based
//! interface shared by input formats. Coefficients embedded in a data file are
//! returned as metadata and merged into the force field by the caller.

pub mod data;
pub mod traits;
