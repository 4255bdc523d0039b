//! # Force Field Module
//!
//! Parameters, functional forms and energy bookkeeping for a single-point evaluation.
//!
//! ## Overview
//!
//! - **Van der Waals interactions** with a truncated 12-6 Lennard-Jones potential, optionally
//!   shifted to zero at the cutoff and complemented by an analytic tail correction
//! - **Electrostatic interactions** with a truncated Coulomb term for `lj/cut/coul/cut`
//! - **Bonded interactions** through a hybrid of harmonic and Morse bond styles
//! - **Special bonds** scaling of 1-2, 1-3 and 1-4 neighbors per channel
//!
//! ## Key Components
//!
//! - [`params`] - Settings file model, validation and the resolved [`params::Forcefield`]
//! - [`mixing`] - Combination rules for unlike atom types
//! - [`term`] - Per-term energy accumulator
//! - [`report`] - Thermo report and energy groups derived from the accumulator
//!
//! ## Usage
//!
//! ```ignore
//! use singlepoint::core::forcefield::params::{CoefficientTable, Forcefield, ForcefieldSettings};
//!
//! let settings = ForcefieldSettings::load(Path::new("forcefield.toml"))?;
//! let forcefield = Forcefield::from_settings(&settings, &CoefficientTable::default())?;
//! forcefield.check_system(&system)?;
//! ```

pub(crate) mod energy;
pub mod mixing;
pub mod params;
pub(crate) mod potentials;
pub mod report;
pub mod term;
