//! # Core Models Module
//!
//! This module contains the data structures used to represent the simulated system:
//! atoms, bond records, and the [`system::MolecularSystem`] that ties them to a
//! periodic box.
//!
//! ## Key Components
//!
//! - [`atom`] - Individual atom representation with serial, type, charge and position
//! - [`topology`] - Bond records connecting pairs of atoms
//! - [`system`] - The complete system with adjacency information and validation
//! - [`ids`] - Internal identifier types
//!
//! ## Usage
//!
//! ```ignore
//! use singlepoint::core::models::{atom::Atom, system::MolecularSystem};
//! use singlepoint::core::utils::geometry::PeriodicBox;
//!
//! let mut system = MolecularSystem::new(PeriodicBox::fully_periodic([0.0; 3], [40.0; 3])?);
//! system.add_atom(Atom::new(1, 1, Point3::new(10.0, 10.0, 10.0)))?;
//! system.add_atom(Atom::new(2, 1, Point3::new(15.0, 10.0, 10.0)))?;
//! system.add_bond(1, 1, 1, 2)?;
//! ```

pub mod atom;
pub mod ids;
pub mod system;
pub mod topology;
