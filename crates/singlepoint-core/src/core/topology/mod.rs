//! # Topology Module
//!
//! Bonded-graph analysis used by the nonbonded evaluator.
//!
//! Pairs of atoms that are close in the bond graph (1-2, 1-3 and 1-4 neighbors) have
//! their nonbonded interactions excluded or scaled according to the special-bonds
//! policy of the force field. This module classifies those pairs.
//!
//! ## Key Components
//!
//! - [`special`] - Bounded breadth-first search and the precomputed [`special::SpecialTable`]
//!
//! ## Usage
//!
//! ```ignore
//! use singlepoint::core::topology::special::SpecialTable;
//!
//! let table = SpecialTable::build(&system);
//! let separation = table.separation(atom_a, atom_b);
//! ```

pub mod special;
