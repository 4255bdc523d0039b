//! Shared numerical helpers.
//!
//! - [`geometry`] - Orthogonal periodic box and minimum-image displacements

pub mod geometry;
