//! Cube geometry shared by every renderer.
//!
//! One unit-extent cube (corners at +/-1) with 4 vertices per face so each
//! face can carry its own flat color. The arrays are uploaded verbatim; no
//! renderer rebuilds or reorders them.
//!
//! # Invariants
//! - 24 positions, 24 colors, 36 indices.
//! - Indices of a face only reference that face's 4 vertices.

mod cube;
mod validate;

pub use cube::{CUBE_COLORS, CUBE_INDICES, CUBE_POSITIONS, Face, VERTICES_PER_FACE};
pub use validate::{MeshError, MeshStats, validate_mesh};

/// Number of indices drawn for one cube.
pub const CUBE_INDEX_COUNT: u32 = CUBE_INDICES.len() as u32;
