//! Terrain: procedural ground-plane mesh generation.
//!
//! # Invariants
//! - The mesh is a pure function of `(size, divisions)`.
//! - Every index addresses an existing vertex and none equals the `Uint16`
//!   strip-restart value; 16-bit capacity is checked up front rather than
//!   truncated.
//! - The index buffer is one triangle strip; rows are joined by exactly two
//!   degenerate indices.

mod mesh;

pub use mesh::{MAX_VERTICES, MeshError, TerrainMesh, generate};

pub fn crate_info() -> &'static str {
    "trailrun-terrain v0.1.0"
}
