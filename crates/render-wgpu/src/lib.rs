//! wgpu render backend for the terrain viewer.
//!
//! Draws the ground plane as one indexed triangle strip with 16-bit indices.
//! Yaw, pitch and the fixed look-at view are separate uniforms applied in the
//! vertex stage; the viewer position shifts the shaded surface pattern.
//!
//! # Invariants
//! - Renderer never mutates viewer state.
//! - Mesh buffers are uploaded once at construction.
//! - Frame readback never blocks the frame that requested it.

mod context;
mod gpu;
mod shaders;
mod snapshot;

pub use context::{GpuContext, RenderError};
pub use gpu::TerrainRenderer;
pub use snapshot::{CapturedFrame, PendingCapture, SnapshotError, Thumbnail};
