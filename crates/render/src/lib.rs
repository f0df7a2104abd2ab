//! Rendering Adapter: renderer-agnostic draw state.
//!
//! # Invariants
//! - Renderers never mutate viewer state; they consume a `FrameDraw`.
//! - Mesh buffers are handed to a backend once and never change afterwards.
//!
//! The GPU backend lives in `trailrun-render-wgpu`. `DebugTextRenderer`
//! implements the same trait for headless runs and tests.

mod draw;
mod renderer;

pub use draw::FrameDraw;
pub use renderer::{DebugTextRenderer, Renderer};

pub fn crate_info() -> &'static str {
    "trailrun-render v0.1.0"
}
