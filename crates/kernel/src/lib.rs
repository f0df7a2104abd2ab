//! Viewer Kernel: per-frame camera integration and matrix derivation.
//!
//! # Invariants
//! - One frame step at a time; all viewer state is passed in explicitly as
//!   `&mut ViewerState`, nothing is global.
//! - Per-frame computation is pure arithmetic and cannot fail.
//! - The first frame integrates with `dt = 0`.
//! - Pitch is never clamped; the camera may look past vertical.

pub mod camera;
pub mod clock;
pub mod frame;
pub mod idle;
pub mod matrix;

pub use camera::{CameraState, MotionConfig, StepOutcome, step};
pub use clock::FrameClock;
pub use frame::{
    FrameOrchestrator, FrameOutput, SceneMatrices, TRANSFORM_STAGES, TransformStage, ViewerState,
    surface_coordinate,
};
pub use idle::{ExportRequest, IdleSnapshotPolicy};
