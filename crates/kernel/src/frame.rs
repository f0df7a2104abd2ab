use std::f32::consts::FRAC_PI_2;
use std::time::Instant;

use glam::{Mat4, Vec2, Vec3};
use trailrun_common::ViewerConfig;
use trailrun_input::InputTracker;

use crate::camera::{self, CameraState, MotionConfig};
use crate::clock::FrameClock;
use crate::idle::{ExportRequest, IdleSnapshotPolicy};
use crate::matrix;

/// Everything the viewer mutates from frame to frame.
///
/// Owned by the application and lent to `FrameOrchestrator::frame`; input
/// callbacks push into `input` between frames.
#[derive(Debug, Default)]
pub struct ViewerState {
    pub camera: CameraState,
    pub input: InputTracker,
}

impl ViewerState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// One step of the vertex transform, in the order a ground vertex passes
/// through them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformStage {
    /// Plane-local position as uploaded.
    Model,
    /// Rotation about +Y by `yaw - 90°`.
    YawRotate,
    /// Rotation about +X by `pitch`.
    PitchRotate,
    /// Viewer position. The plane is drawn centred on the viewer, so this
    /// stage offsets the world-anchored surface coordinates used for shading
    /// (`local.xz + position`) instead of the clip-space geometry.
    TranslateByPosition,
    /// Fixed look-at from eye height towards +Z.
    View,
    Project,
}

pub const TRANSFORM_STAGES: [TransformStage; 6] = [
    TransformStage::Model,
    TransformStage::YawRotate,
    TransformStage::PitchRotate,
    TransformStage::TranslateByPosition,
    TransformStage::View,
    TransformStage::Project,
];

/// Matrices handed to the renderer each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneMatrices {
    pub projection: Mat4,
    pub view: Mat4,
    pub yaw_rotation: Mat4,
    pub pitch_rotation: Mat4,
}

impl SceneMatrices {
    pub fn build(camera: &CameraState, aspect: f32, cfg: &ViewerConfig) -> Self {
        let orientation = camera.orientation;
        Self {
            projection: matrix::perspective(cfg.fov_y, aspect, cfg.z_near, cfg.z_far),
            view: matrix::look_at(
                Vec3::new(0.0, cfg.eye_height, 0.0),
                Vec3::new(0.0, 0.0, cfg.look_at_distance),
                Vec3::Y,
            ),
            yaw_rotation: matrix::rotation(orientation.yaw - FRAC_PI_2, Vec3::Y),
            pitch_rotation: matrix::rotation(orientation.pitch, Vec3::X),
        }
    }

    /// Matrix for a single stage. `TranslateByPosition` is the identity on
    /// geometry; see `surface_coordinate`.
    pub fn stage(&self, stage: TransformStage) -> Mat4 {
        match stage {
            TransformStage::Model | TransformStage::TranslateByPosition => matrix::identity(),
            TransformStage::YawRotate => self.yaw_rotation,
            TransformStage::PitchRotate => self.pitch_rotation,
            TransformStage::View => self.view,
            TransformStage::Project => self.projection,
        }
    }

    /// All stages folded into one matrix, applied to plane-local positions.
    pub fn model_to_clip(&self) -> Mat4 {
        TRANSFORM_STAGES
            .iter()
            .fold(matrix::identity(), |acc, stage| self.stage(*stage) * acc)
    }
}

/// World-space ground coordinate (x, z) of a plane-local vertex.
pub fn surface_coordinate(local: Vec3, position: Vec2) -> Vec2 {
    Vec2::new(local.x, local.z) + position
}

/// Result of one frame step, ready to be submitted to a backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutput {
    pub index: u64,
    /// Seconds integrated this frame.
    pub dt: f32,
    pub camera: CameraState,
    pub matrices: SceneMatrices,
    pub moved: bool,
    pub export: Option<ExportRequest>,
    /// Idle counter after this frame, for overlays and logs.
    pub idle_counter: i32,
}

/// Drives the per-frame cycle: elapsed time, input, motion, matrices and the
/// idle-snapshot policy.
#[derive(Debug, Clone)]
pub struct FrameOrchestrator {
    config: ViewerConfig,
    motion: MotionConfig,
    clock: FrameClock,
    idle: IdleSnapshotPolicy,
    aspect: f32,
    frames: u64,
}

impl FrameOrchestrator {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            motion: MotionConfig::from(&config),
            idle: IdleSnapshotPolicy::new(config.idle_frame_threshold),
            clock: FrameClock::new(),
            aspect: 1.0,
            frames: 0,
            config,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Still frames needed before the first idle snapshot.
    pub fn idle_threshold(&self) -> i32 {
        self.idle.threshold()
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Number of frames stepped so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Drawable size in physical pixels. Zero dimensions are treated as one.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
        tracing::debug!(width, height, aspect = self.aspect, "viewport updated");
    }

    /// Step the viewer to the display refresh at `now`.
    pub fn frame(&mut self, state: &mut ViewerState, now: Instant) -> FrameOutput {
        let index = self.frames;
        let _span = tracing::trace_span!("frame", index).entered();

        let dt = self.clock.tick(now);
        let input = state.input.drain();
        let outcome = camera::step(dt, input, state.camera, &self.motion);
        state.camera = outcome.camera;

        let matrices = SceneMatrices::build(&state.camera, self.aspect, &self.config);
        let export = self.idle.maybe_export(outcome.moved, index);
        self.frames += 1;

        tracing::trace!(
            dt,
            moved = outcome.moved,
            x = state.camera.position.x,
            z = state.camera.position.y,
            yaw = state.camera.orientation.yaw,
            pitch = state.camera.orientation.pitch,
            "frame stepped"
        );

        FrameOutput {
            index,
            dt,
            camera: state.camera,
            matrices,
            moved: outcome.moved,
            export,
            idle_counter: self.idle.counter(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;
    use std::time::Duration;
    use trailrun_common::Orientation;
    use trailrun_input::{InputEvent, Key};

    fn project(m: Mat4, p: Vec3) -> Vec3 {
        let clip = m * Vec4::new(p.x, p.y, p.z, 1.0);
        clip.truncate() / clip.w
    }

    #[test]
    fn stage_order_is_fixed() {
        assert_eq!(TRANSFORM_STAGES[0], TransformStage::Model);
        assert_eq!(TRANSFORM_STAGES[5], TransformStage::Project);
        let yaw = TRANSFORM_STAGES.iter().position(|s| *s == TransformStage::YawRotate);
        let pitch = TRANSFORM_STAGES.iter().position(|s| *s == TransformStage::PitchRotate);
        assert!(yaw < pitch);
    }

    #[test]
    fn look_at_target_lands_mid_screen() {
        let cfg = ViewerConfig::default();
        let m = SceneMatrices::build(&CameraState::default(), 16.0 / 9.0, &cfg);
        let ndc = project(m.model_to_clip(), Vec3::new(0.0, 0.0, cfg.look_at_distance));
        assert!(ndc.x.abs() < 1e-4);
        assert!(ndc.y.abs() < 1e-4);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn heading_direction_stays_mid_screen_after_turning() {
        let cfg = ViewerConfig::default();
        let camera = CameraState {
            position: Vec2::ZERO,
            orientation: Orientation::new(0.4, 0.0),
        };
        let m = SceneMatrices::build(&camera, 1.0, &cfg);
        let ahead = camera.orientation.forward() * cfg.look_at_distance;
        let ndc = project(m.model_to_clip(), Vec3::new(ahead.x, 0.0, ahead.y));
        assert!(ndc.x.abs() < 1e-4, "x={}", ndc.x);
        assert!(ndc.y.abs() < 1e-4, "y={}", ndc.y);
    }

    #[test]
    fn surface_coordinate_follows_position() {
        let c = surface_coordinate(Vec3::new(1.0, 0.0, 2.0), Vec2::new(10.0, -5.0));
        assert_eq!(c, Vec2::new(11.0, -3.0));
    }

    #[test]
    fn first_frame_does_not_move() {
        let mut orchestrator = FrameOrchestrator::new(ViewerConfig::default());
        let mut state = ViewerState::new();
        state.input.push(InputEvent::KeyDown(Key::Forward));
        let out = orchestrator.frame(&mut state, Instant::now());
        assert_eq!(out.index, 0);
        assert_eq!(out.dt, 0.0);
        assert_eq!(state.camera.position, Vec2::ZERO);
        assert!(out.moved);
    }

    #[test]
    fn held_forward_advances_by_elapsed_time() {
        let cfg = ViewerConfig::default();
        let mut orchestrator = FrameOrchestrator::new(cfg);
        let mut state = ViewerState::new();
        let start = Instant::now();
        state.input.push(InputEvent::KeyDown(Key::Forward));
        orchestrator.frame(&mut state, start);
        let out = orchestrator.frame(&mut state, start + Duration::from_millis(500));
        assert!((out.dt - 0.5).abs() < 1e-6);
        assert!((state.camera.position.y - cfg.linear_speed * 0.5).abs() < 1e-3);
        assert!(state.camera.position.x.abs() < 1e-3);
        assert_eq!(out.camera, state.camera);
    }

    #[test]
    fn idle_frames_raise_one_export() {
        let mut orchestrator = FrameOrchestrator::new(ViewerConfig::default());
        let mut state = ViewerState::new();
        let start = Instant::now();
        let exports: Vec<u64> = (0..101u64)
            .filter_map(|i| {
                orchestrator
                    .frame(&mut state, start + Duration::from_millis(16 * i))
                    .export
                    .map(|r| r.frame)
            })
            .collect();
        assert_eq!(exports, vec![100]);
        assert_eq!(orchestrator.frame_count(), 101);
    }

    #[test]
    fn motion_frame_suppresses_export() {
        let mut orchestrator = FrameOrchestrator::new(ViewerConfig::default());
        let mut state = ViewerState::new();
        let start = Instant::now();
        for i in 0..150u64 {
            if i == 60 {
                state.input.push(InputEvent::KeyDown(Key::TurnLeft));
            }
            if i == 61 {
                state.input.push(InputEvent::KeyUp(Key::TurnLeft));
            }
            let out = orchestrator.frame(&mut state, start + Duration::from_millis(16 * i));
            assert!(out.export.is_none(), "unexpected export at frame {i}");
        }
    }

    #[test]
    fn viewport_sets_aspect() {
        let mut orchestrator = FrameOrchestrator::new(ViewerConfig::default());
        orchestrator.set_viewport(1920, 1080);
        assert!((orchestrator.aspect() - 16.0 / 9.0).abs() < 1e-6);
        orchestrator.set_viewport(800, 0);
        assert_eq!(orchestrator.aspect(), 800.0);
    }

    #[test]
    fn idle_threshold_follows_config() {
        let cfg = ViewerConfig {
            idle_frame_threshold: 7,
            ..ViewerConfig::default()
        };
        let orchestrator = FrameOrchestrator::new(cfg);
        assert_eq!(orchestrator.idle_threshold(), 7);
        assert_eq!(orchestrator.config().idle_frame_threshold, 7);
    }
}
