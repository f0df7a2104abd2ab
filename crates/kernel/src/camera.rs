use glam::Vec2;
use trailrun_common::{CameraSnapshot, Orientation, ViewerConfig};
use trailrun_input::{InputSnapshot, Key};

/// Ground-plane viewer: a 2D position (x, z) and a yaw/pitch orientation.
/// There is no vertical motion; eye height is a rendering constant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraState {
    pub position: Vec2,
    pub orientation: Orientation,
}

impl CameraState {
    pub fn snapshot(&self) -> CameraSnapshot {
        CameraSnapshot {
            position: self.position,
            orientation: self.orientation,
        }
    }
}

/// Rates used by the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    /// Units per second.
    pub linear_speed: f32,
    /// Radians per second per unit of yaw input.
    pub yaw_speed: f32,
    /// Radians per second per unit of pitch input.
    pub pitch_speed: f32,
}

impl From<&ViewerConfig> for MotionConfig {
    fn from(cfg: &ViewerConfig) -> Self {
        Self {
            linear_speed: cfg.linear_speed,
            yaw_speed: cfg.yaw_speed,
            pitch_speed: cfg.pitch_speed,
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self::from(&ViewerConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub camera: CameraState,
    /// Any movement or turning input was active this frame.
    pub moved: bool,
}

/// Integrate one frame of motion.
///
/// Movement follows the heading: `forward * (cos yaw, sin yaw)` plus
/// `strafe * (cos(yaw + 90°), sin(yaw + 90°))`, scaled by `dt` and the linear
/// speed. Yaw input is the horizontal drag plus the turn keys, pitch input the
/// vertical drag plus the look keys. Position is unbounded and pitch is not
/// clamped.
///
/// `moved` reports active input, not displacement: with `dt == 0` nothing
/// changes but held keys still count.
pub fn step(
    dt: f32,
    input: &InputSnapshot,
    camera: CameraState,
    cfg: &MotionConfig,
) -> StepOutcome {
    let forward = input.axis(Key::Forward, Key::Back);
    let strafe = input.axis(Key::StrafeRight, Key::StrafeLeft);

    let orientation = camera.orientation;
    let distance = dt * cfg.linear_speed;
    let displacement =
        (orientation.forward() * forward + orientation.right() * strafe) * distance;

    let drag = input.drag_delta();
    let yaw_rate = drag.x + input.axis(Key::TurnRight, Key::TurnLeft);
    let pitch_rate = drag.y + input.axis(Key::LookUp, Key::LookDown);

    let next = CameraState {
        position: camera.position + displacement,
        orientation: Orientation {
            yaw: orientation.yaw + yaw_rate * dt * cfg.yaw_speed,
            pitch: orientation.pitch + pitch_rate * dt * cfg.pitch_speed,
        },
    };
    let moved = forward != 0.0 || strafe != 0.0 || yaw_rate != 0.0 || pitch_rate != 0.0;

    StepOutcome { camera: next, moved }
}
