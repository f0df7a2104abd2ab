use glam::{Mat4, Vec2};
use trailrun_kernel::FrameOutput;

/// Everything a backend needs for one frame besides the static mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDraw {
    pub projection: Mat4,
    pub view: Mat4,
    pub yaw_rotation: Mat4,
    pub pitch_rotation: Mat4,
    /// Viewer position on the ground plane (x, z).
    pub position: Vec2,
    pub vertex_spacing: f32,
}

impl FrameDraw {
    pub fn from_frame(frame: &FrameOutput, vertex_spacing: f32) -> Self {
        let m = frame.matrices;
        Self {
            projection: m.projection,
            view: m.view,
            yaw_rotation: m.yaw_rotation,
            pitch_rotation: m.pitch_rotation,
            position: frame.camera.position,
            vertex_spacing,
        }
    }
}
