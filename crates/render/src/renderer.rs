use std::fmt::Write as _;

use crate::draw::FrameDraw;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads a frame's draw state and produces output. It never
/// mutates the camera or input; those belong to the frame step.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(&self, frame: &FrameDraw) -> Self::Output;
}

/// Text renderer for headless runs.
///
/// Describes the draw call the GPU backend would issue: mesh size, viewer
/// position and the ground point under the centre of the screen.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    vertex_count: usize,
    index_count: usize,
}

impl DebugTextRenderer {
    pub fn new(vertex_count: usize, index_count: usize) -> Self {
        Self {
            vertex_count,
            index_count,
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, frame: &FrameDraw) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame (vertices={}, indices={}, spacing={:.1}) ===",
            self.vertex_count, self.index_count, frame.vertex_spacing
        );
        let _ = writeln!(
            out,
            "Position: x={:.2} z={:.2}",
            frame.position.x, frame.position.y
        );

        // Yaw matrix maps the heading onto +Z; its inverse recovers it.
        let heading = frame.yaw_rotation.inverse().transform_vector3(glam::Vec3::Z);
        let yaw = heading.z.atan2(heading.x);
        let up = frame.pitch_rotation.transform_vector3(glam::Vec3::Z);
        let pitch = (-up.y).atan2(up.z);
        let _ = writeln!(
            out,
            "Heading: yaw={:.1}deg pitch={:.1}deg",
            display_degrees(yaw),
            display_degrees(pitch)
        );
        let _ = writeln!(
            out,
            "Strip: {} triangles incl. degenerates",
            self.index_count.saturating_sub(2)
        );
        out
    }
}

/// Degrees for display; adding zero folds `-0.0` into `0.0`.
fn display_degrees(radians: f32) -> f32 {
    radians.to_degrees() + 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec2, Vec3};

    fn draw_with(yaw: f32, pitch: f32) -> FrameDraw {
        FrameDraw {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
            yaw_rotation: Mat4::from_axis_angle(Vec3::Y, yaw - std::f32::consts::FRAC_PI_2),
            pitch_rotation: Mat4::from_axis_angle(Vec3::X, pitch),
            position: Vec2::new(1.5, -2.0),
            vertex_spacing: 20.0,
        }
    }

    #[test]
    fn debug_renderer_reports_mesh_and_position() {
        let renderer = DebugTextRenderer::new(4, 4);
        let output = renderer.render(&draw_with(std::f32::consts::FRAC_PI_2, 0.0));
        assert!(output.contains("vertices=4"));
        assert!(output.contains("x=1.50 z=-2.00"));
        assert!(output.contains("yaw=90.0deg"));
        assert!(output.contains("pitch=0.0deg"));
        assert!(output.contains("Strip: 2 triangles"));
    }

    #[test]
    fn debug_renderer_recovers_pitch() {
        let renderer = DebugTextRenderer::new(0, 0);
        let output = renderer.render(&draw_with(0.3, 0.5));
        assert!(output.contains("yaw=17.2deg"), "{output}");
        assert!(output.contains("pitch=28.6deg"), "{output}");
    }
}
