use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Viewing direction as yaw (heading about +Y) and pitch (about +X), in radians.
///
/// Yaw is measured so that the forward direction on the ground plane is
/// `(cos yaw, sin yaw)` in (x, z). The initial yaw of 90° faces +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

impl Orientation {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self { yaw, pitch }
    }

    /// Unit vector on the ground plane the viewer is heading towards.
    pub fn forward(&self) -> Vec2 {
        Vec2::new(self.yaw.cos(), self.yaw.sin())
    }

    /// Unit vector on the ground plane at heading `yaw + 90°` (screen right).
    pub fn right(&self) -> Vec2 {
        let a = self.yaw + FRAC_PI_2;
        Vec2::new(a.cos(), a.sin())
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self {
            yaw: FRAC_PI_2,
            pitch: 0.0,
        }
    }
}

/// Plain, serializable copy of the camera for logs, HUDs and CLI traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraSnapshot {
    /// Ground-plane position: `x` is world X, `y` is world Z.
    pub position: Vec2,
    pub orientation: Orientation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orientation_faces_positive_z() {
        let o = Orientation::default();
        let f = o.forward();
        assert!(f.x.abs() < 1e-6);
        assert!((f.y - 1.0).abs() < 1e-6);
        assert_eq!(o.pitch, 0.0);
    }

    #[test]
    fn right_is_perpendicular_to_forward() {
        let o = Orientation::new(0.3, 0.0);
        assert!(o.forward().dot(o.right()).abs() < 1e-6);
        assert!((o.right().length() - 1.0).abs() < 1e-6);
    }
}
