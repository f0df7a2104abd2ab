//! Build-time tuning constants.

/// Edge length of the ground plane in world units.
pub const PLANE_SIZE: f32 = 5000.0;
/// Subdivisions along each edge of the ground plane.
pub const PLANE_DIVISIONS: u32 = 250;
/// Far clip distance.
pub const Z_FAR: f32 = 5000.0;
pub const Z_NEAR: f32 = 0.1;
/// Vertical field of view in degrees.
pub const FIELD_OF_VIEW_DEGREES: f32 = 45.0;
/// Eye height above the plane.
pub const EYE_HEIGHT: f32 = 10.0;
/// Distance along +Z of the fixed look-at target.
pub const LOOK_AT_DISTANCE: f32 = 100.0;
/// Ground speed in units per second.
pub const LINEAR_SPEED: f32 = 100.0;
/// Yaw rate in radians per second per unit of input.
pub const YAW_SPEED: f32 = 0.5;
/// Pitch rate in radians per second per unit of input.
pub const PITCH_SPEED: f32 = 0.3;
/// Still frames before an idle snapshot is requested.
pub const IDLE_FRAME_THRESHOLD: i32 = 100;
pub const CLEAR_COLOR: [f64; 4] = [0.0, 0.0, 0.5, 1.0];

/// Every tuning value the kernel and renderers read, bundled so it can be
/// passed explicitly instead of reaching for globals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    pub plane_size: f32,
    pub plane_divisions: u32,
    pub z_near: f32,
    pub z_far: f32,
    pub fov_y: f32,
    pub eye_height: f32,
    pub look_at_distance: f32,
    pub linear_speed: f32,
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub idle_frame_threshold: i32,
    pub clear_color: [f64; 4],
}

impl ViewerConfig {
    /// Distance between neighbouring grid vertices.
    pub fn vertex_spacing(&self) -> f32 {
        self.plane_size / self.plane_divisions as f32
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            plane_size: PLANE_SIZE,
            plane_divisions: PLANE_DIVISIONS,
            z_near: Z_NEAR,
            z_far: Z_FAR,
            fov_y: FIELD_OF_VIEW_DEGREES.to_radians(),
            eye_height: EYE_HEIGHT,
            look_at_distance: LOOK_AT_DISTANCE,
            linear_speed: LINEAR_SPEED,
            yaw_speed: YAW_SPEED,
            pitch_speed: PITCH_SPEED,
            idle_frame_threshold: IDLE_FRAME_THRESHOLD,
            clear_color: CLEAR_COLOR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spacing_is_twenty_units() {
        let cfg = ViewerConfig::default();
        assert_eq!(cfg.vertex_spacing(), 20.0);
    }

    #[test]
    fn default_fov_is_radians() {
        let cfg = ViewerConfig::default();
        assert!((cfg.fov_y - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }
}
