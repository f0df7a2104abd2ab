//! 4x4 transform construction.
//!
//! All matrices are column-major `glam::Mat4`, right-handed, with clip-space
//! depth in `[0, 1]` as wgpu expects.

use glam::{Mat4, Vec3};

pub fn identity() -> Mat4 {
    Mat4::IDENTITY
}

/// Perspective projection. `fov_y` is the vertical field of view in radians.
pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::perspective_rh(fov_y, aspect, near, far)
}

/// View matrix for an eye at `eye` looking at `target`.
pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    Mat4::look_at_rh(eye, target, up)
}

/// Rotation by `angle` radians about `axis`. The axis does not need to be
/// normalized; a (near) zero-length axis gives the identity.
pub fn rotation(angle: f32, axis: Vec3) -> Mat4 {
    match axis.try_normalize() {
        Some(axis) => Mat4::from_axis_angle(axis, angle),
        None => Mat4::IDENTITY,
    }
}

pub fn translation(offset: Vec3) -> Mat4 {
    Mat4::from_translation(offset)
}
