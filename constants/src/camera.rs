use bevy::math::Vec3;

pub const CAMERA_POSITION: Vec3 = Vec3::new(0.0, 2.0, 10.0);
pub const CAMERA_LOOK_AT: Vec3 = Vec3::ZERO;

/// Vertical field of view in degrees.
pub const CAMERA_FOV_DEGREES: f32 = 50.0;
pub const CAMERA_NEAR: f32 = 1.0;
pub const CAMERA_FAR: f32 = 1000.0;
