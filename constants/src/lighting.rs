use bevy::color::Color;
use bevy::math::Vec3;

pub const POINT_LIGHT_COLOR: Color = Color::WHITE;
pub const POINT_LIGHT_POSITION: Vec3 = Vec3::new(200.0, 200.0, 200.0);
pub const POINT_LIGHT_RANGE: f32 = 100.0;
/// Luminous power in lumens.
pub const POINT_LIGHT_INTENSITY: f32 = 1_000_000.0;

pub const AMBIENT_LIGHT_COLOR: Color = Color::WHITE;
pub const AMBIENT_LIGHT_BRIGHTNESS: f32 = 200.0;
