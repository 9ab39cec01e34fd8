pub const ENABLE_DAMPING: bool = true;
pub const DAMPING_FACTOR: f32 = 0.05;

pub const ROTATE_SPEED: f32 = 1.0;
pub const ZOOM_SPEED: f32 = 1.0;
pub const PAN_SPEED: f32 = 1.0;

pub const MIN_DISTANCE: f32 = 0.0;
pub const MAX_DISTANCE: f32 = f32::INFINITY;

/// Keeps the polar angle away from the poles so `looking_at` stays defined.
pub const POLAR_EPSILON: f32 = 1e-6;

/// Pixel-unit wheel events are divided by this to get line steps.
pub const PIXELS_PER_WHEEL_LINE: f32 = 100.0;
