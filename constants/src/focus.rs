/// Camera and look-target tween length in seconds.
pub const FOCUS_DURATION_SECS: f32 = 1.0;

/// Cursor travel above this many logical pixels turns a click into a drag.
pub const CLICK_DRAG_THRESHOLD_PX: f32 = 4.0;

pub const INDICATOR_RADIUS: f32 = 0.05;

/// Camera-to-target distances below this are treated as coincident.
pub const DEGENERATE_DISTANCE: f32 = 1e-6;
