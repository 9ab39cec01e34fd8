//! Viewer camera, damped orbit controls and click-to-focus transitions.
//!
//! The camera pose is its `Transform` plus the `OrbitControls` look-target.
//! Focus transitions tween both; orbit controls then aim the camera each frame.

/// Focus planning and the eased transition between camera poses.
///
/// A new focus request replaces any transition still in flight.
pub mod focus;

/// Damped spherical orbit, pan and zoom around a look-target.
pub mod orbit_controls;

/// Fixed-duration eased interpolation used by focus transitions.
pub mod tween;

/// Camera spawning from the viewer configuration.
pub mod viewer_camera;
