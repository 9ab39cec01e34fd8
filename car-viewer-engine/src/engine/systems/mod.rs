//! Runtime systems shared by the running viewer.
//!
//! Provides the per-frame system ordering and FPS diagnostics.

/// FPS tracking and notification systems for performance monitoring.
///
/// Sends frame rate updates to the hosting page via RPC and updates the native overlay.
pub mod fps_tracking;

/// System sets fixing the order of input, animation and controls each frame.
pub mod frame;
