//! Asset loading and bootstrap systems for the car viewer.
//!
//! Resolves the viewer configuration, starts the model and environment loads,
//! and turns their completion into events the rest of the engine reacts to.

/// Load outcome events and the polling system that emits them.
///
/// Each load reports exactly once, either success or a `ViewerError`.
pub mod asset_events;

/// Viewer configuration loading with fallback to defaults.
pub mod config_loader;

/// HDR panorama loading and cubemap installation on the camera.
pub mod environment_loader;

/// glTF scene spawning and mesh discovery once the scene instance is ready.
pub mod model_loader;

/// Loading progress tracking resource for state transitions.
pub mod progress;
