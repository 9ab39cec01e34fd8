//! Scene content around the car model.
//!
//! Provides lighting, the environment map baker, the car paint material,
//! the registry of clickable model surfaces and the focus indicator.

/// Car paint material with a procedural flake normal map.
///
/// Seeded so every run produces the same flakes.
pub mod car_paint;

/// Clickable surface registry filled when the model finishes loading.
pub mod clickable;

/// Equirectangular HDR to cubemap conversion for image-based lighting.
pub mod environment_map;

/// Lazily spawned marker sphere at the current focus target.
pub mod focus_indicator;

/// Point and ambient lights.
pub mod lighting;
