//! Asset descriptions for the car viewer.
//!
//! Holds the JSON viewer configuration and the handles of the model and
//! environment map being loaded.

/// Model and environment handles plus the spawned model root.
pub mod car_assets;

/// `viewer.json` configuration asset with defaults for every field.
pub mod viewer_config;
