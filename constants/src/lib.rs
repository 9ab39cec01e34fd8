//! Shared defaults for the car viewer.
//!
//! Every value here is the fallback used when `viewer.json` omits a field.

pub mod asset_path;
pub mod camera;
pub mod controls;
pub mod environment;
pub mod focus;
pub mod lighting;
pub mod logging;
pub mod paint;
