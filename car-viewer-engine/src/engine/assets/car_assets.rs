use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::engine::loading::asset_events::AssetKind;

/// Handles for the two asynchronously loaded scene assets.
/// Both stay default until the bootstrap sequence starts their loads.
#[derive(Resource, Debug, Clone)]
pub struct CarAssets {
    /// The glTF file itself; its load state reports model failures.
    pub model_file: Handle<Gltf>,
    pub model: Handle<Scene>,
    pub model_path: String,
    pub environment: Handle<Image>,
    pub environment_path: String,
    /// Root entity of the spawned glTF scene.
    pub model_root: Option<Entity>,
}

impl CarAssets {
    pub fn path(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Model => &self.model_path,
            AssetKind::Environment => &self.environment_path,
        }
    }
}

pub fn create_car_assets() -> CarAssets {
    CarAssets {
        model_file: Handle::default(),
        model: Handle::default(),
        model_path: String::new(),
        environment: Handle::default(),
        environment_path: String::new(),
        model_root: None,
    }
}
