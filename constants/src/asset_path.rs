/// Viewer configuration file, relative to the asset root.
pub const VIEWER_CONFIG_PATH: &str = "viewer.json";

/// glTF model of the car. Scene 0 is spawned.
pub const MODEL_PATH: &str = "models/kia-stonic/scene.gltf";

/// Equirectangular HDR panorama used as the lighting environment.
pub const ENVIRONMENT_PATH: &str = "hdr/docklands_01_1k.hdr";
