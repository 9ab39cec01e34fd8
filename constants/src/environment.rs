/// Edge length of each cubemap face baked from the equirectangular panorama.
pub const CUBE_FACE_SIZE: u32 = 256;

/// Environment light intensity in cd/m².
pub const ENVIRONMENT_INTENSITY: f32 = 1000.0;

/// Edge length of the irradiance cube used for diffuse lighting.
pub const DIFFUSE_FACE_SIZE: u32 = 32;

/// Longitude cells of the downsampled panorama integrated for irradiance.
/// Latitude uses half as many.
pub const IRRADIANCE_SAMPLE_WIDTH: usize = 64;
