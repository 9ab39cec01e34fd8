/// Linear RGB base colour of the car paint.
pub const PAINT_COLOR: [f32; 3] = [1.0, 0.0, 0.0];
pub const PAINT_METALLIC: f32 = 1.0;
pub const PAINT_ROUGHNESS: f32 = 0.1;
pub const PAINT_CLEARCOAT: f32 = 1.0;
pub const PAINT_CLEARCOAT_ROUGHNESS: f32 = 0.1;

/// Flake texture tiling across each UV axis.
pub const FLAKE_REPEAT: f32 = 10.0;
/// Strength of the flake normals, baked into the normal map.
pub const FLAKE_NORMAL_SCALE: f32 = 0.05;
pub const FLAKE_TEXTURE_SIZE: u32 = 512;
pub const FLAKE_SEED: u64 = 0x5EED_F1A4;
