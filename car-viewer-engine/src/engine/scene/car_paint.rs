use bevy::asset::RenderAssetUsages;
use bevy::image::{ImageAddressMode, ImageSampler, ImageSamplerDescriptor};
use bevy::math::Affine2;
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::engine::assets::viewer_config::{PaintSettings, ViewerConfig};

/// Flakes per 512x512 texels; scaled with texture area.
const FLAKES_PER_TILE: f32 = 4000.0;
const FLAKE_RADIUS_PX: (f32, f32) = (1.0, 3.5);

/// Paint materials shared by every mesh of the model.
#[derive(Resource, Clone)]
pub struct CarPaint {
    pub material: Handle<StandardMaterial>,
    /// Same paint without the flake normal map, for meshes lacking tangents.
    pub plain: Handle<StandardMaterial>,
}

/// Tangent-space flake normals as RGBA8, flat (+Z) outside the flakes.
///
/// Each flake is a disc tilted in a random direction. `strength` scales the
/// tangential part before encoding, so a sampled normal is already attenuated.
pub fn generate_flake_normals(size: u32, seed: u64, strength: f32) -> Vec<u8> {
    let size = size as usize;
    let mut normals = vec![Vec3::Z; size * size];
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let area_scale = (size * size) as f32 / (512.0 * 512.0);
    let flake_count = (FLAKES_PER_TILE * area_scale).max(1.0) as usize;

    for _ in 0..flake_count {
        let centre = Vec2::new(
            rng.random::<f32>() * size as f32,
            rng.random::<f32>() * size as f32,
        );
        let (min_radius, max_radius) = FLAKE_RADIUS_PX;
        let radius = min_radius + rng.random::<f32>() * (max_radius - min_radius);
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let tilt = rng.random::<f32>();
        let normal = Vec3::new(
            angle.cos() * tilt * strength,
            angle.sin() * tilt * strength,
            1.0,
        )
        .normalize();

        let reach = radius.ceil() as i64;
        for dy in -reach..=reach {
            for dx in -reach..=reach {
                let offset = Vec2::new(dx as f32, dy as f32);
                if offset.length() > radius {
                    continue;
                }
                // Wrap so the tile repeats without seams.
                let x = (centre.x as i64 + dx).rem_euclid(size as i64) as usize;
                let y = (centre.y as i64 + dy).rem_euclid(size as i64) as usize;
                normals[y * size + x] = normal;
            }
        }
    }

    normals
        .iter()
        .flat_map(|n| {
            let encoded = (*n * 0.5 + Vec3::splat(0.5)) * 255.0;
            [
                encoded.x.round() as u8,
                encoded.y.round() as u8,
                encoded.z.round() as u8,
                255,
            ]
        })
        .collect()
}

/// Repeating, linear flake normal map.
pub fn create_flake_texture(settings: &PaintSettings) -> Image {
    let data = generate_flake_normals(
        settings.flake_texture_size,
        settings.flake_seed,
        settings.flake_normal_scale,
    );

    let mut image = Image::new(
        Extent3d {
            width: settings.flake_texture_size,
            height: settings.flake_texture_size,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        data,
        TextureFormat::Rgba8Unorm,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.sampler = ImageSampler::Descriptor(ImageSamplerDescriptor {
        address_mode_u: ImageAddressMode::Repeat,
        address_mode_v: ImageAddressMode::Repeat,
        ..ImageSamplerDescriptor::linear()
    });
    image
}

pub fn car_paint_material(settings: &PaintSettings, flakes: Handle<Image>) -> StandardMaterial {
    let [r, g, b] = settings.color;
    StandardMaterial {
        base_color: Color::linear_rgb(r, g, b),
        metallic: settings.metallic,
        perceptual_roughness: settings.roughness,
        clearcoat: settings.clearcoat,
        clearcoat_perceptual_roughness: settings.clearcoat_roughness,
        normal_map_texture: Some(flakes),
        uv_transform: Affine2::from_scale(Vec2::splat(settings.flake_repeat)),
        ..default()
    }
}

/// Build the paint once per run, before the model is requested.
pub fn create_car_paint(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let flakes = images.add(create_flake_texture(&config.paint));
    let flaked = car_paint_material(&config.paint, flakes);
    let plain = materials.add(StandardMaterial {
        normal_map_texture: None,
        ..flaked.clone()
    });
    let material = materials.add(flaked);
    commands.insert_resource(CarPaint { material, plain });
    debug!(
        "Car paint ready ({}² flake map, seed {:#x})",
        config.paint.flake_texture_size, config.paint.flake_seed
    );
}
