//! Equirectangular panorama to cubemaps for environment lighting: an
//! irradiance cube for diffuse and a mip-mapped radiance cube for specular.

use bevy::asset::RenderAssetUsages;
use bevy::prelude::*;
use bevy::render::render_resource::{
    Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
};
use constants::environment::IRRADIANCE_SAMPLE_WIDTH;
use half::f16;
use std::f32::consts::{PI, TAU};

use crate::engine::assets::viewer_config::EnvironmentSettings;
use crate::engine::error::ViewerError;

/// Cube faces in wgpu layer order.
pub const CUBE_FACES: usize = 6;

/// Largest finite half-float; brighter HDR texels are clamped to it.
const F16_MAX: f32 = 65504.0;

/// Borrowed view of an RGBA float panorama.
pub struct EquirectSource<'a> {
    width: usize,
    height: usize,
    texels: &'a [f32],
}

impl<'a> EquirectSource<'a> {
    pub fn new(width: usize, height: usize, texels: &'a [f32]) -> Result<Self, ViewerError> {
        let expected = width * height * 4;
        if texels.len() != expected || width == 0 || height == 0 {
            return Err(ViewerError::ImageSizeMismatch {
                expected,
                actual: texels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            texels,
        })
    }

    /// Bilinear sample at panorama UV, wrapping in longitude and clamping in latitude.
    pub fn sample_bilinear(&self, uv: Vec2) -> Vec4 {
        let pixel_x = uv.x * self.width as f32 - 0.5;
        let pixel_y = uv.y * self.height as f32 - 0.5;

        let x0 = pixel_x.floor();
        let y0 = pixel_y.floor();
        let wx = pixel_x - x0;
        let wy = pixel_y - y0;

        let x0 = x0 as i64;
        let y0 = y0 as i64;

        let c00 = self.texel(x0, y0);
        let c10 = self.texel(x0 + 1, y0);
        let c01 = self.texel(x0, y0 + 1);
        let c11 = self.texel(x0 + 1, y0 + 1);

        let top = c00.lerp(c10, wx);
        let bottom = c01.lerp(c11, wx);
        top.lerp(bottom, wy)
    }

    fn texel(&self, x: i64, y: i64) -> Vec4 {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.clamp(0, self.height as i64 - 1) as usize;
        let index = (y * self.width + x) * 4;
        Vec4::from_slice(&self.texels[index..index + 4])
    }
}

/// Direction through a cube face texel. `u` and `v` span [-1, 1] with `v` pointing down.
pub fn cube_face_direction(face: usize, u: f32, v: f32) -> Vec3 {
    let direction = match face {
        0 => Vec3::new(1.0, -v, -u),
        1 => Vec3::new(-1.0, -v, u),
        2 => Vec3::new(u, 1.0, v),
        3 => Vec3::new(u, -1.0, -v),
        4 => Vec3::new(u, -v, 1.0),
        _ => Vec3::new(-u, -v, -1.0),
    };
    direction.normalize()
}

/// Panorama UV for a world direction. Row zero of the image is straight up.
pub fn equirect_uv(direction: Vec3) -> Vec2 {
    let u = direction.z.atan2(direction.x) / TAU + 0.5;
    let v = direction.y.clamp(-1.0, 1.0).asin() / PI + 0.5;
    Vec2::new(u, 1.0 - v)
}

/// Sample `shade` at every texel of six square faces, in wgpu layer order.
fn bake_face_texels(face_size: u32, mut shade: impl FnMut(Vec3) -> Vec4) -> Vec<Vec<Vec4>> {
    let size = face_size as usize;
    (0..CUBE_FACES)
        .map(|face| {
            let mut texels = Vec::with_capacity(size * size);
            for y in 0..size {
                for x in 0..size {
                    let u = (x as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                    let v = (y as f32 + 0.5) / size as f32 * 2.0 - 1.0;
                    // Bevy samples environment cubemaps with z negated.
                    let cube_direction = cube_face_direction(face, u, v);
                    texels.push(shade(cube_direction * Vec3::new(1.0, 1.0, -1.0)));
                }
            }
            texels
        })
        .collect()
}

/// Panorama radiance resampled onto the cube.
pub fn radiance_faces(source: &EquirectSource, face_size: u32) -> Vec<Vec<Vec4>> {
    bake_face_texels(face_size, |direction| {
        source.sample_bilinear(equirect_uv(direction))
    })
}

/// Coarse lat-long cell of the panorama used for the irradiance integral.
struct RadianceCell {
    direction: Vec3,
    radiance: Vec4,
    solid_angle: f32,
}

/// Average the panorama into `width` x `width / 2` cells. Cells finer than
/// the source fall back to a bilinear sample at their centre.
fn radiance_cells(source: &EquirectSource, width: usize) -> Vec<RadianceCell> {
    let height = (width / 2).max(1);
    let mut sums = vec![Vec4::ZERO; width * height];
    let mut counts = vec![0u32; width * height];

    for y in 0..source.height {
        let cell_y = y * height / source.height;
        for x in 0..source.width {
            let cell_x = x * width / source.width;
            let texel = source.texel(x as i64, y as i64);
            if texel.is_finite() {
                sums[cell_y * width + cell_x] += texel.max(Vec4::ZERO);
            }
            counts[cell_y * width + cell_x] += 1;
        }
    }

    let mut cells = Vec::with_capacity(width * height);
    for cell_y in 0..height {
        for cell_x in 0..width {
            let uv = Vec2::new(
                (cell_x as f32 + 0.5) / width as f32,
                (cell_y as f32 + 0.5) / height as f32,
            );
            let latitude = (0.5 - uv.y) * PI;
            let longitude = (uv.x - 0.5) * TAU;
            let index = cell_y * width + cell_x;
            let radiance = match counts[index] {
                0 => source.sample_bilinear(uv),
                count => sums[index] / count as f32,
            };

            cells.push(RadianceCell {
                direction: Vec3::new(
                    latitude.cos() * longitude.cos(),
                    latitude.sin(),
                    latitude.cos() * longitude.sin(),
                ),
                radiance,
                solid_angle: latitude.cos() * (PI / height as f32) * (TAU / width as f32),
            });
        }
    }
    cells
}

/// Cosine-weighted irradiance over π, so a uniform panorama of radiance L
/// yields L on every face.
pub fn irradiance_faces(source: &EquirectSource, face_size: u32) -> Vec<Vec<Vec4>> {
    let cells = radiance_cells(source, IRRADIANCE_SAMPLE_WIDTH);
    bake_face_texels(face_size, |normal| {
        let mut irradiance = Vec4::ZERO;
        for cell in &cells {
            let cosine = normal.dot(cell.direction);
            if cosine > 0.0 {
                irradiance += cell.radiance * (cosine * cell.solid_angle);
            }
        }
        let mut irradiance = irradiance / PI;
        irradiance.w = 1.0;
        irradiance
    })
}

/// Mip levels for a square face, down to 1x1.
pub fn mip_level_count(face_size: u32) -> u32 {
    32 - face_size.leading_zeros()
}

/// Box-filtered mip chain of one face, base level first. Roughness lookups
/// read the blurrier levels.
pub fn mip_chain(face: Vec<Vec4>, face_size: u32) -> Vec<Vec<Vec4>> {
    let mut size = face_size as usize;
    let mut levels = vec![face];

    while size > 1 {
        let half = (size / 2).max(1);
        let previous = &levels[levels.len() - 1];
        let mut next = Vec::with_capacity(half * half);
        for y in 0..half {
            for x in 0..half {
                let mut sum = Vec4::ZERO;
                for (dx, dy) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
                    let sx = (2 * x + dx).min(size - 1);
                    let sy = (2 * y + dy).min(size - 1);
                    sum += previous[sy * size + sx];
                }
                next.push(sum / 4.0);
            }
        }
        levels.push(next);
        size = half;
    }
    levels
}

fn encode_half(texels: &[Vec4], data: &mut Vec<u8>) {
    for texel in texels {
        for channel in texel.to_array() {
            let value = if channel.is_finite() {
                channel.clamp(0.0, F16_MAX)
            } else {
                0.0
            };
            data.extend_from_slice(&f16::from_f32(value).to_le_bytes());
        }
    }
}

/// Resample the panorama into six square faces, returned as RGBA half floats.
pub fn bake_faces(source: &EquirectSource, face_size: u32) -> Vec<u8> {
    let size = face_size as usize;
    let mut data = Vec::with_capacity(CUBE_FACES * size * size * 8);
    for face in radiance_faces(source, face_size) {
        encode_half(&face, &mut data);
    }
    data
}

/// `Rgba16Float` cube image. `faces` holds every mip level of each face,
/// laid out face by face as the GPU upload expects.
fn cube_image(faces: Vec<Vec<Vec<Vec4>>>, face_size: u32) -> Image {
    let mip_levels = faces.first().map_or(1, |levels| levels.len() as u32);
    let mut data = Vec::new();
    for levels in &faces {
        for level in levels {
            encode_half(level, &mut data);
        }
    }

    let mut image = Image::new_uninit(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: CUBE_FACES as u32,
        },
        TextureDimension::D2,
        TextureFormat::Rgba16Float,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.data = Some(data);
    image.texture_descriptor.mip_level_count = mip_levels;
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    image
}

/// Cubemaps lighting the scene: irradiance for diffuse, a mip chain of
/// radiance for specular.
pub struct BakedEnvironment {
    pub diffuse: Image,
    pub specular: Image,
}

/// Bake both environment cubemaps from a loaded equirectangular HDR image.
pub fn bake_environment(
    source: &Image,
    settings: &EnvironmentSettings,
) -> Result<BakedEnvironment, ViewerError> {
    let format = source.texture_descriptor.format;
    if format != TextureFormat::Rgba32Float {
        return Err(ViewerError::UnsupportedEnvironmentFormat(format));
    }

    let bytes = source.data.as_ref().ok_or(ViewerError::MissingImageData)?;
    // Image bytes carry no alignment guarantee, so copy into an f32 buffer.
    let texels: Vec<f32> = bytemuck::pod_collect_to_vec(bytes);

    let size = source.texture_descriptor.size;
    let panorama = EquirectSource::new(size.width as usize, size.height as usize, &texels)?;

    let specular = radiance_faces(&panorama, settings.face_size)
        .into_iter()
        .map(|face| mip_chain(face, settings.face_size))
        .collect();
    let diffuse = irradiance_faces(&panorama, settings.diffuse_face_size)
        .into_iter()
        .map(|face| vec![face])
        .collect();

    Ok(BakedEnvironment {
        diffuse: cube_image(diffuse, settings.diffuse_face_size),
        specular: cube_image(specular, settings.face_size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_image(width: u32, height: u32, texels: &[f32]) -> Image {
        Image::new(
            Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            bytemuck::cast_slice::<f32, u8>(texels).to_vec(),
            TextureFormat::Rgba32Float,
            RenderAssetUsages::default(),
        )
    }

    fn decode_half(bytes: &[u8]) -> Vec<f32> {
        bytes
            .chunks_exact(2)
            .map(|pair| f16::from_le_bytes([pair[0], pair[1]]).to_f32())
            .collect()
    }

    #[test]
    fn face_centres_point_along_axes() {
        let expected = [
            Vec3::X,
            Vec3::NEG_X,
            Vec3::Y,
            Vec3::NEG_Y,
            Vec3::Z,
            Vec3::NEG_Z,
        ];
        for (face, axis) in expected.iter().enumerate() {
            let direction = cube_face_direction(face, 0.0, 0.0);
            assert!(direction.abs_diff_eq(*axis, 1e-6), "face {face}: {direction}");
        }
    }

    #[test]
    fn top_of_face_looks_upward_on_side_faces() {
        for face in [0, 1, 4, 5] {
            assert!(cube_face_direction(face, 0.0, -1.0).y > 0.5);
        }
    }

    #[test]
    fn equirect_poles_and_horizon() {
        let up = equirect_uv(Vec3::Y);
        assert!((up.y - 0.0).abs() < 1e-6);
        let down = equirect_uv(Vec3::NEG_Y);
        assert!((down.y - 1.0).abs() < 1e-6);
        let horizon = equirect_uv(Vec3::X);
        assert!((horizon - Vec2::new(0.5, 0.5)).length() < 1e-6);
    }

    fn settings(face_size: u32, diffuse_face_size: u32) -> EnvironmentSettings {
        EnvironmentSettings {
            face_size,
            diffuse_face_size,
            ..default()
        }
    }

    /// Top half at `sky`, bottom half black.
    fn sky_panorama(width: usize, height: usize, sky: f32) -> Vec<f32> {
        let mut texels = Vec::new();
        for y in 0..height {
            let value = if y < height / 2 { sky } else { 0.0 };
            for _ in 0..width {
                texels.extend_from_slice(&[value, value, value, 1.0]);
            }
        }
        texels
    }

    #[test]
    fn constant_panorama_bakes_constant_faces() {
        let texels: Vec<f32> = std::iter::repeat([0.25, 0.5, 2.0, 1.0])
            .take(8 * 4)
            .flatten()
            .collect();
        let image = float_image(8, 4, &texels);

        let baked = bake_environment(&image, &settings(4, 2)).unwrap();
        for cubemap in [&baked.specular, &baked.diffuse] {
            assert_eq!(cubemap.texture_descriptor.size.depth_or_array_layers, 6);
            assert_eq!(cubemap.texture_descriptor.format, TextureFormat::Rgba16Float);
        }

        // Every specular mip of a flat panorama stays flat.
        for texel in decode_half(baked.specular.data.as_ref().unwrap()).chunks_exact(4) {
            assert!((texel[0] - 0.25).abs() < 1e-3);
            assert!((texel[1] - 0.5).abs() < 1e-3);
            assert!((texel[2] - 2.0).abs() < 1e-3);
        }
        // Irradiance of uniform radiance equals that radiance.
        for texel in decode_half(baked.diffuse.data.as_ref().unwrap()).chunks_exact(4) {
            assert!((texel[0] - 0.25).abs() < 0.25 * 0.03, "{texel:?}");
            assert!((texel[1] - 0.5).abs() < 0.5 * 0.03, "{texel:?}");
            assert!((texel[2] - 2.0).abs() < 2.0 * 0.03, "{texel:?}");
        }
    }

    #[test]
    fn specular_cube_carries_a_full_mip_chain() {
        let texels = sky_panorama(8, 4, 1.0);
        let image = float_image(8, 4, &texels);

        let baked = bake_environment(&image, &settings(4, 2)).unwrap();
        assert_eq!(baked.specular.texture_descriptor.mip_level_count, 3);
        assert_eq!(baked.specular.texture_descriptor.size.width, 4);
        // 4x4 + 2x2 + 1x1 texels per face, eight bytes each.
        assert_eq!(baked.specular.data.as_ref().unwrap().len(), 6 * 21 * 8);

        assert_eq!(baked.diffuse.texture_descriptor.mip_level_count, 1);
        assert_eq!(baked.diffuse.texture_descriptor.size.width, 2);
        assert_eq!(baked.diffuse.data.as_ref().unwrap().len(), 6 * 4 * 8);
    }

    #[test]
    fn mip_levels_average_their_parents() {
        let face = vec![
            Vec4::splat(1.0),
            Vec4::splat(3.0),
            Vec4::splat(5.0),
            Vec4::splat(7.0),
        ];
        let levels = mip_chain(face, 2);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[1], vec![Vec4::splat(4.0)]);

        assert_eq!(mip_level_count(1), 1);
        assert_eq!(mip_level_count(256), 9);
        assert_eq!(mip_level_count(5), 3);
    }

    #[test]
    fn sky_brightness_lands_on_upper_face() {
        let (width, height) = (16, 8);
        let texels = sky_panorama(width, height, 10.0);
        let panorama = EquirectSource::new(width, height, &texels).unwrap();
        let face_size = 4;
        let values = decode_half(&bake_faces(&panorama, face_size));
        let face_len = (face_size * face_size * 4) as usize;

        let upper = &values[2 * face_len..3 * face_len];
        let lower = &values[3 * face_len..4 * face_len];
        assert!(upper.chunks_exact(4).all(|t| t[0] > 9.0));
        assert!(lower.chunks_exact(4).all(|t| t[0] < 1.0));
    }

    #[test]
    fn irradiance_follows_the_cosine_lobe() {
        // One source texel per integration cell.
        let (width, height) = (IRRADIANCE_SAMPLE_WIDTH, IRRADIANCE_SAMPLE_WIDTH / 2);
        let texels = sky_panorama(width, height, 10.0);
        let panorama = EquirectSource::new(width, height, &texels).unwrap();

        // A single texel per face sits on the face axis.
        let faces = irradiance_faces(&panorama, 1);
        let up = faces[2][0].x;
        let down = faces[3][0].x;
        let side = faces[0][0].x;

        assert!((up - 10.0).abs() < 0.3, "up {up}");
        assert!(down < 0.1, "down {down}");
        assert!((side - 5.0).abs() < 0.3, "side {side}");
    }

    #[test]
    fn non_float_images_are_rejected() {
        let image = Image::new(
            Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            vec![0, 0, 0, 255],
            TextureFormat::Rgba8UnormSrgb,
            RenderAssetUsages::default(),
        );
        assert!(matches!(
            bake_environment(&image, &settings(4, 2)),
            Err(ViewerError::UnsupportedEnvironmentFormat(TextureFormat::Rgba8UnormSrgb))
        ));
    }

    #[test]
    fn mismatched_texel_count_is_an_error() {
        let texels = [0.0; 12];
        assert!(EquirectSource::new(2, 2, &texels).is_err());
    }
}
