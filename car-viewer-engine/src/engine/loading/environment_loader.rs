use bevy::prelude::*;

use crate::engine::assets::car_assets::CarAssets;
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::viewer_camera::ViewerCamera;
use crate::engine::error::ViewerError;
use crate::engine::loading::asset_events::{AssetKind, AssetLoadEvent, report};
use crate::engine::loading::progress::{LoadStatus, LoadingProgress};
use crate::engine::scene::environment_map::bake_environment;

pub fn begin_environment_load(
    asset_server: Res<AssetServer>,
    config: Res<ViewerConfig>,
    mut assets: ResMut<CarAssets>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    info!("Loading environment map from {}", config.environment_path);
    assets.environment = asset_server.load(&config.environment_path);
    assets.environment_path = config.environment_path.clone();
    loading_progress.environment = LoadStatus::Pending;
}

// Bake the decoded panorama and light the scene with it
pub fn install_environment_map(
    mut loading_progress: ResMut<LoadingProgress>,
    assets: Res<CarAssets>,
    config: Res<ViewerConfig>,
    mut images: ResMut<Assets<Image>>,
    camera_query: Query<Entity, With<ViewerCamera>>,
    mut commands: Commands,
    mut load_events: EventWriter<AssetLoadEvent>,
) {
    if loading_progress.environment != LoadStatus::Loaded || loading_progress.environment_installed
    {
        return;
    }
    let Ok(camera) = camera_query.single() else {
        return;
    };

    let baked = images
        .get(&assets.environment)
        .ok_or(ViewerError::MissingImageData)
        .and_then(|panorama| bake_environment(panorama, &config.environment));

    let outcome = match baked {
        Ok(environment) => {
            commands.entity(camera).insert(EnvironmentMapLight {
                diffuse_map: images.add(environment.diffuse),
                specular_map: images.add(environment.specular),
                intensity: config.environment.intensity,
                ..default()
            });
            loading_progress.environment_installed = true;
            debug!(
                "Environment installed ({}² specular, {}² irradiance)",
                config.environment.face_size, config.environment.diffuse_face_size
            );
            Ok(())
        }
        Err(err) => Err(err.to_string()),
    };

    loading_progress.environment = report(
        AssetKind::Environment,
        assets.path(AssetKind::Environment),
        outcome,
        &mut load_events,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::car_assets::create_car_assets;
    use bevy::asset::RenderAssetUsages;
    use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

    fn panorama(format: TextureFormat, data: Vec<u8>) -> Image {
        Image::new(
            Extent3d {
                width: 4,
                height: 2,
                depth_or_array_layers: 1,
            },
            TextureDimension::D2,
            data,
            format,
            RenderAssetUsages::default(),
        )
    }

    fn test_app(image: Image) -> App {
        let mut app = App::new();
        let mut config = ViewerConfig::default();
        config.environment.face_size = 8;
        config.environment.diffuse_face_size = 2;
        app.add_plugins(MinimalPlugins)
            .add_event::<AssetLoadEvent>()
            .init_resource::<LoadingProgress>()
            .insert_resource(config)
            .insert_resource(Assets::<Image>::default())
            .add_systems(Update, install_environment_map);

        let handle = app.world_mut().resource_mut::<Assets<Image>>().add(image);
        let mut assets = create_car_assets();
        assets.environment = handle;
        assets.environment_path = "hdr/test.hdr".into();
        app.insert_resource(assets);
        app.world_mut().spawn(ViewerCamera);
        app.world_mut().resource_mut::<LoadingProgress>().environment = LoadStatus::Loaded;
        app
    }

    fn drain_events(app: &mut App) -> Vec<AssetLoadEvent> {
        app.world_mut()
            .resource_mut::<Events<AssetLoadEvent>>()
            .drain()
            .collect()
    }

    #[test]
    fn float_panorama_installs_environment_light() {
        let texels = [1.0f32; 4 * 2 * 4];
        let image = panorama(
            TextureFormat::Rgba32Float,
            bytemuck::cast_slice::<f32, u8>(&texels).to_vec(),
        );
        let mut app = test_app(image);
        app.update();

        let mut lights = app.world_mut().query::<&EnvironmentMapLight>();
        let light = lights.single(app.world()).unwrap();
        assert_eq!(light.intensity, ViewerConfig::default().environment.intensity);

        // Diffuse reads a small irradiance cube, specular a mip-mapped one.
        assert_ne!(light.diffuse_map, light.specular_map);
        let images = app.world().resource::<Assets<Image>>();
        let diffuse = images.get(&light.diffuse_map).unwrap();
        let specular = images.get(&light.specular_map).unwrap();
        assert_eq!(diffuse.texture_descriptor.size.width, 2);
        assert_eq!(diffuse.texture_descriptor.mip_level_count, 1);
        assert_eq!(specular.texture_descriptor.size.width, 8);
        assert_eq!(specular.texture_descriptor.mip_level_count, 4);

        let progress = app.world().resource::<LoadingProgress>();
        assert!(progress.environment_installed);
        assert_eq!(progress.environment, LoadStatus::Loaded);

        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert!(events[0].outcome.is_ok());

        // Installing happens once.
        app.update();
        assert!(drain_events(&mut app).is_empty());
    }

    #[test]
    fn unsupported_format_is_a_load_failure() {
        let image = panorama(TextureFormat::Rgba8UnormSrgb, vec![0; 4 * 2 * 4]);
        let mut app = test_app(image);
        app.update();

        let mut lights = app.world_mut().query::<&EnvironmentMapLight>();
        assert_eq!(lights.iter(app.world()).count(), 0);
        assert_eq!(
            app.world().resource::<LoadingProgress>().environment,
            LoadStatus::Failed
        );

        let events = drain_events(&mut app);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, AssetKind::Environment);
        assert!(matches!(
            &events[0].outcome,
            Err(ViewerError::AssetLoad { path, .. }) if path == "hdr/test.hdr"
        ));
    }
}
