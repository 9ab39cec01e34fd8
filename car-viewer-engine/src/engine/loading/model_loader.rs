use bevy::gltf::GltfAssetLabel;
use bevy::prelude::*;
use bevy::scene::SceneInstanceReady;

use crate::engine::assets::car_assets::CarAssets;
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::loading::progress::{LoadStatus, LoadingProgress};

/// Root of the spawned car scene.
#[derive(Component)]
pub struct CarModel;

/// The car scene is in the world and its meshes can be registered.
#[derive(Event, Debug, Clone)]
pub struct ModelReady {
    pub root: Entity,
    pub meshes: Vec<Entity>,
}

/// Request the glTF and spawn its first scene. The scene fills in once the
/// file is loaded; failures surface through the load state of `model_file`.
pub fn begin_model_load(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<ViewerConfig>,
    mut assets: ResMut<CarAssets>,
    mut loading_progress: ResMut<LoadingProgress>,
) {
    let path = config.model_path.clone();
    info!("Loading model from {}", path);

    assets.model_file = asset_server.load(&path);
    assets.model = asset_server.load(GltfAssetLabel::Scene(0).from_asset(path.clone()));
    assets.model_path = path;

    let root = commands
        .spawn((
            SceneRoot(assets.model.clone()),
            Transform::default(),
            Name::new("CarModel"),
            CarModel,
        ))
        .observe(on_model_scene_ready)
        .id();

    assets.model_root = Some(root);
    loading_progress.model = LoadStatus::Pending;
}

fn on_model_scene_ready(
    trigger: Trigger<SceneInstanceReady>,
    children: Query<&Children>,
    mesh_query: Query<(), With<Mesh3d>>,
    mut ready_events: EventWriter<ModelReady>,
) {
    let root = trigger.target();
    let meshes = collect_mesh_descendants(root, &children, &mesh_query);
    debug!("Model scene ready with {} meshes", meshes.len());
    ready_events.write(ModelReady { root, meshes });
}

/// Every mesh entity anywhere below `root`, in hierarchy order.
pub fn collect_mesh_descendants(
    root: Entity,
    children: &Query<&Children>,
    mesh_query: &Query<(), With<Mesh3d>>,
) -> Vec<Entity> {
    children
        .iter_descendants(root)
        .filter(|entity| mesh_query.contains(*entity))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;

    #[test]
    fn collects_nested_meshes_only_below_root() {
        let mut world = World::new();
        let mesh = Handle::<Mesh>::default();

        let root = world.spawn_empty().id();
        let body = world.spawn((Mesh3d(mesh.clone()), ChildOf(root))).id();
        let wheel_node = world.spawn(ChildOf(root)).id();
        let wheel = world.spawn((Mesh3d(mesh.clone()), ChildOf(wheel_node))).id();
        let stray = world.spawn(Mesh3d(mesh)).id();

        let found = world
            .run_system_once(
                move |children: Query<&Children>, mesh_query: Query<(), With<Mesh3d>>| {
                    collect_mesh_descendants(root, &children, &mesh_query)
                },
            )
            .unwrap();

        assert_eq!(found.len(), 2);
        assert!(found.contains(&body));
        assert!(found.contains(&wheel));
        assert!(!found.contains(&wheel_node));
        assert!(!found.contains(&stray));
    }

    #[test]
    fn empty_scene_has_no_meshes() {
        let mut world = World::new();
        let root = world.spawn_empty().id();
        let found = world
            .run_system_once(
                move |children: Query<&Children>, mesh_query: Query<(), With<Mesh3d>>| {
                    collect_mesh_descendants(root, &children, &mesh_query)
                },
            )
            .unwrap();
        assert!(found.is_empty());
    }
}
