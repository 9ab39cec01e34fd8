use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;

use crate::engine::loading::model_loader::ModelReady;
use crate::engine::loading::progress::LoadingProgress;
use crate::engine::scene::car_paint::CarPaint;

/// Mesh entities of the loaded model that the pointer can select.
/// Filled once when the model becomes ready; entries are never removed.
#[derive(Resource, Default, Debug)]
pub struct ClickableSurfaces(pub Vec<Entity>);

impl ClickableSurfaces {
    pub fn contains(&self, entity: Entity) -> bool {
        self.0.contains(&entity)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }
}

/// Display name for a surface, matching what the page shows for unnamed parts.
pub fn surface_name(name: Option<&Name>) -> String {
    name.map(|n| n.as_str().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "Unnamed Mesh".to_string())
}

// Paint every model mesh and make it clickable
pub fn register_clickable_surfaces(
    mut ready_events: EventReader<ModelReady>,
    mut surfaces: ResMut<ClickableSurfaces>,
    mut loading_progress: ResMut<LoadingProgress>,
    mut meshes: ResMut<Assets<Mesh>>,
    paint: Option<Res<CarPaint>>,
    mesh_query: Query<(&Mesh3d, Option<&Name>)>,
    mut commands: Commands,
) {
    for ready in ready_events.read() {
        for &entity in &ready.meshes {
            let Ok((mesh_handle, name)) = mesh_query.get(entity) else {
                continue;
            };

            if let Some(paint) = paint.as_deref() {
                let flaked = meshes
                    .get_mut(&mesh_handle.0)
                    .is_some_and(|mesh| ensure_tangents(mesh, name));
                let material = if flaked {
                    paint.material.clone()
                } else {
                    paint.plain.clone()
                };
                commands.entity(entity).insert(MeshMaterial3d(material));
            }

            if !surfaces.contains(entity) {
                surfaces.0.push(entity);
            }
        }

        loading_progress.surfaces_registered = surfaces.len();
        info!(
            "✓ Registered {} clickable surfaces under {:?}",
            surfaces.len(),
            ready.root
        );
    }
}

/// Tangents are needed for the flake normal map. Returns false when the mesh
/// cannot provide them.
fn ensure_tangents(mesh: &mut Mesh, name: Option<&Name>) -> bool {
    if mesh.contains_attribute(Mesh::ATTRIBUTE_TANGENT) {
        return true;
    }
    if !has_uvs(mesh) {
        debug!("{} has no UVs, painting without flakes", surface_name(name));
        return false;
    }
    match mesh.generate_tangents() {
        Ok(()) => true,
        Err(err) => {
            warn!(
                "Could not generate tangents for {}: {}",
                surface_name(name),
                err
            );
            false
        }
    }
}

fn has_uvs(mesh: &Mesh) -> bool {
    matches!(
        mesh.attribute(Mesh::ATTRIBUTE_UV_0),
        Some(VertexAttributeValues::Float32x2(_))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::asset::{RenderAssetUsages, weak_handle};
    use bevy::render::mesh::PrimitiveTopology;

    const PLAIN_PAINT: Handle<StandardMaterial> =
        weak_handle!("5b1f3c0e-8d4a-4e6f-9a2b-7c3d1e0f4a96");

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<ModelReady>()
            .init_resource::<ClickableSurfaces>()
            .init_resource::<LoadingProgress>()
            .insert_resource(Assets::<Mesh>::default())
            .insert_resource(CarPaint {
                material: Handle::default(),
                plain: PLAIN_PAINT,
            })
            .add_systems(Update, register_clickable_surfaces);
        app
    }

    #[test]
    fn every_mesh_of_the_model_becomes_clickable() {
        let mut app = test_app();
        let cube = app
            .world_mut()
            .resource_mut::<Assets<Mesh>>()
            .add(Cuboid::default());

        let root = app.world_mut().spawn_empty().id();
        let meshes: Vec<Entity> = (0..3)
            .map(|i| {
                app.world_mut()
                    .spawn((Mesh3d(cube.clone()), Name::new(format!("part_{i}"))))
                    .id()
            })
            .collect();

        app.world_mut().send_event(ModelReady {
            root,
            meshes: meshes.clone(),
        });
        app.update();

        let surfaces = app.world().resource::<ClickableSurfaces>();
        assert_eq!(surfaces.0, meshes);
        assert_eq!(
            app.world().resource::<LoadingProgress>().surfaces_registered,
            3
        );

        // Cuboids carry UVs, so they get the flaked paint and tangents.
        for entity in meshes {
            let material = app.world().get::<MeshMaterial3d<StandardMaterial>>(entity);
            assert_eq!(material.map(|m| m.0.clone()), Some(Handle::default()));
        }
        let mesh_assets = app.world().resource::<Assets<Mesh>>();
        let mesh = mesh_assets.get(&cube).unwrap();
        assert!(mesh.contains_attribute(Mesh::ATTRIBUTE_TANGENT));
    }

    #[test]
    fn meshes_without_uvs_get_plain_paint() {
        let mut app = test_app();
        let mut triangle = Mesh::new(PrimitiveTopology::TriangleList, RenderAssetUsages::default());
        triangle.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        );
        triangle.insert_attribute(Mesh::ATTRIBUTE_NORMAL, vec![[0.0, 0.0, 1.0]; 3]);
        let handle = app.world_mut().resource_mut::<Assets<Mesh>>().add(triangle);

        let root = app.world_mut().spawn_empty().id();
        let badge = app
            .world_mut()
            .spawn((Mesh3d(handle.clone()), Name::new("badge")))
            .id();
        app.world_mut().send_event(ModelReady {
            root,
            meshes: vec![badge],
        });
        app.update();

        let material = app.world().get::<MeshMaterial3d<StandardMaterial>>(badge);
        assert_eq!(material.map(|m| m.0.clone()), Some(PLAIN_PAINT));
        assert!(app.world().resource::<ClickableSurfaces>().contains(badge));

        let mesh_assets = app.world().resource::<Assets<Mesh>>();
        assert!(!mesh_assets.get(&handle).unwrap().contains_attribute(Mesh::ATTRIBUTE_TANGENT));
    }

    #[test]
    fn nothing_registers_before_the_model_is_ready() {
        let mut app = test_app();
        app.update();
        assert!(app.world().resource::<ClickableSurfaces>().is_empty());
    }

    #[test]
    fn unnamed_surfaces_get_a_placeholder_name() {
        assert_eq!(surface_name(None), "Unnamed Mesh");
        assert_eq!(surface_name(Some(&Name::new(""))), "Unnamed Mesh");
        assert_eq!(surface_name(Some(&Name::new("door_fl"))), "door_fl");
    }
}
