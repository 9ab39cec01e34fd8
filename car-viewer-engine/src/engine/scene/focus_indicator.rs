use bevy::prelude::*;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::focus::FocusRequest;

/// Small red sphere marking the current focus target. At most one exists.
#[derive(Component)]
pub struct FocusIndicator;

/// Move the indicator to the latest focus target, spawning it on first use.
pub fn place_focus_indicator(
    mut focus_requests: EventReader<FocusRequest>,
    mut indicator_query: Query<&mut Transform, With<FocusIndicator>>,
    config: Res<ViewerConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut commands: Commands,
) {
    let Some(request) = focus_requests.read().last() else {
        return;
    };

    if let Ok(mut transform) = indicator_query.single_mut() {
        transform.translation = request.target;
        return;
    }

    commands.spawn((
        Mesh3d(meshes.add(Sphere::new(config.focus.indicator_radius))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: Color::srgb(1.0, 0.0, 0.0),
            unlit: true,
            ..default()
        })),
        Transform::from_translation(request.target),
        Name::new("FocusIndicator"),
        FocusIndicator,
    ));
    debug!("Focus indicator spawned at {}", request.target);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_event::<FocusRequest>()
            .insert_resource(ViewerConfig::default())
            .insert_resource(Assets::<Mesh>::default())
            .insert_resource(Assets::<StandardMaterial>::default())
            .add_systems(Update, place_focus_indicator);
        app
    }

    fn indicator_positions(app: &mut App) -> Vec<Vec3> {
        let mut query = app
            .world_mut()
            .query_filtered::<&Transform, With<FocusIndicator>>();
        query.iter(app.world()).map(|t| t.translation).collect()
    }

    #[test]
    fn indicator_is_spawned_once_then_moved() {
        let mut app = test_app();
        let surface = app.world_mut().spawn_empty().id();

        app.update();
        assert!(indicator_positions(&mut app).is_empty());

        app.world_mut().send_event(FocusRequest {
            surface,
            target: Vec3::new(2.0, 1.0, 1.0),
        });
        app.update();
        assert_eq!(indicator_positions(&mut app), vec![Vec3::new(2.0, 1.0, 1.0)]);

        app.world_mut().send_event(FocusRequest {
            surface,
            target: Vec3::new(-1.0, 0.5, 3.0),
        });
        app.update();
        assert_eq!(indicator_positions(&mut app), vec![Vec3::new(-1.0, 0.5, 3.0)]);
    }

    #[test]
    fn same_frame_requests_spawn_a_single_indicator() {
        let mut app = test_app();
        let surface = app.world_mut().spawn_empty().id();

        for x in 0..3 {
            app.world_mut().send_event(FocusRequest {
                surface,
                target: Vec3::new(x as f32, 0.0, 0.0),
            });
        }
        app.update();
        assert_eq!(indicator_positions(&mut app), vec![Vec3::new(2.0, 0.0, 0.0)]);
    }
}
