use bevy::prelude::*;
use bevy::render::camera::{PerspectiveProjection, Projection};

use crate::engine::assets::viewer_config::ViewerConfig;

/// The single camera looking at the car.
#[derive(Component)]
pub struct ViewerCamera;

pub fn viewer_projection(config: &ViewerConfig) -> Projection {
    Projection::Perspective(PerspectiveProjection {
        fov: config.camera.fov_degrees.to_radians(),
        near: config.camera.near,
        far: config.camera.far,
        ..default()
    })
}

pub fn spawn_viewer_camera(mut commands: Commands, config: Res<ViewerConfig>) {
    let position = config.camera.position();
    let look_at = config.camera.look_at();

    commands.spawn((
        Camera3d::default(),
        viewer_projection(&config),
        Transform::from_translation(position).looking_at(look_at, Vec3::Y),
        Name::new("ViewerCamera"),
        ViewerCamera,
    ));

    debug!("Viewer camera spawned at {} looking at {}", position, look_at);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_uses_configured_frustum() {
        let Projection::Perspective(perspective) = viewer_projection(&ViewerConfig::default())
        else {
            panic!("expected a perspective projection");
        };
        assert!((perspective.fov - 50f32.to_radians()).abs() < 1e-6);
        assert_eq!(perspective.near, 1.0);
        assert_eq!(perspective.far, 1000.0);
    }
}
