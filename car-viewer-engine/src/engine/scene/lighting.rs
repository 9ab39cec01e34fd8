use bevy::prelude::*;
use constants::lighting::{
    AMBIENT_LIGHT_BRIGHTNESS, AMBIENT_LIGHT_COLOR, POINT_LIGHT_COLOR, POINT_LIGHT_INTENSITY,
    POINT_LIGHT_POSITION, POINT_LIGHT_RANGE,
};

/// Point light high above the car plus a flat white ambient term.
pub fn spawn_lighting(mut commands: Commands) {
    commands.spawn((
        PointLight {
            color: POINT_LIGHT_COLOR,
            intensity: POINT_LIGHT_INTENSITY,
            range: POINT_LIGHT_RANGE,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(POINT_LIGHT_POSITION),
    ));

    commands.insert_resource(AmbientLight {
        color: AMBIENT_LIGHT_COLOR,
        brightness: AMBIENT_LIGHT_BRIGHTNESS,
        affects_lightmapped_meshes: true,
    });

    debug!("Lighting spawned");
}
