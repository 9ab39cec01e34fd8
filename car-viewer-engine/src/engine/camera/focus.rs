use bevy::prelude::*;
use constants::focus::DEGENERATE_DISTANCE;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::orbit_controls::OrbitControls;
use crate::engine::camera::tween::Tween;
use crate::engine::camera::viewer_camera::ViewerCamera;

/// Ask the camera to focus on a world position belonging to `surface`.
#[derive(Event, Debug, Clone)]
pub struct FocusRequest {
    pub surface: Entity,
    pub target: Vec3,
}

/// Where the camera and its look-target should end up.
/// `camera_to` is `None` when the camera sits on its target and has no
/// direction to preserve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusPlan {
    pub camera_to: Option<Vec3>,
    pub target_to: Vec3,
}

/// Keep the viewing direction and distance, shifted so the camera looks at `focus_point`.
pub fn plan_focus(camera: Vec3, target: Vec3, focus_point: Vec3) -> FocusPlan {
    let offset = camera - target;
    let distance = offset.length();
    let camera_to = if distance < DEGENERATE_DISTANCE {
        None
    } else {
        let direction = offset / distance;
        Some(focus_point + direction * distance)
    };

    FocusPlan {
        camera_to,
        target_to: focus_point,
    }
}

/// In-flight camera move. Replaced wholesale when a new request arrives.
#[derive(Component, Debug, Clone)]
pub struct FocusTransition {
    camera: Option<Tween>,
    target: Tween,
    elapsed: f32,
}

impl FocusTransition {
    pub fn new(camera_from: Vec3, target_from: Vec3, plan: FocusPlan, duration: f32) -> Self {
        Self {
            camera: plan
                .camera_to
                .map(|camera_to| Tween::new(camera_from, camera_to, duration)),
            target: Tween::new(target_from, plan.target_to, duration),
            elapsed: 0.0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.target.is_finished(self.elapsed)
    }
}

// Start a transition for the newest request this frame, cancelling any in flight
pub fn begin_focus_transition(
    mut focus_requests: EventReader<FocusRequest>,
    config: Res<ViewerConfig>,
    camera_query: Query<(Entity, &Transform, &OrbitControls), With<ViewerCamera>>,
    mut commands: Commands,
) {
    let Some(request) = focus_requests.read().last() else {
        return;
    };
    let Ok((camera, transform, controls)) = camera_query.single() else {
        return;
    };

    let plan = plan_focus(transform.translation, controls.target, request.target);
    if plan.camera_to.is_none() {
        debug!("Camera sits on its target, only the target will move");
    }

    commands.entity(camera).insert(FocusTransition::new(
        transform.translation,
        controls.target,
        plan,
        config.focus.duration_secs,
    ));
}

// Step the tweens; orbit controls run afterwards and aim the camera
pub fn advance_focus_transition(
    time: Res<Time>,
    mut camera_query: Query<(
        Entity,
        &mut Transform,
        &mut OrbitControls,
        &mut FocusTransition,
    )>,
    mut commands: Commands,
) {
    for (entity, mut transform, mut controls, mut transition) in &mut camera_query {
        transition.elapsed += time.delta_secs();
        let elapsed = transition.elapsed;

        if let Some(camera_tween) = &transition.camera {
            transform.translation = camera_tween.sample(elapsed);
        }
        controls.target = transition.target.sample(elapsed);

        if transition.is_finished() {
            commands.entity(entity).remove::<FocusTransition>();
            debug!("Focus transition finished at {}", controls.target);
        }
    }
}
