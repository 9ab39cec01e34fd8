use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use constants::controls::{PIXELS_PER_WHEEL_LINE, POLAR_EPSILON};
use std::f32::consts::{PI, TAU};

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::viewer_camera::ViewerCamera;

/// Base zoom factor per wheel step, raised to `zoom_speed`.
const ZOOM_BASE: f32 = 0.95;

/// Damped orbit around `target`. Input accumulates deltas; `update` applies
/// them and places the camera, once per frame.
#[derive(Component, Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending azimuth (x) and polar (y) change in radians.
    spherical_delta: Vec2,
    pan_offset: Vec3,
    scale: f32,
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            spherical_delta: Vec2::ZERO,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn from_config(config: &ViewerConfig) -> Self {
        let controls = &config.controls;
        Self {
            enable_damping: controls.enable_damping,
            damping_factor: controls.damping_factor,
            rotate_speed: controls.rotate_speed,
            zoom_speed: controls.zoom_speed,
            pan_speed: controls.pan_speed,
            min_distance: controls.min_distance,
            max_distance: config.max_distance(),
            ..Self::new(config.camera.look_at())
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.x -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.y -= angle;
    }

    /// Drag-to-rotate: a drag across the full viewport height is one turn.
    pub fn rotate_by_drag(&mut self, delta_px: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.rotate_left(TAU * delta_px.x / viewport_height * self.rotate_speed);
        self.rotate_up(TAU * delta_px.y / viewport_height * self.rotate_speed);
    }

    /// Screen-space pan. The point under the cursor at target depth follows the cursor.
    pub fn pan_by_drag(
        &mut self,
        delta_px: Vec2,
        viewport_height: f32,
        fov: f32,
        camera_transform: &Transform,
    ) {
        if viewport_height <= 0.0 {
            return;
        }
        let target_distance =
            (camera_transform.translation - self.target).length() * (fov * 0.5).tan();
        let scale = 2.0 * target_distance / viewport_height * self.pan_speed;

        let right = camera_transform.right().as_vec3();
        let up = camera_transform.up().as_vec3();
        self.pan_offset += -right * delta_px.x * scale + up * delta_px.y * scale;
    }

    /// Positive steps zoom in.
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= ZOOM_BASE.powf(self.zoom_speed * steps);
    }

    /// True while damped motion is still being applied.
    pub fn is_moving(&self) -> bool {
        self.spherical_delta.length_squared() > 1e-12 || self.pan_offset.length_squared() > 1e-12
    }

    /// Apply pending motion to the camera and aim it at the target.
    pub fn update(&mut self, transform: &mut Transform) {
        let mut offset = transform.translation - self.target;
        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let radius = offset.length();
        if radius > 0.0 {
            let (theta, phi) = spherical_angles(offset, radius);
            let theta = theta + self.spherical_delta.x * factor;
            let phi = (phi + self.spherical_delta.y * factor)
                .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
            let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
            offset = from_spherical(radius, theta, phi);
        }

        self.target += self.pan_offset * factor;
        transform.translation = self.target + offset;
        if offset != Vec3::ZERO {
            transform.look_at(self.target, Vec3::Y);
        }

        if self.enable_damping {
            self.spherical_delta *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Vec2::ZERO;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
    }
}

/// Azimuth around +Y measured from +Z, and polar angle from +Y.
fn spherical_angles(offset: Vec3, radius: f32) -> (f32, f32) {
    let theta = offset.x.atan2(offset.z);
    let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
    (theta, phi)
}

fn from_spherical(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi = phi.sin();
    Vec3::new(
        radius * sin_phi * theta.sin(),
        radius * phi.cos(),
        radius * sin_phi * theta.cos(),
    )
}

/// Attach controls to the camera, aimed at the configured look-at point.
pub fn configure_orbit_controls(
    mut commands: Commands,
    config: Res<ViewerConfig>,
    camera_query: Query<Entity, With<ViewerCamera>>,
) {
    let Ok(camera) = camera_query.single() else {
        warn!("No viewer camera to attach orbit controls to");
        return;
    };
    let controls = OrbitControls::from_config(&config);
    debug!(
        "Orbit controls: damping {} (factor {})",
        controls.enable_damping, controls.damping_factor
    );
    commands.entity(camera).insert(controls);
}

// Left drag rotates, right drag pans, wheel zooms
pub fn orbit_controls_input(
    mut camera_query: Query<(&mut OrbitControls, &Transform, &Projection), With<ViewerCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
) {
    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();

    let mut scroll_accum = 0.0;
    for ev in scroll_events.read() {
        scroll_accum += match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / PIXELS_PER_WHEEL_LINE,
        };
    }

    let Ok((mut controls, transform, projection)) = camera_query.single_mut() else {
        return;
    };
    let Ok(window) = windows.single() else {
        return;
    };
    let viewport_height = window.height();

    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            controls.rotate_by_drag(mouse_delta, viewport_height);
        } else if mouse_button.any_pressed([MouseButton::Right, MouseButton::Middle]) {
            let fov = match projection {
                Projection::Perspective(perspective) => perspective.fov,
                _ => std::f32::consts::FRAC_PI_4,
            };
            controls.pan_by_drag(mouse_delta, viewport_height, fov, transform);
        }
    }

    if scroll_accum.abs() > f32::EPSILON {
        controls.dolly(scroll_accum);
    }
}

pub fn update_orbit_controls(mut camera_query: Query<(&mut Transform, &mut OrbitControls)>) {
    for (mut transform, mut controls) in &mut camera_query {
        controls.update(&mut transform);
    }
}
