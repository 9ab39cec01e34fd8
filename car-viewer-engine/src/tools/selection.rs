use bevy::picking::mesh_picking::ray_cast::{MeshRayCast, MeshRayCastSettings, RayCastVisibility};
use bevy::prelude::*;
use bevy::render::camera::CameraProjection;
use bevy::window::PrimaryWindow;

use crate::engine::assets::viewer_config::{FocusAnchor, ViewerConfig};
use crate::engine::camera::focus::FocusRequest;
use crate::engine::camera::viewer_camera::ViewerCamera;
use crate::engine::scene::clickable::{ClickableSurfaces, surface_name};

/// Pointer position in normalized device coordinates, both axes in [-1, 1]
/// with +y up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub ndc: Vec2,
}

impl PointerSample {
    /// Normalize a cursor position against the viewport size at the moment of
    /// the click. No sample for an empty viewport.
    pub fn from_cursor(cursor: Vec2, viewport: Vec2) -> Option<Self> {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return None;
        }
        Some(Self {
            ndc: Vec2::new(
                (cursor.x / viewport.x) * 2.0 - 1.0,
                -(cursor.y / viewport.y) * 2.0 + 1.0,
            ),
        })
    }

    /// World-space ray from the near plane through this sample. Projections
    /// are reverse-Z, so the near plane is at depth 1 and depth approaches 0
    /// towards infinity.
    pub fn ray(&self, world_from_view: Mat4, clip_from_view: Mat4) -> Option<Ray3d> {
        let view_from_clip = clip_from_view.inverse();
        let near = view_from_clip.project_point3(self.ndc.extend(1.0));
        let far = view_from_clip.project_point3(self.ndc.extend(f32::EPSILON));

        let origin = world_from_view.transform_point3(near);
        let far = world_from_view.transform_point3(far);
        let direction = Dir3::new(far - origin).ok()?;
        Some(Ray3d::new(origin, direction))
    }
}

/// One ray-surface intersection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub entity: Entity,
    pub distance: f32,
    pub point: Vec3,
}

/// Closest hit along the ray. Hits behind the origin or with invalid
/// distances are ignored.
pub fn nearest_hit(hits: impl IntoIterator<Item = SurfaceHit>) -> Option<SurfaceHit> {
    hits.into_iter()
        .filter(|hit| hit.distance.is_finite() && hit.distance >= 0.0)
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

pub fn focus_target(anchor: FocusAnchor, hit: &SurfaceHit, surface_origin: Vec3) -> Vec3 {
    match anchor {
        FocusAnchor::SurfaceOrigin => surface_origin,
        FocusAnchor::HitPoint => hit.point,
    }
}

/// Tells clicks from orbit drags by how far the cursor travelled while held.
#[derive(Resource, Default, Debug)]
pub struct ClickTracker {
    last_position: Option<Vec2>,
    travel: f32,
}

impl ClickTracker {
    pub fn press(&mut self, position: Vec2) {
        self.last_position = Some(position);
        self.travel = 0.0;
    }

    pub fn track(&mut self, position: Vec2) {
        if let Some(last) = self.last_position {
            self.travel += last.distance(position);
            self.last_position = Some(position);
        }
    }

    /// True when the press-release pair counts as a click.
    pub fn release(&mut self, position: Vec2, threshold: f32) -> bool {
        if self.last_position.is_none() {
            return false;
        }
        self.track(position);
        self.last_position = None;
        self.travel < threshold
    }
}

// Resolve left clicks against the clickable surfaces and request focus on a hit
pub fn resolve_pointer_selection(
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut click_tracker: ResMut<ClickTracker>,
    windows: Query<&Window, With<PrimaryWindow>>,
    camera_query: Query<(&GlobalTransform, &Projection), With<ViewerCamera>>,
    surfaces: Res<ClickableSurfaces>,
    surface_query: Query<(&GlobalTransform, Option<&Name>)>,
    config: Res<ViewerConfig>,
    mut ray_cast: MeshRayCast,
    mut focus_requests: EventWriter<FocusRequest>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    // A quick tap can press and release within one frame; it still counts.
    if mouse_button.just_pressed(MouseButton::Left) {
        click_tracker.press(cursor);
    } else if mouse_button.pressed(MouseButton::Left) {
        click_tracker.track(cursor);
        return;
    }
    if !mouse_button.just_released(MouseButton::Left)
        || !click_tracker.release(cursor, config.focus.click_drag_threshold_px)
    {
        return;
    }

    let viewport = Vec2::new(window.width(), window.height());
    let Some(sample) = PointerSample::from_cursor(cursor, viewport) else {
        return;
    };
    let Ok((camera_transform, projection)) = camera_query.single() else {
        return;
    };
    let Some(ray) = sample.ray(
        camera_transform.compute_matrix(),
        projection.get_clip_from_view(),
    ) else {
        return;
    };

    if surfaces.is_empty() {
        return;
    }
    let filter = |entity: Entity| surfaces.contains(entity);
    let settings = MeshRayCastSettings::default()
        .with_filter(&filter)
        .with_visibility(RayCastVisibility::Visible)
        .never_early_exit();

    let hits = ray_cast
        .cast_ray(ray, &settings)
        .iter()
        .map(|(entity, hit)| SurfaceHit {
            entity: *entity,
            distance: hit.distance,
            point: hit.point,
        });
    let Some(hit) = nearest_hit(hits) else {
        return;
    };

    let Ok((surface_transform, name)) = surface_query.get(hit.entity) else {
        return;
    };
    info!("Clicked on: {}", surface_name(name));

    focus_requests.write(FocusRequest {
        surface: hit.entity,
        target: focus_target(config.focus.anchor, &hit, surface_transform.translation()),
    });
}
