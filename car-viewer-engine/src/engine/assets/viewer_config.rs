use bevy::prelude::*;
use constants::{asset_path, camera, controls, environment, focus, paint};
use serde::{Deserialize, Serialize};

use crate::engine::error::ViewerError;

/// Initial camera placement and projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    pub position: [f32; 3],
    pub look_at: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            position: camera::CAMERA_POSITION.to_array(),
            look_at: camera::CAMERA_LOOK_AT.to_array(),
            fov_degrees: camera::CAMERA_FOV_DEGREES,
            near: camera::CAMERA_NEAR,
            far: camera::CAMERA_FAR,
        }
    }
}

impl CameraSettings {
    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn look_at(&self) -> Vec3 {
        Vec3::from_array(self.look_at)
    }
}

/// Orbit control tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    /// `None` leaves zoom-out unbounded.
    pub max_distance: Option<f32>,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enable_damping: controls::ENABLE_DAMPING,
            damping_factor: controls::DAMPING_FACTOR,
            rotate_speed: controls::ROTATE_SPEED,
            zoom_speed: controls::ZOOM_SPEED,
            pan_speed: controls::PAN_SPEED,
            min_distance: controls::MIN_DISTANCE,
            max_distance: None,
        }
    }
}

/// Which point of a clicked surface the camera focuses on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FocusAnchor {
    /// World-space origin of the clicked mesh.
    #[default]
    SurfaceOrigin,
    /// Exact point where the pointer ray met the mesh.
    HitPoint,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FocusSettings {
    pub duration_secs: f32,
    pub anchor: FocusAnchor,
    pub indicator_radius: f32,
    pub click_drag_threshold_px: f32,
}

impl Default for FocusSettings {
    fn default() -> Self {
        Self {
            duration_secs: focus::FOCUS_DURATION_SECS,
            anchor: FocusAnchor::default(),
            indicator_radius: focus::INDICATOR_RADIUS,
            click_drag_threshold_px: focus::CLICK_DRAG_THRESHOLD_PX,
        }
    }
}

/// Metallic clear-coated paint applied to every mesh of the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaintSettings {
    pub color: [f32; 3],
    pub metallic: f32,
    pub roughness: f32,
    pub clearcoat: f32,
    pub clearcoat_roughness: f32,
    pub flake_repeat: f32,
    pub flake_normal_scale: f32,
    pub flake_texture_size: u32,
    pub flake_seed: u64,
}

impl Default for PaintSettings {
    fn default() -> Self {
        Self {
            color: paint::PAINT_COLOR,
            metallic: paint::PAINT_METALLIC,
            roughness: paint::PAINT_ROUGHNESS,
            clearcoat: paint::PAINT_CLEARCOAT,
            clearcoat_roughness: paint::PAINT_CLEARCOAT_ROUGHNESS,
            flake_repeat: paint::FLAKE_REPEAT,
            flake_normal_scale: paint::FLAKE_NORMAL_SCALE,
            flake_texture_size: paint::FLAKE_TEXTURE_SIZE,
            flake_seed: paint::FLAKE_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentSettings {
    /// Base level of the specular cube; smaller mips hold blurrier reflections.
    pub face_size: u32,
    pub diffuse_face_size: u32,
    pub intensity: f32,
}

impl Default for EnvironmentSettings {
    fn default() -> Self {
        Self {
            face_size: environment::CUBE_FACE_SIZE,
            diffuse_face_size: environment::DIFFUSE_FACE_SIZE,
            intensity: environment::ENVIRONMENT_INTENSITY,
        }
    }
}

/// Viewer configuration as a Bevy asset loaded from `viewer.json`.
/// Missing fields fall back to the shared defaults, so `{}` is a valid file.
#[derive(Asset, TypePath, Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub model_path: String,
    pub environment_path: String,
    pub camera: CameraSettings,
    pub controls: ControlSettings,
    pub focus: FocusSettings,
    pub paint: PaintSettings,
    pub environment: EnvironmentSettings,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            model_path: asset_path::MODEL_PATH.to_string(),
            environment_path: asset_path::ENVIRONMENT_PATH.to_string(),
            camera: CameraSettings::default(),
            controls: ControlSettings::default(),
            focus: FocusSettings::default(),
            paint: PaintSettings::default(),
            environment: EnvironmentSettings::default(),
        }
    }
}

impl ViewerConfig {
    /// Reject values the camera, controls or bakers cannot work with.
    pub fn validate(&self) -> Result<(), ViewerError> {
        if self.model_path.is_empty() {
            return Err(ViewerError::InvalidConfig("model_path is empty".into()));
        }
        if self.environment_path.is_empty() {
            return Err(ViewerError::InvalidConfig("environment_path is empty".into()));
        }
        if !(self.camera.fov_degrees > 0.0 && self.camera.fov_degrees < 180.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                self.camera.fov_degrees
            )));
        }
        if !(self.camera.near > 0.0 && self.camera.far > self.camera.near) {
            return Err(ViewerError::InvalidConfig(
                "camera.near must be positive and below camera.far".into(),
            ));
        }
        if !(self.controls.damping_factor > 0.0 && self.controls.damping_factor <= 1.0) {
            return Err(ViewerError::InvalidConfig(format!(
                "controls.damping_factor must be in (0, 1], got {}",
                self.controls.damping_factor
            )));
        }
        if let Some(max) = self.controls.max_distance {
            if max < self.controls.min_distance {
                return Err(ViewerError::InvalidConfig(
                    "controls.max_distance is below controls.min_distance".into(),
                ));
            }
        }
        if self.focus.duration_secs < 0.0 || !self.focus.duration_secs.is_finite() {
            return Err(ViewerError::InvalidConfig(format!(
                "focus.duration_secs must be a non-negative number, got {}",
                self.focus.duration_secs
            )));
        }
        if self.environment.face_size == 0
            || self.environment.diffuse_face_size == 0
            || self.paint.flake_texture_size == 0
        {
            return Err(ViewerError::InvalidConfig(
                "texture sizes must be non-zero".into(),
            ));
        }
        Ok(())
    }

    pub fn max_distance(&self) -> f32 {
        self.controls.max_distance.unwrap_or(controls::MAX_DISTANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config: ViewerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.model_path, asset_path::MODEL_PATH);
        assert_eq!(config.environment_path, asset_path::ENVIRONMENT_PATH);
        assert_eq!(config.camera.position(), Vec3::new(0.0, 2.0, 10.0));
        assert_eq!(config.focus.duration_secs, 1.0);
        assert_eq!(config.focus.anchor, FocusAnchor::SurfaceOrigin);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let json = r#"{
            "controls": { "damping_factor": 0.2 },
            "focus": { "anchor": "hit_point" }
        }"#;
        let config: ViewerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.controls.damping_factor, 0.2);
        assert!(config.controls.enable_damping);
        assert_eq!(config.focus.anchor, FocusAnchor::HitPoint);
        assert_eq!(config.focus.indicator_radius, focus::INDICATOR_RADIUS);
    }

    #[test]
    fn validation_rejects_bad_values() {
        let mut config = ViewerConfig::default();
        config.controls.damping_factor = 0.0;
        assert!(matches!(config.validate(), Err(ViewerError::InvalidConfig(_))));

        let mut config = ViewerConfig::default();
        config.camera.near = 10.0;
        config.camera.far = 5.0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.environment.face_size = 0;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.environment.diffuse_face_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unbounded_zoom_by_default() {
        let config = ViewerConfig::default();
        assert!(config.max_distance().is_infinite());
    }
}
