use bevy::asset::LoadState;
use bevy::prelude::*;
use constants::asset_path::VIEWER_CONFIG_PATH;

use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::LoadingProgress;

#[derive(Resource, Default)]
pub struct ConfigLoader {
    handle: Option<Handle<ViewerConfig>>,
}

// Start the loading process
pub fn start_loading(mut config_loader: ResMut<ConfigLoader>, asset_server: Res<AssetServer>) {
    info!("Loading viewer config from {}", VIEWER_CONFIG_PATH);
    config_loader.handle = Some(asset_server.load(VIEWER_CONFIG_PATH));
}

/// Pick the configuration to run with. A missing, malformed or invalid file
/// never stops the viewer; it runs on defaults instead.
pub fn resolve_config(loaded: Result<&ViewerConfig, String>) -> ViewerConfig {
    match loaded {
        Ok(config) => match config.validate() {
            Ok(()) => config.clone(),
            Err(err) => {
                warn!("{}; using defaults", err);
                ViewerConfig::default()
            }
        },
        Err(reason) => {
            warn!(
                "Viewer config '{}' unavailable ({}); using defaults",
                VIEWER_CONFIG_PATH, reason
            );
            ViewerConfig::default()
        }
    }
}

// Insert the resolved config and hand over to the bootstrap sequence
pub fn resolve_config_system(
    mut loading_progress: ResMut<LoadingProgress>,
    config_loader: Res<ConfigLoader>,
    asset_server: Res<AssetServer>,
    configs: Res<Assets<ViewerConfig>>,
    mut commands: Commands,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loading_progress.config_resolved {
        return;
    }
    let Some(handle) = config_loader.handle.as_ref() else {
        return;
    };

    let config = match asset_server.get_load_state(handle) {
        Some(LoadState::Loaded) => {
            let Some(config) = configs.get(handle) else {
                return;
            };
            resolve_config(Ok(config))
        }
        Some(LoadState::Failed(err)) => resolve_config(Err(err.to_string())),
        _ => return,
    };

    debug!("Viewer config: {:?}", config);
    commands.insert_resource(config);
    loading_progress.config_resolved = true;
    info!("✓ Viewer config resolved");
    next_state.set(AppState::Bootstrapping);
}
