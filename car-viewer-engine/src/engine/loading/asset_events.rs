use bevy::asset::LoadState;
use bevy::prelude::*;
use serde::Serialize;

use crate::engine::assets::car_assets::CarAssets;
use crate::engine::error::ViewerError;
use crate::engine::loading::progress::{LoadStatus, LoadingProgress};

/// The two independent asset loads started by the bootstrap sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Model,
    Environment,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetKind::Model => write!(f, "model"),
            AssetKind::Environment => write!(f, "environment map"),
        }
    }
}

/// Completion of an asset load. Written exactly once per load.
#[derive(Event, Debug, Clone)]
pub struct AssetLoadEvent {
    pub kind: AssetKind,
    pub outcome: Result<(), ViewerError>,
}

/// Map a load state to a settled outcome, or `None` while still in flight.
pub fn settled_outcome(state: Option<&LoadState>) -> Option<Result<(), String>> {
    match state? {
        LoadState::Loaded => Some(Ok(())),
        LoadState::Failed(err) => Some(Err(err.to_string())),
        _ => None,
    }
}

// Poll both loads. The environment only reports success once its cubemap
// is installed, so a decoded image just moves it to Loaded here.
pub fn watch_asset_loads(
    mut loading_progress: ResMut<LoadingProgress>,
    assets: Res<CarAssets>,
    asset_server: Res<AssetServer>,
    mut load_events: EventWriter<AssetLoadEvent>,
) {
    if loading_progress.model == LoadStatus::Pending {
        let state = asset_server.get_load_state(&assets.model_file);
        if let Some(outcome) = settled_outcome(state.as_ref()) {
            loading_progress.model = report(
                AssetKind::Model,
                assets.path(AssetKind::Model),
                outcome,
                &mut load_events,
            );
        }
    }

    if loading_progress.environment == LoadStatus::Pending {
        let state = asset_server.get_load_state(&assets.environment);
        match settled_outcome(state.as_ref()) {
            Some(Ok(())) => {
                debug!("Environment image decoded, baking cubemap");
                loading_progress.environment = LoadStatus::Loaded;
            }
            Some(Err(reason)) => {
                loading_progress.environment = report(
                    AssetKind::Environment,
                    assets.path(AssetKind::Environment),
                    Err(reason),
                    &mut load_events,
                );
            }
            None => {}
        }
    }
}

/// Log a settled load and announce it. Returns the resulting status.
pub fn report(
    kind: AssetKind,
    path: &str,
    outcome: Result<(), String>,
    load_events: &mut EventWriter<AssetLoadEvent>,
) -> LoadStatus {
    match outcome {
        Ok(()) => {
            info!("✓ {} loaded from {}", kind, path);
            load_events.write(AssetLoadEvent {
                kind,
                outcome: Ok(()),
            });
            LoadStatus::Loaded
        }
        Err(reason) => {
            let error = ViewerError::AssetLoad {
                kind,
                path: path.to_string(),
                reason,
            };
            error!("{}", error);
            load_events.write(AssetLoadEvent {
                kind,
                outcome: Err(error),
            });
            LoadStatus::Failed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_flight_states_are_not_settled() {
        assert!(settled_outcome(None).is_none());
        assert!(settled_outcome(Some(&LoadState::NotLoaded)).is_none());
        assert!(settled_outcome(Some(&LoadState::Loading)).is_none());
    }

    #[test]
    fn loaded_state_settles_ok() {
        assert_eq!(settled_outcome(Some(&LoadState::Loaded)), Some(Ok(())));
    }

    #[test]
    fn load_error_names_kind_and_path() {
        let error = ViewerError::AssetLoad {
            kind: AssetKind::Environment,
            path: "hdr/missing.hdr".into(),
            reason: "not found".into(),
        };
        let message = error.to_string();
        assert!(message.contains("environment map"));
        assert!(message.contains("hdr/missing.hdr"));
    }
}
