use bevy::prelude::*;

/// Lifecycle of one asynchronous asset load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LoadStatus {
    #[default]
    NotStarted,
    Pending,
    Loaded,
    Failed,
}

#[derive(Resource, Default, Debug)]
pub struct LoadingProgress {
    pub config_resolved: bool,
    pub environment: LoadStatus,
    pub model: LoadStatus,
    pub environment_installed: bool,
    pub surfaces_registered: usize,
}
