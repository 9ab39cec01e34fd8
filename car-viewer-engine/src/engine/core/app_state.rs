use bevy::prelude::*;

/// Viewer lifecycle. Asset loads keep running in the background once
/// `Running` is entered; the render loop never waits for them.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    /// Waiting for `viewer.json` to load or fail.
    #[default]
    Configuring,
    /// One-shot scene bootstrap sequence.
    Bootstrapping,
    Running,
}

#[derive(Component)]
pub struct FpsText;

// Final transition to running state
pub fn transition_to_running(mut next_state: ResMut<NextState<AppState>>) {
    info!("→ Scene bootstrapped, transitioning to Running state");
    next_state.set(AppState::Running);
}
