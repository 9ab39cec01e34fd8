use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;
use constants::logging::LOG_FILTER;
// Crate engine modules
use crate::engine::assets::car_assets::create_car_assets;
use crate::engine::assets::viewer_config::ViewerConfig;
use crate::engine::camera::{
    focus::{FocusRequest, advance_focus_transition, begin_focus_transition},
    orbit_controls::{configure_orbit_controls, orbit_controls_input, update_orbit_controls},
    viewer_camera::spawn_viewer_camera,
};
use crate::engine::core::app_state::{AppState, FpsText, transition_to_running};
use crate::engine::core::window_config::create_window_config;
use crate::engine::loading::{
    asset_events::{AssetLoadEvent, watch_asset_loads},
    config_loader::{ConfigLoader, resolve_config_system, start_loading},
    environment_loader::{begin_environment_load, install_environment_map},
    model_loader::{ModelReady, begin_model_load},
    progress::LoadingProgress,
};
use crate::engine::scene::{
    car_paint::create_car_paint,
    clickable::{ClickableSurfaces, register_clickable_surfaces},
    focus_indicator::place_focus_indicator,
    lighting::spawn_lighting,
};
use crate::engine::systems::fps_tracking::{fps_notification_system, fps_text_update_system};
use crate::engine::systems::frame::FrameSet;
// Crate tools modules
use crate::tools::selection::{ClickTracker, resolve_pointer_selection};
// Web RPC
use crate::rpc::web_rpc::WebRpcPlugin;

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers ViewerConfig as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<ViewerConfig>::new(&["json"]))
        .add_plugins(WebRpcPlugin);

    // Initialise resources early
    app.init_resource::<LoadingProgress>()
        .init_resource::<ConfigLoader>()
        .init_resource::<ClickableSurfaces>()
        .init_resource::<ClickTracker>()
        .add_event::<AssetLoadEvent>()
        .add_event::<ModelReady>()
        .add_event::<FocusRequest>()
        .insert_resource(create_car_assets());

    app.configure_sets(
        Update,
        (FrameSet::Input, FrameSet::Animate, FrameSet::Controls).chain(),
    );

    app.add_systems(Startup, (setup, start_loading).chain())
        .add_systems(
            Update,
            resolve_config_system.run_if(in_state(AppState::Configuring)),
        )
        // Bootstrap runs once, strictly in this order.
        .add_systems(
            OnEnter(AppState::Bootstrapping),
            (
                spawn_viewer_camera,
                begin_environment_load,
                spawn_lighting,
                configure_orbit_controls,
                create_car_paint,
                begin_model_load,
                transition_to_running,
            )
                .chain(),
        );

    // Load completion, ahead of the frame sets
    app.add_systems(
        Update,
        (
            watch_asset_loads,
            install_environment_map,
            register_clickable_surfaces,
        )
            .chain()
            .before(FrameSet::Input)
            .run_if(in_state(AppState::Running)),
    );

    app.add_systems(
        Update,
        (
            (resolve_pointer_selection, orbit_controls_input).in_set(FrameSet::Input),
            (
                (begin_focus_transition, advance_focus_transition).chain(),
                place_focus_indicator,
            )
                .in_set(FrameSet::Animate),
            update_orbit_controls.in_set(FrameSet::Controls),
            fps_notification_system,
        )
            .run_if(in_state(AppState::Running)),
    );

    // Add fps_text_update_system only for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    info!("=== CAR VIEWER ===");

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }

    #[cfg(target_arch = "wasm32")]
    {
        let _ = &mut commands;
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    let log_config = LogPlugin {
        filter: LOG_FILTER.to_string(),
        ..default()
    };

    DefaultPlugins
        .set(window_config)
        .set(asset_config)
        .set(log_config)
}
