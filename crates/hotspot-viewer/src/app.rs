//! Bevy application setup

use bevy::prelude::*;
use bevy::winit::{UpdateMode, WinitSettings};
use bevy_egui::EguiPlugin;
use bevy_picking::{prelude::MeshPickingPlugin, DefaultPickingPlugins};
use hotspot_core::{ConfigError, SceneConfig};
use hotspot_scene::ui::PanelLayout;
use hotspot_scene::HotspotScenePlugin;
use std::time::Duration;

/// Scene description shipped with the viewer
pub const DEFAULT_SCENE: &str = include_str!("../assets/scene.toml");

/// Parse the embedded scene description
pub fn default_config() -> Result<SceneConfig, ConfigError> {
    SceneConfig::from_toml(DEFAULT_SCENE)
}

/// Startup options that are not part of the scene
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub title: String,
    pub log_level: tracing::Level,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            title: "Hotspot Viewer".to_string(),
            log_level: tracing::Level::INFO,
        }
    }
}

/// Map a log level name to a level, falling back to `INFO`
pub fn parse_level(name: &str) -> tracing::Level {
    match name.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}

/// Build the viewer app for `config`; fails if the config does not validate
pub fn build_app(config: SceneConfig, options: &ViewerOptions) -> Result<App, ConfigError> {
    let scene = HotspotScenePlugin::new(config)?;

    let plugins = DefaultPlugins
        .set(WindowPlugin {
            primary_window: Some(Window {
                title: options.title.clone(),
                canvas: Some("#viewer-canvas".to_string()),
                fit_canvas_to_parent: true,
                prevent_default_event_handling: false,
                ..default()
            }),
            ..default()
        })
        .set(AssetPlugin {
            // Static hosting has no .meta files
            meta_check: bevy::asset::AssetMetaCheck::Never,
            ..default()
        });

    #[cfg(not(target_arch = "wasm32"))]
    let plugins = plugins.set(bevy::log::LogPlugin {
        level: options.log_level,
        filter: "wgpu=error,naga=warn".to_string(),
        ..default()
    });

    let mut app = App::new();
    app.insert_resource(WinitSettings::default())
        .add_plugins(plugins)
        // Picking must be added before EguiPlugin so egui can detect it
        .add_plugins(DefaultPickingPlugins)
        .add_plugins(MeshPickingPlugin)
        .add_plugins(EguiPlugin::default())
        .add_plugins(scene)
        .add_systems(Update, adjust_power_settings_for_mobile);
    Ok(app)
}

/// Build and run the viewer until the window closes
pub fn run(config: SceneConfig, options: &ViewerOptions) -> Result<(), ConfigError> {
    let mut app = build_app(config, options)?;
    tracing::info!("Hotspot viewer v{}", env!("CARGO_PKG_VERSION"));
    app.run();
    Ok(())
}

/// On mobile, use power saving mode. On desktop, use continuous rendering for smooth 3D.
fn adjust_power_settings_for_mobile(
    layout: Res<PanelLayout>,
    mut winit_settings: ResMut<WinitSettings>,
) {
    // Only update if mobile status changed
    if !layout.is_changed() {
        return;
    }

    *winit_settings = power_settings(layout.is_mobile);
}

fn power_settings(is_mobile: bool) -> WinitSettings {
    if is_mobile {
        WinitSettings {
            // 10 FPS max when idle
            focused_mode: UpdateMode::reactive_low_power(Duration::from_millis(100)),
            unfocused_mode: UpdateMode::reactive_low_power(Duration::from_millis(500)),
        }
    } else {
        WinitSettings::default()
    }
}
