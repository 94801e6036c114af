//! Hotspot Scene - Bevy side of the hotspot viewer
//!
//! Turns a [`SceneConfig`] into a running scene: camera, lights, ground,
//! markers and the glTF model, plus the systems that pick markers, keep the
//! follow light attached to the camera, react to resizes and draw the panels.

pub mod camera;
pub mod lighting;
pub mod models;
pub mod picking;
pub mod resize;
pub mod scene;
pub mod selection;
pub mod ui;

use bevy::prelude::*;
use hotspot_core::config::parse_hex_color;
use hotspot_core::{ConfigError, SceneConfig};

pub use selection::{Selection, SelectionMessage};

/// Scene configuration shared by every plugin in this crate
#[derive(Debug, Clone, Resource)]
pub struct SceneSettings(pub SceneConfig);

/// Plugin that sets up the whole viewer scene
pub struct HotspotScenePlugin {
    config: SceneConfig,
    selection: Selection,
}

impl HotspotScenePlugin {
    /// Validate `config` and build the marker registry and panel set from it
    pub fn new(config: SceneConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let selection = Selection::from_config(&config)?;
        Ok(Self { config, selection })
    }
}

impl Plugin for HotspotScenePlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneSettings(self.config.clone()))
            .insert_resource(self.selection.clone())
            .add_plugins(selection::SelectionPlugin)
            .add_plugins(camera::CameraPlugin)
            .add_plugins(scene::SceneSetupPlugin)
            .add_plugins(models::ModelsPlugin)
            .add_plugins(lighting::FollowLightPlugin)
            .add_plugins(resize::ResizePlugin)
            .add_plugins(picking::MarkerPickingPlugin)
            .add_plugins(ui::PanelUiPlugin);
    }
}

/// Bevy color from a validated hex string
pub(crate) fn srgba(hex: &str) -> Color {
    let [r, g, b, a] = parse_hex_color(hex).unwrap_or([1.0, 0.0, 1.0, 1.0]);
    Color::srgba(r, g, b, a)
}

pub(crate) fn vec3(v: [f32; 3]) -> Vec3 {
    Vec3::from_array(v)
}

/// Rotation from Euler XYZ angles in radians
pub(crate) fn euler(v: [f32; 3]) -> Quat {
    Quat::from_euler(EulerRot::XYZ, v[0], v[1], v[2])
}
