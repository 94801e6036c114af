//! Scene configuration
//!
//! Every value that places something in the scene lives here: camera, lights,
//! ground plane, markers, the loaded model, the label panel and the panel
//! contents. All fields have defaults, so an empty TOML document yields the
//! stock viewer scene.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::marker::{Marker, MarkerRegistry};
use crate::panel::{Panel, PanelId, PanelSet};
use crate::selection::SelectionError;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read scene config: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse scene config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize scene config: {0}")]
    SerializeError(#[from] toml::ser::Error),
    #[error("Invalid scene config: {0}")]
    ValidationError(String),
    #[error("Invalid color {0:?}: expected #rgb, #rgba, #rrggbb or #rrggbbaa")]
    InvalidColor(String),
    #[error(transparent)]
    Selection(#[from] SelectionError),
}

/// Complete description of the viewer scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub light: LightConfig,
    #[serde(default)]
    pub fill: FillLightConfig,
    #[serde(default)]
    pub ground: GroundConfig,
    #[serde(default)]
    pub markers: MarkerStyle,
    #[serde(default = "default_markers", rename = "marker")]
    pub marker_list: Vec<MarkerConfig>,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
    #[serde(default = "default_panels", rename = "panel")]
    pub panels: Vec<Panel>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            renderer: RendererConfig::default(),
            light: LightConfig::default(),
            fill: FillLightConfig::default(),
            ground: GroundConfig::default(),
            markers: MarkerStyle::default(),
            marker_list: default_markers(),
            model: ModelConfig::default(),
            labels: LabelsConfig::default(),
            panels: default_panels(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    #[serde(default = "default_fov")]
    pub fov_degrees: f32,
    #[serde(default = "default_near")]
    pub near: f32,
    #[serde(default = "default_far")]
    pub far: f32,
    /// Initial camera position
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
    /// Point the camera orbits around
    #[serde(default)]
    pub target: [f32; 3],
    /// Radians of orbit per pixel of drag
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f32,
    #[serde(default = "default_zoom_speed")]
    pub zoom_speed: f32,
    #[serde(default = "default_smooth_factor")]
    pub smooth_factor: f32,
    #[serde(default = "default_min_distance")]
    pub min_distance: f32,
    #[serde(default = "default_max_distance")]
    pub max_distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: default_fov(),
            near: default_near(),
            far: default_far(),
            position: default_camera_position(),
            target: [0.0; 3],
            sensitivity: default_sensitivity(),
            zoom_speed: default_zoom_speed(),
            smooth_factor: default_smooth_factor(),
            min_distance: default_min_distance(),
            max_distance: default_max_distance(),
        }
    }
}

fn default_fov() -> f32 {
    75.0
}

fn default_near() -> f32 {
    0.1
}

fn default_far() -> f32 {
    1000.0
}

fn default_camera_position() -> [f32; 3] {
    [3.0, 0.0, 4.0]
}

fn default_sensitivity() -> f32 {
    0.005
}

fn default_zoom_speed() -> f32 {
    0.1
}

fn default_smooth_factor() -> f32 {
    0.15
}

fn default_min_distance() -> f32 {
    0.5
}

fn default_max_distance() -> f32 {
    50.0
}

/// Tone mapping operator applied to the final image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToneMapping {
    None,
    #[default]
    Reinhard,
    AcesFitted,
    AgX,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererConfig {
    #[serde(default = "default_clear_color")]
    pub clear_color: String,
    #[serde(default)]
    pub tone_mapping: ToneMapping,
    /// Exposure multiplier (2.0 doubles the brightness)
    #[serde(default = "default_exposure")]
    pub exposure: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            clear_color: default_clear_color(),
            tone_mapping: ToneMapping::default(),
            exposure: default_exposure(),
        }
    }
}

fn default_clear_color() -> String {
    "#ffffff".to_string()
}

fn default_exposure() -> f32 {
    2.0
}

/// Shadow-casting spot light that follows the camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    #[serde(default = "default_white")]
    pub color: String,
    /// Luminous power in lumens
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,
    #[serde(default = "default_light_range")]
    pub range: f32,
    /// Cone half angle in degrees
    #[serde(default = "default_light_angle")]
    pub angle_degrees: f32,
    /// Light position relative to the camera, applied every frame
    #[serde(default = "default_light_offset")]
    pub offset: [f32; 3],
    #[serde(default = "default_shadow_depth_bias")]
    pub shadow_depth_bias: f32,
    /// Shadow map resolution in texels per side
    #[serde(default = "default_shadow_map_size")]
    pub shadow_map_size: usize,
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            color: default_white(),
            intensity: default_light_intensity(),
            range: default_light_range(),
            angle_degrees: default_light_angle(),
            offset: default_light_offset(),
            shadow_depth_bias: default_shadow_depth_bias(),
            shadow_map_size: default_shadow_map_size(),
        }
    }
}

fn default_white() -> String {
    "#ffffff".to_string()
}

fn default_light_intensity() -> f32 {
    10_000_000.0
}

fn default_light_range() -> f32 {
    60.0
}

fn default_light_angle() -> f32 {
    60.0
}

fn default_light_offset() -> [f32; 3] {
    [10.0, 10.0, 10.0]
}

fn default_shadow_depth_bias() -> f32 {
    0.02
}

fn default_shadow_map_size() -> usize {
    4096
}

/// Uniform fill light standing in for sky/ground hemisphere lighting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FillLightConfig {
    #[serde(default = "default_white")]
    pub color: String,
    /// Brightness in cd/m^2
    #[serde(default = "default_fill_brightness")]
    pub brightness: f32,
}

impl Default for FillLightConfig {
    fn default() -> Self {
        Self {
            color: default_white(),
            brightness: default_fill_brightness(),
        }
    }
}

fn default_fill_brightness() -> f32 {
    800.0
}

/// Translucent horizontal plane that catches the model's shadow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundConfig {
    #[serde(default = "default_ground_size")]
    pub size: [f32; 2],
    #[serde(default = "default_ground_position")]
    pub position: [f32; 3],
    #[serde(default = "default_white")]
    pub color: String,
    #[serde(default = "default_ground_opacity")]
    pub opacity: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: default_ground_size(),
            position: default_ground_position(),
            color: default_white(),
            opacity: default_ground_opacity(),
        }
    }
}

fn default_ground_size() -> [f32; 2] {
    [5.0, 5.0]
}

fn default_ground_position() -> [f32; 3] {
    [-2.1, -1.2, -1.7]
}

fn default_font_color() -> String {
    "#000000".to_string()
}

fn default_ground_opacity() -> f32 {
    0.5
}

/// Appearance shared by every marker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    #[serde(default = "default_marker_radius")]
    pub radius: f32,
    #[serde(default = "default_marker_segments")]
    pub segments: u32,
    /// Texture applied to the marker disc
    #[serde(default = "default_marker_texture")]
    pub texture: String,
    /// Click tolerance around the marker center, in world units
    #[serde(default = "default_marker_radius")]
    pub pick_radius: f32,
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: default_marker_radius(),
            segments: default_marker_segments(),
            texture: default_marker_texture(),
            pick_radius: default_marker_radius(),
        }
    }
}

fn default_marker_radius() -> f32 {
    0.12
}

fn default_marker_segments() -> u32 {
    32
}

fn default_marker_texture() -> String {
    "UI/circle.png".to_string()
}

/// One clickable hotspot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    pub name: String,
    pub position: [f32; 3],
    /// Euler XYZ rotation in radians
    #[serde(default)]
    pub rotation: [f32; 3],
    /// Index of the panel this marker opens
    pub panel: PanelId,
}

fn default_markers() -> Vec<MarkerConfig> {
    vec![
        MarkerConfig {
            name: "circle1".to_string(),
            position: [0.97, 0.71, 0.26],
            rotation: [0.0, 0.8, 0.0],
            panel: PanelId(0),
        },
        MarkerConfig {
            name: "circle2".to_string(),
            position: [0.15, 0.0, 1.1],
            rotation: [0.0, 0.8, 0.0],
            panel: PanelId(1),
        },
        MarkerConfig {
            name: "circle3".to_string(),
            position: [0.82, -0.2, 0.39],
            rotation: [0.0, 0.8, 0.0],
            panel: PanelId(2),
        },
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// glTF asset path, relative to the asset root
    #[serde(default = "default_model_path")]
    pub path: String,
    #[serde(default)]
    pub position: [f32; 3],
    #[serde(default = "default_scale")]
    pub scale: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
            position: [0.0; 3],
            scale: default_scale(),
        }
    }
}

fn default_model_path() -> String {
    "scene.gltf".to_string()
}

fn default_scale() -> f32 {
    1.0
}

/// Kind of a label element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelKind {
    #[default]
    Text,
}

/// A text element on the label panel, placed in canvas pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelElement {
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: LabelKind,
    pub text: String,
    pub left: f32,
    pub top: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStyle {
    #[serde(default = "default_label_background")]
    pub background_color: String,
    #[serde(default = "default_font_color")]
    pub font_color: String,
    /// Font size in canvas pixels
    #[serde(default = "default_font_size")]
    pub font_size: f32,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            background_color: default_label_background(),
            font_color: default_font_color(),
            font_size: default_font_size(),
        }
    }
}

fn default_label_background() -> String {
    "#fff0".to_string()
}

fn default_font_size() -> f32 {
    40.0
}

/// World-space panel carrying the marker labels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelsConfig {
    /// Canvas resolution the element positions refer to
    #[serde(default = "default_canvas_size")]
    pub canvas_size: [f32; 2],
    /// Panel size in world units
    #[serde(default = "default_panel_size")]
    pub panel_size: [f32; 2],
    #[serde(default = "default_labels_position")]
    pub position: [f32; 3],
    #[serde(default = "default_labels_rotation")]
    pub rotation: [f32; 3],
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    #[serde(default)]
    pub body: LabelStyle,
    #[serde(default = "default_label_elements", rename = "element")]
    pub elements: Vec<LabelElement>,
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            canvas_size: default_canvas_size(),
            panel_size: default_panel_size(),
            position: default_labels_position(),
            rotation: default_labels_rotation(),
            opacity: default_opacity(),
            body: LabelStyle::default(),
            elements: default_label_elements(),
        }
    }
}

fn default_canvas_size() -> [f32; 2] {
    [512.0, 512.0]
}

fn default_panel_size() -> [f32; 2] {
    [2.0, 2.0]
}

fn default_labels_position() -> [f32; 3] {
    [0.78, -0.05, 0.46]
}

fn default_labels_rotation() -> [f32; 3] {
    [0.0, 0.8, 0.0]
}

fn default_opacity() -> f32 {
    1.0
}

fn default_label_elements() -> Vec<LabelElement> {
    [("number1", "1", 295.0, 35.0), ("number2", "2", -5.0, 220.0), ("number3", "3", 245.0, 270.0)]
        .into_iter()
        .map(|(name, text, left, top)| LabelElement {
            name: name.to_string(),
            kind: LabelKind::Text,
            text: text.to_string(),
            left,
            top,
        })
        .collect()
}

fn default_panels() -> Vec<Panel> {
    (1..=3)
        .map(|i| Panel::new(format!("Hotspot {}", i), format!("Details for hotspot {}.", i)))
        .collect()
}

impl SceneConfig {
    /// Load and validate a scene config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), "Loaded scene config");
        Ok(config)
    }

    /// Parse and validate a scene config from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check cross-field constraints that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.panels.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[panel]] is required".to_string(),
            ));
        }

        for marker in &self.marker_list {
            if marker.panel.0 >= self.panels.len() {
                return Err(ConfigError::ValidationError(format!(
                    "marker {:?} opens panel {} but only {} panels are defined",
                    marker.name,
                    marker.panel,
                    self.panels.len()
                )));
            }
        }

        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(ConfigError::ValidationError(format!(
                "camera.fov_degrees must be in (0, 180), got {}",
                camera.fov_degrees
            )));
        }
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return Err(ConfigError::ValidationError(format!(
                "camera clip planes must satisfy 0 < near < far, got near={} far={}",
                camera.near, camera.far
            )));
        }
        if !(self.renderer.exposure > 0.0 && self.renderer.exposure.is_finite()) {
            return Err(ConfigError::ValidationError(format!(
                "renderer.exposure must be positive, got {}",
                self.renderer.exposure
            )));
        }
        if !(camera.min_distance > 0.0 && camera.max_distance >= camera.min_distance) {
            return Err(ConfigError::ValidationError(format!(
                "camera distance limits must satisfy 0 < min <= max, got min={} max={}",
                camera.min_distance, camera.max_distance
            )));
        }

        if self.labels.canvas_size.iter().any(|v| *v <= 0.0) {
            return Err(ConfigError::ValidationError(
                "labels.canvas_size must be positive".to_string(),
            ));
        }

        for color in [
            &self.renderer.clear_color,
            &self.light.color,
            &self.fill.color,
            &self.ground.color,
            &self.labels.body.background_color,
            &self.labels.body.font_color,
        ] {
            parse_hex_color(color)?;
        }

        Ok(())
    }

    /// Panel set in configuration order
    pub fn panel_set(&self) -> PanelSet {
        self.panels.iter().cloned().collect()
    }

    /// Register every configured marker against the configured panels
    pub fn marker_registry(&self) -> Result<MarkerRegistry, SelectionError> {
        let mut registry = MarkerRegistry::new(self.panels.len());
        for m in &self.marker_list {
            registry.register(
                Marker {
                    name: m.name.clone(),
                    position: m.position,
                    rotation: m.rotation,
                },
                m.panel,
            )?;
        }
        Ok(registry)
    }
}

/// Parse a CSS-style hex color into sRGBA components in 0..=1
pub fn parse_hex_color(s: &str) -> Result<[f32; 4], ConfigError> {
    let invalid = || ConfigError::InvalidColor(s.to_string());
    let hex = s.strip_prefix('#').ok_or_else(invalid)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

    let rgba: [u8; 4] = match hex.len() {
        3 => [nibble(0), nibble(1), nibble(2), Ok(255)],
        4 => [nibble(0), nibble(1), nibble(2), nibble(3)],
        6 => [byte(0), byte(2), byte(4), Ok(255)],
        8 => [byte(0), byte(2), byte(4), byte(6)],
        _ => return Err(invalid()),
    }
    .map(|c| c.unwrap_or(0));

    Ok(rgba.map(|c| c as f32 / 255.0))
}
