//! Panel and label overlays using bevy_egui

use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use hotspot_core::config::{parse_hex_color, LabelElement, LabelsConfig};
use hotspot_core::label::LabelLayout;
use hotspot_core::SelectionEvent;

use crate::camera::MainCamera;
use crate::selection::{Selection, SelectionMessage};
use crate::{euler, vec3, SceneSettings};

pub struct PanelUiPlugin;

impl Plugin for PanelUiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PanelLayout>()
            .add_systems(Update, update_panel_layout)
            .add_systems(EguiPrimaryContextPass, (label_overlay, panel_window).chain());
    }
}

/// Responsive placement of the info panel
#[derive(Debug, Clone, Resource)]
pub struct PanelLayout {
    pub screen_width: f32,
    pub screen_height: f32,
    /// Small screens get a bottom sheet instead of a side window
    pub is_mobile: bool,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            screen_width: 1920.0,
            screen_height: 1080.0,
            is_mobile: false,
        }
    }
}

impl PanelLayout {
    pub fn update_for_screen(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        self.is_mobile = width < 800.0 || (width < height && width < 600.0);
    }

    pub fn panel_width(&self) -> f32 {
        if self.is_mobile {
            (self.screen_width - 24.0).max(160.0)
        } else {
            320.0
        }
    }
}

fn update_panel_layout(windows: Query<&Window>, mut layout: ResMut<PanelLayout>) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        // Only update if dimensions changed significantly
        if (layout.screen_width - width).abs() > 1.0 || (layout.screen_height - height).abs() > 1.0 {
            layout.update_for_screen(width, height);
        }
    }
}

/// Info window for the active panel; its close button dismisses it
fn panel_window(
    mut contexts: EguiContexts,
    selection: Res<Selection>,
    layout: Res<PanelLayout>,
    mut messages: MessageWriter<SelectionMessage>,
) {
    let Some((id, panel)) = selection.dispatcher.active_panel() else {
        return;
    };
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let (anchor, offset) = if layout.is_mobile {
        (egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -12.0))
    } else {
        (egui::Align2::RIGHT_TOP, egui::vec2(-16.0, 16.0))
    };

    egui::Window::new(&panel.title)
        .id(egui::Id::new(("text-panel", id.index())))
        .anchor(anchor, offset)
        .default_width(layout.panel_width())
        .collapsible(false)
        .resizable(false)
        .title_bar(false)
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading(&panel.title);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("✕").on_hover_text("Close").clicked() {
                        messages.write(SelectionMessage(SelectionEvent::CloseClicked));
                    }
                });
            });
            ui.separator();
            if !panel.body.is_empty() {
                ui.label(&panel.body);
            }
        });
}

/// World position of a label's top-left corner on the label panel
pub fn label_anchor(labels: &LabelsConfig, element: &LabelElement) -> Vec3 {
    let [x, y] = LabelLayout::from_config(labels).to_local(element.left, element.top);
    panel_transform(labels).transform_point(Vec3::new(x, y, 0.0))
}

fn panel_transform(labels: &LabelsConfig) -> Transform {
    Transform::from_translation(vec3(labels.position)).with_rotation(euler(labels.rotation))
}

/// The label panel is single sided: it is only drawn when its front faces the camera
pub fn faces_camera(labels: &LabelsConfig, camera_position: Vec3) -> bool {
    let transform = panel_transform(labels);
    let normal = transform.rotation * Vec3::Z;
    normal.dot(camera_position - transform.translation) > 0.0
}

fn egui_color(hex: &str, opacity: f32) -> egui::Color32 {
    let [r, g, b, a] = parse_hex_color(hex).unwrap_or([0.0, 0.0, 0.0, 1.0]);
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(to_u8(r), to_u8(g), to_u8(b), to_u8(a * opacity))
}

/// Paint the marker numbers where the label panel projects onto the screen
fn label_overlay(
    mut contexts: EguiContexts,
    settings: Res<SceneSettings>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
) {
    let labels = &settings.0.labels;
    if labels.elements.is_empty() {
        return;
    }
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    if !faces_camera(labels, camera_transform.translation()) {
        return;
    }
    let Ok(ctx) = contexts.ctx_mut() else { return };

    let layout = LabelLayout::from_config(labels);
    let up = panel_transform(labels).rotation * Vec3::Y;
    let font_world = layout.world_height(labels.body.font_size);
    let font_color = egui_color(&labels.body.font_color, labels.opacity);
    let background = egui_color(&labels.body.background_color, labels.opacity);
    let painter = ctx.layer_painter(egui::LayerId::background());

    for element in &labels.elements {
        let anchor = label_anchor(labels, element);
        let Ok(top) = camera.world_to_viewport(camera_transform, anchor) else {
            continue;
        };
        let Ok(bottom) = camera.world_to_viewport(camera_transform, anchor - up * font_world) else {
            continue;
        };
        let font_px = top.distance(bottom);
        if font_px < 1.0 {
            continue;
        }

        let galley = painter.layout_no_wrap(
            element.text.clone(),
            egui::FontId::proportional(font_px),
            font_color,
        );
        let pos = egui::pos2(top.x, top.y);
        if background.a() > 0 {
            painter.rect_filled(egui::Rect::from_min_size(pos, galley.size()), 0.0, background);
        }
        painter.galley(pos, galley, font_color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_anchor_on_unrotated_panel() {
        let labels = LabelsConfig {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0; 3],
            ..LabelsConfig::default()
        };
        let element = LabelElement {
            left: 0.0,
            top: 0.0,
            ..labels.elements[0].clone()
        };
        let anchor = label_anchor(&labels, &element);
        assert!(anchor.abs_diff_eq(Vec3::new(0.0, 3.0, 3.0), 1e-5));
    }

    #[test]
    fn test_default_panel_faces_default_camera() {
        let labels = LabelsConfig::default();
        assert!(faces_camera(&labels, Vec3::new(3.0, 0.0, 4.0)));
        assert!(!faces_camera(&labels, Vec3::new(-3.0, 0.0, -4.0)));
    }

    #[test]
    fn test_mobile_layout() {
        let mut layout = PanelLayout::default();
        assert!(!layout.is_mobile);
        assert_eq!(layout.panel_width(), 320.0);

        layout.update_for_screen(400.0, 800.0);
        assert!(layout.is_mobile);
        assert_eq!(layout.panel_width(), 376.0);
    }

    #[test]
    fn test_transparent_background() {
        assert_eq!(egui_color("#fff0", 1.0).a(), 0);
        assert_eq!(egui_color("#000", 0.5).a(), 128);
    }
}
