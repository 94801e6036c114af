//! Marker picking via mouse click or touch tap
//!
//! A press that travels less than [`TAP_THRESHOLD`] pixels before release is
//! a click; anything longer is an orbit drag and selects nothing.

use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use hotspot_core::{MarkerId, SelectionEvent};

use crate::camera::MainCamera;
use crate::scene::MarkerEntity;
use crate::selection::{apply_selection_messages, SelectionMessage};
use crate::SceneSettings;

/// Maximum pointer travel, in logical pixels, for a press to count as a click
pub const TAP_THRESHOLD: f32 = 10.0;

pub struct MarkerPickingPlugin;

impl Plugin for MarkerPickingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PressState>().add_systems(
            Update,
            (handle_marker_clicks, close_on_escape).before(apply_selection_messages),
        );
    }
}

/// Where the current press started
#[derive(Resource, Default)]
pub struct PressState {
    start_position: Option<Vec2>,
    is_dragging: bool,
}

impl PressState {
    pub fn press(&mut self, position: Vec2) {
        self.start_position = Some(position);
        self.is_dragging = false;
    }

    pub fn moved_to(&mut self, position: Vec2) {
        if let Some(start) = self.start_position {
            if position.distance(start) > TAP_THRESHOLD {
                self.is_dragging = true;
            }
        }
    }

    /// End the press; returns the click position if it was not a drag
    pub fn release(&mut self, position: Vec2) -> Option<Vec2> {
        self.moved_to(position);
        let click = self.start_position.filter(|_| !self.is_dragging);
        self.start_position = None;
        self.is_dragging = false;
        click
    }
}

/// Closest marker whose center lies within `radius` of the ray
pub fn nearest_marker(
    origin: Vec3,
    direction: Vec3,
    markers: impl IntoIterator<Item = (MarkerId, Vec3)>,
    radius: f32,
) -> Option<MarkerId> {
    let mut closest: Option<(f32, MarkerId)> = None;

    for (id, center) in markers {
        let to_marker = center - origin;
        let t = to_marker.dot(direction);
        if t < 0.0 {
            continue;
        }

        let closest_point = origin + direction * t;
        let distance_sq = (closest_point - center).length_squared();
        if distance_sq < radius * radius && closest.is_none_or(|(best, _)| t < best) {
            closest = Some((t, id));
        }
    }

    closest.map(|(_, id)| id)
}

/// Feed this frame's left button state into `press`; returns the click position, if any
///
/// A press and release can land in the same frame, so both are applied in order.
pub fn track_mouse(
    press: &mut PressState,
    mouse_button: &ButtonInput<MouseButton>,
    cursor: Vec2,
) -> Option<Vec2> {
    if mouse_button.just_pressed(MouseButton::Left) {
        press.press(cursor);
    }
    if mouse_button.just_released(MouseButton::Left) {
        return press.release(cursor);
    }
    if mouse_button.pressed(MouseButton::Left) {
        press.moved_to(cursor);
    }
    None
}

fn handle_marker_clicks(
    mut press: ResMut<PressState>,
    mut messages: MessageWriter<SelectionMessage>,
    camera_query: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    markers: Query<(&MarkerEntity, &GlobalTransform)>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    windows: Query<&Window, With<PrimaryWindow>>,
    settings: Res<SceneSettings>,
    mut contexts: bevy_egui::EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);
    if egui_wants_pointer {
        return;
    }

    let Ok(window) = windows.single() else {
        return;
    };
    // Mouse (desktop)
    let mut click = window
        .cursor_position()
        .and_then(|cursor| track_mouse(&mut press, &mouse_button, cursor));

    // Touch (mobile)
    for touch in touch_input.iter_just_pressed() {
        press.press(touch.position());
    }
    for touch in touch_input.iter() {
        press.moved_to(touch.position());
    }
    for touch in touch_input.iter_just_released() {
        click = press.release(touch.position()).or(click);
    }

    let Some(position) = click else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Ok(ray) = camera.viewport_to_world(camera_transform, position) else {
        return;
    };

    let hit = nearest_marker(
        ray.origin,
        *ray.direction,
        markers.iter().map(|(m, t)| (m.0, t.translation())),
        settings.0.markers.pick_radius,
    );
    if let Some(marker) = hit {
        tracing::debug!("Picked {}", marker);
        messages.write(SelectionMessage(SelectionEvent::MarkerClicked(marker)));
    }
}

/// Escape closes the open panel
fn close_on_escape(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut messages: MessageWriter<SelectionMessage>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        messages.write(SelectionMessage(SelectionEvent::CloseClicked));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markers() -> Vec<(MarkerId, Vec3)> {
        vec![
            (MarkerId(0), Vec3::new(0.0, 0.0, -5.0)),
            (MarkerId(1), Vec3::new(0.0, 0.0, -2.0)),
            (MarkerId(2), Vec3::new(1.0, 0.0, -2.0)),
        ]
    }

    #[test]
    fn test_nearest_hit_wins() {
        let hit = nearest_marker(Vec3::ZERO, Vec3::NEG_Z, markers(), 0.12);
        assert_eq!(hit, Some(MarkerId(1)));
    }

    #[test]
    fn test_miss_outside_radius() {
        let hit = nearest_marker(Vec3::new(0.5, 0.0, 0.0), Vec3::NEG_Z, markers(), 0.12);
        assert_eq!(hit, None);
    }

    #[test]
    fn test_markers_behind_ray_are_ignored() {
        let hit = nearest_marker(Vec3::ZERO, Vec3::Z, markers(), 0.12);
        assert_eq!(hit, None);
    }

    #[test]
    fn test_offset_ray_picks_side_marker() {
        let hit = nearest_marker(Vec3::new(0.95, 0.05, 0.0), Vec3::NEG_Z, markers(), 0.12);
        assert_eq!(hit, Some(MarkerId(2)));
    }

    #[test]
    fn test_short_press_is_a_click() {
        let mut press = PressState::default();
        press.press(Vec2::new(100.0, 100.0));
        press.moved_to(Vec2::new(103.0, 101.0));
        assert_eq!(press.release(Vec2::new(104.0, 102.0)), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_drag_is_not_a_click() {
        let mut press = PressState::default();
        press.press(Vec2::new(100.0, 100.0));
        press.moved_to(Vec2::new(180.0, 100.0));
        // Returning to the start does not turn a drag back into a click
        assert_eq!(press.release(Vec2::new(100.0, 100.0)), None);
    }

    #[test]
    fn test_press_and_release_in_one_frame_is_a_click() {
        let mut press = PressState::default();
        let mut input = ButtonInput::<MouseButton>::default();
        input.press(MouseButton::Left);
        input.release(MouseButton::Left);
        assert!(input.just_pressed(MouseButton::Left));
        assert!(input.just_released(MouseButton::Left));

        let cursor = Vec2::new(40.0, 60.0);
        assert_eq!(track_mouse(&mut press, &input, cursor), Some(cursor));
    }

    #[test]
    fn test_mouse_click_across_frames() {
        let mut press = PressState::default();
        let mut input = ButtonInput::<MouseButton>::default();

        input.press(MouseButton::Left);
        assert_eq!(track_mouse(&mut press, &input, Vec2::new(10.0, 10.0)), None);

        input.clear();
        assert_eq!(track_mouse(&mut press, &input, Vec2::new(12.0, 11.0)), None);

        input.clear();
        input.release(MouseButton::Left);
        assert_eq!(
            track_mouse(&mut press, &input, Vec2::new(13.0, 12.0)),
            Some(Vec2::new(10.0, 10.0))
        );
    }

    #[test]
    fn test_mouse_drag_across_frames() {
        let mut press = PressState::default();
        let mut input = ButtonInput::<MouseButton>::default();

        input.press(MouseButton::Left);
        track_mouse(&mut press, &input, Vec2::new(10.0, 10.0));
        input.clear();
        track_mouse(&mut press, &input, Vec2::new(200.0, 10.0));
        input.clear();
        input.release(MouseButton::Left);
        assert_eq!(track_mouse(&mut press, &input, Vec2::new(200.0, 10.0)), None);
    }

    #[test]
    fn test_release_without_press() {
        let mut press = PressState::default();
        assert_eq!(press.release(Vec2::ZERO), None);
    }
}
