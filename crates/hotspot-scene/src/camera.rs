//! Camera controls and orbit navigation

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use hotspot_core::config::CameraConfig;

use crate::vec3;

/// Orbit controller state (Y up)
#[derive(Debug, Clone, Resource)]
pub struct OrbitCamera {
    pub distance: f32,
    pub target_distance: f32,
    pub azimuth: f32,
    pub elevation: f32,
    pub target: Vec3,
    pub target_focus: Vec3,
    pub sensitivity: f32,
    pub zoom_speed: f32,
    pub smooth_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    /// Start looking at `config.target` from `config.position`
    pub fn from_config(config: &CameraConfig) -> Self {
        let target = vec3(config.target);
        let offset = vec3(config.position) - target;
        let distance = offset.length().max(config.min_distance);
        let elevation = (offset.y / distance).clamp(-1.0, 1.0).asin();
        let azimuth = offset.x.atan2(offset.z);

        Self {
            distance,
            target_distance: distance,
            azimuth,
            elevation,
            target,
            target_focus: target,
            sensitivity: config.sensitivity,
            zoom_speed: config.zoom_speed,
            smooth_factor: config.smooth_factor,
            min_distance: config.min_distance,
            max_distance: config.max_distance,
        }
    }

    /// Camera position on the orbit sphere
    pub fn eye(&self) -> Vec3 {
        let x = self.distance * self.elevation.cos() * self.azimuth.sin();
        let y = self.distance * self.elevation.sin();
        let z = self.distance * self.elevation.cos() * self.azimuth.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn orbit(&mut self, delta: Vec2) {
        self.azimuth -= delta.x * self.sensitivity;
        self.elevation = (self.elevation - delta.y * self.sensitivity).clamp(-1.5, 1.5);
    }

    /// Scale the zoom goal; `factor` < 1 moves closer
    pub fn zoom(&mut self, factor: f32) {
        self.target_distance =
            (self.target_distance * factor).clamp(self.min_distance, self.max_distance);
    }

    /// Ease distance and target towards their goals
    pub fn step(&mut self, dt: f32) {
        let lerp_factor = 1.0 - (-self.smooth_factor * 60.0 * dt).exp();
        self.distance += (self.target_distance - self.distance) * lerp_factor;
        self.target += (self.target_focus - self.target) * lerp_factor;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

/// Marker component for the main camera
#[derive(Component)]
pub struct MainCamera;

/// Plugin for camera controls
pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCamera>()
            .add_systems(Update, update_camera);
    }
}

fn update_camera(
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mut mouse_motion: MessageReader<MouseMotion>,
    mut mouse_wheel: MessageReader<MouseWheel>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    touch_input: Res<Touches>,
    time: Res<Time>,
    mut contexts: bevy_egui::EguiContexts,
) {
    let egui_wants_pointer = contexts
        .ctx_mut()
        .map(|ctx| ctx.wants_pointer_input())
        .unwrap_or(false);

    let mut total_motion = Vec2::ZERO;
    for motion in mouse_motion.read() {
        total_motion += motion.delta;
    }

    if !egui_wants_pointer {
        if mouse_button.pressed(MouseButton::Left) {
            orbit.orbit(total_motion);
        }

        // Pan in the camera's screen plane
        if mouse_button.pressed(MouseButton::Right) {
            let right = Vec3::new(orbit.azimuth.cos(), 0.0, -orbit.azimuth.sin());
            let pan_speed = orbit.distance * 0.002;
            let delta = -right * total_motion.x * pan_speed + Vec3::Y * total_motion.y * pan_speed;
            orbit.target_focus += delta;
        }

        for scroll in mouse_wheel.read() {
            let factor = 1.0 - scroll.y * orbit.zoom_speed * 0.3;
            orbit.zoom(factor);
        }

        if touch_input.iter().count() == 1 {
            for touch in touch_input.iter() {
                let delta = touch.delta();
                if delta != Vec2::ZERO {
                    orbit.orbit(delta);
                }
            }
        }
    } else {
        // Drain the scroll events even if we're not using them
        for _ in mouse_wheel.read() {}
    }

    // Pinch to zoom
    if touch_input.iter().count() == 2 {
        let touches: Vec<_> = touch_input.iter().collect();
        if let (Some(t1), Some(t2)) = (touches.first(), touches.get(1)) {
            let curr_dist = t1.position().distance(t2.position());
            let prev_dist = (t1.position() - t1.delta()).distance(t2.position() - t2.delta());
            orbit.zoom(prev_dist / curr_dist.max(1.0));
        }
    }

    orbit.step(time.delta_secs());

    if let Ok(mut transform) = camera_query.single_mut() {
        transform.translation = orbit.eye();
        transform.look_at(orbit.target, Vec3::Y);
    }
}
