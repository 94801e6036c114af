//! Per-frame light follow
//!
//! The shadow-casting light sits at a fixed offset from the camera. It is
//! moved in `PostUpdate`, after the camera controller has run for the frame
//! and before transforms are propagated, so the frame is drawn with the light
//! matching that frame's camera.

use bevy::prelude::*;
use bevy::transform::TransformSystems;

use crate::camera::MainCamera;

/// Light that tracks the main camera
#[derive(Component, Debug, Clone, Copy)]
pub struct FollowLight {
    /// Position relative to the camera
    pub offset: Vec3,
    /// World point the light keeps pointing at
    pub aim: Vec3,
}

impl FollowLight {
    pub fn transform_for(&self, camera_position: Vec3) -> Transform {
        let position = camera_position + self.offset;
        if position.abs_diff_eq(self.aim, f32::EPSILON) {
            return Transform::from_translation(position);
        }
        Transform::from_translation(position).looking_at(self.aim, Vec3::Y)
    }
}

pub struct FollowLightPlugin;

impl Plugin for FollowLightPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            PostUpdate,
            follow_camera.before(TransformSystems::Propagate),
        );
    }
}

fn follow_camera(
    camera_query: Query<&Transform, (With<MainCamera>, Without<FollowLight>)>,
    mut lights: Query<(&FollowLight, &mut Transform)>,
) {
    let Ok(camera) = camera_query.single() else {
        return;
    };
    for (follow, mut transform) in &mut lights {
        *transform = follow.transform_for(camera.translation);
    }
}
