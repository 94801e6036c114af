//! Scene setup - camera, lights, ground plane and markers

use bevy::core_pipeline::tonemapping::Tonemapping;
use bevy::camera::Exposure;
use bevy::light::{DirectionalLightShadowMap, NotShadowCaster};
use bevy::prelude::*;
use hotspot_core::config::ToneMapping;
use hotspot_core::MarkerId;

use crate::camera::{MainCamera, OrbitCamera};
use crate::lighting::FollowLight;
use crate::selection::Selection;
use crate::{euler, srgba, vec3, SceneSettings};

/// Marker component for hotspot entities
#[derive(Component, Debug, Clone, Copy)]
pub struct MarkerEntity(pub MarkerId);

/// Marker component for the shadow-catching ground plane
#[derive(Component)]
pub struct GroundPlane;

/// Plugin for scene setup
pub struct SceneSetupPlugin;

impl Plugin for SceneSetupPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, (setup_camera_and_lights, setup_scene));
    }
}

fn tonemapping(mode: ToneMapping) -> Tonemapping {
    match mode {
        ToneMapping::None => Tonemapping::None,
        ToneMapping::Reinhard => Tonemapping::Reinhard,
        ToneMapping::AcesFitted => Tonemapping::AcesFitted,
        ToneMapping::AgX => Tonemapping::AgX,
    }
}

/// Camera exposure for a brightness multiplier; 2.0 is one stop brighter than Bevy's default
pub fn camera_exposure(multiplier: f32) -> Exposure {
    Exposure {
        ev100: Exposure::EV100_BLENDER - multiplier.log2(),
    }
}

/// Camera, clear colour and lights
fn setup_camera_and_lights(mut commands: Commands, settings: Res<SceneSettings>) {
    let config = &settings.0;

    commands.insert_resource(ClearColor(srgba(&config.renderer.clear_color)));

    let orbit = OrbitCamera::from_config(&config.camera);
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: config.camera.fov_degrees.to_radians(),
            near: config.camera.near,
            far: config.camera.far,
            ..default()
        }),
        tonemapping(config.renderer.tone_mapping),
        camera_exposure(config.renderer.exposure),
        Transform::from_translation(orbit.eye()).looking_at(orbit.target, Vec3::Y),
        MainCamera,
    ));
    commands.insert_resource(orbit);

    // Fill light
    commands.insert_resource(AmbientLight {
        color: srgba(&config.fill.color),
        brightness: config.fill.brightness,
        ..default()
    });

    // Spot light shadow maps are sized by the directional light resource
    commands.insert_resource(DirectionalLightShadowMap {
        size: config.light.shadow_map_size,
    });

    // Shadow-casting light, repositioned every frame by the follow-light system
    let aim = vec3(config.camera.target);
    let offset = vec3(config.light.offset);
    let half_angle = config.light.angle_degrees.to_radians();
    commands.spawn((
        SpotLight {
            color: srgba(&config.light.color),
            intensity: config.light.intensity,
            range: config.light.range,
            shadows_enabled: true,
            shadow_depth_bias: config.light.shadow_depth_bias,
            inner_angle: half_angle * 0.9,
            outer_angle: half_angle,
            ..default()
        },
        Transform::from_translation(vec3(config.camera.position) + offset).looking_at(aim, Vec3::Y),
        FollowLight { offset, aim },
    ));
}

/// Ground plane and markers
fn setup_scene(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
    selection: Res<Selection>,
) {
    let config = &settings.0;

    // Ground plane that only shows the model's shadow against the background
    let [ground_w, ground_d] = config.ground.size;
    commands.spawn((
        Mesh3d(meshes.add(Plane3d::default().mesh().size(ground_w, ground_d))),
        MeshMaterial3d(materials.add(StandardMaterial {
            base_color: srgba(&config.ground.color).with_alpha(config.ground.opacity),
            alpha_mode: AlphaMode::Blend,
            perceptual_roughness: 1.0,
            reflectance: 0.0,
            ..default()
        })),
        Transform::from_translation(vec3(config.ground.position)),
        NotShadowCaster,
        GroundPlane,
    ));

    // Markers share one mesh and one material
    let marker_mesh = meshes.add(
        Circle::new(config.markers.radius)
            .mesh()
            .resolution(config.markers.segments),
    );
    let marker_material = materials.add(StandardMaterial {
        base_color_texture: Some(asset_server.load(config.markers.texture.clone())),
        unlit: true,
        double_sided: true,
        cull_mode: None,
        alpha_mode: AlphaMode::Blend,
        ..default()
    });

    for (id, marker, panel) in selection.registry.iter() {
        tracing::debug!(marker = %marker.name, %panel, "Spawning marker");
        commands.spawn((
            Mesh3d(marker_mesh.clone()),
            MeshMaterial3d(marker_material.clone()),
            Transform::from_translation(vec3(marker.position)).with_rotation(euler(marker.rotation)),
            NotShadowCaster,
            MarkerEntity(id),
            Name::new(marker.name.clone()),
        ));
    }

    tracing::info!(
        markers = selection.registry.len(),
        panels = selection.dispatcher.panels().len(),
        "Scene assembled"
    );
}
