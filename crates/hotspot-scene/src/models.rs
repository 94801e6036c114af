//! glTF model loading
//!
//! The model is requested at startup and inserted into the scene the first
//! frame its load state reports `Loaded`. Everything else renders without it.

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::light::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use hotspot_core::config::ModelConfig;
use hotspot_core::ModelLoad;

use crate::{vec3, SceneSettings};

/// Root entity of the loaded model
#[derive(Component)]
pub struct ModelRoot;

/// Load slot for the configured model
#[derive(Resource, Default)]
pub struct ModelLoadState {
    pub path: String,
    pub handle: Handle<Gltf>,
    pub load: ModelLoad,
}

pub struct ModelsPlugin;

impl Plugin for ModelsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ModelLoadState>()
            .add_systems(Startup, request_model)
            .add_systems(Update, insert_loaded_model)
            .add_systems(Update, enable_model_shadows.after(insert_loaded_model));
    }
}

fn request_model(
    mut state: ResMut<ModelLoadState>,
    asset_server: Res<AssetServer>,
    settings: Res<SceneSettings>,
) {
    let path = settings.0.model.path.clone();
    tracing::info!("Starting to load model: {}", path);
    state.handle = asset_server.load(path.clone());
    state.path = path;
    state.load = ModelLoad::Pending;
}

/// Spawn the model's scene once the glTF is available
fn insert_loaded_model(
    mut commands: Commands,
    mut state: ResMut<ModelLoadState>,
    asset_server: Res<AssetServer>,
    gltf_assets: Res<Assets<Gltf>>,
    settings: Res<SceneSettings>,
) {
    if !state.load.is_pending() {
        return;
    }

    match asset_server.get_load_state(state.handle.id()) {
        Some(LoadState::Loaded) => {
            let Some(gltf) = gltf_assets.get(&state.handle) else {
                return;
            };
            // Use first scene if no default
            let Some(scene) = gltf.default_scene.clone().or_else(|| gltf.scenes.first().cloned())
            else {
                tracing::error!("Model {} contains no scenes", state.path);
                let path = state.path.clone();
                state.load.fail(format!("{} contains no scenes", path));
                return;
            };

            insert_model(&mut commands, &mut state, scene, &settings.0.model);
        }
        Some(LoadState::Failed(err)) => {
            tracing::error!("Failed to load model {}: {}", state.path, err);
            state.load.fail(err.to_string());
        }
        _ => {
            // Still loading
        }
    }
}

/// Spawn the model root unless the load slot has already resolved
fn insert_model(
    commands: &mut Commands,
    state: &mut ModelLoadState,
    scene: Handle<Scene>,
    model: &ModelConfig,
) -> bool {
    if !state.load.complete() {
        return false;
    }
    tracing::info!("Model loaded: {}", state.path);
    commands.spawn((
        SceneRoot(scene),
        Transform::from_translation(vec3(model.position)).with_scale(Vec3::splat(model.scale)),
        ModelRoot,
    ));
    true
}

/// Keep model meshes casting and receiving shadows
///
/// Bevy's glTF meshes do both by default. This only strips shadow opt-outs
/// that end up on a mesh under the model root.
fn enable_model_shadows(
    mut commands: Commands,
    new_meshes: Query<(Entity, Has<NotShadowCaster>, Has<NotShadowReceiver>), Added<Mesh3d>>,
    parents: Query<&ChildOf>,
    roots: Query<(), With<ModelRoot>>,
) {
    for (entity, no_cast, no_receive) in &new_meshes {
        if !(no_cast || no_receive) {
            continue;
        }
        if parents.iter_ancestors(entity).any(|a| roots.contains(a)) {
            tracing::debug!(?entity, "Re-enabling shadows on model mesh");
            commands
                .entity(entity)
                .remove::<(NotShadowCaster, NotShadowReceiver)>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn insert_every_frame(mut commands: Commands, mut state: ResMut<ModelLoadState>) {
        insert_model(&mut commands, &mut state, Handle::default(), &ModelConfig::default());
    }

    fn model_roots(app: &mut App) -> usize {
        app.world_mut()
            .query_filtered::<(), With<ModelRoot>>()
            .iter(app.world())
            .count()
    }

    #[test]
    fn test_model_is_inserted_at_most_once() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ModelLoadState>()
            .add_systems(Update, insert_every_frame);

        for _ in 0..3 {
            app.update();
        }

        assert_eq!(model_roots(&mut app), 1);
        assert!(app.world().resource::<ModelLoadState>().load.is_loaded());
    }

    #[test]
    fn test_failed_load_never_inserts() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<ModelLoadState>()
            .add_systems(Update, insert_every_frame);
        app.world_mut()
            .resource_mut::<ModelLoadState>()
            .load
            .fail("missing file".to_string());

        app.update();
        app.update();

        assert_eq!(model_roots(&mut app), 0);
        assert!(!app.world().resource::<ModelLoadState>().load.is_loaded());
    }

    #[test]
    fn test_model_meshes_get_shadows_others_do_not() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_systems(Update, enable_model_shadows);

        let root = app.world_mut().spawn(ModelRoot).id();
        let node = app.world_mut().spawn(ChildOf(root)).id();
        let model_mesh = app
            .world_mut()
            .spawn((Mesh3d::default(), NotShadowCaster, NotShadowReceiver, ChildOf(node)))
            .id();
        let marker_mesh = app
            .world_mut()
            .spawn((Mesh3d::default(), NotShadowCaster))
            .id();

        app.update();

        let world = app.world();
        assert!(world.get::<NotShadowCaster>(model_mesh).is_none());
        assert!(world.get::<NotShadowReceiver>(model_mesh).is_none());
        assert!(world.get::<NotShadowCaster>(marker_mesh).is_some());
    }
}
