//! Viewport resize handling

use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowResized};
use hotspot_core::Viewport;

use crate::camera::MainCamera;

/// Current output size and projection aspect
#[derive(Debug, Clone, Default, Resource)]
pub struct ViewportState(pub Viewport);

pub struct ResizePlugin;

impl Plugin for ResizePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportState>()
            .add_systems(Startup, init_viewport)
            .add_systems(PreUpdate, handle_resize);
    }
}

/// Apply a new output size to the viewport and the camera projection together
pub fn apply_resize(
    viewport: &mut Viewport,
    projection: &mut Projection,
    width: u32,
    height: u32,
) -> bool {
    if !viewport.resize(width, height) {
        return false;
    }
    if let Projection::Perspective(perspective) = projection {
        perspective.aspect_ratio = viewport.aspect();
    }
    true
}

fn init_viewport(
    windows: Query<&Window, With<PrimaryWindow>>,
    mut viewport: ResMut<ViewportState>,
) {
    if let Ok(window) = windows.single() {
        viewport
            .0
            .resize(window.physical_width(), window.physical_height());
    }
}

fn handle_resize(
    mut resized: MessageReader<WindowResized>,
    windows: Query<&Window>,
    mut viewport: ResMut<ViewportState>,
    mut cameras: Query<&mut Projection, With<MainCamera>>,
) {
    // Only the last size of the frame matters
    let Some(event) = resized.read().last() else {
        return;
    };
    let Ok(window) = windows.get(event.window) else {
        return;
    };
    let (width, height) = (window.physical_width(), window.physical_height());

    let Ok(mut projection) = cameras.single_mut() else {
        viewport.0.resize(width, height);
        return;
    };
    if apply_resize(&mut viewport.0, &mut projection, width, height) {
        tracing::debug!(width, height, aspect = viewport.0.aspect(), "Viewport resized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_keeps_projection_in_step() {
        let mut viewport = Viewport::new(1920, 1080);
        let mut projection = Projection::Perspective(PerspectiveProjection {
            aspect_ratio: viewport.aspect(),
            ..default()
        });

        assert!(apply_resize(&mut viewport, &mut projection, 800, 600));

        assert_eq!((viewport.width(), viewport.height()), (800, 600));
        let Projection::Perspective(perspective) = &projection else {
            panic!("expected perspective projection");
        };
        assert!((perspective.aspect_ratio - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(perspective.aspect_ratio, viewport.aspect());
    }

    fn aspect(app: &mut App) -> f32 {
        let projection = app
            .world_mut()
            .query_filtered::<&Projection, With<MainCamera>>()
            .single(app.world())
            .unwrap()
            .clone();
        let Projection::Perspective(perspective) = projection else {
            panic!("expected perspective projection");
        };
        perspective.aspect_ratio
    }

    #[test]
    fn test_window_resize_updates_viewport_and_camera() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .add_message::<WindowResized>()
            .add_plugins(ResizePlugin);

        let mut window = Window::default();
        window.resolution.set_physical_resolution(1920, 1080);
        let window = app.world_mut().spawn((window, PrimaryWindow)).id();
        app.world_mut().spawn((
            MainCamera,
            Projection::Perspective(PerspectiveProjection {
                aspect_ratio: 1920.0 / 1080.0,
                ..default()
            }),
        ));

        app.update();
        let viewport = app.world().resource::<ViewportState>().0;
        assert_eq!((viewport.width(), viewport.height()), (1920, 1080));

        app.world_mut()
            .get_mut::<Window>(window)
            .unwrap()
            .resolution
            .set_physical_resolution(800, 600);
        app.world_mut().write_message(WindowResized {
            window,
            width: 800.0,
            height: 600.0,
        });
        app.update();

        let viewport = app.world().resource::<ViewportState>().0;
        assert_eq!((viewport.width(), viewport.height()), (800, 600));
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(aspect(&mut app), viewport.aspect());
    }

    #[test]
    fn test_minimised_window_is_ignored() {
        let mut viewport = Viewport::new(800, 600);
        let mut projection = Projection::Perspective(PerspectiveProjection {
            aspect_ratio: viewport.aspect(),
            ..default()
        });

        assert!(!apply_resize(&mut viewport, &mut projection, 0, 0));
        let Projection::Perspective(perspective) = &projection else {
            panic!("expected perspective projection");
        };
        assert!((perspective.aspect_ratio - 800.0 / 600.0).abs() < 1e-6);
    }
}
