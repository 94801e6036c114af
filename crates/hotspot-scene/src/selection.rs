//! Selection state and the message that drives it

use bevy::prelude::*;
use hotspot_core::{MarkerRegistry, SceneConfig, SelectionDispatcher, SelectionError, SelectionEvent};

/// Marker registry and selection dispatcher for the scene
///
/// All panel mutations go through `ResMut<Selection>`, so there is exactly
/// one writer per schedule run.
#[derive(Debug, Clone, Resource)]
pub struct Selection {
    pub registry: MarkerRegistry,
    pub dispatcher: SelectionDispatcher,
}

impl Selection {
    pub fn from_config(config: &SceneConfig) -> Result<Self, SelectionError> {
        Ok(Self {
            registry: config.marker_registry()?,
            dispatcher: SelectionDispatcher::new(config.panel_set()),
        })
    }
}

/// Click on a marker or on the close control
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionMessage(pub SelectionEvent);

pub struct SelectionPlugin;

impl Plugin for SelectionPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<SelectionMessage>()
            .add_systems(Update, apply_selection_messages);
    }
}

/// Feed queued click messages into the dispatcher, in arrival order
pub fn apply_selection_messages(
    mut messages: MessageReader<SelectionMessage>,
    mut selection: ResMut<Selection>,
) {
    for SelectionMessage(event) in messages.read() {
        let Selection {
            registry,
            dispatcher,
        } = &mut *selection;
        if let Err(e) = dispatcher.handle(registry, *event) {
            tracing::error!("Ignoring selection event {:?}: {}", event, e);
        }
    }
}
