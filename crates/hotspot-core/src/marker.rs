//! Marker registry - clickable hotspots and the panels they open

use serde::{Deserialize, Serialize};

use crate::panel::PanelId;
use crate::selection::SelectionError;

/// Position of a marker within the [`MarkerRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkerId(pub usize);

impl std::fmt::Display for MarkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "marker-{}", self.0)
    }
}

/// A hotspot placed in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub name: String,
    /// World position (x, y, z)
    pub position: [f32; 3],
    /// Euler XYZ rotation in radians
    pub rotation: [f32; 3],
}

#[derive(Debug, Clone)]
struct Entry {
    marker: Marker,
    panel: PanelId,
}

/// Ordered list of markers, each bound to one panel
///
/// Registration happens once during scene assembly. There is no removal:
/// a marker id stays valid for the lifetime of the viewer.
#[derive(Debug, Clone, Default)]
pub struct MarkerRegistry {
    entries: Vec<Entry>,
    panel_count: usize,
}

impl MarkerRegistry {
    /// Create a registry for a panel set with `panel_count` entries
    pub fn new(panel_count: usize) -> Self {
        Self {
            entries: Vec::new(),
            panel_count,
        }
    }

    /// Associate a marker with a panel, returning the marker's id
    pub fn register(&mut self, marker: Marker, panel: PanelId) -> Result<MarkerId, SelectionError> {
        if panel.0 >= self.panel_count {
            return Err(SelectionError::PanelOutOfRange {
                index: panel.0,
                len: self.panel_count,
            });
        }

        let id = MarkerId(self.entries.len());
        tracing::debug!(marker = %marker.name, %panel, "Registered marker {}", id);
        self.entries.push(Entry { marker, panel });
        Ok(id)
    }

    /// Panel opened by the given marker
    pub fn resolve(&self, id: MarkerId) -> Result<PanelId, SelectionError> {
        self.entries
            .get(id.0)
            .map(|e| e.panel)
            .ok_or(SelectionError::UnknownMarker(id))
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.entries.get(id.0).map(|e| &e.marker)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate markers in registration order
    pub fn iter(&self) -> impl Iterator<Item = (MarkerId, &Marker, PanelId)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (MarkerId(i), &e.marker, e.panel))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marker(name: &str) -> Marker {
        Marker {
            name: name.to_string(),
            position: [0.0; 3],
            rotation: [0.0; 3],
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = MarkerRegistry::new(3);
        let a = registry.register(marker("a"), PanelId(2)).unwrap();
        let b = registry.register(marker("b"), PanelId(0)).unwrap();

        assert_eq!(a, MarkerId(0));
        assert_eq!(b, MarkerId(1));
        assert_eq!(registry.resolve(a).unwrap(), PanelId(2));
        assert_eq!(registry.resolve(b).unwrap(), PanelId(0));
        assert_eq!(registry.get(b).unwrap().name, "b");
    }

    #[test]
    fn test_register_rejects_out_of_range_panel() {
        let mut registry = MarkerRegistry::new(2);
        let err = registry.register(marker("bad"), PanelId(2)).unwrap_err();

        assert_eq!(err, SelectionError::PanelOutOfRange { index: 2, len: 2 });
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_unknown_marker() {
        let registry = MarkerRegistry::new(1);
        assert_eq!(
            registry.resolve(MarkerId(0)),
            Err(SelectionError::UnknownMarker(MarkerId(0)))
        );
    }
}
