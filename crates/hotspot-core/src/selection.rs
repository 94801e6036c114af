//! Selection dispatcher - which panel is open
//!
//! The dispatcher holds an explicit [`ActivePanel`] state. At most one panel
//! is active at any time: activating a panel closes every other panel first,
//! and closing clears all of them. Presentation layers read
//! [`SelectionDispatcher::presentation`] instead of keeping their own flags.

use thiserror::Error;

use crate::marker::{MarkerId, MarkerRegistry};
use crate::panel::{Panel, PanelId, PanelSet};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("Panel index {index} out of range (panel set has {len} entries)")]
    PanelOutOfRange { index: usize, len: usize },
    #[error("Unknown marker: {0}")]
    UnknownMarker(MarkerId),
}

/// Currently open panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivePanel {
    #[default]
    None,
    Index(PanelId),
}

impl ActivePanel {
    pub fn id(self) -> Option<PanelId> {
        match self {
            Self::None => None,
            Self::Index(id) => Some(id),
        }
    }
}

/// Input that changes the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A marker in the scene was clicked
    MarkerClicked(MarkerId),
    /// The close control of the open panel was clicked
    CloseClicked,
}

/// Per-panel presentation state derived from the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelView {
    pub id: PanelId,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionDispatcher {
    panels: PanelSet,
    active: ActivePanel,
}

impl SelectionDispatcher {
    /// Create a dispatcher with no panel active
    pub fn new(panels: PanelSet) -> Self {
        Self {
            panels,
            active: ActivePanel::None,
        }
    }

    /// Make `id` the only active panel
    ///
    /// On an out-of-range id the state is left untouched.
    pub fn activate(&mut self, id: PanelId) -> Result<(), SelectionError> {
        if !self.panels.contains(id) {
            return Err(SelectionError::PanelOutOfRange {
                index: id.0,
                len: self.panels.len(),
            });
        }
        if self.active != ActivePanel::Index(id) {
            tracing::info!(panel = %id, "Panel activated");
        }
        self.active = ActivePanel::Index(id);
        Ok(())
    }

    /// Close every panel
    pub fn deactivate_all(&mut self) {
        if let ActivePanel::Index(id) = self.active {
            tracing::info!(panel = %id, "Panel closed");
        }
        self.active = ActivePanel::None;
    }

    /// Apply a click event, resolving markers through `registry`
    pub fn handle(
        &mut self,
        registry: &MarkerRegistry,
        event: SelectionEvent,
    ) -> Result<(), SelectionError> {
        match event {
            SelectionEvent::MarkerClicked(marker) => {
                let panel = registry.resolve(marker)?;
                self.activate(panel)
            }
            SelectionEvent::CloseClicked => {
                self.deactivate_all();
                Ok(())
            }
        }
    }

    pub fn active(&self) -> ActivePanel {
        self.active
    }

    pub fn is_active(&self, id: PanelId) -> bool {
        self.active == ActivePanel::Index(id)
    }

    pub fn active_count(&self) -> usize {
        self.presentation().iter().filter(|v| v.is_active).count()
    }

    /// The open panel and its content
    pub fn active_panel(&self) -> Option<(PanelId, &Panel)> {
        let id = self.active.id()?;
        self.panels.get(id).map(|p| (id, p))
    }

    pub fn panels(&self) -> &PanelSet {
        &self.panels
    }

    /// Active flag for every panel, in panel order
    pub fn presentation(&self) -> Vec<PanelView> {
        self.panels
            .iter()
            .map(|(id, _)| PanelView {
                id,
                is_active: self.is_active(id),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::Marker;

    fn dispatcher(n: usize) -> SelectionDispatcher {
        SelectionDispatcher::new(
            (0..n)
                .map(|i| Panel::new(format!("Panel {}", i + 1), ""))
                .collect(),
        )
    }

    fn active_ids(d: &SelectionDispatcher) -> Vec<usize> {
        d.presentation()
            .into_iter()
            .filter(|v| v.is_active)
            .map(|v| v.id.0)
            .collect()
    }

    #[test]
    fn test_initially_nothing_active() {
        let d = dispatcher(3);
        assert_eq!(d.active(), ActivePanel::None);
        assert_eq!(d.active_count(), 0);
        assert!(d.active_panel().is_none());
    }

    #[test]
    fn test_activate_each_valid_panel() {
        for k in 0..4 {
            let mut d = dispatcher(4);
            d.activate(PanelId(k)).unwrap();
            assert_eq!(active_ids(&d), vec![k]);
            assert!(d.is_active(PanelId(k)));
        }
    }

    #[test]
    fn test_activate_replaces_previous() {
        let mut d = dispatcher(3);
        d.activate(PanelId(0)).unwrap();
        d.activate(PanelId(2)).unwrap();

        assert_eq!(active_ids(&d), vec![2]);
        assert_eq!(d.active(), ActivePanel::Index(PanelId(2)));
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut once = dispatcher(3);
        once.activate(PanelId(1)).unwrap();

        let mut twice = dispatcher(3);
        twice.activate(PanelId(1)).unwrap();
        twice.activate(PanelId(1)).unwrap();

        assert_eq!(once.presentation(), twice.presentation());
    }

    #[test]
    fn test_deactivate_all_from_any_state() {
        let mut d = dispatcher(3);
        d.deactivate_all();
        assert_eq!(d.active_count(), 0);

        d.activate(PanelId(1)).unwrap();
        d.deactivate_all();
        assert_eq!(d.active_count(), 0);
        assert_eq!(d.active(), ActivePanel::None);

        d.deactivate_all();
        assert_eq!(d.active(), ActivePanel::None);
    }

    #[test]
    fn test_out_of_range_activation_fails() {
        let mut d = dispatcher(3);
        d.activate(PanelId(1)).unwrap();

        let err = d.activate(PanelId(3)).unwrap_err();
        assert_eq!(err, SelectionError::PanelOutOfRange { index: 3, len: 3 });
        // State untouched
        assert_eq!(active_ids(&d), vec![1]);
    }

    #[test]
    fn test_click_scenario() {
        let mut registry = MarkerRegistry::new(3);
        let markers: Vec<MarkerId> = (0..3)
            .map(|i| {
                registry
                    .register(
                        Marker {
                            name: format!("circle{}", i + 1),
                            position: [0.0; 3],
                            rotation: [0.0; 3],
                        },
                        PanelId(i),
                    )
                    .unwrap()
            })
            .collect();
        let mut d = dispatcher(3);
        assert_eq!(d.active_count(), 0);

        d.handle(&registry, SelectionEvent::MarkerClicked(markers[1])).unwrap();
        assert_eq!(active_ids(&d), vec![1]);

        d.handle(&registry, SelectionEvent::CloseClicked).unwrap();
        assert_eq!(d.active_count(), 0);

        d.handle(&registry, SelectionEvent::MarkerClicked(markers[0])).unwrap();
        d.handle(&registry, SelectionEvent::MarkerClicked(markers[2])).unwrap();
        assert_eq!(active_ids(&d), vec![2]);
        assert_eq!(d.active_panel().unwrap().1.title, "Panel 3");
    }

    #[test]
    fn test_unknown_marker_is_reported() {
        let registry = MarkerRegistry::new(3);
        let mut d = dispatcher(3);
        let err = d
            .handle(&registry, SelectionEvent::MarkerClicked(MarkerId(7)))
            .unwrap_err();
        assert_eq!(err, SelectionError::UnknownMarker(MarkerId(7)));
        assert_eq!(d.active_count(), 0);
    }
}
