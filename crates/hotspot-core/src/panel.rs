//! Informational panels opened by markers

use serde::{Deserialize, Serialize};

/// Index of a panel within the [`PanelSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PanelId(pub usize);

impl PanelId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for PanelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content of a single panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    /// Heading shown at the top of the panel
    pub title: String,
    /// Body text
    #[serde(default)]
    pub body: String,
}

impl Panel {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Ordered collection of panels, indexed `0..len`
///
/// Built once at startup. Panels are never removed, so a [`PanelId`] that was
/// valid once stays valid for the lifetime of the set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PanelSet {
    panels: Vec<Panel>,
}

impl PanelSet {
    pub fn new(panels: Vec<Panel>) -> Self {
        Self { panels }
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn contains(&self, id: PanelId) -> bool {
        id.0 < self.panels.len()
    }

    pub fn get(&self, id: PanelId) -> Option<&Panel> {
        self.panels.get(id.0)
    }

    /// Iterate panels together with their ids
    pub fn iter(&self) -> impl Iterator<Item = (PanelId, &Panel)> {
        self.panels.iter().enumerate().map(|(i, p)| (PanelId(i), p))
    }
}

impl FromIterator<Panel> for PanelSet {
    fn from_iter<T: IntoIterator<Item = Panel>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
