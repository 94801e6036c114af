//! Hotspot Core - Engine-independent state for the hotspot viewer
//!
//! This crate owns everything about the viewer that does not need a renderer:
//! - Panel set and the selection dispatcher that keeps at most one panel open
//! - Marker registry mapping clickable hotspots to panels
//! - Scene configuration (camera, lights, markers, labels, panels) loaded from TOML
//! - Viewport state, model load tracking and label layout math

pub mod config;
pub mod label;
pub mod load;
pub mod marker;
pub mod panel;
pub mod selection;
pub mod viewport;

pub use config::{ConfigError, SceneConfig};
pub use load::ModelLoad;
pub use marker::{Marker, MarkerId, MarkerRegistry};
pub use panel::{Panel, PanelId, PanelSet};
pub use selection::{ActivePanel, PanelView, SelectionDispatcher, SelectionError, SelectionEvent};
pub use viewport::Viewport;
