//! Hotspot Viewer - interactive 3D hotspot scene
//!
//! Renders a glTF model with clickable markers; each marker opens its info
//! panel. Runs in the browser on a `#viewer-canvas` element or natively.

pub mod app;

pub use app::{build_app, default_config, parse_level, run, ViewerOptions};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// WASM entry point
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn main() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging with filtering to reduce noise
    tracing_wasm::set_as_global_default_with_config(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(tracing::Level::WARN)
            .build(),
    );

    let config = match default_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid embedded scene: {}", e);
            return;
        }
    };

    if let Err(e) = run(config, &ViewerOptions::default()) {
        tracing::error!("Viewer failed to start: {}", e);
    }
}
