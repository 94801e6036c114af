//! Label panel layout
//!
//! Labels are authored in canvas pixels (origin top-left, y down) on a canvas
//! of `canvas_size`, and the canvas is stretched over a `panel_size` rectangle
//! in the scene. This module maps between the two.

use crate::config::LabelsConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelLayout {
    canvas: [f32; 2],
    panel: [f32; 2],
}

impl LabelLayout {
    pub fn new(canvas: [f32; 2], panel: [f32; 2]) -> Self {
        Self { canvas, panel }
    }

    pub fn from_config(config: &LabelsConfig) -> Self {
        Self::new(config.canvas_size, config.panel_size)
    }

    /// Panel-local point (x right, y up, origin at panel center) for a canvas pixel
    pub fn to_local(&self, left: f32, top: f32) -> [f32; 2] {
        let u = left / self.canvas[0];
        let v = top / self.canvas[1];
        [(u - 0.5) * self.panel[0], (0.5 - v) * self.panel[1]]
    }

    /// World height of a length given in canvas pixels
    pub fn world_height(&self, pixels: f32) -> f32 {
        pixels / self.canvas[1] * self.panel[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_corners_map_to_panel_corners() {
        let layout = LabelLayout::new([512.0, 512.0], [2.0, 2.0]);
        assert_eq!(layout.to_local(0.0, 0.0), [-1.0, 1.0]);
        assert_eq!(layout.to_local(512.0, 512.0), [1.0, -1.0]);
        assert_eq!(layout.to_local(256.0, 256.0), [0.0, 0.0]);
    }

    #[test]
    fn test_non_square_panel() {
        let layout = LabelLayout::new([400.0, 200.0], [4.0, 1.0]);
        assert_eq!(layout.to_local(100.0, 50.0), [-1.0, 0.25]);
        assert_eq!(layout.world_height(40.0), 0.2);
    }

    #[test]
    fn test_default_labels_fit_panel() {
        let config = LabelsConfig::default();
        let layout = LabelLayout::from_config(&config);
        let [x, y] = layout.to_local(config.elements[0].left, config.elements[0].top);
        assert!((x - 0.15234375).abs() < 1e-6);
        assert!((y - 0.86328125).abs() < 1e-6);
    }
}
