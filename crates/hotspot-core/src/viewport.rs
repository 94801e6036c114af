//! Output size and the projection aspect derived from it

/// Render target dimensions in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    width: u32,
    height: u32,
    aspect: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        let mut viewport = Self {
            width: 1,
            height: 1,
            aspect: 1.0,
        };
        viewport.resize(width, height);
        viewport
    }

    /// Update the output size and aspect ratio together
    ///
    /// Returns false and leaves the viewport unchanged when either dimension
    /// is zero (minimised window), since no aspect can be derived from it.
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        if width == self.width && height == self.height {
            return false;
        }
        self.width = width;
        self.height = height;
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Aspect ratio used for the camera projection
    pub fn aspect(&self) -> f32 {
        self.aspect
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_updates_size_and_aspect() {
        let mut viewport = Viewport::new(1920, 1080);
        assert!((viewport.aspect() - 1920.0 / 1080.0).abs() < 1e-6);

        assert!(viewport.resize(800, 600));
        assert_eq!((viewport.width(), viewport.height()), (800, 600));
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_size_is_ignored() {
        let mut viewport = Viewport::new(800, 600);
        assert!(!viewport.resize(0, 600));
        assert!(!viewport.resize(800, 0));
        assert_eq!((viewport.width(), viewport.height()), (800, 600));
        assert!((viewport.aspect() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn test_same_size_reports_no_change() {
        let mut viewport = Viewport::new(800, 600);
        assert!(!viewport.resize(800, 600));
    }
}
