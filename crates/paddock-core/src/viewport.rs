//! Render surface dimensions

use crate::error::ViewportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewportError> {
        if width == 0 || height == 0 {
            return Err(ViewportError::ZeroDimension { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Adopt a new container size and return the new aspect ratio. A zero
    /// dimension (e.g. a minimised window) is rejected and the previous size
    /// kept.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<f32, ViewportError> {
        *self = Self::new(width, height)?;
        Ok(self.aspect_ratio())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}
