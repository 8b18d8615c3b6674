//! Scene lighting environment

use serde::{Deserialize, Serialize};

/// Sky/ground gradient used when no environment map is available
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientLighting {
    /// sRGB `0xRRGGBB`
    pub sky: u32,
    pub ground: u32,
    pub intensity: f32,
}

impl GradientLighting {
    pub const DEFAULT: GradientLighting = GradientLighting {
        sky: 0xffffbb,
        ground: 0x080820,
        intensity: 2.0,
    };

    pub fn sky_rgb(&self) -> [u8; 3] {
        rgb(self.sky)
    }

    pub fn ground_rgb(&self) -> [u8; 3] {
        rgb(self.ground)
    }
}

impl Default for GradientLighting {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn rgb(hex: u32) -> [u8; 3] {
    [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8]
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    /// No environment load has settled yet
    Pending,
    /// Image-based lighting from a loaded map
    Map { locator: String },
    Fallback(GradientLighting),
}

impl Environment {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Environment::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_channels() {
        let lighting = GradientLighting::default();
        assert_eq!(lighting.sky_rgb(), [0xff, 0xff, 0xbb]);
        assert_eq!(lighting.ground_rgb(), [0x08, 0x08, 0x20]);
    }
}
