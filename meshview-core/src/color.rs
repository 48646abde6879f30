/// 24-bit RGB colors
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);
    pub const GREY: Color = Color::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Scales brightness by `intensity` (clamped to 0..=1). Every channel is
    /// scaled by the same factor, which keeps hue and saturation.
    pub fn scale_brightness(self, intensity: f64) -> Self {
        let i = intensity.clamp(0.0, 1.0);
        let scale = |c: u8| (c as f64 * i).round() as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }

    pub fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Color {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}
