/// Color and depth buffers owned by the rasterizer
use crate::color::Color;

/// Row-major grid of colors, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl ColorBuffer {
    pub fn new(width: usize, height: usize, fill: Color) -> Self {
        Self {
            width,
            height,
            pixels: vec![fill; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        self.pixels.fill(color);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = color;
        }
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Iterate rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Color]> {
        self.pixels.chunks(self.width.max(1))
    }
}

/// One depth per pixel. A write lands only when it is nearer the eye than
/// what is stored, where nearer means a smaller magnitude.
#[derive(Debug, Clone, PartialEq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    depth: Vec<f64>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: vec![f64::INFINITY; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth.fill(f64::INFINITY);
    }

    pub fn get(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.depth[y * self.width + x])
    }

    /// Stores `depth` if it beats the current value and reports whether it
    /// did. Out-of-bounds writes never pass.
    pub fn test_and_set(&mut self, x: usize, y: usize, depth: f64) -> bool {
        if x >= self.width || y >= self.height || depth.is_nan() {
            return false;
        }
        let slot = &mut self.depth[y * self.width + x];
        if depth.abs() < slot.abs() {
            *slot = depth;
            true
        } else {
            false
        }
    }
}
