/// Decoded textures and the cache that owns them
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::algebra::Vector2;
use crate::color::Color;
use crate::error::ArgumentError;

/// Immutable RGB pixel grid, row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    width: usize,
    height: usize,
    pixels: Vec<Color>,
}

impl Texture {
    pub fn new(width: usize, height: usize, pixels: Vec<Color>) -> Result<Self, ArgumentError> {
        if width == 0 || height == 0 {
            return Err(ArgumentError::new("texture dimensions must be non-zero"));
        }
        if pixels.len() != width * height {
            return Err(ArgumentError::new(format!(
                "texture expects {} pixels, got {}",
                width * height,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Two-color checkerboard, handy as a stand-in texture.
    pub fn checkerboard(size: usize, cells: usize, a: Color, b: Color) -> Self {
        let size = size.max(1);
        let cell = (size / cells.max(1)).max(1);
        let pixels = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                if (x / cell + y / cell) % 2 == 0 {
                    a
                } else {
                    b
                }
            })
            .collect();
        Self {
            width: size,
            height: size,
            pixels,
        }
    }

    /// Decode an image file (PNG, JPEG or BMP).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|e| TextureError::Decode {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let rgb = img.to_rgb8();
        let (width, height) = rgb.dimensions();
        let pixels = rgb.pixels().map(|p| Color::new(p[0], p[1], p[2])).collect();
        debug!(path = %path.display(), width, height, "decoded texture");
        Ok(Self {
            width: width as usize,
            height: height as usize,
            pixels,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel(&self, x: usize, y: usize) -> Color {
        self.pixels[y.min(self.height - 1) * self.width + x.min(self.width - 1)]
    }

    /// Nearest texel for UV already inside [0, 1]. V grows upward.
    fn nearest(&self, u: f64, v: f64) -> Color {
        let x = ((u * self.width as f64) as usize).min(self.width - 1);
        let y = (((1.0 - v) * self.height as f64) as usize).min(self.height - 1);
        self.pixel(x, y)
    }

    /// Display sampling: UV clamped into [0, 1].
    pub fn sample_clamped(&self, uv: Vector2) -> Color {
        let u = if uv.x.is_nan() { 0.0 } else { uv.x.clamp(0.0, 1.0) };
        let v = if uv.y.is_nan() { 0.0 } else { uv.y.clamp(0.0, 1.0) };
        self.nearest(u, v)
    }

    /// Raw pixel lookup: UV wrapped by subtracting its floor, so the
    /// texture repeats.
    pub fn sample_wrapped(&self, uv: Vector2) -> Color {
        let wrap = |t: f64| {
            if t.is_finite() {
                t - t.floor()
            } else {
                0.0
            }
        };
        self.nearest(wrap(uv.x), wrap(uv.y))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextureError {
    Decode { path: String, message: String },
}

impl fmt::Display for TextureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextureError::Decode { path, message } => {
                write!(f, "failed to load texture {}: {}", path, message)
            }
        }
    }
}

impl std::error::Error for TextureError {}

/// Owns decoded textures by key. Construct once and lend it to whatever
/// needs lookups; entries are shared read-only.
#[derive(Debug, Default, Clone)]
pub struct TextureCache {
    textures: HashMap<String, Arc<Texture>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, texture: Texture) -> Arc<Texture> {
        let texture = Arc::new(texture);
        self.textures.insert(key.into(), Arc::clone(&texture));
        texture
    }

    /// Decodes `path` unless a texture is already cached under `key`.
    pub fn load<P: AsRef<Path>>(
        &mut self,
        key: impl Into<String>,
        path: P,
    ) -> Result<Arc<Texture>, TextureError> {
        let key = key.into();
        if let Some(existing) = self.textures.get(&key) {
            return Ok(Arc::clone(existing));
        }
        let texture = Texture::from_file(path)?;
        Ok(self.insert(key, texture))
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Texture>> {
        self.textures.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<Texture>> {
        self.textures.remove(key)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}
