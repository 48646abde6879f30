/// Software rasterizer: transform, project, scan-convert, depth-test, shade

pub mod framebuffer;
pub mod projector;

pub use framebuffer::{ColorBuffer, DepthBuffer};
pub use projector::{ScreenPoint, ScreenProjector};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::algebra::{Vector2, Vector3};
use crate::color::Color;
use crate::mesh::{Mesh, Polygon};
use crate::normals::{face_normal, face_toward_viewer};
use crate::texture::{Texture, TextureCache};
use crate::transform::{model_matrix, Transform};

/// Twice-area below which a projected triangle is dropped.
const DEGENERATE_AREA: f64 = 1e-4;

/// Barycentric slack that keeps shared edges covered.
const EDGE_TOLERANCE: f64 = -1e-4;

/// How UVs outside [0, 1] are brought back onto the texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureSampling {
    /// Clamp into [0, 1] (display sampling).
    #[default]
    Clamp,
    /// Subtract the floor, repeating the texture.
    Wrap,
}

/// Mode flags and lighting state for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Stored for callers; no line drawing is done for it.
    pub wireframe: bool,
    pub texture: bool,
    pub lighting: bool,
    pub sampling: TextureSampling,
    pub ambient: f64,
    pub diffuse: f64,
    /// Direction toward the light; normalized when a frame starts.
    pub light_direction: Vector3,
    pub background: Color,
    pub projector: ScreenProjector,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            wireframe: false,
            texture: true,
            lighting: true,
            sampling: TextureSampling::Clamp,
            ambient: 0.2,
            diffuse: 0.8,
            light_direction: Vector3::new(0.3, 0.5, -1.0),
            background: Color::new(24, 24, 32),
            projector: ScreenProjector::default(),
        }
    }
}

/// One entry of the render input.
#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    /// Triangulated mesh, ideally with cached face normals.
    pub mesh: Mesh,
    pub transform: Transform,
    pub color: Color,
    /// Key into the [`TextureCache`].
    pub texture: Option<String>,
    pub visible: bool,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            mesh,
            transform: Transform::identity(),
            color: Color::WHITE,
            texture: None,
            visible: true,
        }
    }
}

/// Counters for one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub objects: usize,
    pub triangles: usize,
    pub skipped: usize,
    pub pixels: usize,
}

/// Per-triangle shading inputs, fixed before scan conversion.
struct Shading<'a> {
    base: Color,
    texture: Option<&'a Texture>,
    uvs: [Vector2; 3],
    intensity: Option<f64>,
}

/// Owns the color and depth buffers and draws scenes into them.
pub struct Rasterizer {
    color: ColorBuffer,
    depth: DepthBuffer,
    pub settings: RenderSettings,
}

impl Rasterizer {
    pub fn new(width: usize, height: usize, settings: RenderSettings) -> Self {
        Self {
            color: ColorBuffer::new(width, height, settings.background),
            depth: DepthBuffer::new(width, height),
            settings,
        }
    }

    pub fn width(&self) -> usize {
        self.color.width()
    }

    pub fn height(&self) -> usize {
        self.color.height()
    }

    pub fn color_buffer(&self) -> &ColorBuffer {
        &self.color
    }

    pub fn depth_buffer(&self) -> &DepthBuffer {
        &self.depth
    }

    /// Reallocates both buffers for a new output size.
    pub fn resize(&mut self, width: usize, height: usize) {
        if width == self.width() && height == self.height() {
            return;
        }
        debug!(width, height, "resizing framebuffer");
        self.color = ColorBuffer::new(width, height, self.settings.background);
        self.depth = DepthBuffer::new(width, height);
    }

    pub fn clear(&mut self) {
        self.color.clear(self.settings.background);
        self.depth.clear();
    }

    /// Renders one frame of `objects` into the color buffer.
    pub fn render_scene(&mut self, objects: &[SceneObject], textures: &TextureCache) -> FrameStats {
        self.clear();
        let mut stats = FrameStats::default();
        let light = self.settings.light_direction.normalize().ok();

        for object in objects.iter().filter(|o| o.visible) {
            stats.objects += 1;
            let texture = if self.settings.texture {
                self.resolve_texture(object, textures)
            } else {
                None
            };
            let model = model_matrix(&object.transform);

            for polygon in object.mesh.polygons() {
                if !polygon.is_triangle() {
                    stats.skipped += 1;
                    continue;
                }
                let Some(screen) = self.project_triangle(&object.mesh, polygon, |p| {
                    model.transform_point(p)
                }) else {
                    stats.skipped += 1;
                    continue;
                };

                let shading = Shading {
                    base: object.color,
                    texture,
                    uvs: [0, 1, 2].map(|c| object.mesh.corner_uv(polygon, c)),
                    intensity: self.light_intensity(&object.mesh, polygon, light),
                };
                match self.rasterize_triangle(&screen, &shading) {
                    Some(pixels) => {
                        stats.triangles += 1;
                        stats.pixels += pixels;
                    }
                    None => stats.skipped += 1,
                }
            }
        }

        debug!(
            objects = stats.objects,
            triangles = stats.triangles,
            skipped = stats.skipped,
            pixels = stats.pixels,
            "frame rendered"
        );
        stats
    }

    fn resolve_texture<'t>(&self, object: &SceneObject, textures: &'t TextureCache) -> Option<&'t Texture> {
        let key = object.texture.as_deref()?;
        match textures.get(key) {
            Some(texture) => Some(texture.as_ref()),
            None => {
                warn!(object = %object.name, key, "texture not in cache");
                None
            }
        }
    }

    fn project_triangle(
        &self,
        mesh: &Mesh,
        polygon: &Polygon,
        to_world: impl Fn(Vector3) -> Vector3,
    ) -> Option<[ScreenPoint; 3]> {
        let (width, height) = (self.width(), self.height());
        let idx = polygon.vertex_indices();
        let mut out = [ScreenPoint {
            x: 0.0,
            y: 0.0,
            depth: 0.0,
        }; 3];
        for (slot, &i) in out.iter_mut().zip(idx) {
            let world = to_world(mesh.vertex(i)?.position);
            *slot = self.settings.projector.project(world, width, height)?;
        }
        Some(out)
    }

    /// Flat lighting factor for a triangle, or `None` when lighting is off.
    fn light_intensity(&self, mesh: &Mesh, polygon: &Polygon, light: Option<Vector3>) -> Option<f64> {
        if !self.settings.lighting {
            return None;
        }
        let normal = polygon
            .normal()
            .or_else(|| face_normal(mesh, polygon).ok())
            .map(face_toward_viewer);
        let diffuse = match (normal, light) {
            (Some(n), Some(l)) => n.dot(l).clamp(0.0, 1.0),
            _ => 0.0,
        };
        Some((self.settings.ambient + self.settings.diffuse * diffuse).clamp(0.0, 1.0))
    }

    /// Scan-converts one triangle. Returns the number of pixels written, or
    /// `None` if the triangle is degenerate on screen.
    fn rasterize_triangle(&mut self, v: &[ScreenPoint; 3], shading: &Shading<'_>) -> Option<usize> {
        let area = edge(v[0], v[1], v[2].x, v[2].y);
        if area.abs() < DEGENERATE_AREA || !area.is_finite() {
            return None;
        }
        let (width, height) = (self.width() as i64, self.height() as i64);
        if width == 0 || height == 0 {
            return Some(0);
        }

        // Bounding box
        let min_x = v.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor() as i64;
        let max_x = v.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;
        let min_y = v.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor() as i64;
        let max_y = v.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(width - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(height - 1);

        let mut written = 0;
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                let w0 = edge(v[1], v[2], px, py) / area;
                let w1 = edge(v[2], v[0], px, py) / area;
                let w2 = edge(v[0], v[1], px, py) / area;
                if w0 < EDGE_TOLERANCE || w1 < EDGE_TOLERANCE || w2 < EDGE_TOLERANCE {
                    continue;
                }

                let depth = w0 * v[0].depth + w1 * v[1].depth + w2 * v[2].depth;
                let (ux, uy) = (x as usize, y as usize);
                if self.depth.test_and_set(ux, uy, depth) {
                    let color = self.shade([w0, w1, w2], shading);
                    self.color.set(ux, uy, color);
                    written += 1;
                }
            }
        }
        Some(written)
    }

    fn shade(&self, weights: [f64; 3], shading: &Shading<'_>) -> Color {
        let mut color = shading.base;
        if let Some(texture) = shading.texture {
            let [a, b, c] = shading.uvs;
            let uv = a * weights[0] + b * weights[1] + c * weights[2];
            color = match self.settings.sampling {
                TextureSampling::Clamp => texture.sample_clamped(uv),
                TextureSampling::Wrap => texture.sample_wrapped(uv),
            };
        }
        match shading.intensity {
            Some(intensity) => color.scale_brightness(intensity),
            None => color,
        }
    }
}

/// 2D edge function: twice the signed area of (a, b, p).
fn edge(a: ScreenPoint, b: ScreenPoint, px: f64, py: f64) -> f64 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Vertex;
    use crate::normals::compute_normals;
    use crate::transform::Rotation;
    use crate::triangulate::triangulate_model;

    const RED: Color = Color::new(255, 0, 0);
    const BLUE: Color = Color::new(0, 0, 255);

    fn flat_settings() -> RenderSettings {
        RenderSettings {
            texture: false,
            lighting: false,
            background: Color::BLACK,
            ..RenderSettings::default()
        }
    }

    /// Axis-aligned square in the plane z, ready to render.
    fn square(half: f64, z: f64) -> Mesh {
        let mut mesh = Mesh::new();
        for (x, y) in [(-half, -half), (half, -half), (half, half), (-half, half)] {
            mesh.add_vertex(Vertex::new(x, y, z));
        }
        for uv in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.add_texture_coord(Vector2::new(uv.0, uv.1));
        }
        let polygon = Polygon::new(vec![0, 1, 2, 3])
            .unwrap()
            .with_texture_indices(vec![0, 1, 2, 3])
            .unwrap();
        mesh.add_polygon(polygon).unwrap();
        triangulate_model(&mut mesh).unwrap();
        compute_normals(&mut mesh).unwrap();
        mesh
    }

    fn object(name: &str, mesh: Mesh, color: Color) -> SceneObject {
        SceneObject {
            color,
            ..SceneObject::new(name, mesh)
        }
    }

    #[test]
    fn test_empty_scene_is_background() {
        let mut r = Rasterizer::new(8, 6, flat_settings());
        let stats = r.render_scene(&[], &TextureCache::new());
        assert_eq!(stats, FrameStats::default());
        assert!(r.color_buffer().pixels().iter().all(|&c| c == Color::BLACK));
        assert_eq!(r.depth_buffer().get(3, 3), Some(f64::INFINITY));
    }

    #[test]
    fn test_flat_square_covers_center() {
        let mut r = Rasterizer::new(32, 32, flat_settings());
        let scene = [object("square", square(1.0, 0.0), RED)];
        let stats = r.render_scene(&scene, &TextureCache::new());
        assert_eq!(stats.triangles, 2);
        assert!(stats.pixels > 0);
        assert_eq!(r.color_buffer().get(16, 16), Some(RED));
        assert_eq!(r.color_buffer().get(0, 0), Some(Color::BLACK));
        let depth = r.depth_buffer().get(16, 16).unwrap();
        assert!((depth - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_nearer_object_wins_in_either_order() {
        let near = object("near", square(0.5, -1.0), RED);
        let far = object("far", square(1.5, 1.0), BLUE);
        for scene in [[near.clone(), far.clone()], [far, near]] {
            let mut r = Rasterizer::new(40, 40, flat_settings());
            r.render_scene(&scene, &TextureCache::new());
            assert_eq!(r.color_buffer().get(20, 20), Some(RED));
            assert!((r.depth_buffer().get(20, 20).unwrap() - 4.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_hidden_objects_are_skipped() {
        let mut r = Rasterizer::new(16, 16, flat_settings());
        let mut hidden = object("hidden", square(1.0, 0.0), RED);
        hidden.visible = false;
        let stats = r.render_scene(&[hidden], &TextureCache::new());
        assert_eq!(stats.objects, 0);
        assert_eq!(r.color_buffer().get(8, 8), Some(Color::BLACK));
    }

    #[test]
    fn test_lighting_scales_brightness() {
        let settings = RenderSettings {
            lighting: true,
            light_direction: Vector3::new(0.0, 0.0, -1.0),
            ..flat_settings()
        };
        let mut r = Rasterizer::new(16, 16, settings);
        let scene = [object("lit", square(1.0, 0.0), Color::new(200, 100, 50))];
        r.render_scene(&scene, &TextureCache::new());
        // Facing the light: ambient + diffuse = 1.
        assert_eq!(r.color_buffer().get(8, 8), Some(Color::new(200, 100, 50)));

        r.settings.light_direction = Vector3::UNIT_X;
        r.render_scene(&scene, &TextureCache::new());
        // Grazing light leaves only the ambient term.
        assert_eq!(r.color_buffer().get(8, 8), Some(Color::new(40, 20, 10)));
    }

    #[test]
    fn test_texture_sampling_and_lighting_combine() {
        let mut textures = TextureCache::new();
        textures.insert("checker", Texture::checkerboard(2, 2, RED, BLUE));
        let settings = RenderSettings {
            texture: true,
            ..flat_settings()
        };
        let mut r = Rasterizer::new(64, 64, settings);
        let mut textured = object("textured", square(1.0, 0.0), Color::WHITE);
        textured.texture = Some("checker".to_string());
        let scene = [textured];

        r.render_scene(&scene, &textures);
        // Top-left quadrant of the square is UV (low u, high v): texel (0, 0).
        let top_left = r.color_buffer().get(28, 28).unwrap();
        let bottom_left = r.color_buffer().get(28, 36).unwrap();
        assert_eq!(top_left, RED);
        assert_eq!(bottom_left, BLUE);

        r.settings.lighting = true;
        r.settings.light_direction = Vector3::UNIT_X;
        r.render_scene(&scene, &textures);
        assert_eq!(r.color_buffer().get(28, 28), Some(RED.scale_brightness(0.2)));

        // Missing key falls back to the flat color.
        let mut missing = scene[0].clone();
        missing.texture = Some("nope".to_string());
        r.settings.lighting = false;
        r.render_scene(&[missing], &textures);
        assert_eq!(r.color_buffer().get(28, 28), Some(Color::WHITE));
    }

    #[test]
    fn test_transform_moves_object() {
        let mut r = Rasterizer::new(40, 40, flat_settings());
        let mut moved = object("moved", square(0.5, 0.0), RED);
        moved.transform = Transform::new(
            Vector3::new(1.5, 0.0, 0.0),
            Rotation::new(0.0, 0.0, 45.0),
            Vector3::new(1.0, 1.0, 1.0),
        );
        r.render_scene(&[moved], &TextureCache::new());
        assert_eq!(r.color_buffer().get(20, 20), Some(Color::BLACK));
        let lit = r.color_buffer().pixels().iter().filter(|&&c| c == RED).count();
        assert!(lit > 0);
        // Everything drawn sits right of center.
        for (y, row) in r.color_buffer().rows().enumerate() {
            for (x, &c) in row.iter().enumerate() {
                if c == RED {
                    assert!(x > 20, "pixel ({}, {}) left of center", x, y);
                }
            }
        }
    }

    #[test]
    fn test_triangles_behind_eye_are_skipped() {
        let mut r = Rasterizer::new(16, 16, flat_settings());
        let scene = [object("behind", square(1.0, -10.0), RED)];
        let stats = r.render_scene(&scene, &TextureCache::new());
        assert_eq!(stats.triangles, 0);
        assert_eq!(stats.skipped, 2);
        assert!(r.color_buffer().pixels().iter().all(|&c| c == Color::BLACK));
    }

    #[test]
    fn test_non_triangles_are_skipped() {
        let mut mesh = Mesh::cube(1.0);
        compute_normals(&mut mesh).unwrap();
        let mut r = Rasterizer::new(16, 16, flat_settings());
        let stats = r.render_scene(&[object("quads", mesh, RED)], &TextureCache::new());
        assert_eq!(stats.skipped, 6);
        assert_eq!(stats.triangles, 0);
    }

    #[test]
    fn test_resize_reallocates_and_clears() {
        let mut r = Rasterizer::new(16, 16, flat_settings());
        r.render_scene(&[object("square", square(1.0, 0.0), RED)], &TextureCache::new());
        r.resize(10, 5);
        assert_eq!((r.width(), r.height()), (10, 5));
        assert_eq!(r.depth_buffer().width(), 10);
        assert_eq!(r.depth_buffer().get(5, 2), Some(f64::INFINITY));
        assert_eq!(r.color_buffer().pixels().len(), 50);
    }
}
