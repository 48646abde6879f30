/// Vertex and polygon storage for polygonal meshes
use crate::algebra::{Vector2, Vector3};
use crate::error::ArgumentError;

/// A mesh vertex: position plus an optional texture coordinate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub uv: Option<Vector2>,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            uv: None,
        }
    }

    pub fn with_uv(position: Vector3, uv: Vector2) -> Self {
        Self {
            position,
            uv: Some(uv),
        }
    }
}

impl From<Vector3> for Vertex {
    fn from(position: Vector3) -> Self {
        Self { position, uv: None }
    }
}

/// An ordered loop of vertex indices. The order defines the winding.
///
/// `texture_indices` and `normal_indices` are either empty or parallel to
/// `vertex_indices`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertex_indices: Vec<usize>,
    texture_indices: Vec<usize>,
    normal_indices: Vec<usize>,
    normal: Option<Vector3>,
}

impl Polygon {
    pub fn new(vertex_indices: Vec<usize>) -> Result<Self, ArgumentError> {
        if vertex_indices.len() < 3 {
            return Err(ArgumentError::new(format!(
                "polygon needs at least 3 vertices, got {}",
                vertex_indices.len()
            )));
        }
        Ok(Self {
            vertex_indices,
            texture_indices: Vec::new(),
            normal_indices: Vec::new(),
            normal: None,
        })
    }

    pub fn triangle(a: usize, b: usize, c: usize) -> Self {
        Self {
            vertex_indices: vec![a, b, c],
            texture_indices: Vec::new(),
            normal_indices: Vec::new(),
            normal: None,
        }
    }

    pub fn with_texture_indices(mut self, indices: Vec<usize>) -> Result<Self, ArgumentError> {
        check_parallel("texture", &indices, self.vertex_indices.len())?;
        self.texture_indices = indices;
        Ok(self)
    }

    pub fn with_normal_indices(mut self, indices: Vec<usize>) -> Result<Self, ArgumentError> {
        check_parallel("normal", &indices, self.vertex_indices.len())?;
        self.normal_indices = indices;
        Ok(self)
    }

    /// Sub-polygon made of the given corners of this one, carrying the
    /// parallel texture and normal indices along.
    pub(crate) fn select_corners(&self, corners: &[usize]) -> Self {
        let pick = |list: &[usize]| -> Vec<usize> {
            if list.is_empty() {
                Vec::new()
            } else {
                corners.iter().map(|&c| list[c]).collect()
            }
        };
        Self {
            vertex_indices: pick(&self.vertex_indices),
            texture_indices: pick(&self.texture_indices),
            normal_indices: pick(&self.normal_indices),
            normal: None,
        }
    }

    pub fn vertex_indices(&self) -> &[usize] {
        &self.vertex_indices
    }

    pub fn texture_indices(&self) -> &[usize] {
        &self.texture_indices
    }

    pub fn normal_indices(&self) -> &[usize] {
        &self.normal_indices
    }

    pub fn len(&self) -> usize {
        self.vertex_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_indices.is_empty()
    }

    pub fn is_triangle(&self) -> bool {
        self.vertex_indices.len() == 3
    }

    /// Cached face normal, set by the normal calculator.
    pub fn normal(&self) -> Option<Vector3> {
        self.normal
    }

    pub fn set_normal(&mut self, normal: Vector3) {
        self.normal = Some(normal);
    }
}

fn check_parallel(kind: &str, indices: &[usize], expected: usize) -> Result<(), ArgumentError> {
    if !indices.is_empty() && indices.len() != expected {
        return Err(ArgumentError::new(format!(
            "{} index count {} does not match vertex index count {}",
            kind,
            indices.len(),
            expected
        )));
    }
    Ok(())
}

/// A polygonal mesh: vertices, optional texture/normal pools, and polygons
/// that index into them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub texture_coords: Vec<Vector2>,
    pub normals: Vec<Vector3>,
    polygons: Vec<Polygon>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, polygons: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            texture_coords: Vec::new(),
            normals: Vec::new(),
            polygons: Vec::with_capacity(polygons),
        }
    }

    pub fn add_vertex(&mut self, vertex: impl Into<Vertex>) -> usize {
        self.vertices.push(vertex.into());
        self.vertices.len() - 1
    }

    pub fn add_texture_coord(&mut self, uv: Vector2) -> usize {
        self.texture_coords.push(uv);
        self.texture_coords.len() - 1
    }

    pub fn add_normal(&mut self, normal: Vector3) -> usize {
        self.normals.push(normal);
        self.normals.len() - 1
    }

    /// Adds a polygon after checking every index against the current pools.
    pub fn add_polygon(&mut self, polygon: Polygon) -> Result<usize, ArgumentError> {
        check_range("vertex", polygon.vertex_indices(), self.vertices.len())?;
        check_range("texture", polygon.texture_indices(), self.texture_coords.len())?;
        check_range("normal", polygon.normal_indices(), self.normals.len())?;
        self.polygons.push(polygon);
        Ok(self.polygons.len() - 1)
    }

    pub fn vertex(&self, index: usize) -> Option<&Vertex> {
        self.vertices.get(index)
    }

    pub fn polygon(&self, index: usize) -> Option<&Polygon> {
        self.polygons.get(index)
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn polygons_mut(&mut self) -> &mut [Polygon] {
        &mut self.polygons
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn polygon_count(&self) -> usize {
        self.polygons.len()
    }

    /// Position of a vertex, or an error naming the bad index.
    pub fn position(&self, index: usize) -> Result<Vector3, ArgumentError> {
        self.vertices
            .get(index)
            .map(|v| v.position)
            .ok_or_else(|| {
                ArgumentError::new(format!(
                    "vertex index {} out of range (vertex count {})",
                    index,
                    self.vertices.len()
                ))
            })
    }

    pub fn is_triangulated(&self) -> bool {
        self.polygons.iter().all(Polygon::is_triangle)
    }

    /// Swaps in a new polygon list. Indices were validated when the source
    /// polygons were added.
    pub(crate) fn replace_polygons(&mut self, polygons: Vec<Polygon>) {
        self.polygons = polygons;
    }

    /// Texture coordinate of one polygon corner: the polygon's texture index
    /// wins, then the vertex's own UV, then the origin.
    pub fn corner_uv(&self, polygon: &Polygon, corner: usize) -> Vector2 {
        if let Some(uv) = polygon
            .texture_indices()
            .get(corner)
            .and_then(|&t| self.texture_coords.get(t))
        {
            return *uv;
        }
        polygon
            .vertex_indices()
            .get(corner)
            .and_then(|&v| self.vertices.get(v))
            .and_then(|v| v.uv)
            .unwrap_or_default()
    }

    /// A cube centered at the origin with one quad per face, wound
    /// counter-clockwise when seen from outside.
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(8, 6);
        for &(x, y, z) in &[
            (-half, -half, -half),
            (half, -half, -half),
            (half, half, -half),
            (-half, half, -half),
            (-half, -half, half),
            (half, -half, half),
            (half, half, half),
            (-half, half, half),
        ] {
            mesh.add_vertex(Vertex::new(x, y, z));
        }
        for uv in [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)] {
            mesh.add_texture_coord(Vector2::new(uv.0, uv.1));
        }

        let faces: [[usize; 4]; 6] = [
            [4, 5, 6, 7], // front (+Z)
            [1, 0, 3, 2], // back (-Z)
            [3, 7, 6, 2], // top (+Y)
            [0, 1, 5, 4], // bottom (-Y)
            [5, 1, 2, 6], // right (+X)
            [0, 4, 7, 3], // left (-X)
        ];
        for face in faces {
            let polygon = Polygon {
                vertex_indices: face.to_vec(),
                texture_indices: vec![0, 1, 2, 3],
                normal_indices: Vec::new(),
                normal: None,
            };
            mesh.polygons.push(polygon);
        }
        mesh
    }
}

fn check_range(kind: &str, indices: &[usize], len: usize) -> Result<(), ArgumentError> {
    match indices.iter().find(|&&i| i >= len) {
        Some(bad) => Err(ArgumentError::new(format!(
            "{} index {} out of range ({} available)",
            kind, bad, len
        ))),
        None => Ok(()),
    }
}
