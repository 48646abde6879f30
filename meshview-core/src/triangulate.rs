/// Polygon triangulation: fan for convex polygons, ear clipping otherwise
use tracing::{debug, warn};

use crate::algebra::{Vector2, Vector3, EPSILON};
use crate::error::ArgumentError;
use crate::mesh::{Mesh, Polygon};

/// Replaces every polygon in the mesh with triangles.
///
/// Triangles keep the order of their source polygons, and triangles cut from
/// one polygon stay together in the order they were produced. Returns the
/// number of triangles in the mesh afterwards.
pub fn triangulate_model(mesh: &mut Mesh) -> Result<usize, ArgumentError> {
    let mut triangles = Vec::with_capacity(mesh.polygon_count() * 2);
    for polygon in mesh.polygons() {
        triangles.extend(triangulate_polygon(mesh, polygon)?);
    }
    debug!(
        polygons = mesh.polygon_count(),
        triangles = triangles.len(),
        "triangulated mesh"
    );
    let count = triangles.len();
    mesh.replace_polygons(triangles);
    Ok(count)
}

/// Splits one polygon of `mesh` into triangles. A triangle comes back as is.
pub fn triangulate_polygon(mesh: &Mesh, polygon: &Polygon) -> Result<Vec<Polygon>, ArgumentError> {
    let n = polygon.len();
    if n < 3 {
        return Err(ArgumentError::new(format!(
            "cannot triangulate a polygon with {} vertices",
            n
        )));
    }
    if n == 3 {
        return Ok(vec![polygon.clone()]);
    }

    let positions = polygon
        .vertex_indices()
        .iter()
        .map(|&i| mesh.position(i))
        .collect::<Result<Vec<_>, _>>()?;
    let points = project_to_plane(&positions);

    // A fan through a straight corner would emit a zero-area triangle.
    let corners = if is_convex(&points) && !has_straight_corner(&points) {
        fan(&(0..n).collect::<Vec<_>>())
    } else {
        ear_clip(&points)
    };

    Ok(corners
        .iter()
        .map(|tri| polygon.select_corners(tri))
        .collect())
}

/// Flattens the polygon onto the coordinate plane most perpendicular to its
/// Newell normal. Axes stay in cyclic order (XY, YZ or ZX) so the sense of
/// rotation is kept, and polygons facing Z use plain XY.
fn project_to_plane(positions: &[Vector3]) -> Vec<Vector2> {
    let mut normal = Vector3::ZERO;
    for (i, a) in positions.iter().enumerate() {
        let b = positions[(i + 1) % positions.len()];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());

    positions
        .iter()
        .map(|p| {
            if az >= ax && az >= ay {
                Vector2::new(p.x, p.y)
            } else if ax >= ay {
                Vector2::new(p.y, p.z)
            } else {
                Vector2::new(p.z, p.x)
            }
        })
        .collect()
}

/// Signed turn at each corner, starting with the turn at vertex 1.
fn turns(points: &[Vector2]) -> impl Iterator<Item = f64> + '_ {
    let n = points.len();
    (0..n).map(move |i| {
        let a = points[i];
        let b = points[(i + 1) % n];
        let c = points[(i + 2) % n];
        (b - a).perp_dot(c - b)
    })
}

/// True when every turn along the outline bends the same way. Collinear
/// runs are ignored.
fn is_convex(points: &[Vector2]) -> bool {
    let mut sign = 0.0;
    for turn in turns(points) {
        if turn.abs() < EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = turn.signum();
        } else if turn.signum() != sign {
            return false;
        }
    }
    true
}

fn has_straight_corner(points: &[Vector2]) -> bool {
    turns(points).any(|turn| turn.abs() < EPSILON)
}

fn fan(ring: &[usize]) -> Vec<[usize; 3]> {
    (1..ring.len() - 1)
        .map(|i| [ring[0], ring[i], ring[i + 1]])
        .collect()
}

/// Twice the signed area (positive for counter-clockwise outlines).
fn signed_area(points: &[Vector2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum()
}

fn ear_clip(points: &[Vector2]) -> Vec<[usize; 3]> {
    let mut ring: Vec<usize> = (0..points.len()).collect();
    // Clipping expects a clockwise outline.
    if signed_area(points) >= 0.0 {
        ring.reverse();
    }

    let mut triangles = Vec::with_capacity(points.len() - 2);
    while ring.len() > 3 {
        match find_ear(points, &ring) {
            Some(k) => {
                let m = ring.len();
                triangles.push([ring[(k + m - 1) % m], ring[k], ring[(k + 1) % m]]);
                ring.remove(k);
            }
            None => {
                warn!(
                    remaining = ring.len(),
                    "no ear found, falling back to fan triangulation"
                );
                triangles.extend(fan(&ring));
                return triangles;
            }
        }
    }
    triangles.push([ring[0], ring[1], ring[2]]);
    triangles
}

/// Position in `ring` of the first vertex that forms an ear.
fn find_ear(points: &[Vector2], ring: &[usize]) -> Option<usize> {
    let m = ring.len();
    (0..m).find(|&k| {
        let prev = ring[(k + m - 1) % m];
        let curr = ring[k];
        let next = ring[(k + 1) % m];
        let (a, b, c) = (points[prev], points[curr], points[next]);

        // Collinear corners would clip off a zero-area triangle.
        if (a - b).perp_dot(c - b) < EPSILON {
            return false;
        }
        ring.iter()
            .filter(|&&other| other != prev && other != curr && other != next)
            .all(|&other| !point_in_triangle(points[other], a, b, c))
    })
}

/// Barycentric containment test, boundary included.
fn point_in_triangle(p: Vector2, a: Vector2, b: Vector2, c: Vector2) -> bool {
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;
    let dot00 = v0.dot(v0);
    let dot01 = v0.dot(v1);
    let dot02 = v0.dot(v2);
    let dot11 = v1.dot(v1);
    let dot12 = v1.dot(v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom.abs() < EPSILON {
        return false;
    }
    let u = (dot11 * dot02 - dot01 * dot12) / denom;
    let v = (dot00 * dot12 - dot01 * dot02) / denom;
    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}
