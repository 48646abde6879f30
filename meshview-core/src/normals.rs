/// Face normal computation for triangulated meshes
use crate::algebra::Vector3;
use crate::error::{ArithmeticError, Error};
use crate::mesh::{Mesh, Polygon};

/// Unit normal of a polygon from its first three vertices, oriented so its
/// Z component is never positive.
pub fn face_normal(mesh: &Mesh, polygon: &Polygon) -> Result<Vector3, Error> {
    let indices = polygon.vertex_indices();
    if indices.len() < 3 {
        return Err(ArithmeticError::new(format!(
            "face normal needs 3 vertices, polygon has {}",
            indices.len()
        ))
        .into());
    }
    let v0 = mesh.position(indices[0])?;
    let v1 = mesh.position(indices[1])?;
    let v2 = mesh.position(indices[2])?;

    let normal = (v1 - v0).cross(v2 - v0).normalize()?;
    Ok(face_toward_viewer(normal))
}

/// Flips a normal whose Z component is positive.
pub fn face_toward_viewer(normal: Vector3) -> Vector3 {
    if normal.z > 0.0 {
        -normal
    } else {
        normal
    }
}

/// Computes and caches the face normal of every polygon in the mesh.
///
/// Stops at the first degenerate polygon; normals cached before the failure
/// are kept.
pub fn compute_normals(mesh: &mut Mesh) -> Result<(), Error> {
    for i in 0..mesh.polygon_count() {
        let normal = face_normal(mesh, &mesh.polygons()[i])?;
        mesh.polygons_mut()[i].set_normal(normal);
    }
    Ok(())
}
