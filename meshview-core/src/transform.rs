/// Per-object model transforms
use serde::{Deserialize, Serialize};

use crate::algebra::{Matrix4, Vector3};

/// Rotation around three axes, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in degrees), wrapping each axis into [0, 360)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x = (self.x + dx).rem_euclid(360.0);
        self.y = (self.y + dy).rem_euclid(360.0);
        self.z = (self.z + dz).rem_euclid(360.0);
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::zero()
    }
}

/// Translation, rotation and scale of one object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vector3,
    pub rotation: Rotation,
    pub scale: Vector3,
}

impl Transform {
    pub fn new(translation: Vector3, rotation: Rotation, scale: Vector3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn identity() -> Self {
        Self::new(Vector3::ZERO, Rotation::zero(), Vector3::new(1.0, 1.0, 1.0))
    }

    pub fn model_matrix(&self) -> Matrix4 {
        model_matrix(self)
    }

    /// Applies the model matrix to a position. The bottom row of a model
    /// matrix is always (0, 0, 0, 1), so no divide by w is needed.
    pub fn transform_vertex(&self, v: Vector3) -> Vector3 {
        self.model_matrix().transform_point(v)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Model matrix `T * Rz * Ry * Rx * S`: scale first, then rotate about X, Y
/// and Z in that order, then translate.
///
/// Every caller that places an object in the world goes through here.
pub fn model_matrix(transform: &Transform) -> Matrix4 {
    let Transform {
        translation: t,
        rotation: r,
        scale: s,
    } = *transform;
    Matrix4::translation(t.x, t.y, t.z)
        * Matrix4::rotation_z_degrees(r.z)
        * Matrix4::rotation_y_degrees(r.y)
        * Matrix4::rotation_x_degrees(r.x)
        * Matrix4::scale(s.x, s.y, s.z)
}
