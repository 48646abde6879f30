/// Conversions between the kernel's value types and nalgebra
use nalgebra as na;

use super::matrix::{Matrix3, Matrix4};
use super::vector::{Vector2, Vector3, Vector4};

impl From<Vector2> for na::Vector2<f64> {
    fn from(v: Vector2) -> Self {
        na::Vector2::new(v.x, v.y)
    }
}

impl From<na::Vector2<f64>> for Vector2 {
    fn from(v: na::Vector2<f64>) -> Self {
        Vector2::new(v.x, v.y)
    }
}

impl From<Vector3> for na::Vector3<f64> {
    fn from(v: Vector3) -> Self {
        na::Vector3::new(v.x, v.y, v.z)
    }
}

impl From<na::Vector3<f64>> for Vector3 {
    fn from(v: na::Vector3<f64>) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for na::Point3<f64> {
    fn from(v: Vector3) -> Self {
        na::Point3::new(v.x, v.y, v.z)
    }
}

impl From<Vector4> for na::Vector4<f64> {
    fn from(v: Vector4) -> Self {
        na::Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<na::Vector4<f64>> for Vector4 {
    fn from(v: na::Vector4<f64>) -> Self {
        Vector4::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Matrix3> for na::Matrix3<f64> {
    fn from(m: Matrix3) -> Self {
        na::Matrix3::from_fn(|r, c| m.get(r, c))
    }
}

impl From<na::Matrix3<f64>> for Matrix3 {
    fn from(m: na::Matrix3<f64>) -> Self {
        let mut rows = [[0.0; 3]; 3];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = m[(r, c)];
            }
        }
        Matrix3::from_rows(rows)
    }
}

impl From<Matrix4> for na::Matrix4<f64> {
    fn from(m: Matrix4) -> Self {
        na::Matrix4::from_fn(|r, c| m.get(r, c))
    }
}

impl From<na::Matrix4<f64>> for Matrix4 {
    fn from(m: na::Matrix4<f64>) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (r, row) in rows.iter_mut().enumerate() {
            for (c, value) in row.iter_mut().enumerate() {
                *value = m[(r, c)];
            }
        }
        Matrix4::from_rows(rows)
    }
}
