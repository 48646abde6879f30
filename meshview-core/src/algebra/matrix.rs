/// Row-major square matrix value types
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use super::linalg::SquareMatrix;
use super::vector::{Vector3, Vector4};
use super::EPSILON;
use crate::error::ArithmeticError;

macro_rules! matrix_common {
    ($name:ident, $n:literal) => {
        impl $name {
            pub const fn from_rows(m: [[f64; $n]; $n]) -> Self {
                Self { m }
            }

            pub const fn zero() -> Self {
                Self { m: [[0.0; $n]; $n] }
            }

            pub fn identity() -> Self {
                let mut m = [[0.0; $n]; $n];
                for (i, row) in m.iter_mut().enumerate() {
                    row[i] = 1.0;
                }
                Self { m }
            }

            pub fn get(&self, row: usize, col: usize) -> f64 {
                self.m[row][col]
            }

            pub fn rows(&self) -> &[[f64; $n]; $n] {
                &self.m
            }

            pub fn transpose(&self) -> Self {
                let mut m = [[0.0; $n]; $n];
                for (i, row) in self.m.iter().enumerate() {
                    for (j, value) in row.iter().enumerate() {
                        m[j][i] = *value;
                    }
                }
                Self { m }
            }

            /// Determinant, failing when it is within 1e-12 of zero.
            pub fn determinant(&self) -> Result<f64, ArithmeticError> {
                let det = self.raw_determinant();
                if det.abs() < EPSILON {
                    return Err(ArithmeticError::new(concat!(
                        stringify!($name),
                        " is singular"
                    )));
                }
                Ok(det)
            }

            /// Largest absolute element-wise difference.
            pub fn max_abs_diff(&self, other: &Self) -> f64 {
                let mut max = 0.0_f64;
                for i in 0..$n {
                    for j in 0..$n {
                        max = max.max((self.m[i][j] - other.m[i][j]).abs());
                    }
                }
                max
            }
        }

        impl SquareMatrix<$n> for $name {
            fn to_rows(&self) -> [[f64; $n]; $n] {
                self.m
            }

            fn from_rows(rows: [[f64; $n]; $n]) -> Self {
                Self { m: rows }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::identity()
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                let mut m = self.m;
                for i in 0..$n {
                    for j in 0..$n {
                        m[i][j] += rhs.m[i][j];
                    }
                }
                Self { m }
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                let mut m = self.m;
                for i in 0..$n {
                    for j in 0..$n {
                        m[i][j] -= rhs.m[i][j];
                    }
                }
                Self { m }
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, s: f64) -> Self {
                let mut m = self.m;
                for row in m.iter_mut() {
                    for value in row.iter_mut() {
                        *value *= s;
                    }
                }
                Self { m }
            }
        }

        impl Mul for $name {
            type Output = Self;
            fn mul(self, rhs: Self) -> Self {
                let mut m = [[0.0; $n]; $n];
                for i in 0..$n {
                    for j in 0..$n {
                        let mut sum = 0.0;
                        for k in 0..$n {
                            sum += self.m[i][k] * rhs.m[k][j];
                        }
                        m[i][j] = sum;
                    }
                }
                Self { m }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix3 {
    m: [[f64; 3]; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Matrix4 {
    m: [[f64; 4]; 4],
}

matrix_common!(Matrix3, 3);
matrix_common!(Matrix4, 4);

impl Matrix3 {
    /// Determinant without the singularity check.
    pub fn raw_determinant(&self) -> f64 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    /// Closed-form adjugate over determinant.
    pub fn inverse(&self) -> Result<Self, ArithmeticError> {
        let det = self.determinant()?;
        let m = &self.m;
        let inv_det = 1.0 / det;
        let adj = [
            [
                m[1][1] * m[2][2] - m[1][2] * m[2][1],
                m[0][2] * m[2][1] - m[0][1] * m[2][2],
                m[0][1] * m[1][2] - m[0][2] * m[1][1],
            ],
            [
                m[1][2] * m[2][0] - m[1][0] * m[2][2],
                m[0][0] * m[2][2] - m[0][2] * m[2][0],
                m[0][2] * m[1][0] - m[0][0] * m[1][2],
            ],
            [
                m[1][0] * m[2][1] - m[1][1] * m[2][0],
                m[0][1] * m[2][0] - m[0][0] * m[2][1],
                m[0][0] * m[1][1] - m[0][1] * m[1][0],
            ],
        ];
        Ok(Self::from_rows(adj) * inv_det)
    }

    pub fn solve(&self, b: Vector3) -> Result<Vector3, ArithmeticError> {
        self.solve_rows(b.to_array()).map(Vector3::from)
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }
}

impl Matrix4 {
    /// The 3x3 matrix left after deleting `row` and `col`.
    fn minor(&self, row: usize, col: usize) -> Matrix3 {
        let mut out = [[0.0; 3]; 3];
        let mut r = 0;
        for i in (0..4).filter(|&i| i != row) {
            let mut c = 0;
            for j in (0..4).filter(|&j| j != col) {
                out[r][c] = self.m[i][j];
                c += 1;
            }
            r += 1;
        }
        Matrix3::from_rows(out)
    }

    fn cofactor(&self, row: usize, col: usize) -> f64 {
        let sign = if (row + col) % 2 == 0 { 1.0 } else { -1.0 };
        sign * self.minor(row, col).raw_determinant()
    }

    /// Cofactor expansion along the first row, without the singularity check.
    pub fn raw_determinant(&self) -> f64 {
        (0..4).map(|j| self.m[0][j] * self.cofactor(0, j)).sum()
    }

    /// Adjugate (transposed cofactor matrix) over determinant.
    pub fn inverse(&self) -> Result<Self, ArithmeticError> {
        let det = self.determinant()?;
        let mut adj = [[0.0; 4]; 4];
        for (i, row) in adj.iter_mut().enumerate() {
            for (j, value) in row.iter_mut().enumerate() {
                *value = self.cofactor(j, i);
            }
        }
        Ok(Self::from_rows(adj) * (1.0 / det))
    }

    pub fn solve(&self, b: Vector4) -> Result<Vector4, ArithmeticError> {
        let x = self.solve_rows([b.x, b.y, b.z, b.w])?;
        Ok(Vector4::new(x[0], x[1], x[2], x[3]))
    }

    /// Upper-left 3x3 block.
    pub fn linear_part(&self) -> Matrix3 {
        self.minor(3, 3)
    }

    pub fn translation(x: f64, y: f64, z: f64) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_y(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_z(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self::from_rows([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn rotation_x_degrees(degrees: f64) -> Self {
        Self::rotation_x(degrees.to_radians())
    }

    pub fn rotation_y_degrees(degrees: f64) -> Self {
        Self::rotation_y(degrees.to_radians())
    }

    pub fn rotation_z_degrees(degrees: f64) -> Self {
        Self::rotation_z(degrees.to_radians())
    }

    /// View matrix whose Z axis points from `eye` toward `target`.
    pub fn look_at(eye: Vector3, target: Vector3, up: Vector3) -> Result<Self, ArithmeticError> {
        let z_axis = (target - eye).normalize()?;
        let x_axis = up.cross(z_axis).normalize()?;
        let y_axis = z_axis.cross(x_axis);
        Ok(Self::from_rows([
            [x_axis.x, x_axis.y, x_axis.z, -x_axis.dot(eye)],
            [y_axis.x, y_axis.y, y_axis.z, -y_axis.dot(eye)],
            [z_axis.x, z_axis.y, z_axis.z, -z_axis.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// OpenGL-style perspective projection. Points with positive view-space Z
    /// come out with a negative w; nothing is clamped.
    pub fn perspective(fov_degrees: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fov_degrees.to_radians() / 2.0).tan();
        Self::from_rows([
            [f / aspect, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [
                0.0,
                0.0,
                (near + far) / (near - far),
                2.0 * near * far / (near - far),
            ],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Applies the matrix to `(p, 1)` and returns xyz without dividing by w.
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        (*self * p.to_point()).xyz()
    }
}

impl Mul<Vector4> for Matrix4 {
    type Output = Vector4;
    fn mul(self, v: Vector4) -> Vector4 {
        let m = &self.m;
        let row = |r: usize| m[r][0] * v.x + m[r][1] * v.y + m[r][2] * v.z + m[r][3] * v.w;
        Vector4::new(row(0), row(1), row(2), row(3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_matrix4(rng: &mut StdRng) -> Matrix4 {
        let mut m = [[0.0; 4]; 4];
        for row in m.iter_mut() {
            for value in row.iter_mut() {
                *value = rng.gen_range(-10.0..10.0);
            }
        }
        Matrix4::from_rows(m)
    }

    #[test]
    fn test_identity_times_point() {
        let p = Vector4::new(1.0, 2.0, 3.0, 1.0);
        assert_eq!(Matrix4::identity() * p, p);
    }

    #[test]
    fn test_matrix3_inverse() {
        let m = Matrix3::from_rows([[2.0, 0.0, 1.0], [1.0, 3.0, 2.0], [1.0, 1.0, 2.0]]);
        assert!((m.determinant().unwrap() - 6.0).abs() < 1e-12);
        let product = m.inverse().unwrap() * m;
        assert!(product.max_abs_diff(&Matrix3::identity()) < 1e-12);

        let x = m.solve(Vector3::new(5.0, 13.0, 9.0)).unwrap();
        assert!((x - Vector3::new(1.0, 2.0, 3.0)).length() < 1e-12);
    }

    #[test]
    fn test_singular_matrices_fail() {
        let m3 = Matrix3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 1.0]]);
        assert!(m3.inverse().is_err());
        assert!(m3.solve(Vector3::new(1.0, 1.0, 1.0)).is_err());
        assert!(m3.determinant().is_err());
        assert_eq!(m3.raw_determinant(), 0.0);

        let m4 = Matrix4::zero();
        assert!(m4.inverse().is_err());
        assert!(m4.solve(Vector4::new(1.0, 0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn test_matrix4_inverse_and_solve_random() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut checked = 0;
        while checked < 50 {
            let m = random_matrix4(&mut rng);
            if m.raw_determinant().abs() < 1.0 {
                continue;
            }
            let product = m.inverse().unwrap() * m;
            assert!(product.max_abs_diff(&Matrix4::identity()) < 1e-6);

            let b = Vector4::new(
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
                rng.gen_range(-5.0..5.0),
            );
            let x = m.solve(b).unwrap();
            assert!((m * x - b).length() < 1e-6);
            checked += 1;
        }
    }

    #[test]
    fn test_transpose_and_arithmetic() {
        let a = Matrix3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        assert_eq!(a.transpose().get(0, 2), 7.0);
        assert_eq!((a + a).get(1, 1), 10.0);
        assert_eq!((a - a), Matrix3::zero());
        assert_eq!((a * 2.0).get(2, 2), 18.0);
        assert_eq!(a * Matrix3::identity(), a);
    }

    #[test]
    fn test_rotations_preserve_length() {
        let vectors = [
            Vector4::new(1.0, 0.0, 0.0, 0.0),
            Vector4::new(0.3, -2.0, 5.0, 0.0),
            Vector4::new(-7.5, 1.25, 0.5, 0.0),
        ];
        let mut degrees = -360.0;
        while degrees <= 360.0 {
            for v in vectors {
                for r in [
                    Matrix4::rotation_x_degrees(degrees),
                    Matrix4::rotation_y_degrees(degrees),
                    Matrix4::rotation_z_degrees(degrees),
                ] {
                    assert!(((r * v).length() - v.length()).abs() < 1e-6);
                }
            }
            degrees += 7.5;
        }
    }

    #[test]
    fn test_rotation_z_quarter_turn() {
        let p = Matrix4::rotation_z_degrees(90.0).transform_point(Vector3::UNIT_X);
        assert!((p - Vector3::UNIT_Y).length() < 1e-12);
    }

    #[test]
    fn test_look_at_is_orthonormal() {
        let cases = [
            (Vector3::new(0.0, 0.0, 5.0), Vector3::ZERO, Vector3::UNIT_Y),
            (Vector3::new(3.0, 4.0, -2.0), Vector3::new(1.0, -1.0, 0.5), Vector3::UNIT_Y),
            (Vector3::new(-6.0, 0.5, 2.0), Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.2, 1.0, 0.1)),
        ];
        for (eye, target, up) in cases {
            let basis = Matrix4::look_at(eye, target, up).unwrap().linear_part();
            let rows = basis.rows();
            for i in 0..3 {
                let ri = Vector3::from(rows[i]);
                assert!((ri.length() - 1.0).abs() < 1e-6);
                for row in rows.iter().skip(i + 1) {
                    assert!(ri.dot(Vector3::from(*row)).abs() < 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_look_at_parallel_up_fails() {
        let eye = Vector3::ZERO;
        let target = Vector3::new(0.0, 5.0, 0.0);
        assert!(Matrix4::look_at(eye, target, Vector3::UNIT_Y).is_err());
        assert!(Matrix4::look_at(eye, eye, Vector3::UNIT_Y).is_err());
    }

    #[test]
    fn test_perspective_in_front_lands_in_ndc() {
        let proj = Matrix4::perspective(90.0, 1.0, 1.0, 100.0);
        let clip = proj * Vector4::new(0.0, 0.0, -2.0, 1.0);
        assert!(clip.w > 0.0);
        let ndc = clip.perspective_divide();
        assert!(ndc.z >= -1.0 && ndc.z <= 1.0);
    }

    #[test]
    fn test_perspective_behind_eye_has_negative_w() {
        let proj = Matrix4::perspective(90.0, 1.0, 1.0, 100.0);
        let clip = proj * Vector4::new(0.0, 0.0, 1.0, 1.0);
        assert!(clip.w < 0.0);
    }
}
