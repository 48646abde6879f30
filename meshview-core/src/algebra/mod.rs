/// Vector and matrix value types used by every stage of the pipeline

pub mod interop;
pub mod linalg;
pub mod matrix;
pub mod vector;

pub use linalg::{gaussian_solve, SquareMatrix};
pub use matrix::{Matrix3, Matrix4};
pub use vector::{Vector2, Vector3, Vector4};

/// Magnitude below which lengths, determinants and pivots count as zero.
pub const EPSILON: f64 = 1e-12;

/// Tolerance for classifying homogeneous w as a point (1) or direction (0).
pub const HOMOGENEOUS_EPSILON: f64 = 1e-6;
