/// Camera state and the view/projection matrices derived from it
use serde::{Deserialize, Serialize};

use crate::algebra::{Matrix4, Vector3};
use crate::error::ArithmeticError;

/// Camera configuration for 3D rendering.
///
/// All fields are plain mutable state; both matrices are rebuilt on every
/// call so edits take effect immediately.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub eye: Vector3,
    pub target: Vector3,
    pub up: Vector3,
    /// Vertical field of view in degrees
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: width as f64 / height.max(1) as f64,
            ..Self::default()
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Result<Matrix4, ArithmeticError> {
        Matrix4::look_at(self.eye, self.target, self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4 {
        Matrix4::perspective(self.fov, self.aspect, self.near, self.far)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, 5.0),
            target: Vector3::ZERO,
            up: Vector3::UNIT_Y,
            fov: 60.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-12);
        assert_eq!(camera.up, Vector3::UNIT_Y);
        assert_eq!(camera.fov, 60.0);
        assert!((Camera::default().aspect - 16.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::default();
        let view = camera.view_matrix().unwrap();
        let eye = view.transform_point(camera.eye);
        assert!(eye.length() < 1e-12);
    }

    #[test]
    fn test_matrices_track_field_edits() {
        let mut camera = Camera::default();
        let before = camera.projection_matrix();
        camera.fov = 90.0;
        camera.aspect = 1.0;
        let after = camera.projection_matrix();
        assert_ne!(before, after);
        assert_eq!(after, Matrix4::perspective(90.0, 1.0, 0.1, 100.0));

        camera.target = camera.eye;
        assert!(camera.view_matrix().is_err());
    }
}
