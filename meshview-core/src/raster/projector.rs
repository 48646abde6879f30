/// Fixed-eye perspective mapping from world space to pixels
use serde::{Deserialize, Serialize};

use crate::algebra::Vector3;

/// A projected vertex: pixel coordinates plus view-space depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

/// Viewer at `eye` looking down +Z with a symmetric vertical field of view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenProjector {
    pub eye: Vector3,
    pub fov_degrees: f64,
}

/// View-space depth at or below which a point counts as behind the eye.
pub const MIN_DEPTH: f64 = 1e-6;

impl ScreenProjector {
    pub fn new(eye: Vector3, fov_degrees: f64) -> Self {
        Self { eye, fov_degrees }
    }

    /// Projects a world-space point into a `width` x `height` pixel grid,
    /// screen Y growing downward. Returns `None` for points behind the eye.
    pub fn project(&self, p: Vector3, width: usize, height: usize) -> Option<ScreenPoint> {
        let view = p - self.eye;
        if view.z <= MIN_DEPTH {
            return None;
        }
        let aspect = width as f64 / height.max(1) as f64;
        let scale = view.z * (self.fov_degrees.to_radians() / 2.0).tan();

        let ndc_x = view.x / scale / aspect;
        let ndc_y = view.y / scale;

        Some(ScreenPoint {
            x: (ndc_x + 1.0) * 0.5 * width as f64,
            y: (1.0 - ndc_y) * 0.5 * height as f64,
            depth: view.z,
        })
    }
}

impl Default for ScreenProjector {
    fn default() -> Self {
        Self {
            eye: Vector3::new(0.0, 0.0, -5.0),
            fov_degrees: 60.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_maps_to_middle_of_screen() {
        let projector = ScreenProjector::default();
        let p = projector.project(Vector3::ZERO, 200, 100).unwrap();
        assert!((p.x - 100.0).abs() < 1e-9);
        assert!((p.y - 50.0).abs() < 1e-9);
        assert!((p.depth - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_up_is_toward_row_zero() {
        let projector = ScreenProjector::new(Vector3::new(0.0, 0.0, -1.0), 90.0);
        // At depth 1 with a 90 degree fov, y = 1 sits on the top edge.
        let p = projector.project(Vector3::new(0.0, 1.0, 0.0), 100, 100).unwrap();
        assert!(p.y.abs() < 1e-9);
        let q = projector.project(Vector3::new(2.0, 0.0, 0.0), 200, 100).unwrap();
        // x = 2 at aspect 2 is the right edge.
        assert!((q.x - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_behind_eye_is_rejected() {
        let projector = ScreenProjector::default();
        assert!(projector.project(Vector3::new(0.0, 0.0, -5.0), 10, 10).is_none());
        assert!(projector.project(Vector3::new(0.0, 0.0, -9.0), 10, 10).is_none());
    }
}
