/// Fixed-size vector value types
use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

use super::{EPSILON, HOMOGENEOUS_EPSILON};
use crate::error::ArithmeticError;

/// Arithmetic every vector width shares, expanded per concrete type.
macro_rules! vector_common {
    ($name:ident { $($field:ident),+ }) => {
        impl $name {
            pub const ZERO: Self = Self { $($field: 0.0),+ };

            pub const fn new($($field: f64),+) -> Self {
                Self { $($field),+ }
            }

            pub fn dot(self, rhs: Self) -> f64 {
                0.0 $(+ self.$field * rhs.$field)+
            }

            pub fn length_squared(self) -> f64 {
                self.dot(self)
            }

            pub fn length(self) -> f64 {
                self.length_squared().sqrt()
            }

            /// Unit vector in the same direction.
            pub fn normalize(self) -> Result<Self, ArithmeticError> {
                let len = self.length();
                if len < EPSILON {
                    return Err(ArithmeticError::new(concat!(
                        "cannot normalize zero-length ",
                        stringify!($name)
                    )));
                }
                Ok(self * (1.0 / len))
            }

            pub fn distance(self, other: Self) -> f64 {
                (self - other).length()
            }

            /// Angle in radians between two vectors.
            pub fn angle_between(self, other: Self) -> Result<f64, ArithmeticError> {
                let denom = self.length() * other.length();
                if denom < EPSILON {
                    return Err(ArithmeticError::new(
                        "angle between vectors is undefined for zero-length input",
                    ));
                }
                Ok((self.dot(other) / denom).clamp(-1.0, 1.0).acos())
            }

            pub fn is_finite(self) -> bool {
                true $(&& self.$field.is_finite())+
            }
        }

        impl Add for $name {
            type Output = Self;
            fn add(self, rhs: Self) -> Self {
                Self { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $name {
            type Output = Self;
            fn sub(self, rhs: Self) -> Self {
                Self { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl Mul<f64> for $name {
            type Output = Self;
            fn mul(self, s: f64) -> Self {
                Self { $($field: self.$field * s),+ }
            }
        }

        impl Mul<$name> for f64 {
            type Output = $name;
            fn mul(self, v: $name) -> $name {
                v * self
            }
        }

        impl Neg for $name {
            type Output = Self;
            fn neg(self) -> Self {
                Self { $($field: -self.$field),+ }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

vector_common!(Vector2 { x, y });
vector_common!(Vector3 { x, y, z });
vector_common!(Vector4 { x, y, z, w });

impl Vector2 {
    /// Z component of the 3D cross product of two XY vectors.
    pub fn perp_dot(self, rhs: Self) -> f64 {
        self.x * rhs.y - self.y * rhs.x
    }
}

impl Vector3 {
    pub const UNIT_X: Self = Self::new(1.0, 0.0, 0.0);
    pub const UNIT_Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const UNIT_Z: Self = Self::new(0.0, 0.0, 1.0);

    pub fn cross(self, rhs: Self) -> Self {
        Self::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn to_point(self) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, 1.0)
    }

    pub fn to_direction(self) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, 0.0)
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Vector3 {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

impl Vector4 {
    pub fn xyz(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Divides x, y, z by w. A w within 1e-12 of zero leaves the components
    /// untouched and yields (x, y, z, 0).
    pub fn perspective_divide(self) -> Self {
        if self.w.abs() < EPSILON {
            return Self::new(self.x, self.y, self.z, 0.0);
        }
        Self::new(self.x / self.w, self.y / self.w, self.z / self.w, 1.0)
    }

    /// Homogeneous to 3D conversion, with the same near-zero w passthrough.
    pub fn to_vector3(self) -> Vector3 {
        self.perspective_divide().xyz()
    }

    pub fn is_point(self) -> bool {
        (self.w - 1.0).abs() < HOMOGENEOUS_EPSILON
    }

    pub fn is_direction(self) -> bool {
        self.w.abs() < HOMOGENEOUS_EPSILON
    }

    /// Reinterprets a homogeneous coordinate as a point. Directions have no
    /// point form.
    pub fn to_point(self) -> Result<Vector3, ArithmeticError> {
        if self.is_direction() {
            return Err(ArithmeticError::new(
                "cannot convert a direction (w = 0) to a point",
            ));
        }
        Ok(self.to_vector3())
    }
}
