use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Vector3D { x, y, z }
    }

    pub fn magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2) + self.z.powi(2)).sqrt()
    }

    /// Unit vector in the same direction; the zero vector maps to itself.
    pub fn normalize(&self) -> Self {
        let mag = self.magnitude();
        if mag == 0.0 {
            *self
        } else {
            Vector3D::new(self.x / mag, self.y / mag, self.z / mag)
        }
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn horizontal_magnitude(&self) -> f64 {
        (self.x.powi(2) + self.y.powi(2)).sqrt()
    }
}

impl From<[f64; 3]> for Vector3D {
    fn from(components: [f64; 3]) -> Self {
        Vector3D::new(components[0], components[1], components[2])
    }
}

impl Sum for Vector3D {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Vector3D::ZERO, |a, b| a + b)
    }
}

impl Add for Vector3D {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Vector3D::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }
}

impl AddAssign for Vector3D {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Vector3D {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Vector3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

impl Mul<f64> for Vector3D {
    type Output = Self;

    fn mul(self, scalar: f64) -> Self {
        Vector3D::new(self.x * scalar, self.y * scalar, self.z * scalar)
    }
}

impl Mul<Vector3D> for f64 {
    type Output = Vector3D;

    fn mul(self, vector: Vector3D) -> Vector3D {
        Vector3D::new(self * vector.x, self * vector.y, self * vector.z)
    }
}

impl Div<f64> for Vector3D {
    type Output = Self;

    fn div(self, scalar: f64) -> Self {
        Vector3D::new(self.x / scalar, self.y / scalar, self.z / scalar)
    }
}

impl Neg for Vector3D {
    type Output = Self;

    fn neg(self) -> Self {
        Vector3D::new(-self.x, -self.y, -self.z)
    }
}
