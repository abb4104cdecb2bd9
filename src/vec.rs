//! Planar vector type and the geometric helpers the solver leans on.

use crate::float::Float;
use core::ops::{Add, Sub, Neg};

/// 2D vector. The y axis grows towards the floor of the world.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec2<F: Float> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Create a new 2D vector.
    pub fn new(x: F, y: F) -> Self { Vec2 { x, y } }

    /// Zero vector.
    pub fn zero() -> Self { Vec2 { x: F::zero(), y: F::zero() } }

    /// Dot product.
    pub fn dot(self, other: Self) -> F { self.x * other.x + self.y * other.y }

    /// 2D cross product (returns scalar): self.x * other.y - self.y * other.x
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    /// Scale both components by a scalar.
    pub fn scale(self, s: F) -> Self { Vec2 { x: self.x * s, y: self.y * s } }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F { self.dot(self) }

    /// Length (magnitude).
    pub fn length(self) -> F { self.length_sq().sqrt() }

    /// Squared distance between two points.
    pub fn distance_sq(self, other: Self) -> F { (self - other).length_sq() }

    /// Normalize to unit length. Returns zero vector if length is near zero.
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len.is_near_zero(F::from_f32(1e-10)) {
            Self::zero()
        } else {
            self.scale(F::one() / len)
        }
    }

    /// Perpendicular vector (rotated 90 degrees counter-clockwise).
    pub fn perp(self) -> Self {
        Vec2 { x: -self.y, y: self.x }
    }

    /// Unit normal of the segment `a -> b`: `(a.y - b.y, b.x - a.x)` normalized.
    ///
    /// Callers guarantee `a != b`.
    pub fn edge_normal(a: Self, b: Self) -> Self {
        let n = Vec2 { x: a.y - b.y, y: b.x - a.x };
        let inv_len = F::one() / n.length();
        n.scale(inv_len)
    }

    /// Rotate this point about `origin` by `angle` radians.
    pub fn rotate_about(self, origin: Self, angle: F) -> Self {
        let d = self - origin;
        let (sin, cos) = (angle.sin(), angle.cos());
        Vec2 {
            x: d.x * cos - d.y * sin + origin.x,
            y: d.x * sin + d.y * cos + origin.y,
        }
    }
}

/// Signed angle from `u` to `v`, in `(-pi, pi]`.
pub fn signed_angle<F: Float>(u: Vec2<F>, v: Vec2<F>) -> F {
    F::atan2(u.cross(v), u.dot(v))
}

impl<F: Float> Add for Vec2<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self { Vec2 { x: self.x + rhs.x, y: self.y + rhs.y } }
}

impl<F: Float> Sub for Vec2<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self { Vec2 { x: self.x - rhs.x, y: self.y - rhs.y } }
}

impl<F: Float> Neg for Vec2<F> {
    type Output = Self;
    fn neg(self) -> Self { Vec2 { x: -self.x, y: -self.y } }
}
