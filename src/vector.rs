//! Minimal 2D vector used by every entity.
//!
//! Value semantics: every method returns a new `Vec2` except the explicit
//! `*_assign` helpers used by the physics step.

use std::f32::consts::TAU;

use rand::Rng;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Unit vector pointing along `angle` (radians, 0 = +x).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Unit vector with a uniformly random heading.
    pub fn random_unit(rng: &mut impl Rng) -> Self {
        Self::from_angle(rng.gen_range(0.0..TAU))
    }

    pub fn add(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x + other.x, self.y + other.y)
    }

    pub fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }

    pub fn scale(self, k: f32) -> Vec2 {
        Vec2::new(self.x * k, self.y * k)
    }

    pub fn mag(self) -> f32 {
        self.x.hypot(self.y)
    }

    pub fn dist(self, other: Vec2) -> f32 {
        self.sub(other).mag()
    }

    /// Unit-length copy; the zero vector stays zero.
    pub fn normalize(self) -> Vec2 {
        let m = self.mag();
        if m > 0.0 {
            self.scale(1.0 / m)
        } else {
            Vec2::ZERO
        }
    }

    /// Copy whose magnitude is at most `max`.
    pub fn limit(self, max: f32) -> Vec2 {
        let m = self.mag();
        if m > max && m > 0.0 {
            self.scale(max / m)
        } else {
            self
        }
    }

    /// Angle of the vector in radians.
    pub fn heading(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Perpendicular (rotated +90°).
    pub fn perp(self) -> Vec2 {
        Vec2::new(-self.y, self.x)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn add_assign(&mut self, other: Vec2) {
        self.x += other.x;
        self.y += other.y;
    }

    pub fn scale_assign(&mut self, k: f32) {
        self.x *= k;
        self.y *= k;
    }
}

/// Linear re-map of `value` from `[a0, a1]` onto `[b0, b1]` (unclamped).
pub fn map_range(value: f32, a0: f32, a1: f32, b0: f32, b1: f32) -> f32 {
    b0 + (value - a0) * (b1 - b0) / (a1 - a0)
}
