use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Point2
// ─────────────────────────────────────────────────────────────────────────────

/// A point on the ground plane. `x` runs east, `z` runs along the second ground
/// axis; the vertical axis (`y`) is implied to be zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    #[must_use]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (other - self).length()
    }

    /// Direction angle from `self` towards `other`, `atan2(dz, dx)`.
    #[must_use]
    pub fn angle_to(self, other: Self) -> f64 {
        let d = other - self;
        d.z.atan2(d.x)
    }

    /// Point reached by walking `distance` from `self` along `angle`.
    #[must_use]
    pub fn offset_polar(self, angle: f64, distance: f64) -> Self {
        Self::new(
            self.x + angle.cos() * distance,
            self.z + angle.sin() * distance,
        )
    }

    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::new(
            self.x + (other.x - self.x) * t,
            self.z + (other.z - self.z) * t,
        )
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.z.is_finite()
    }

    /// Lift onto the 3D frame used by placements (`y` up).
    #[must_use]
    pub const fn at_height(self, y: f64) -> Point3 {
        Point3::new(self.x, y, self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vec2
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec2 {
    pub x: f64,
    pub z: f64,
}

impl Vec2 {
    #[must_use]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Unit vector pointing along `angle`.
    #[must_use]
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.z)
    }
}

impl Sub for Point2 {
    type Output = Vec2;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec2::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Add<Vec2> for Point2 {
    type Output = Self;
    fn add(self, rhs: Vec2) -> Self::Output {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Mul<f64> for Vec2 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for layout comparisons.
///
/// Use the named constants to avoid epsilon scatter:
/// - `Tolerance::LENGTH` - Length comparisons along segments and panels (1e-3)
/// - `Tolerance::ZERO_LENGTH` - Detecting degenerate/zero-length segments (1e-9)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Length tolerance for panel and post arithmetic (1e-3).
    /// Panel widths are compared against this rather than exact equality.
    pub const LENGTH: Self = Self { eps: 1e-3 };

    /// Tolerance for detecting zero-length segments (1e-9).
    pub const ZERO_LENGTH: Self = Self { eps: 1e-9 };

    #[must_use]
    pub fn is_zero(self, value: f64) -> bool {
        value.abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_point2(self, a: Point2, b: Point2) -> bool {
        a.distance(b) <= self.eps
    }
}

#[cfg(test)]
mod tests {
    use super::{Point2, Tolerance};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn angle_and_polar_offset_are_consistent() {
        let a = Point2::new(1.0, 1.0);
        let b = Point2::new(1.0, 4.0);
        let angle = a.angle_to(b);
        assert!((angle - FRAC_PI_2).abs() < 1e-12);

        let back = a.offset_polar(angle, a.distance(b));
        assert!(Tolerance::LENGTH.approx_eq_point2(back, b));
    }

    #[test]
    fn at_height_keeps_ground_coordinates() {
        let p = Point2::new(2.0, -3.0).at_height(1.1);
        assert_eq!(p.to_array(), [2.0, 1.1, -3.0]);
    }
}
