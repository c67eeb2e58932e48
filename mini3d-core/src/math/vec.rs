//! Immutable vector value types (2/3/4 components, f64).

use std::ops::{Add, Mul, Neg, Sub};

use super::EPS;

/// A 2D vector, used for texture coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, b: Vec2) -> f64 {
        self.x * b.x + self.y * b.y
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector, or zero when the length is below [`EPS`].
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= EPS {
            Vec2::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    pub fn distance_to(self, b: Vec2) -> f64 {
        (self - b).length()
    }

    /// Linear interpolation with `t` clamped to [0, 1].
    pub fn lerp(self, b: Vec2, t: f64) -> Vec2 {
        let t = t.clamp(0.0, 1.0);
        self + (b - self) * t
    }

    pub fn eps_eq(self, b: Vec2, eps: f64) -> bool {
        (self.x - b.x).abs() <= eps && (self.y - b.y).abs() <= eps
    }
}

/// A 3D vector: positions, normals, Euler angles, RGB intensities.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const ONE: Vec3 = Vec3 { x: 1.0, y: 1.0, z: 1.0 };
    /// World-up used by the camera model.
    pub const UP: Vec3 = Vec3 { x: 0.0, y: 1.0, z: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, b: Vec3) -> f64 {
        self.x * b.x + self.y * b.y + self.z * b.z
    }

    pub fn cross(self, b: Vec3) -> Vec3 {
        Vec3 {
            x: self.y * b.z - self.z * b.y,
            y: self.z * b.x - self.x * b.z,
            z: self.x * b.y - self.y * b.x,
        }
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Unit vector, or zero when the length is below [`EPS`].
    /// Callers must tolerate the degenerate zero result.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len <= EPS {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    pub fn distance_squared_to(self, b: Vec3) -> f64 {
        (self - b).length_squared()
    }

    pub fn distance_to(self, b: Vec3) -> f64 {
        (self - b).length()
    }

    /// Linear interpolation with `t` clamped to [0, 1].
    pub fn lerp(self, b: Vec3, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        self + (b - self) * t
    }

    pub fn eps_eq(self, b: Vec3, eps: f64) -> bool {
        (self.x - b.x).abs() <= eps
            && (self.y - b.y).abs() <= eps
            && (self.z - b.z).abs() <= eps
    }
}

/// A homogeneous 4D vector: a point (w = 1) or a direction (w = 0).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Vec4 {
    pub const ZERO: Vec4 = Vec4 { x: 0.0, y: 0.0, z: 0.0, w: 0.0 };

    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    /// Homogeneous point: translation applies.
    pub const fn point(p: Vec3) -> Self {
        Self { x: p.x, y: p.y, z: p.z, w: 1.0 }
    }

    /// Homogeneous direction: translation does not apply.
    pub const fn direction(d: Vec3) -> Self {
        Self { x: d.x, y: d.y, z: d.z, w: 0.0 }
    }

    /// Drops the w component without dividing.
    pub fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    pub fn dot(self, b: Vec4) -> f64 {
        self.x * b.x + self.y * b.y + self.z * b.z + self.w * b.w
    }

    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    pub fn normalized(self) -> Vec4 {
        let len = self.length();
        if len <= EPS {
            Vec4::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Linear interpolation with `t` clamped to [0, 1].
    pub fn lerp(self, b: Vec4, t: f64) -> Vec4 {
        let t = t.clamp(0.0, 1.0);
        self + (b - self) * t
    }

    pub fn eps_eq(self, b: Vec4, eps: f64) -> bool {
        (self.x - b.x).abs() <= eps
            && (self.y - b.y).abs() <= eps
            && (self.z - b.z).abs() <= eps
            && (self.w - b.w).abs() <= eps
    }
}

macro_rules! impl_vec_ops {
    ($t:ty { $($f:ident),+ }) => {
        impl Add for $t {
            type Output = $t;
            fn add(self, b: $t) -> $t {
                <$t>::new($(self.$f + b.$f),+)
            }
        }

        impl Sub for $t {
            type Output = $t;
            fn sub(self, b: $t) -> $t {
                <$t>::new($(self.$f - b.$f),+)
            }
        }

        impl Mul<f64> for $t {
            type Output = $t;
            fn mul(self, k: f64) -> $t {
                <$t>::new($(self.$f * k),+)
            }
        }

        impl Neg for $t {
            type Output = $t;
            fn neg(self) -> $t {
                <$t>::new($(-self.$f),+)
            }
        }
    };
}

impl_vec_ops!(Vec2 { x, y });
impl_vec_ops!(Vec3 { x, y, z });
impl_vec_ops!(Vec4 { x, y, z, w });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_is_commutative() {
        let a = Vec3::new(1.0, -2.0, 3.5);
        let b = Vec3::new(0.25, 4.0, -1.0);
        assert_eq!(a.dot(b), b.dot(a));
    }

    #[test]
    fn addition_is_associative_within_tolerance() {
        let a = Vec3::new(0.1, 0.2, 0.3);
        let b = Vec3::new(-1.5, 2.25, 0.0);
        let c = Vec3::new(10.0, -20.0, 30.0);
        assert!(((a + b) + c).eps_eq(a + (b + c), 1e-12));
    }

    #[test]
    fn normalized_has_unit_length() {
        let v = Vec3::new(3.0, 4.0, 12.0).normalized();
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn normalized_near_zero_returns_zero() {
        assert_eq!(Vec3::new(0.0, 1e-10, 0.0).normalized(), Vec3::ZERO);
        assert_eq!(Vec2::new(0.0, 0.0).normalized(), Vec2::ZERO);
    }

    #[test]
    fn cross_follows_right_hand_rule() {
        let x = Vec3::new(1.0, 0.0, 0.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        assert!(x.cross(y).eps_eq(Vec3::new(0.0, 0.0, 1.0), 1e-12));
        assert!(y.cross(x).eps_eq(Vec3::new(0.0, 0.0, -1.0), 1e-12));
    }

    #[test]
    fn lerp_clamps_t() {
        let a = Vec3::ZERO;
        let b = Vec3::new(2.0, 2.0, 2.0);
        assert_eq!(a.lerp(b, -1.0), a);
        assert_eq!(a.lerp(b, 2.0), b);
        assert!(a.lerp(b, 0.5).eps_eq(Vec3::new(1.0, 1.0, 1.0), 1e-12));
    }

    #[test]
    fn point_and_direction_set_w() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Vec4::point(v).w, 1.0);
        assert_eq!(Vec4::direction(v).w, 0.0);
        assert_eq!(Vec4::point(v).xyz(), v);
    }
}
