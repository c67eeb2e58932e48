//! Row-major 3x3 and 4x4 matrices, column-vector convention (`M * v`).

use std::ops::Mul;

use super::vec::{Vec3, Vec4};
use super::EPS;
use crate::error::MatrixError;

/// A 4x4 matrix. Factories cover the transforms the pipeline needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    m: [[f64; 4]; 4],
}

impl Mat4 {
    pub const fn from_rows(m: [[f64; 4]; 4]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { m }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    pub fn translation(t: Vec3) -> Self {
        let mut r = Self::identity();
        r.m[0][3] = t.x;
        r.m[1][3] = t.y;
        r.m[2][3] = t.z;
        r
    }

    pub fn scale(s: Vec3) -> Self {
        let mut r = Self::identity();
        r.m[0][0] = s.x;
        r.m[1][1] = s.y;
        r.m[2][2] = s.z;
        r
    }

    pub fn rotation_x(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        let mut r = Self::identity();
        r.m[1][1] = c;
        r.m[1][2] = -s;
        r.m[2][1] = s;
        r.m[2][2] = c;
        r
    }

    pub fn rotation_y(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        let mut r = Self::identity();
        r.m[0][0] = c;
        r.m[0][2] = s;
        r.m[2][0] = -s;
        r.m[2][2] = c;
        r
    }

    pub fn rotation_z(angle_rad: f64) -> Self {
        let (s, c) = angle_rad.sin_cos();
        let mut r = Self::identity();
        r.m[0][0] = c;
        r.m[0][1] = -s;
        r.m[1][0] = s;
        r.m[1][1] = c;
        r
    }

    /// Right-handed perspective projection onto [-1, 1] clip space.
    ///
    /// The w row carries `-1` in its z column, so `clip.w = -view.z`.
    /// The exact element layout is load-bearing for the screen mapping.
    pub fn perspective(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Self {
        let f = 1.0 / (fov_y_rad / 2.0).tan();
        let mut m = [[0.0; 4]; 4];
        m[0][0] = f / aspect;
        m[1][1] = f;
        m[2][2] = (far + near) / (near - far);
        m[2][3] = (2.0 * far * near) / (near - far);
        m[3][2] = -1.0;
        Self { m }
    }

    /// View matrix looking from `eye` toward `target` with the given up hint.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let f = (target - eye).normalized();
        let s = f.cross(up).normalized();
        let u = s.cross(f);
        let basis = Self::from_rows([
            [s.x, s.y, s.z, 0.0],
            [u.x, u.y, u.z, 0.0],
            [-f.x, -f.y, -f.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        basis * Self::translation(-eye)
    }

    /// Applies the matrix to a point (w = 1) and performs the perspective
    /// divide. When the resulting w is degenerate (|w| <= EPS) the raw
    /// x/y/z are returned undivided.
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let r = *self * Vec4::point(p);
        if r.w.abs() <= EPS {
            r.xyz()
        } else {
            Vec3::new(r.x / r.w, r.y / r.w, r.z / r.w)
        }
    }

    /// Applies the matrix to a direction (w = 0); translation never applies.
    pub fn transform_direction(&self, d: Vec3) -> Vec3 {
        (*self * Vec4::direction(d)).xyz()
    }

    pub fn transpose(&self) -> Self {
        let mut r = [[0.0; 4]; 4];
        for i in 0..4 {
            for j in 0..4 {
                r[i][j] = self.m[j][i];
            }
        }
        Self { m: r }
    }

    pub fn determinant(&self) -> f64 {
        let a = &self.m;
        let s2323 = a[2][2] * a[3][3] - a[2][3] * a[3][2];
        let s1323 = a[2][1] * a[3][3] - a[2][3] * a[3][1];
        let s1223 = a[2][1] * a[3][2] - a[2][2] * a[3][1];
        let s0323 = a[2][0] * a[3][3] - a[2][3] * a[3][0];
        let s0223 = a[2][0] * a[3][2] - a[2][2] * a[3][0];
        let s0123 = a[2][0] * a[3][1] - a[2][1] * a[3][0];

        a[0][0] * (a[1][1] * s2323 - a[1][2] * s1323 + a[1][3] * s1223)
            - a[0][1] * (a[1][0] * s2323 - a[1][2] * s0323 + a[1][3] * s0223)
            + a[0][2] * (a[1][0] * s1323 - a[1][1] * s0323 + a[1][3] * s0123)
            - a[0][3] * (a[1][0] * s1223 - a[1][1] * s0223 + a[1][2] * s0123)
    }

    /// Inverse via the adjugate. Fails when |det| <= EPS.
    pub fn inverse(&self) -> Result<Self, MatrixError> {
        let a = &self.m;
        let s2323 = a[2][2] * a[3][3] - a[2][3] * a[3][2];
        let s1323 = a[2][1] * a[3][3] - a[2][3] * a[3][1];
        let s1223 = a[2][1] * a[3][2] - a[2][2] * a[3][1];
        let s0323 = a[2][0] * a[3][3] - a[2][3] * a[3][0];
        let s0223 = a[2][0] * a[3][2] - a[2][2] * a[3][0];
        let s0123 = a[2][0] * a[3][1] - a[2][1] * a[3][0];
        let s2313 = a[1][2] * a[3][3] - a[1][3] * a[3][2];
        let s1313 = a[1][1] * a[3][3] - a[1][3] * a[3][1];
        let s1213 = a[1][1] * a[3][2] - a[1][2] * a[3][1];
        let s2312 = a[1][2] * a[2][3] - a[1][3] * a[2][2];
        let s1312 = a[1][1] * a[2][3] - a[1][3] * a[2][1];
        let s1212 = a[1][1] * a[2][2] - a[1][2] * a[2][1];
        let s0313 = a[1][0] * a[3][3] - a[1][3] * a[3][0];
        let s0213 = a[1][0] * a[3][2] - a[1][2] * a[3][0];
        let s0312 = a[1][0] * a[2][3] - a[1][3] * a[2][0];
        let s0212 = a[1][0] * a[2][2] - a[1][2] * a[2][0];
        let s0113 = a[1][0] * a[3][1] - a[1][1] * a[3][0];
        let s0112 = a[1][0] * a[2][1] - a[1][1] * a[2][0];

        let det = a[0][0] * (a[1][1] * s2323 - a[1][2] * s1323 + a[1][3] * s1223)
            - a[0][1] * (a[1][0] * s2323 - a[1][2] * s0323 + a[1][3] * s0223)
            + a[0][2] * (a[1][0] * s1323 - a[1][1] * s0323 + a[1][3] * s0123)
            - a[0][3] * (a[1][0] * s1223 - a[1][1] * s0223 + a[1][2] * s0123);
        if det.abs() <= EPS {
            return Err(MatrixError::Singular { det });
        }
        let id = 1.0 / det;

        let mut r = [[0.0; 4]; 4];
        r[0][0] = (a[1][1] * s2323 - a[1][2] * s1323 + a[1][3] * s1223) * id;
        r[0][1] = -(a[0][1] * s2323 - a[0][2] * s1323 + a[0][3] * s1223) * id;
        r[0][2] = (a[0][1] * s2313 - a[0][2] * s1313 + a[0][3] * s1213) * id;
        r[0][3] = -(a[0][1] * s2312 - a[0][2] * s1312 + a[0][3] * s1212) * id;
        r[1][0] = -(a[1][0] * s2323 - a[1][2] * s0323 + a[1][3] * s0223) * id;
        r[1][1] = (a[0][0] * s2323 - a[0][2] * s0323 + a[0][3] * s0223) * id;
        r[1][2] = -(a[0][0] * s2313 - a[0][2] * s0313 + a[0][3] * s0213) * id;
        r[1][3] = (a[0][0] * s2312 - a[0][2] * s0312 + a[0][3] * s0212) * id;
        r[2][0] = (a[1][0] * s1323 - a[1][1] * s0323 + a[1][3] * s0123) * id;
        r[2][1] = -(a[0][0] * s1323 - a[0][1] * s0323 + a[0][3] * s0123) * id;
        r[2][2] = (a[0][0] * s1313 - a[0][1] * s0313 + a[0][3] * s0113) * id;
        r[2][3] = -(a[0][0] * s1312 - a[0][1] * s0312 + a[0][3] * s0112) * id;
        r[3][0] = -(a[1][0] * s1223 - a[1][1] * s0223 + a[1][2] * s0123) * id;
        r[3][1] = (a[0][0] * s1223 - a[0][1] * s0223 + a[0][2] * s0123) * id;
        r[3][2] = -(a[0][0] * s1213 - a[0][1] * s0213 + a[0][2] * s0113) * id;
        r[3][3] = (a[0][0] * s1212 - a[0][1] * s0212 + a[0][2] * s0112) * id;
        Ok(Self { m: r })
    }

    pub fn eps_eq(&self, b: &Mat4, eps: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(b.m.iter().flatten())
            .all(|(x, y)| (x - y).abs() <= eps)
    }
}

impl Mul for Mat4 {
    type Output = Mat4;

    fn mul(self, b: Mat4) -> Mat4 {
        let mut r = [[0.0; 4]; 4];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                let mut s = 0.0;
                for k in 0..4 {
                    s += self.m[i][k] * b.m[k][j];
                }
                *cell = s;
            }
        }
        Mat4 { m: r }
    }
}

impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Vec4 {
        let a = [v.x, v.y, v.z, v.w];
        let mut r = [0.0; 4];
        for (i, out) in r.iter_mut().enumerate() {
            let mut s = 0.0;
            for k in 0..4 {
                s += self.m[i][k] * a[k];
            }
            *out = s;
        }
        Vec4::new(r[0], r[1], r[2], r[3])
    }
}

/// A 3x3 matrix, mainly the linear part of a Mat4 (normal matrices).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    m: [[f64; 3]; 3],
}

impl Mat3 {
    pub const fn from_rows(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    pub fn identity() -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { m }
    }

    /// The upper-left 3x3 block of a Mat4: its rotation/scale part.
    pub fn from_mat4_upper_left(a: &Mat4) -> Self {
        let mut m = [[0.0; 3]; 3];
        for (i, row) in m.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a.get(i, j);
            }
        }
        Self { m }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.m[row][col]
    }

    pub fn transpose(&self) -> Self {
        let mut r = [[0.0; 3]; 3];
        for i in 0..3 {
            for j in 0..3 {
                r[i][j] = self.m[j][i];
            }
        }
        Self { m: r }
    }

    pub fn determinant(&self) -> f64 {
        let [[a, b, c], [d, e, f], [g, h, i]] = self.m;
        a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
    }

    /// Inverse via the adjugate. Fails when |det| <= EPS.
    pub fn inverse(&self) -> Result<Self, MatrixError> {
        let det = self.determinant();
        if det.abs() <= EPS {
            return Err(MatrixError::Singular { det });
        }
        let id = 1.0 / det;
        let [[a, b, c], [d, e, f], [g, h, i]] = self.m;

        let r = [
            [
                (e * i - f * h) * id,
                -(b * i - c * h) * id,
                (b * f - c * e) * id,
            ],
            [
                -(d * i - f * g) * id,
                (a * i - c * g) * id,
                -(a * f - c * d) * id,
            ],
            [
                (d * h - e * g) * id,
                -(a * h - b * g) * id,
                (a * e - b * d) * id,
            ],
        ];
        Ok(Self { m: r })
    }

    /// `(M^-1)^T`, the normal matrix for a model transform.
    pub fn inverse_transpose(&self) -> Result<Self, MatrixError> {
        Ok(self.inverse()?.transpose())
    }

    pub fn eps_eq(&self, b: &Mat3, eps: f64) -> bool {
        self.m
            .iter()
            .flatten()
            .zip(b.m.iter().flatten())
            .all(|(x, y)| (x - y).abs() <= eps)
    }
}

impl Mul for Mat3 {
    type Output = Mat3;

    fn mul(self, b: Mat3) -> Mat3 {
        let mut r = [[0.0; 3]; 3];
        for (i, row) in r.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                let mut s = 0.0;
                for k in 0..3 {
                    s += self.m[i][k] * b.m[k][j];
                }
                *cell = s;
            }
        }
        Mat3 { m: r }
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m[0][0] * v.x + self.m[0][1] * v.y + self.m[0][2] * v.z,
            self.m[1][0] * v.x + self.m[1][1] * v.y + self.m[1][2] * v.z,
            self.m[2][0] * v.x + self.m[2][1] * v.y + self.m[2][2] * v.z,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_multiplicative_identity() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0)) * Mat4::rotation_y(0.7);
        assert!((Mat4::identity() * m).eps_eq(&m, 1e-12));
        assert!((m * Mat4::identity()).eps_eq(&m, 1e-12));
    }

    #[test]
    fn translation_moves_points_not_directions() {
        let t = Mat4::translation(Vec3::new(5.0, -2.0, 1.0));
        let d = Vec3::new(0.3, 0.4, 0.5);
        assert!(t.transform_direction(d).eps_eq(d, 1e-12));
        assert!(t
            .transform_point(Vec3::ZERO)
            .eps_eq(Vec3::new(5.0, -2.0, 1.0), 1e-12));
    }

    #[test]
    fn rotation_z_quarter_turn() {
        let r = Mat4::rotation_z(std::f64::consts::FRAC_PI_2);
        let p = r.transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert!(p.eps_eq(Vec3::new(0.0, 1.0, 0.0), 1e-9));
    }

    #[test]
    fn perspective_layout() {
        let fov = 60f64.to_radians();
        let p = Mat4::perspective(fov, 2.0, 0.1, 200.0);
        let f = 1.0 / (fov / 2.0).tan();
        assert!((p.get(0, 0) - f / 2.0).abs() < 1e-12);
        assert!((p.get(1, 1) - f).abs() < 1e-12);
        assert_eq!(p.get(3, 2), -1.0);
        assert_eq!(p.get(3, 3), 0.0);
    }

    #[test]
    fn look_at_centers_the_target() {
        let view = Mat4::look_at(Vec3::new(0.0, 0.0, 4.0), Vec3::ZERO, Vec3::UP);
        let p = view.transform_point(Vec3::ZERO);
        // Target sits straight ahead, 4 units down the -z view axis.
        assert!(p.eps_eq(Vec3::new(0.0, 0.0, -4.0), 1e-9));
    }

    #[test]
    fn inverse_roundtrip() {
        let m = Mat4::translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::rotation_x(0.4)
            * Mat4::scale(Vec3::new(2.0, 3.0, 4.0));
        let inv = m.inverse().unwrap();
        assert!((m * inv).eps_eq(&Mat4::identity(), 1e-9));
    }

    #[test]
    fn singular_inverse_is_an_error() {
        let m = Mat4::scale(Vec3::new(1.0, 0.0, 1.0));
        assert!(m.inverse().is_err());
        let m3 = Mat3::from_rows([[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [0.0, 1.0, 0.0]]);
        assert!(m3.inverse().is_err());
    }

    #[test]
    fn mat3_inverse_transpose_of_scale() {
        let m = Mat3::from_rows([[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 8.0]]);
        let it = m.inverse_transpose().unwrap();
        assert!((it.get(0, 0) - 0.5).abs() < 1e-12);
        assert!((it.get(1, 1) - 0.25).abs() < 1e-12);
        assert!((it.get(2, 2) - 0.125).abs() < 1e-12);
    }

    #[test]
    fn mat3_tracks_mat4_linear_part() {
        let m4 = Mat4::translation(Vec3::new(9.0, 9.0, 9.0)) * Mat4::rotation_z(0.3);
        let m3 = Mat3::from_mat4_upper_left(&m4);
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert!((m3 * v).eps_eq(m4.transform_direction(v), 1e-12));
    }
}
