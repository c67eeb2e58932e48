//! Position / Euler rotation / scale, composed into a model matrix.

use crate::error::MatrixError;
use crate::math::{Mat3, Mat4, Vec3};

/// Mutable transform state. `to_matrix` is derived on every call and
/// never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Euler angles in radians, applied X then Y then Z.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }

    /// Column-vector composition, fixed order: `M = T * Rz * Ry * Rx * S`.
    pub fn to_matrix(&self) -> Mat4 {
        let t = Mat4::translation(self.position);
        let rx = Mat4::rotation_x(self.rotation.x);
        let ry = Mat4::rotation_y(self.rotation.y);
        let rz = Mat4::rotation_z(self.rotation.z);
        let s = Mat4::scale(self.scale);
        t * rz * ry * rx * s
    }

    /// Normal matrix `(M^-1)^T` of the linear part; fails on degenerate
    /// scale (zero component).
    pub fn normal_matrix(&self) -> Result<Mat3, MatrixError> {
        Mat3::from_mat4_upper_left(&self.to_matrix()).inverse_transpose()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
