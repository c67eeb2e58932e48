/// Linear algebra for the software rendering pipeline.
///
/// Column-vector convention throughout: `transformed = M * v`.
pub mod mat;
pub mod vec;

pub use mat::{Mat3, Mat4};
pub use vec::{Vec2, Vec3, Vec4};

/// Tolerance for degeneracy checks (zero-length normalize, singular determinant).
pub const EPS: f64 = 1e-9;

#[inline]
pub fn eps_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}
