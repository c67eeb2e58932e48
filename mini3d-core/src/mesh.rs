//! Immutable triangle geometry in local/model space.

use crate::error::MeshError;
use crate::math::{Mat4, Vec2, Vec3};

/// Parallel per-vertex attributes (positions, texcoords, normals) plus a
/// triangle index list. Invariants are checked once at construction:
/// non-empty vertices, equal attribute lengths, index count a multiple of
/// three, every index in range.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    texcoords: Vec<Vec2>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl Mesh {
    /// Geometry without texcoords/normals; they default to (0,0) and (0,1,0).
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Result<Self, MeshError> {
        let n = positions.len();
        Self::with_attributes(
            positions,
            vec![Vec2::ZERO; n],
            vec![Vec3::UP; n],
            indices,
        )
    }

    pub fn with_attributes(
        positions: Vec<Vec3>,
        texcoords: Vec<Vec2>,
        normals: Vec<Vec3>,
        indices: Vec<u32>,
    ) -> Result<Self, MeshError> {
        if positions.is_empty() {
            return Err(MeshError::Empty);
        }
        if texcoords.len() != positions.len() || normals.len() != positions.len() {
            return Err(MeshError::AttributeMismatch {
                positions: positions.len(),
                texcoords: texcoords.len(),
                normals: normals.len(),
            });
        }
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCount(indices.len()));
        }
        let count = positions.len();
        for &index in &indices {
            if index as usize >= count {
                return Err(MeshError::IndexOutOfRange { index, count });
            }
        }
        Ok(Self {
            positions,
            texcoords,
            normals,
            indices,
        })
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn texcoords(&self) -> &[Vec2] {
        &self.texcoords
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// A new mesh with every position transformed by `m`. Texcoords,
    /// normals and indices are carried over unchanged; callers that bake
    /// a deforming transform are expected to follow up with
    /// [`Mesh::recalculate_normals`].
    pub fn transformed(&self, m: &Mat4) -> Self {
        Self {
            positions: self.positions.iter().map(|&p| m.transform_point(p)).collect(),
            texcoords: self.texcoords.clone(),
            normals: self.normals.clone(),
            indices: self.indices.clone(),
        }
    }

    /// A new mesh with area-weighted, vertex-averaged normals.
    ///
    /// Each triangle contributes its unnormalized edge cross product, so
    /// larger triangles weigh more. Vertices whose accumulated normal
    /// stays degenerate (untouched, or only degenerate triangles) fall
    /// back to (0,1,0).
    pub fn recalculate_normals(&self) -> Self {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let e1 = self.positions[b] - self.positions[a];
            let e2 = self.positions[c] - self.positions[a];
            let face = e1.cross(e2);
            acc[a] = acc[a] + face;
            acc[b] = acc[b] + face;
            acc[c] = acc[c] + face;
        }
        let normals = acc
            .into_iter()
            .map(|n| {
                let n = n.normalized();
                if n == Vec3::ZERO {
                    Vec3::UP
                } else {
                    n
                }
            })
            .collect();
        Self {
            positions: self.positions.clone(),
            texcoords: self.texcoords.clone(),
            normals,
            indices: self.indices.clone(),
        }
    }

    /// An axis-aligned cube with outward (counter-clockwise) winding,
    /// used by the demo front-end and tests.
    pub fn cube(size: f64) -> Self {
        let h = size / 2.0;
        let positions = vec![
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        let indices = vec![
            4, 5, 6, 4, 6, 7, // front  (+z)
            1, 0, 3, 1, 3, 2, // back   (-z)
            5, 1, 2, 5, 2, 6, // right  (+x)
            0, 4, 7, 0, 7, 3, // left   (-x)
            3, 7, 6, 3, 6, 2, // top    (+y)
            0, 1, 5, 0, 5, 4, // bottom (-y)
        ];
        let n = positions.len();
        Self {
            positions,
            texcoords: vec![Vec2::ZERO; n],
            normals: vec![Vec3::UP; n],
            indices,
        }
        .recalculate_normals()
    }
}
