//! A mesh placed in the scene with its own transform.

use std::rc::Rc;

use crate::math::Vec3;
use crate::mesh::Mesh;
use crate::transform::Transform;

/// One mesh bound to one transform. The mesh is shared (many instances
/// may reference the same geometry); the transform is exclusively owned.
#[derive(Debug, Clone)]
pub struct ModelInstance {
    mesh: Rc<Mesh>,
    pub transform: Transform,
}

impl ModelInstance {
    pub fn new(mesh: Rc<Mesh>) -> Self {
        Self::with_transform(mesh, Transform::new())
    }

    pub fn with_transform(mesh: Rc<Mesh>, transform: Transform) -> Self {
        Self { mesh, transform }
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// The mesh with the current transform applied to its positions.
    pub fn baked_mesh(&self) -> Mesh {
        self.mesh.transformed(&self.transform.to_matrix())
    }

    /// A new instance whose geometry has the transform baked in and whose
    /// transform is reset to identity. Baking an identity transform
    /// reproduces the original geometry.
    pub fn baked(&self) -> ModelInstance {
        ModelInstance::new(Rc::new(self.baked_mesh()))
    }

    /// Vertex positions in world space under the current transform.
    pub fn world_positions(&self) -> Vec<Vec3> {
        let m = self.transform.to_matrix();
        self.mesh
            .positions()
            .iter()
            .map(|&p| m.transform_point(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baked_identity_preserves_geometry() {
        let instance = ModelInstance::new(Rc::new(Mesh::cube(2.0)));
        let baked = instance.baked();
        for (a, b) in instance
            .mesh()
            .positions()
            .iter()
            .zip(baked.mesh().positions())
        {
            assert!(a.eps_eq(*b, 1e-9));
        }
        assert_eq!(baked.transform, Transform::new());
    }

    #[test]
    fn baked_folds_the_transform_in() {
        let mut instance = ModelInstance::new(Rc::new(Mesh::cube(2.0)));
        instance.transform.position = Vec3::new(3.0, 0.0, 0.0);
        let baked = instance.baked();
        // The world positions of both instances must agree.
        for (a, b) in instance
            .world_positions()
            .iter()
            .zip(baked.world_positions())
        {
            assert!(a.eps_eq(b, 1e-9));
        }
        assert!(baked.mesh().positions()[0].x > 1.0);
    }

    #[test]
    fn instances_share_one_mesh() {
        let mesh = Rc::new(Mesh::cube(1.0));
        let a = ModelInstance::new(Rc::clone(&mesh));
        let _b = ModelInstance::new(Rc::clone(&mesh));
        assert_eq!(Rc::strong_count(&mesh), 3);
        assert_eq!(a.mesh().vertex_count(), 8);
    }
}
