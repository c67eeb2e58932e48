/// mini3d Core Library - CPU software rendering pipeline
///
/// This library provides the stateless core of a software 3D renderer:
/// vector/matrix math, triangle meshes with OBJ import/export, camera
/// and scene management, and a z-buffered triangle rasterizer with
/// flat, textured, lit and wireframe shading.

pub mod camera;
pub mod color;
pub mod error;
pub mod filter;
pub mod input;
pub mod instance;
pub mod math;
pub mod mesh;
pub mod obj;
pub mod renderer;
pub mod scene;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use camera::{Camera, CameraController};
pub use color::Color;
pub use input::{Action, InputState};
pub use instance::ModelInstance;
pub use math::{Mat3, Mat4, Vec2, Vec3, Vec4};
pub use mesh::Mesh;
pub use renderer::{render, Framebuffer, RenderSettings};
pub use scene::Scene;
pub use texture::Texture;
pub use transform::Transform;
