//! The software rasterizer: model space to a shaded, depth-ordered
//! color buffer. Triangles with z-buffer, flat/textured/lit shading and
//! a wireframe overlay. No frustum clipping: out-of-range vertices are
//! rejected wholesale, which pops triangles at the near/far planes.

use log::trace;

use crate::camera::Camera;
use crate::color::Color;
use crate::error::RenderError;
use crate::instance::ModelInstance;
use crate::math::{Mat4, Vec2, Vec3, Vec4};
use crate::texture::Texture;

/// Vertical field of view of the fixed projection, radians.
const FOV_Y_DEG: f64 = 60.0;
const NEAR: f64 = 0.1;
const FAR: f64 = 200.0;
/// Homogeneous w below this is treated as a degenerate vertex.
const W_EPS: f64 = 1e-12;

pub const BACKGROUND: Color = Color::new(40, 40, 40);
/// Fallback fill color when none is configured.
pub const BASE_COLOR: Color = Color::new(180, 180, 220);
/// Secondary-camera markers are always drawn in this color.
pub const MARKER_COLOR: Color = Color::new(255, 230, 120);

/// Per-call shading configuration. The three booleans combine freely;
/// the fill pass runs unless texturing, lighting and the base color are
/// all absent, which leaves a pure wireframe.
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub draw_wireframe: bool,
    pub use_texture: bool,
    pub use_lighting: bool,
    pub base_color: Option<Color>,
    /// Color of wireframe edges (and of the whole image in wireframe-only
    /// mode).
    pub wire_color: Color,
    pub texture: Option<Texture>,
}

impl RenderSettings {
    fn fill_enabled(&self) -> bool {
        self.use_lighting || self.use_texture || self.base_color.is_some()
    }

    fn marker() -> Self {
        Self {
            draw_wireframe: true,
            use_texture: false,
            use_lighting: false,
            base_color: None,
            wire_color: MARKER_COLOR,
            texture: None,
        }
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            draw_wireframe: true,
            use_texture: false,
            use_lighting: false,
            base_color: Some(BASE_COLOR),
            wire_color: Color::WHITE,
            texture: None,
        }
    }
}

/// Caller-owned scratch target: ARGB color plus an f64 depth plane.
/// Reset at the start of every render call, never shared across threads.
#[derive(Debug, Clone)]
pub struct Framebuffer {
    width: usize,
    height: usize,
    color: Vec<u32>,
    depth: Vec<f64>,
}

impl Framebuffer {
    /// Both dimensions must be at least 2 pixels.
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        if width <= 1 || height <= 1 {
            return Err(RenderError::BadSize { width, height });
        }
        Ok(Self {
            width,
            height,
            color: vec![BACKGROUND.to_argb(); width * height],
            depth: vec![f64::INFINITY; width * height],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.color
    }

    pub fn pixels_mut(&mut self) -> &mut [u32] {
        &mut self.color
    }

    pub fn depth(&self) -> &[f64] {
        &self.depth
    }

    pub fn pixel(&self, x: usize, y: usize) -> u32 {
        self.color[y * self.width + x]
    }

    fn clear(&mut self) {
        self.color.fill(BACKGROUND.to_argb());
        self.depth.fill(f64::INFINITY);
    }
}

/// A projected vertex ready for scan conversion.
struct ScreenVertex {
    x: f64,
    y: f64,
    /// Depth in [0, 1], 0 = near plane.
    depth: f64,
    uv: Vec2,
    world_pos: Vec3,
    world_nrm: Vec3,
}

/// The render entry point, called once per tick by the hosting shell.
///
/// `primary` is the model under inspection; `markers` are auxiliary
/// instances (secondary-camera icons) forced into wireframe-only mode
/// with [`MARKER_COLOR`], sharing the same depth buffer so that real
/// geometry can occlude them. A missing camera yields a background-only
/// image: "no camera yet" is a normal transient state, not an error.
pub fn render(
    frame: &mut Framebuffer,
    primary: Option<&ModelInstance>,
    markers: &[ModelInstance],
    camera: Option<&Camera>,
    settings: &RenderSettings,
) {
    frame.clear();
    let Some(camera) = camera else {
        return;
    };

    let view = camera.view_matrix();
    let aspect = frame.width as f64 / frame.height as f64;
    let proj = Mat4::perspective(FOV_Y_DEG.to_radians(), aspect, NEAR, FAR);

    if let Some(instance) = primary {
        draw_instance(frame, instance, camera, &view, &proj, settings);
    }
    let marker_settings = RenderSettings::marker();
    for marker in markers {
        draw_instance(frame, marker, camera, &view, &proj, &marker_settings);
    }
}

fn draw_instance(
    frame: &mut Framebuffer,
    instance: &ModelInstance,
    camera: &Camera,
    view: &Mat4,
    proj: &Mat4,
    settings: &RenderSettings,
) {
    let mesh = instance.mesh();
    let model = instance.transform.to_matrix();
    let mvp = *proj * *view * model;

    let width = frame.width as f64;
    let height = frame.height as f64;

    // Project every vertex up front; triangles touching a rejected
    // vertex are dropped wholesale (no clipping).
    let mut verts: Vec<Option<ScreenVertex>> = Vec::with_capacity(mesh.vertex_count());
    for i in 0..mesh.vertex_count() {
        let local = mesh.positions()[i];
        let world_pos = (model * Vec4::point(local)).xyz();

        let clip = mvp * Vec4::point(local);
        if clip.w.abs() < W_EPS {
            verts.push(None);
            continue;
        }
        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let ndc_z = clip.z / clip.w;
        if !(-1.0..=1.0).contains(&ndc_z) {
            verts.push(None);
            continue;
        }

        let world_nrm = model.transform_direction(mesh.normals()[i]).normalized();
        verts.push(Some(ScreenVertex {
            x: (ndc_x + 1.0) * 0.5 * width,
            y: (1.0 - (ndc_y + 1.0) * 0.5) * height,
            depth: (ndc_z + 1.0) * 0.5,
            uv: mesh.texcoords()[i],
            world_pos,
            world_nrm,
        }));
    }

    let mut drawn = 0usize;
    if settings.fill_enabled() {
        for tri in mesh.indices().chunks_exact(3) {
            let Some((a, b, c)) = triangle(&verts, tri) else {
                continue;
            };
            if !is_front_facing(a, b, c) {
                continue;
            }
            fill_triangle(frame, a, b, c, camera, settings);
            drawn += 1;
        }
    }

    if settings.draw_wireframe {
        let wire = settings.wire_color.to_argb();
        for tri in mesh.indices().chunks_exact(3) {
            let Some((a, b, c)) = triangle(&verts, tri) else {
                continue;
            };
            if !is_front_facing(a, b, c) {
                continue;
            }
            draw_line_z(frame, a, b, wire);
            draw_line_z(frame, b, c, wire);
            draw_line_z(frame, c, a, wire);
        }
    }
    trace!(
        "instance: {} triangles, {} filled",
        mesh.triangle_count(),
        drawn
    );
}

fn triangle<'a>(
    verts: &'a [Option<ScreenVertex>],
    tri: &[u32],
) -> Option<(&'a ScreenVertex, &'a ScreenVertex, &'a ScreenVertex)> {
    match (
        &verts[tri[0] as usize],
        &verts[tri[1] as usize],
        &verts[tri[2] as usize],
    ) {
        (Some(a), Some(b), Some(c)) => Some((a, b, c)),
        _ => None,
    }
}

/// Screen-space backface test. Winding that appears counter-clockwise
/// to the viewer has negative signed double-area here (screen y grows
/// downward); non-negative area is culled. The sign convention is fixed
/// and must match the winding of imported geometry.
fn is_front_facing(a: &ScreenVertex, b: &ScreenVertex, c: &ScreenVertex) -> bool {
    let area2 = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    area2 < 0.0
}

/// 2D edge function; positive when p lies left of the a->b edge under
/// the fixed orientation.
fn edge(ax: f64, ay: f64, bx: f64, by: f64, px: f64, py: f64) -> f64 {
    (px - ax) * (by - ay) - (py - ay) * (bx - ax)
}

fn fill_triangle(
    frame: &mut Framebuffer,
    v0: &ScreenVertex,
    v1: &ScreenVertex,
    v2: &ScreenVertex,
    camera: &Camera,
    settings: &RenderSettings,
) {
    let min_x = (v0.x.min(v1.x).min(v2.x).floor() as i64).max(0) as usize;
    let min_y = (v0.y.min(v1.y).min(v2.y).floor() as i64).max(0) as usize;
    let max_x = (v0.x.max(v1.x).max(v2.x).ceil() as i64).min(frame.width as i64 - 1);
    let max_y = (v0.y.max(v1.y).max(v2.y).ceil() as i64).min(frame.height as i64 - 1);
    if max_x < 0 || max_y < 0 {
        return;
    }
    let (max_x, max_y) = (max_x as usize, max_y as usize);

    let area = edge(v0.x, v0.y, v1.x, v1.y, v2.x, v2.y);
    if area.abs() < W_EPS {
        return;
    }

    let base = settings.base_color.unwrap_or(BASE_COLOR);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let px = x as f64 + 0.5;
            let py = y as f64 + 0.5;

            let mut w0 = edge(v1.x, v1.y, v2.x, v2.y, px, py);
            let mut w1 = edge(v2.x, v2.y, v0.x, v0.y, px, py);
            let mut w2 = edge(v0.x, v0.y, v1.x, v1.y, px, py);
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            w0 /= area;
            w1 /= area;
            w2 /= area;

            // Depth interpolates linearly in screen space; the z-test is
            // strictly "nearer wins".
            let depth = v0.depth * w0 + v1.depth * w1 + v2.depth * w2;
            let id = y * frame.width + x;
            if depth >= frame.depth[id] {
                continue;
            }
            frame.depth[id] = depth;

            let mut color = base;
            if settings.use_texture {
                if let Some(texture) = &settings.texture {
                    // Linear (not perspective-corrected) UV interpolation,
                    // preserved for parity with the calibration scenes.
                    let u = v0.uv.x * w0 + v1.uv.x * w1 + v2.uv.x * w2;
                    let v = v0.uv.y * w0 + v1.uv.y * w1 + v2.uv.y * w2;
                    color = Color::from_argb(texture.sample(u, v));
                }
            }

            if settings.use_lighting {
                let normal = (v0.world_nrm * w0 + v1.world_nrm * w1 + v2.world_nrm * w2)
                    .normalized();
                let point = v0.world_pos * w0 + v1.world_pos * w1 + v2.world_pos * w2;
                // The camera is the only light, co-located with the viewer.
                let light = (camera.position - point).normalized();
                let diffuse = normal.dot(light).max(0.0);
                let ambient = 0.22;
                let intensity = ambient + (1.0 - ambient) * diffuse;
                color = modulate(color, intensity);
            }

            frame.color[id] = color.to_argb();
        }
    }
}

fn modulate(c: Color, intensity: f64) -> Color {
    let scale = |v: u8| ((v as f64 * intensity).round().clamp(0.0, 255.0)) as u8;
    Color::new(scale(c.r), scale(c.g), scale(c.b))
}

/// DDA line walk with a z-test against the shared depth buffer. Lines
/// never write depth, so an edge shows only where it is nearer than the
/// fill already present and cannot occlude later geometry.
fn draw_line_z(frame: &mut Framebuffer, a: &ScreenVertex, b: &ScreenVertex, rgb: u32) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let dz = b.depth - a.depth;
    let steps = dx.abs().max(dy.abs()).ceil() as i64;
    if steps <= 0 {
        return;
    }

    let sx = dx / steps as f64;
    let sy = dy / steps as f64;
    let sz = dz / steps as f64;

    let (mut x, mut y, mut z) = (a.x, a.y, a.depth);
    for _ in 0..=steps {
        let ix = x.round() as i64;
        let iy = y.round() as i64;
        if ix >= 0 && (ix as usize) < frame.width && iy >= 0 && (iy as usize) < frame.height {
            let id = iy as usize * frame.width + ix as usize;
            if z < frame.depth[id] {
                frame.color[id] = rgb;
            }
        }
        x += sx;
        y += sy;
        z += sz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use std::rc::Rc;

    fn flat_settings() -> RenderSettings {
        RenderSettings {
            draw_wireframe: false,
            use_texture: false,
            use_lighting: false,
            base_color: Some(Color::new(200, 40, 40)),
            wire_color: Color::WHITE,
            texture: None,
        }
    }

    /// Default camera sits at (0,0,-5) looking along +z; a triangle in
    /// the z=0 plane faces it when wound (0,2,1) over these vertices.
    fn facing_triangle() -> Mesh {
        let positions = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        Mesh::new(positions, vec![0, 2, 1])
            .unwrap()
            .recalculate_normals()
    }

    fn count_non_background(frame: &Framebuffer) -> usize {
        frame
            .pixels()
            .iter()
            .filter(|&&p| p != BACKGROUND.to_argb())
            .count()
    }

    #[test]
    fn framebuffer_rejects_degenerate_sizes() {
        assert!(Framebuffer::new(1, 100).is_err());
        assert!(Framebuffer::new(100, 0).is_err());
        assert!(Framebuffer::new(2, 2).is_ok());
    }

    #[test]
    fn no_camera_renders_background_only() {
        let mut frame = Framebuffer::new(64, 64).unwrap();
        let instance = ModelInstance::new(Rc::new(facing_triangle()));
        render(&mut frame, Some(&instance), &[], None, &flat_settings());
        assert_eq!(count_non_background(&frame), 0);
    }

    #[test]
    fn no_instance_renders_background_only() {
        let mut frame = Framebuffer::new(64, 64).unwrap();
        let camera = Camera::default();
        render(&mut frame, None, &[], Some(&camera), &flat_settings());
        assert_eq!(count_non_background(&frame), 0);
    }

    #[test]
    fn facing_triangle_fills_the_center() {
        let mut frame = Framebuffer::new(100, 100).unwrap();
        let camera = Camera::default();
        let instance = ModelInstance::new(Rc::new(facing_triangle()));
        render(&mut frame, Some(&instance), &[], Some(&camera), &flat_settings());
        assert_eq!(frame.pixel(50, 50), Color::new(200, 40, 40).to_argb());
        assert!(frame.depth()[50 * 100 + 50].is_finite());
    }

    #[test]
    fn back_facing_triangle_is_culled() {
        let positions = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ];
        // Opposite winding of `facing_triangle`.
        let mesh = Mesh::new(positions, vec![0, 1, 2]).unwrap();
        let mut frame = Framebuffer::new(100, 100).unwrap();
        let camera = Camera::default();
        let instance = ModelInstance::new(Rc::new(mesh));
        render(&mut frame, Some(&instance), &[], Some(&camera), &flat_settings());
        assert_eq!(count_non_background(&frame), 0);
    }

    #[test]
    fn clipped_triangle_writes_nothing() {
        // Behind the camera: every vertex lands outside ndc z range.
        let mut instance = ModelInstance::new(Rc::new(facing_triangle()));
        instance.transform.position = Vec3::new(0.0, 0.0, -10.0);
        let mut frame = Framebuffer::new(100, 100).unwrap();
        let camera = Camera::default();
        render(&mut frame, Some(&instance), &[], Some(&camera), &flat_settings());
        assert_eq!(count_non_background(&frame), 0);
        assert!(frame.depth().iter().all(|d| d.is_infinite()));
    }

    /// Two overlapping triangles, textured so they shade differently;
    /// the nearer one must win regardless of draw order.
    fn overlap_mesh(near_first: bool) -> Mesh {
        let positions = vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-2.0, -2.0, 2.0),
            Vec3::new(2.0, -2.0, 2.0),
            Vec3::new(0.0, 2.0, 2.0),
        ];
        // Near triangle samples the bottom-left texel, far the top-right.
        let texcoords = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 1.0),
        ];
        let normals = vec![Vec3::UP; 6];
        let near = [0u32, 2, 1];
        let far = [3u32, 5, 4];
        let indices = if near_first {
            [near, far].concat()
        } else {
            [far, near].concat()
        };
        Mesh::with_attributes(positions, texcoords, normals, indices).unwrap()
    }

    fn overlap_settings() -> RenderSettings {
        let texture = Texture::from_pixels(
            2,
            2,
            vec![
                Color::BLACK.to_argb(),
                Color::new(255, 0, 0).to_argb(), // top-right: far triangle
                Color::new(0, 0, 255).to_argb(), // bottom-left: near triangle
                Color::BLACK.to_argb(),
            ],
        )
        .unwrap();
        RenderSettings {
            draw_wireframe: false,
            use_texture: true,
            use_lighting: false,
            base_color: Some(BASE_COLOR),
            wire_color: Color::WHITE,
            texture: Some(texture),
        }
    }

    #[test]
    fn nearer_triangle_wins_either_draw_order() {
        for near_first in [true, false] {
            let mut frame = Framebuffer::new(100, 100).unwrap();
            let camera = Camera::default();
            let instance = ModelInstance::new(Rc::new(overlap_mesh(near_first)));
            render(
                &mut frame,
                Some(&instance),
                &[],
                Some(&camera),
                &overlap_settings(),
            );
            assert_eq!(
                frame.pixel(50, 50),
                Color::new(0, 0, 255).to_argb(),
                "near_first={near_first}"
            );
        }
    }

    #[test]
    fn wireframe_only_draws_edges_without_depth() {
        let mut frame = Framebuffer::new(100, 100).unwrap();
        let camera = Camera::default();
        let instance = ModelInstance::new(Rc::new(facing_triangle()));
        let settings = RenderSettings {
            draw_wireframe: true,
            use_texture: false,
            use_lighting: false,
            base_color: None,
            wire_color: Color::WHITE,
            texture: None,
        };
        render(&mut frame, Some(&instance), &[], Some(&camera), &settings);
        assert!(count_non_background(&frame) > 0);
        // The line pass never writes depth.
        assert!(frame.depth().iter().all(|d| d.is_infinite()));
        // Interior pixels stay background in wireframe-only mode.
        assert_eq!(frame.pixel(50, 55), BACKGROUND.to_argb());
    }

    #[test]
    fn markers_render_in_the_marker_color() {
        let mut frame = Framebuffer::new(100, 100).unwrap();
        let camera = Camera::default();
        let marker = ModelInstance::new(Rc::new(facing_triangle()));
        render(&mut frame, None, &[marker], Some(&camera), &flat_settings());
        let marker_pixels = frame
            .pixels()
            .iter()
            .filter(|&&p| p == MARKER_COLOR.to_argb())
            .count();
        assert!(marker_pixels > 0);
        assert_eq!(count_non_background(&frame), marker_pixels);
    }

    #[test]
    fn camera_light_fully_lights_a_facing_surface() {
        let mut frame = Framebuffer::new(100, 100).unwrap();
        let camera = Camera::default();
        let instance = ModelInstance::new(Rc::new(facing_triangle()));
        let mut settings = flat_settings();
        settings.use_lighting = true;
        render(&mut frame, Some(&instance), &[], Some(&camera), &settings);
        // At the pixel straight ahead, the diffuse term is ~1 and the
        // shaded color matches the base color.
        let center = Color::from_argb(frame.pixel(50, 50));
        let base = Color::new(200, 40, 40);
        assert!((center.r as i32 - base.r as i32).abs() <= 1);
        assert!((center.g as i32 - base.g as i32).abs() <= 1);
        assert!((center.b as i32 - base.b as i32).abs() <= 1);
    }
}
