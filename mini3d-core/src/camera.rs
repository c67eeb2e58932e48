//! Free-look camera and its per-tick controller.

use crate::input::{Action, InputState};
use crate::math::{Mat4, Vec3};

/// Yaw/pitch camera. Pitch is not self-clamping; the controller clamps
/// it before writing to avoid gimbal flip.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation around world Y, radians.
    pub yaw: f64,
    /// Rotation around the local X axis, radians.
    pub pitch: f64,
}

impl Camera {
    pub fn new(position: Vec3, yaw: f64, pitch: f64) -> Self {
        Self {
            position,
            yaw,
            pitch,
        }
    }

    /// Unit view direction from the spherical yaw/pitch angles.
    pub fn forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(cp * sy, sp, cp * cy).normalized()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::UP).normalized()
    }

    pub fn up(&self) -> Vec3 {
        self.right().cross(self.forward()).normalized()
    }

    /// Look-at view matrix: eye here, target one forward step ahead,
    /// world-up as the up hint.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position, self.position + self.forward(), Vec3::UP)
    }
}

impl Default for Camera {
    fn default() -> Self {
        // Backed off along -z, facing the origin.
        Self::new(Vec3::new(0.0, 0.0, -5.0), 0.0, 0.0)
    }
}

/// Game-style camera movement, driven once per tick from the input state.
///
/// The update order is fixed: mouse rotation first, then keyboard
/// translation, then the wheel. A tick's rotation therefore steers that
/// same tick's forward/strafe direction.
#[derive(Debug, Clone)]
pub struct CameraController {
    /// Movement speed, units per second.
    pub move_speed: f64,
    /// Speed multiplier while the fast modifier is held.
    pub fast_multiplier: f64,
    /// Radians per pixel of mouse travel.
    pub mouse_sensitivity: f64,
    /// Pitch clamp, radians.
    pub pitch_limit: f64,
    pub invert_y: bool,
    /// When set, wheel clicks move the camera along its forward axis.
    pub wheel_moves_forward: bool,
    /// Units per wheel click.
    pub wheel_step: f64,
}

impl CameraController {
    pub fn new() -> Self {
        Self {
            move_speed: 4.0,
            fast_multiplier: 3.0,
            mouse_sensitivity: 0.0025,
            pitch_limit: 89f64.to_radians(),
            invert_y: false,
            wheel_moves_forward: true,
            wheel_step: 1.0,
        }
    }

    /// Consumes the accumulated input deltas and advances the camera by
    /// `dt` seconds.
    ///
    /// Simultaneous movement keys are intentionally not normalized:
    /// holding forward+strafe moves faster than either alone.
    pub fn update(&self, dt: f64, input: &mut InputState, camera: &mut Camera) {
        let dx = input.consume_mouse_dx();
        let dy = input.consume_mouse_dy();
        if dx != 0.0 || dy != 0.0 {
            camera.yaw += dx * self.mouse_sensitivity;
            let pitch_delta = if self.invert_y { dy } else { -dy } * self.mouse_sensitivity;
            camera.pitch = (camera.pitch + pitch_delta).clamp(-self.pitch_limit, self.pitch_limit);
        }

        let mut speed = self.move_speed;
        if input.is_held(Action::Fast) {
            speed *= self.fast_multiplier;
        }
        let step = speed * dt;

        let forward = camera.forward();
        let right = camera.right();
        if input.is_held(Action::Forward) {
            camera.position = camera.position + forward * step;
        }
        if input.is_held(Action::Back) {
            camera.position = camera.position + forward * -step;
        }
        if input.is_held(Action::StrafeRight) {
            camera.position = camera.position + right * step;
        }
        if input.is_held(Action::StrafeLeft) {
            camera.position = camera.position + right * -step;
        }
        if input.is_held(Action::Up) {
            camera.position = camera.position + Vec3::UP * step;
        }
        if input.is_held(Action::Down) {
            camera.position = camera.position + Vec3::UP * -step;
        }

        let wheel = input.consume_wheel();
        if self.wheel_moves_forward && wheel != 0.0 {
            // Wheel-down (positive) backs away from the scene.
            camera.position = camera.position + camera.forward() * (-wheel * self.wheel_step);
        }
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new()
    }
}
