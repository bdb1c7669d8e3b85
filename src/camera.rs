//! A perspective camera with first-person fly controls.
//!
//! [`Camera`] owns a [`Transform`] for its position and orientation plus the
//! projection parameters (field of view, aspect ratio, near/far planes). The
//! view and projection matrices are *not* lazily cached: the view matrix is
//! rebuilt unconditionally at the end of every [`Camera::update`], and the
//! projection matrix is rebuilt whenever the output surface resizes.
//!
//! Any number of cameras can exist in a scene; only the active one receives
//! `update` each frame, but every camera receives
//! [`update_projection_matrix`](Camera::update_projection_matrix) on resize.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

use crate::input::Input;
use crate::transform::Transform;

/// Pitch is clamped just inside ±π/2 so the look direction never becomes
/// parallel to the world up axis.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.001;

/// Per-frame increment applied to the movement speed by the speed keys.
const SPEED_STEP: f32 = 0.1;

/// Lower bound for the movement speed.
const MIN_SPEED: f32 = 0.1;

/// A free-flying perspective camera.
///
/// # Controls
///
/// - **W/S**: move forward/backward along the view direction
/// - **A/D**: strafe left/right
/// - **Space/E**: move up, **X/Q**: move down (all in local axes)
/// - **Left Shift / Left Ctrl**: raise/lower the movement speed
/// - **Right mouse + drag**: look around (pitch clamped inside ±π/2)
#[derive(Clone, Debug)]
pub struct Camera {
    transform: Transform,
    fov: f32,
    aspect_ratio: f32,
    near: f32,
    far: f32,
    movement_speed: f32,
    look_sensitivity: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Creates a camera at the origin looking down +Z with a 90 degree field
    /// of view, 0.1/200.0 clip planes, and default control speeds.
    pub fn new(aspect_ratio: f32) -> Self {
        let mut camera = Self {
            transform: Transform::new(),
            fov: FRAC_PI_2,
            aspect_ratio,
            near: 0.1,
            far: 200.0,
            movement_speed: 5.0,
            look_sensitivity: 0.005,
            view: Mat4::IDENTITY,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix(aspect_ratio);
        camera.update_view_matrix();
        camera
    }

    /// Sets the starting position.
    pub fn position(mut self, position: Vec3) -> Self {
        self.transform.set_position(position);
        self.update_view_matrix();
        self
    }

    /// Sets the starting rotation as (pitch, yaw, roll) in radians.
    pub fn rotation(mut self, pitch_yaw_roll: Vec3) -> Self {
        self.transform.set_rotation(pitch_yaw_roll);
        self.update_view_matrix();
        self
    }

    /// Sets the field of view in degrees.
    pub fn with_fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self.update_projection_matrix(self.aspect_ratio);
        self
    }

    /// Sets the near and far clipping planes.
    pub fn clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self.update_projection_matrix(self.aspect_ratio);
        self
    }

    /// Sets the movement speed in units per second.
    pub fn speed(mut self, speed: f32) -> Self {
        self.movement_speed = speed;
        self
    }

    /// Sets the mouse look sensitivity in radians per pixel.
    pub fn sensitivity(mut self, sensitivity: f32) -> Self {
        self.look_sensitivity = sensitivity;
        self
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Mutable access to the owned transform. The view matrix picks up any
    /// change on the next [`update`](Self::update) call.
    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Field of view in radians.
    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Rebuilds the left-handed perspective projection for a new aspect
    /// ratio. The owning scene calls this for every camera when the window
    /// resizes.
    pub fn update_projection_matrix(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.projection = Mat4::perspective_lh(self.fov, aspect_ratio, self.near, self.far);
    }

    /// Rebuilds the view matrix from the transform's position and forward
    /// direction, with world up fixed to +Y.
    pub fn update_view_matrix(&mut self) {
        self.view = Mat4::look_to_lh(self.transform.position(), self.transform.forward(), Vec3::Y);
    }

    /// Applies one frame of interactive movement and look input, then
    /// refreshes the view matrix.
    pub fn update(&mut self, input: &Input, dt: f32) {
        let step = self.movement_speed * dt;

        if input.key_down(KeyCode::KeyW) {
            self.transform.move_relative(Vec3::new(0.0, 0.0, step));
        }
        if input.key_down(KeyCode::KeyS) {
            self.transform.move_relative(Vec3::new(0.0, 0.0, -step));
        }
        if input.key_down(KeyCode::KeyA) {
            self.transform.move_relative(Vec3::new(-step, 0.0, 0.0));
        }
        if input.key_down(KeyCode::KeyD) {
            self.transform.move_relative(Vec3::new(step, 0.0, 0.0));
        }
        if input.key_down(KeyCode::Space) || input.key_down(KeyCode::KeyE) {
            self.transform.move_relative(Vec3::new(0.0, step, 0.0));
        }
        if input.key_down(KeyCode::KeyX) || input.key_down(KeyCode::KeyQ) {
            self.transform.move_relative(Vec3::new(0.0, -step, 0.0));
        }
        if input.key_down(KeyCode::ShiftLeft) {
            self.movement_speed += SPEED_STEP;
        }
        if input.key_down(KeyCode::ControlLeft) {
            self.movement_speed = (self.movement_speed - SPEED_STEP).max(MIN_SPEED);
        }

        if input.mouse_down(MouseButton::Right) {
            let delta = input.mouse_delta();
            self.transform.rotate(Vec3::new(
                delta.y * self.look_sensitivity,
                delta.x * self.look_sensitivity,
                0.0,
            ));

            let rotation = self.transform.pitch_yaw_roll();
            let pitch = rotation.x.clamp(-PITCH_LIMIT, PITCH_LIMIT);
            if pitch != rotation.x {
                self.transform
                    .set_rotation(Vec3::new(pitch, rotation.y, rotation.z));
            }
        }

        self.update_view_matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    const EPS: f32 = 1e-5;

    #[test]
    fn builder_sets_fov_in_radians() {
        let camera = Camera::new(1.777).with_fov(45.0);
        assert!((camera.fov() - 45.0f32.to_radians()).abs() < EPS);
    }

    #[test]
    fn pitch_stays_strictly_inside_quarter_turn() {
        let mut camera = Camera::new(1.777);
        let mut input = Input::new();
        input.press_mouse_button(MouseButton::Right);

        let mut cursor = Vec2::ZERO;
        for _ in 0..200 {
            input.end_frame();
            cursor.y += 100.0;
            input.move_cursor(cursor);
            camera.update(&input, 0.016);
        }

        let pitch = camera.transform().pitch_yaw_roll().x;
        assert!(pitch < FRAC_PI_2);
        assert!((pitch - PITCH_LIMIT).abs() < EPS);
    }

    #[test]
    fn look_without_button_does_not_rotate() {
        let mut camera = Camera::new(1.777);
        let mut input = Input::new();
        input.move_cursor(Vec2::new(300.0, 300.0));
        camera.update(&input, 0.016);
        assert_eq!(camera.transform().pitch_yaw_roll(), Vec3::ZERO);
    }

    #[test]
    fn forward_key_moves_along_view_direction() {
        let mut camera = Camera::new(1.777).rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        let mut input = Input::new();
        input.press_key(KeyCode::KeyW);

        camera.update(&input, 0.5);

        // Yawed 90 degrees, forward is world +X: 5.0 units/s for half a second.
        let position = camera.transform().position();
        assert!(position.abs_diff_eq(Vec3::new(2.5, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn speed_is_floored() {
        let mut camera = Camera::new(1.777);
        let mut input = Input::new();
        input.press_key(KeyCode::ControlLeft);

        for _ in 0..100 {
            camera.update(&input, 0.016);
        }
        assert!((camera.movement_speed() - MIN_SPEED).abs() < EPS);
    }

    #[test]
    fn resize_rebuilds_projection_only() {
        let mut camera = Camera::new(1.0);
        let before = camera.projection_matrix();
        let view_before = camera.view_matrix();

        camera.update_projection_matrix(2.0);

        assert_ne!(camera.projection_matrix(), before);
        assert_eq!(camera.view_matrix(), view_before);
        assert!((camera.aspect_ratio() - 2.0).abs() < EPS);
    }

    #[test]
    fn view_tracks_external_transform_changes_on_update() {
        let mut camera = Camera::new(1.777);
        let before = camera.view_matrix();

        camera.transform_mut().set_position(Vec3::new(0.0, 3.0, -4.0));
        assert_eq!(camera.view_matrix(), before);

        camera.update(&Input::new(), 0.016);
        assert_ne!(camera.view_matrix(), before);
    }
}
