//! The scene context: actors, cameras, and the active-camera selection.
//!
//! [`Scene`] is the explicit per-frame state passed through update and draw.
//! It owns the actor list (drawn every frame, in insertion order, with no
//! culling or sorting), the camera list, and which camera is currently
//! active. Switching the active camera is a pure selection; it never mutates
//! camera state.

use crate::actor::Actor;
use crate::camera::Camera;
use crate::color::Color;
use crate::input::Input;

/// Everything that gets updated and drawn each frame.
pub struct Scene {
    actors: Vec<Actor>,
    cameras: Vec<Camera>,
    active_camera: usize,
    background: Color,
    tint: Color,
    quit_requested: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            cameras: Vec::new(),
            active_camera: 0,
            background: Color::BLACK,
            tint: Color::WHITE,
            quit_requested: false,
        }
    }

    /// Adds an actor to the end of the draw order and returns its index.
    pub fn add_actor(&mut self, actor: Actor) -> usize {
        self.actors.push(actor);
        self.actors.len() - 1
    }

    /// Adds a camera and returns its index.
    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actors_mut(&mut self) -> &mut [Actor] {
        &mut self.actors
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn cameras_mut(&mut self) -> &mut [Camera] {
        &mut self.cameras
    }

    pub fn active_camera_index(&self) -> usize {
        self.active_camera
    }

    /// Selects the camera used for rendering. The index must refer to an
    /// existing camera; an out-of-range value panics on the next access
    /// rather than being masked.
    pub fn set_active_camera(&mut self, index: usize) {
        log::debug!("active camera -> {index}");
        self.active_camera = index;
    }

    pub fn active_camera(&self) -> &Camera {
        &self.cameras[self.active_camera]
    }

    pub fn active_camera_mut(&mut self) -> &mut Camera {
        &mut self.cameras[self.active_camera]
    }

    /// Background clear color for the frame.
    pub fn background(&self) -> Color {
        self.background
    }

    pub fn set_background(&mut self, color: Color) {
        self.background = color;
    }

    /// Global tint multiplied into every actor's vertex colors.
    pub fn tint(&self) -> Color {
        self.tint
    }

    pub fn set_tint(&mut self, color: Color) {
        self.tint = color;
    }

    /// Asks the application shell to exit after this frame.
    pub fn request_quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Per-frame update: only the active camera receives input.
    pub fn update(&mut self, input: &Input, dt: f32) {
        if !self.cameras.is_empty() {
            self.active_camera_mut().update(input, dt);
        }
    }

    /// Propagates a new aspect ratio to every camera's projection, active or
    /// not, so switching cameras after a resize never shows a stale frustum.
    pub fn resize(&mut self, aspect_ratio: f32) {
        log::debug!("scene resize, aspect ratio {aspect_ratio:.3}");
        for camera in &mut self.cameras {
            camera.update_projection_matrix(aspect_ratio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn three_camera_scene() -> Scene {
        let mut scene = Scene::new();
        scene.add_camera(Camera::new(1.777).position(Vec3::new(0.0, 0.0, -1.0)));
        scene.add_camera(
            Camera::new(1.777)
                .position(Vec3::new(-2.0, 0.0, -1.0))
                .rotation(Vec3::new(0.0, 45.0f32.to_radians(), 0.0))
                .with_fov(45.0),
        );
        scene.add_camera(
            Camera::new(1.777)
                .position(Vec3::new(2.0, 0.0, -1.0))
                .rotation(Vec3::new(0.0, -45.0f32.to_radians(), 0.0))
                .with_fov(70.0),
        );
        scene
    }

    #[test]
    fn switching_changes_observed_camera_without_touching_others() {
        let mut scene = three_camera_scene();
        assert_eq!(scene.active_camera_index(), 0);
        assert!((scene.active_camera().fov() - 90.0f32.to_radians()).abs() < 1e-5);

        let proj0 = scene.cameras()[0].projection_matrix();
        let view0 = scene.cameras()[0].view_matrix();
        let proj2 = scene.cameras()[2].projection_matrix();
        let view2 = scene.cameras()[2].view_matrix();

        scene.set_active_camera(1);

        assert!((scene.active_camera().fov() - 45.0f32.to_radians()).abs() < 1e-5);
        assert_ne!(scene.active_camera().projection_matrix(), proj0);

        // Selection alone must not mutate any camera.
        assert_eq!(scene.cameras()[0].projection_matrix(), proj0);
        assert_eq!(scene.cameras()[0].view_matrix(), view0);
        assert_eq!(scene.cameras()[2].projection_matrix(), proj2);
        assert_eq!(scene.cameras()[2].view_matrix(), view2);
    }

    #[test]
    fn only_the_active_camera_receives_update() {
        let mut scene = three_camera_scene();
        let mut input = Input::new();
        input.press_key(winit::keyboard::KeyCode::KeyW);

        scene.set_active_camera(2);
        scene.update(&input, 0.5);

        assert_eq!(scene.cameras()[0].transform().position(), Vec3::new(0.0, 0.0, -1.0));
        assert_ne!(scene.cameras()[2].transform().position(), Vec3::new(2.0, 0.0, -1.0));
    }

    #[test]
    fn resize_touches_every_camera() {
        let mut scene = three_camera_scene();
        let before: Vec<_> = scene
            .cameras()
            .iter()
            .map(|c| c.projection_matrix())
            .collect();

        scene.resize(1.0);

        for (camera, old) in scene.cameras().iter().zip(before) {
            assert_ne!(camera.projection_matrix(), old);
            assert!((camera.aspect_ratio() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn update_with_no_cameras_is_a_no_op() {
        let mut scene = Scene::new();
        scene.update(&Input::new(), 0.016);
        assert!(!scene.quit_requested());
    }
}
