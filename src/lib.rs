//! # Argos
//!
//! **A minimal real-time 3D scene renderer.**
//!
//! Argos keeps the moving parts of a tiny renderer small and explicit:
//! transforms with a dirty-flagged world-matrix cache, free-flying
//! perspective cameras, immutable GPU meshes shared between actors, and a
//! fixed per-frame loop that uploads one uniform payload per actor and
//! issues its indexed draw.
//!
//! ## Quick start
//!
//! ```no_run
//! use argos::*;
//!
//! fn main() {
//!     run(|gpu| {
//!         let mut scene = Scene::new();
//!         scene.add_camera(Camera::new(gpu.aspect()).position(Vec3::new(0.0, 0.0, -1.0)));
//!
//!         let triangle = Geometry::new(
//!             "Triangle",
//!             vec![
//!                 Vertex::new([0.0, 0.5, 0.0], Color::RED),
//!                 Vertex::new([0.5, -0.5, 0.0], Color::BLUE),
//!                 Vertex::new([-0.5, -0.5, 0.0], Color::GREEN),
//!             ],
//!             vec![0, 1, 2],
//!         )
//!         .upload(gpu);
//!         scene.add_actor(Actor::new(triangle).named("Triangle"));
//!
//!         (scene, move |scene: &mut Scene, input: &Input, _dt: f32, _total: f32| {
//!             if input.key_down(KeyCode::Escape) {
//!                 scene.request_quit();
//!             }
//!         })
//!     });
//! }
//! ```
//!
//! ## Shape of a frame
//!
//! Update (app callback, then active-camera input) → upload (one uniform
//! payload per actor, written into its own slot of a single shared buffer)
//! → draw → present.
//! Everything runs sequentially on one thread; a frame always completes
//! before the next begins.

mod actor;
mod app;
mod camera;
mod color;
mod gpu;
mod input;
mod mesh;
mod scene;
mod scene_pass;
mod transform;

pub use actor::Actor;
pub use app::{AppConfig, run, run_with_config};
pub use camera::Camera;
pub use color::Color;
pub use gpu::{GpuContext, GpuError};
pub use input::Input;
pub use mesh::{Geometry, Mesh, Vertex};
pub use scene::Scene;
pub use scene_pass::{ScenePass, SceneUniforms};
pub use transform::Transform;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
