//! Actors: the unit of "things in the scene".
//!
//! An [`Actor`] pairs a shared, immutable [`Mesh`] with its own exclusively
//! owned [`Transform`] and a display name. Many actors may reference the
//! same mesh; each contributes only placement, never geometry.

use std::sync::Arc;

use crate::mesh::Mesh;
use crate::transform::Transform;

/// A placed instance of a mesh.
#[derive(Clone, Debug)]
pub struct Actor {
    mesh: Arc<Mesh>,
    transform: Transform,
    name: String,
}

impl Actor {
    /// Creates an actor at the origin with an identity transform.
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self::with_transform(mesh, Transform::new())
    }

    /// Creates an actor with an explicit starting transform.
    pub fn with_transform(mesh: Arc<Mesh>, transform: Transform) -> Self {
        Self {
            mesh,
            transform,
            name: String::new(),
        }
    }

    /// Names the actor, consuming and returning it for chained construction.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transform {
        &mut self.transform
    }

    /// Draws the underlying mesh. Placement comes from the uniform payload
    /// uploaded by the frame loop, not from this call.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass) {
        self.mesh.draw(render_pass);
    }
}
