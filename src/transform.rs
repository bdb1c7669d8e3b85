//! Spatial state for everything placed in a scene.
//!
//! [`Transform`] owns a position, an Euler rotation (pitch/yaw/roll, in
//! radians), and a per-axis scale, and derives a world matrix from them on
//! demand. The matrix is cached behind a dirty flag: mutating any component
//! marks the cache stale, and the next [`Transform::world_matrix`] call
//! recomputes it exactly once.
//!
//! The derived axis vectors ([`forward`](Transform::forward),
//! [`right`](Transform::right), [`up`](Transform::up)) are *not* cached —
//! they are rebuilt from the current rotation on every call.

use glam::{EulerRot, Mat4, Quat, Vec3};

/// Position, rotation, and scale with a lazily cached world matrix.
///
/// The world matrix applies scale first, then rotation, then translation.
/// Rotation is stored as Euler angles in radians: `x` is pitch, `y` is yaw,
/// `z` is roll, applied in yaw-pitch-roll order (yaw about world Y, then
/// pitch, then roll).
///
/// No component is validated. A zero scale is legal and simply produces a
/// singular matrix.
#[derive(Clone, Debug)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    world: Mat4,
    dirty: bool,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            world: Mat4::IDENTITY,
            dirty: true,
        }
    }
}

impl Transform {
    /// Creates an identity transform: origin, no rotation, unit scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a transform at the given position with no rotation or scaling.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Current Euler rotation as (pitch, yaw, roll) in radians.
    pub fn pitch_yaw_roll(&self) -> Vec3 {
        self.rotation
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Overwrites the position.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.dirty = true;
    }

    /// Overwrites the rotation with (pitch, yaw, roll) in radians.
    pub fn set_rotation(&mut self, pitch_yaw_roll: Vec3) {
        self.rotation = pitch_yaw_roll;
        self.dirty = true;
    }

    /// Overwrites the per-axis scale.
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.dirty = true;
    }

    /// Translates by `offset` in world space.
    pub fn move_absolute(&mut self, offset: Vec3) {
        self.position += offset;
        self.dirty = true;
    }

    /// Translates by `offset` expressed in this transform's own rotated axes.
    ///
    /// The offset is rotated by the current orientation before being added,
    /// so `move_relative(Vec3::Z * d)` always moves "forward" regardless of
    /// how the transform is turned.
    pub fn move_relative(&mut self, offset: Vec3) {
        self.position += self.orientation() * offset;
        self.dirty = true;
    }

    /// Adds `delta` (pitch, yaw, roll, radians) to the current rotation.
    pub fn rotate(&mut self, delta: Vec3) {
        self.rotation += delta;
        self.dirty = true;
    }

    /// Multiplies the current scale component-wise by `factor`.
    ///
    /// Scaling is multiplicative: applying `(2, 1, 1)` twice quadruples the
    /// X scale rather than adding to it.
    pub fn scale_by(&mut self, factor: Vec3) {
        self.scale *= factor;
        self.dirty = true;
    }

    /// The orientation quaternion built from the current Euler angles.
    pub fn orientation(&self) -> Quat {
        Quat::from_euler(
            EulerRot::YXZ,
            self.rotation.y,
            self.rotation.x,
            self.rotation.z,
        )
    }

    /// The unit vector this transform faces (+Z rotated by the orientation).
    pub fn forward(&self) -> Vec3 {
        self.orientation() * Vec3::Z
    }

    /// The unit vector to this transform's right (+X rotated by the orientation).
    pub fn right(&self) -> Vec3 {
        self.orientation() * Vec3::X
    }

    /// The unit vector above this transform (+Y rotated by the orientation).
    pub fn up(&self) -> Vec3 {
        self.orientation() * Vec3::Y
    }

    /// Returns the world matrix, recomputing it only if a component changed
    /// since the last call.
    ///
    /// While the transform is clean this returns the cached matrix unchanged,
    /// so repeated calls without intervening mutation are bit-identical.
    pub fn world_matrix(&mut self) -> Mat4 {
        if self.dirty {
            self.world = Mat4::from_scale_rotation_translation(
                self.scale,
                self.orientation(),
                self.position,
            );
            self.dirty = false;
        }
        self.world
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const EPS: f32 = 1e-5;

    fn expected_world(t: &Transform) -> Mat4 {
        // Scale, then rotate, then translate.
        Mat4::from_translation(t.position())
            * Mat4::from_quat(t.orientation())
            * Mat4::from_scale(t.scale())
    }

    #[test]
    fn first_query_reflects_initial_state() {
        let mut t = Transform::new();
        assert_eq!(t.world_matrix(), Mat4::IDENTITY);

        let mut t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let world = t.world_matrix();
        assert_eq!(world.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn world_matrix_matches_direct_composition() {
        let mut t = Transform::new();
        t.set_position(Vec3::new(3.0, -1.0, 2.5));
        t.set_rotation(Vec3::new(0.3, 1.1, -0.7));
        t.set_scale(Vec3::new(2.0, 0.5, 1.5));

        let expected = expected_world(&t);
        assert!(t.world_matrix().abs_diff_eq(expected, EPS));
    }

    #[test]
    fn cache_hit_is_bit_identical() {
        let mut t = Transform::new();
        t.rotate(Vec3::new(0.2, 0.4, 0.6));
        let first = t.world_matrix();
        let second = t.world_matrix();
        assert_eq!(first, second);
    }

    #[test]
    fn every_mutator_invalidates_the_cache() {
        let mut t = Transform::new();
        t.world_matrix();

        t.set_position(Vec3::X);
        assert!(t.world_matrix().abs_diff_eq(expected_world(&t), EPS));
        t.set_rotation(Vec3::new(0.0, 0.5, 0.0));
        assert!(t.world_matrix().abs_diff_eq(expected_world(&t), EPS));
        t.set_scale(Vec3::splat(3.0));
        assert!(t.world_matrix().abs_diff_eq(expected_world(&t), EPS));
        t.move_absolute(Vec3::Y);
        assert!(t.world_matrix().abs_diff_eq(expected_world(&t), EPS));
        t.move_relative(Vec3::Z);
        assert!(t.world_matrix().abs_diff_eq(expected_world(&t), EPS));
        t.rotate(Vec3::new(0.1, 0.0, 0.0));
        assert!(t.world_matrix().abs_diff_eq(expected_world(&t), EPS));
        t.scale_by(Vec3::splat(0.5));
        assert!(t.world_matrix().abs_diff_eq(expected_world(&t), EPS));
    }

    #[test]
    fn scale_is_multiplicative() {
        let mut t = Transform::new();
        t.scale_by(Vec3::new(2.0, 1.0, 1.0));
        t.scale_by(Vec3::new(2.0, 1.0, 1.0));
        assert_eq!(t.scale(), Vec3::new(4.0, 1.0, 1.0));
    }

    #[test]
    fn move_absolute_applies_offset_once() {
        let mut t = Transform::new();
        t.move_absolute(Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(t.position(), Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn move_relative_follows_rotated_axes() {
        // Yawed 90 degrees, local +Z points along world +X.
        let mut t = Transform::new();
        t.set_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        t.move_relative(Vec3::new(0.0, 0.0, 1.0));
        assert!(t.position().abs_diff_eq(Vec3::X, EPS));
    }

    #[test]
    fn axis_vectors_track_rotation() {
        let t = Transform::new();
        assert!(t.forward().abs_diff_eq(Vec3::Z, EPS));
        assert!(t.right().abs_diff_eq(Vec3::X, EPS));
        assert!(t.up().abs_diff_eq(Vec3::Y, EPS));

        let mut t = Transform::new();
        t.set_rotation(Vec3::new(0.0, FRAC_PI_2, 0.0));
        assert!(t.forward().abs_diff_eq(Vec3::X, EPS));
        assert!(t.right().abs_diff_eq(Vec3::NEG_Z, EPS));
    }
}
