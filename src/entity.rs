//! Placement of an object or camera in world space.
//!
//! An [`Entity`] owns a position and a (forward, up) pair and keeps the
//! derived orthonormal [`Basis3`] in sync. The basis axes are `r` = right,
//! `s` = up and `t` = backward, so an entity at the origin with the default
//! orientation has the identity local→world matrix.

use crate::math::{Basis3, Mat4, Vec3};

/// Position and orientation with a cached basis.
///
/// Mutators return `&mut Self` for chaining:
///
/// ```ignore
/// entity
///     .set_position(Vec3::new(0.0, 1.0, 5.0))
///     .look_at(Vec3::ZERO);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Entity {
    position: Vec3,
    forward: Vec3,
    up: Vec3,
    basis: Basis3,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::FORWARD, Vec3::UP)
    }
}

impl Entity {
    /// `forward` must not be zero. `up` only needs to be roughly up; it is
    /// re-orthogonalized against `forward`.
    pub fn new(position: Vec3, forward: Vec3, up: Vec3) -> Self {
        let basis = Basis3::from_forward_up(forward, up);
        Self {
            position,
            forward: basis.forward(),
            up: basis.s,
            basis,
        }
    }

    // ============ Position ============

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position += delta;
        self
    }

    // ============ Orientation ============

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn right(&self) -> Vec3 {
        self.basis.r
    }

    pub fn basis(&self) -> &Basis3 {
        &self.basis
    }

    /// Re-derives the basis from a new (forward, up) pair.
    pub fn set_orientation(&mut self, forward: Vec3, up: Vec3) -> &mut Self {
        self.basis = Basis3::from_forward_up(forward, up);
        self.forward = self.basis.forward();
        self.up = self.basis.s;
        self
    }

    /// Turns to face `target`, keeping the current up as a hint. No-op when
    /// `target` coincides with the position.
    pub fn look_at(&mut self, target: Vec3) -> &mut Self {
        let direction = target - self.position;
        if direction.magnitude_squared() > f32::EPSILON {
            let up = self.up;
            self.set_orientation(direction, up);
        }
        self
    }

    // ============ Matrix Generation ============

    /// Local → world (`frame_to_canonical`).
    pub fn to_world(&self) -> Mat4 {
        Mat4::frame_to_canonical(&self.basis, self.position)
    }

    /// World → local (`canonical_to_frame`). For a camera this is the view
    /// matrix.
    pub fn to_local(&self) -> Mat4 {
        Mat4::canonical_to_frame(&self.basis, self.position)
    }
}
