//! Orbit camera.
//!
//! # Coordinate System
//!
//! Right-handed world space with `+Y` up. The camera looks down its local
//! `-Z` axis, so points in front of it have negative view-space `z`.
//!
//! # Interaction
//!
//! The camera circles a pivot point. A mouse drag is modelled as a
//! [`DragGesture`] that snapshots the camera when the button goes down and
//! recomputes the camera from that snapshot on every move, so the result
//! depends only on the total cursor offset and never accumulates drift.

use crate::entity::Entity;
use crate::math::{Mat4, Vec3};
use crate::projection::{Frustum, ProjectionMode};

/// Radians of orbit per pixel of cursor travel.
pub const ORBIT_SENSITIVITY: f32 = 0.01;
/// Fraction of the pivot distance covered by one scroll notch.
pub const ZOOM_STEP: f32 = 0.1;
/// The camera never gets closer to the pivot than this.
pub const MIN_PIVOT_DISTANCE: f32 = 0.05;

/// Viewing camera: placement, frustum, projection mode and orbit pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    entity: Entity,
    frustum: Frustum,
    mode: ProjectionMode,
    pivot: Vec3,
}

impl Camera {
    /// Places the camera at `position` looking at `pivot`.
    pub fn new(position: Vec3, pivot: Vec3, frustum: Frustum) -> Self {
        let mut entity = Entity::new(position, Vec3::FORWARD, Vec3::UP);
        entity.look_at(pivot);
        Self {
            entity,
            frustum,
            mode: ProjectionMode::Perspective,
            pivot,
        }
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    pub fn position(&self) -> Vec3 {
        self.entity.position()
    }

    pub fn forward(&self) -> Vec3 {
        self.entity.forward()
    }

    pub fn up(&self) -> Vec3 {
        self.entity.up()
    }

    pub fn right(&self) -> Vec3 {
        self.entity.right()
    }

    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn frustum(&self) -> &Frustum {
        &self.frustum
    }

    pub fn mode(&self) -> ProjectionMode {
        self.mode
    }

    pub fn pivot_distance(&self) -> f32 {
        (self.pivot - self.entity.position()).magnitude()
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    pub fn set_mode(&mut self, mode: ProjectionMode) {
        self.mode = mode;
    }

    pub fn toggle_projection(&mut self) {
        self.mode = self.mode.toggled();
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.frustum.set_aspect_ratio(aspect_ratio);
    }

    /// Moves the pivot and turns the camera toward it.
    pub fn set_pivot(&mut self, pivot: Vec3) {
        self.pivot = pivot;
        self.entity.look_at(pivot);
    }

    /// Moves toward (positive `notches`) or away from the pivot. Each notch
    /// covers [`ZOOM_STEP`] of the remaining distance.
    pub fn zoom(&mut self, notches: f32) {
        let offset = self.entity.position() - self.pivot;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            return;
        }
        let scaled = (distance * (1.0 - ZOOM_STEP).powf(notches)).max(MIN_PIVOT_DISTANCE);
        self.entity.set_position(self.pivot + offset * (scaled / distance));
    }

    // =========================================================================
    // Matrix Generation
    // =========================================================================

    /// World → view.
    pub fn view_matrix(&self) -> Mat4 {
        self.entity.to_local()
    }

    /// View → canonical cube. The orthographic window is sized at the pivot
    /// distance.
    pub fn projection_matrix(&self) -> Mat4 {
        self.frustum.matrix(self.mode, self.pivot_distance())
    }
}

// =============================================================================
// Drag Gestures
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragKind {
    Orbit,
    Pan,
}

/// Context of one mouse drag.
///
/// Created on button-down, applied on every move, dropped on button-up.
#[derive(Debug, Clone)]
pub struct DragGesture {
    kind: DragKind,
    start: (i32, i32),
    entity: Entity,
    pivot: Vec3,
}

impl DragGesture {
    pub fn begin(kind: DragKind, camera: &Camera, x: i32, y: i32) -> Self {
        Self {
            kind,
            start: (x, y),
            entity: camera.entity,
            pivot: camera.pivot,
        }
    }

    pub fn kind(&self) -> DragKind {
        self.kind
    }

    /// Whether the cursor has left the button-down position.
    pub fn moved(&self, x: i32, y: i32) -> bool {
        (x, y) != self.start
    }

    /// Sets `camera` to the snapshot transformed by the offset from the
    /// starting cursor position. Window `y` grows downward.
    pub fn apply(&self, camera: &mut Camera, x: i32, y: i32, viewport_height: u32) {
        let dx = (x - self.start.0) as f32;
        let dy = (y - self.start.1) as f32;
        match self.kind {
            DragKind::Orbit => self.orbit(camera, dx, dy),
            DragKind::Pan => self.pan(camera, dx, dy, viewport_height),
        }
    }

    fn orbit(&self, camera: &mut Camera, dx: f32, dy: f32) {
        let yaw = Mat4::rotation_axis(self.entity.up(), -dx * ORBIT_SENSITIVITY);
        let pitch = Mat4::rotation_axis(self.entity.right(), -dy * ORBIT_SENSITIVITY);
        let rotation = yaw * pitch;

        let offset = rotation.transform_direction(self.entity.position() - self.pivot);
        let forward = rotation.transform_direction(self.entity.forward());
        let up = rotation.transform_direction(self.entity.up());

        let mut entity = self.entity;
        entity.set_position(self.pivot + offset).set_orientation(forward, up);
        camera.entity = entity;
        camera.pivot = self.pivot;
    }

    fn pan(&self, camera: &mut Camera, dx: f32, dy: f32, viewport_height: u32) {
        let distance = (self.pivot - self.entity.position()).magnitude();
        let window = camera.frustum.extents_at(distance);
        let units_per_pixel = (window.top - window.bottom) / viewport_height.max(1) as f32;
        let delta = (self.entity.right() * -dx + self.entity.up() * dy) * units_per_pixel;

        let mut entity = self.entity;
        entity.translate(delta);
        camera.entity = entity;
        camera.pivot = self.pivot + delta;
    }
}
