//! Rasterizer lighting.

use crate::math::Vec3;

/// Intensity of a surface facing directly away from the light.
pub const MIN_INTENSITY: f32 = 0.2;

/// A directional light illuminating the scene from infinitely far away.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// The normalized direction the light travels (not where it comes from).
    pub direction: Vec3,
}

impl DirectionalLight {
    /// The direction is normalized here.
    pub fn new(direction: Vec3) -> Self {
        DirectionalLight {
            direction: direction.normalize(),
        }
    }

    /// Lambert term `max(0, -n · l)` remapped into `[MIN_INTENSITY, 1]`.
    pub fn intensity(&self, normal: Vec3) -> f32 {
        let lambert = (-self.direction).dot(normal.normalize()).max(0.0);
        MIN_INTENSITY + (1.0 - MIN_INTENSITY) * lambert
    }
}
