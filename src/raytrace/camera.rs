//! Primary ray generation.

use super::ray::Ray;
use crate::camera::Camera;
use crate::math::{Basis3, Vec3};
use crate::projection::{Extents, ProjectionMode};

/// Eye, frame and image-plane window for casting one ray per pixel.
///
/// The window lies `distance` in front of the eye. Pixel `(i, j)` uses
/// bottom-left addressing and samples its centre, so the rays agree with
/// where the rasterizer puts the same pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct RayCamera {
    origin: Vec3,
    basis: Basis3,
    window: Extents,
    distance: f32,
    mode: ProjectionMode,
    width: u32,
    height: u32,
}

impl RayCamera {
    /// Mirrors the rasterizer camera for a `width x height` image.
    pub fn from_camera(camera: &Camera, width: u32, height: u32) -> Self {
        let frustum = camera.frustum();
        let distance = -frustum.near();
        let window = match camera.mode() {
            ProjectionMode::Perspective => frustum.extents_at(distance),
            ProjectionMode::Orthographic => frustum.extents_at(camera.pivot_distance().max(distance)),
        };
        Self {
            origin: camera.position(),
            basis: *camera.entity().basis(),
            window,
            distance,
            mode: camera.mode(),
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }

    /// Ray through the centre of pixel `(i, j)`.
    pub fn ray(&self, i: u32, j: u32) -> Ray {
        let w = &self.window;
        let u = w.left + (w.right - w.left) * (i as f32 + 0.5) / self.width as f32;
        let v = w.bottom + (w.top - w.bottom) * (j as f32 + 0.5) / self.height as f32;
        let across = self.basis.r * u + self.basis.s * v;
        let forward = self.basis.forward();
        match self.mode {
            ProjectionMode::Perspective => Ray::new(self.origin, forward * self.distance + across),
            ProjectionMode::Orthographic => Ray::new(self.origin + across, forward),
        }
    }
}
