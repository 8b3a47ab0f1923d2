//! Projection parameters.
//!
//! The [`Frustum`] is the single source of truth for the viewing volume. It
//! stores the field angle, aspect ratio and the two clip planes, and derives
//! the `(left, right, bottom, top)` window the projection matrices need.
//!
//! View space is right-handed with the camera looking down `-Z`, so `near`
//! and `far` are negative and `near > far`.

use crate::config::ConfigError;
use crate::math::Mat4;

/// How view space is flattened onto the image plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            ProjectionMode::Perspective => ProjectionMode::Orthographic,
            ProjectionMode::Orthographic => ProjectionMode::Perspective,
        }
    }
}

/// Window on a plane perpendicular to the view axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extents {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
}

/// Symmetric viewing volume.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frustum {
    /// Vertical field angle in radians.
    field_angle: f32,
    /// Width divided by height.
    aspect_ratio: f32,
    near: f32,
    far: f32,
}

impl Frustum {
    /// `near` and `far` are view-space z values, e.g. `-0.1` and `-100.0`.
    pub fn new(field_angle: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            field_angle,
            aspect_ratio,
            near,
            far,
        }
    }

    pub fn from_degrees(field_angle_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self::new(field_angle_degrees.to_radians(), aspect_ratio, near, far)
    }

    /// Checks the ordering the projection matrices rely on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.near < 0.0 && self.far < self.near) {
            return Err(ConfigError::FrustumOrder {
                near: self.near,
                far: self.far,
            });
        }
        if !(self.field_angle > 0.0 && self.field_angle < std::f32::consts::PI) {
            return Err(ConfigError::FieldAngle(self.field_angle));
        }
        if !(self.aspect_ratio.is_finite() && self.aspect_ratio > 0.0) {
            return Err(ConfigError::AspectRatio(self.aspect_ratio));
        }
        Ok(())
    }

    pub fn field_angle(&self) -> f32 {
        self.field_angle
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    /// Updates the aspect ratio (typically called on resize).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// The window cut by the frustum at `distance` in front of the eye.
    pub fn extents_at(&self, distance: f32) -> Extents {
        let top = distance * (self.field_angle / 2.0).tan();
        let right = top * self.aspect_ratio;
        Extents {
            left: -right,
            right,
            bottom: -top,
            top,
        }
    }

    /// The window on the near plane.
    pub fn near_extents(&self) -> Extents {
        self.extents_at(-self.near)
    }

    /// Projection matrix for `mode`.
    ///
    /// The orthographic window is the frustum's cross-section at
    /// `ortho_distance`, so content at that distance keeps its on-screen size
    /// when switching modes.
    pub fn matrix(&self, mode: ProjectionMode, ortho_distance: f32) -> Mat4 {
        match mode {
            ProjectionMode::Perspective => {
                let e = self.near_extents();
                Mat4::perspective(e.left, e.right, e.bottom, e.top, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let e = self.extents_at(ortho_distance.max(-self.near));
                Mat4::orthographic(e.left, e.right, e.bottom, e.top, self.near, self.far)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn extents_follow_aspect_ratio() {
        let f = Frustum::new(FRAC_PI_2, 2.0, -1.0, -10.0);
        let e = f.near_extents();
        assert_relative_eq!(e.top, 1.0, epsilon = 1e-6);
        assert_relative_eq!(e.right, 2.0, epsilon = 1e-6);
        assert_relative_eq!(e.left, -2.0, epsilon = 1e-6);
    }

    #[test]
    fn from_degrees_converts() {
        let f = Frustum::from_degrees(90.0, 1.0, -0.1, -100.0);
        assert_relative_eq!(f.field_angle(), FRAC_PI_2, epsilon = 1e-6);
    }

    #[test]
    fn validate_rejects_swapped_planes() {
        let f = Frustum::new(1.0, 1.0, -100.0, -0.1);
        assert!(matches!(f.validate(), Err(ConfigError::FrustumOrder { .. })));
        let positive = Frustum::new(1.0, 1.0, 0.1, -10.0);
        assert!(positive.validate().is_err());
        assert!(Frustum::new(1.0, 1.0, -0.1, -10.0).validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_field_angle() {
        let f = Frustum::new(0.0, 1.0, -0.1, -10.0);
        assert_eq!(f.validate(), Err(ConfigError::FieldAngle(0.0)));
    }

    #[test]
    fn orthographic_matches_perspective_at_pivot_distance() {
        let f = Frustum::new(1.0, 1.5, -0.5, -50.0);
        let d = 8.0;
        let edge = Vec3::new(f.extents_at(d).right, 0.0, -d);
        let persp = f.matrix(ProjectionMode::Perspective, d) * edge;
        let ortho = f.matrix(ProjectionMode::Orthographic, d) * edge;
        assert_relative_eq!(persp.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(ortho.x, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn toggled_flips_mode() {
        assert_eq!(ProjectionMode::Perspective.toggled(), ProjectionMode::Orthographic);
        assert_eq!(ProjectionMode::Orthographic.toggled(), ProjectionMode::Perspective);
    }
}
