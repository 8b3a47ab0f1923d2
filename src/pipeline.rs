//! Scene-to-screen transform composition.
//!
//! ```text
//! model space ──ModelTransform──▶ world ──View──▶ camera ──Projection──▶ NDC ──Viewport──▶ pixels
//! ```
//!
//! [`FrameTransforms`] is computed once per frame from the camera and the
//! surface size. Per-model matrices come from [`model_matrix`].

use crate::camera::Camera;
use crate::entity::Entity;
use crate::math::{Mat3, Mat4, Vec3};

/// Per-frame camera-side matrices.
#[derive(Debug, Clone, Copy)]
pub struct FrameTransforms {
    pub view: Mat4,
    pub projection: Mat4,
    pub viewport: Mat4,
    /// `viewport * projection * view`.
    pub world_to_screen: Mat4,
    /// View-space z of the near plane.
    pub near: f32,
}

impl FrameTransforms {
    pub fn new(camera: &Camera, width: u32, height: u32) -> Self {
        Self::with_depth_scale(camera, width, height, 1.0)
    }

    pub fn with_depth_scale(camera: &Camera, width: u32, height: u32, depth_scale: f32) -> Self {
        let view = camera.view_matrix();
        let projection = camera.projection_matrix();
        let viewport = Mat4::viewport(width, height, depth_scale);
        Self {
            view,
            projection,
            viewport,
            world_to_screen: viewport * projection * view,
            near: camera.frustum().near(),
        }
    }

    /// World point → `(x, y)` pixel coordinates and depth in `z`.
    #[inline]
    pub fn to_screen(&self, world: Vec3) -> Vec3 {
        self.world_to_screen * world
    }

    /// View-space z of a world point, for the near-plane test.
    #[inline]
    pub fn view_depth(&self, world: Vec3) -> f32 {
        (self.view * world).z
    }

    /// True when a world point lies strictly between the eye and the near
    /// plane, or behind the eye.
    #[inline]
    pub fn in_front_of_near(&self, world: Vec3) -> bool {
        self.view_depth(world) > self.near
    }
}

/// Local → world for a model: `frame_to_canonical · Scale`.
pub fn model_matrix(entity: &Entity, scale: Vec3) -> Mat4 {
    entity.to_world() * Mat4::scaling(scale.x, scale.y, scale.z)
}

/// Inverse-transpose of the model matrix's upper 3x3.
pub fn normal_matrix(model: &Mat4) -> Mat3 {
    Mat3::from_mat4(model).normal_matrix()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projection::Frustum;
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Frustum::from_degrees(90.0, 1.0, -1.0, -100.0),
        )
    }

    #[test]
    fn pivot_lands_in_the_middle_of_the_screen() {
        let t = FrameTransforms::new(&camera(), 101, 51);
        let p = t.to_screen(Vec3::ZERO);
        assert_relative_eq!(p.x, 50.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 25.0, epsilon = 1e-4);
    }

    #[test]
    fn world_up_is_screen_up() {
        let t = FrameTransforms::new(&camera(), 100, 100);
        let low = t.to_screen(Vec3::ZERO);
        let high = t.to_screen(Vec3::new(0.0, 1.0, 0.0));
        assert!(high.y > low.y);
    }

    #[test]
    fn nearer_points_have_larger_depth() {
        let t = FrameTransforms::new(&camera(), 100, 100);
        let near = t.to_screen(Vec3::new(0.0, 0.0, 2.0));
        let far = t.to_screen(Vec3::new(0.0, 0.0, -2.0));
        assert!(near.z > far.z);
    }

    #[test]
    fn near_plane_test() {
        let t = FrameTransforms::new(&camera(), 100, 100);
        assert!(!t.in_front_of_near(Vec3::ZERO));
        assert!(t.in_front_of_near(Vec3::new(0.0, 0.0, 4.5)));
        assert!(t.in_front_of_near(Vec3::new(0.0, 0.0, 9.0)));
    }

    #[test]
    fn model_matrix_scales_then_places() {
        let entity = Entity::new(Vec3::new(1.0, 0.0, 0.0), Vec3::FORWARD, Vec3::UP);
        let m = model_matrix(&entity, Vec3::new(2.0, 2.0, 2.0));
        assert_relative_eq!(m * Vec3::new(1.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn normals_survive_non_uniform_scale() {
        let entity = Entity::default();
        let m = model_matrix(&entity, Vec3::new(1.0, 4.0, 1.0));
        let n = (normal_matrix(&m) * Vec3::new(1.0, 1.0, 0.0)).normalize();
        let tangent = m.transform_direction(Vec3::new(1.0, -1.0, 0.0));
        assert_relative_eq!(n.dot(tangent), 0.0, epsilon = 1e-5);
    }
}
