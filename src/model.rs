//! Placed mesh instances.
//!
//! A [`Model`] pairs a [`Mesh`] with an [`Entity`] and a scale. Each frame
//! it is visible, the model refreshes a cache of world-space vertex
//! positions and the axis-aligned box around them; picking and the
//! bounding-box overlay read that cache.

use crate::entity::Entity;
use crate::math::{Mat4, Vec3};
use crate::mesh::Mesh;
use crate::pipeline;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Corner index bit `i` picks `max` over `min` on axis `i`.
    pub const EDGES: [(usize, usize); 12] = [
        (0, 1), (2, 3), (4, 5), (6, 7),
        (0, 2), (1, 3), (4, 6), (5, 7),
        (0, 4), (1, 5), (2, 6), (3, 7),
    ];

    /// Smallest box around `points`. `None` when there are none.
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        Some(rest.iter().fold(
            Aabb {
                min: *first,
                max: *first,
            },
            |b, p| Aabb {
                min: b.min.min(*p),
                max: b.max.max(*p),
            },
        ))
    }

    pub fn contains(&self, p: Vec3) -> bool {
        (0..3).all(|i| p[i] >= self.min[i] && p[i] <= self.max[i])
    }

    pub fn corners(&self) -> [Vec3; 8] {
        std::array::from_fn(|i| {
            Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            )
        })
    }
}

#[derive(Debug, Clone)]
pub struct Model {
    mesh: Mesh,
    entity: Entity,
    scale: Vec3,
    visible: bool,
    world_vertices: Vec<Vec3>,
    bounds: Option<Aabb>,
}

impl Model {
    pub fn new(mesh: Mesh) -> Self {
        let mut model = Self {
            mesh,
            entity: Entity::default(),
            scale: Vec3::ONE,
            visible: true,
            world_vertices: Vec::new(),
            bounds: None,
        };
        model.update_world();
        model
    }

    // ============ Placement ============

    pub fn entity(&self) -> &Entity {
        &self.entity
    }

    /// Mutable placement. Call [`Model::update_world`] (or render a frame)
    /// before relying on the cached bounds again.
    pub fn entity_mut(&mut self) -> &mut Entity {
        &mut self.entity
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_uniform_scale(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::splat(s);
        self
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.visible = visible;
        self
    }

    // ============ Geometry ============

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Local → world.
    pub fn model_matrix(&self) -> Mat4 {
        pipeline::model_matrix(&self.entity, self.scale)
    }

    /// Transforms every vertex to world space and refits the bounds.
    pub fn update_world(&mut self) {
        let m = self.model_matrix();
        self.world_vertices.clear();
        self.world_vertices
            .extend(self.mesh.vertices().iter().map(|&v| m * v));
        self.bounds = Aabb::from_points(&self.world_vertices);
    }

    /// World-space vertices as of the last [`Model::update_world`].
    pub fn world_vertices(&self) -> &[Vec3] {
        &self.world_vertices
    }

    pub fn bounds(&self) -> Option<&Aabb> {
        self.bounds.as_ref()
    }

    /// World-space triangles from the cache.
    pub fn world_triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.mesh
            .faces()
            .iter()
            .map(|f| f.corners.map(|c| self.world_vertices[c.vertex]))
    }
}
