//! Traceable primitives.

use super::ray::Ray;
use crate::colors::Rgb;
use crate::math::Vec3;

/// Shininess that maps to [`MAX_REFLECTIVITY`].
pub const SHININESS_FOR_MAX_REFLECTION: f32 = 500.0;
pub const MAX_REFLECTIVITY: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse and ambient color.
    pub color: Rgb,
    /// Color of the specular highlight.
    pub specular: Rgb,
    /// Phong exponent.
    pub shininess: f32,
}

impl Material {
    pub fn new(color: Rgb, specular: Rgb, shininess: f32) -> Self {
        Self {
            color,
            specular,
            shininess,
        }
    }

    /// A non-reflective, highlight-free material.
    pub fn matte(color: Rgb) -> Self {
        Self::new(color, Rgb::BLACK, 1.0)
    }

    /// Mirror weight in `[0, MAX_REFLECTIVITY]`, growing linearly with
    /// shininess.
    pub fn reflectivity(&self) -> f32 {
        (self.shininess / SHININESS_FOR_MAX_REFLECTION * MAX_REFLECTIVITY).clamp(0.0, MAX_REFLECTIVITY)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RayObject {
    Sphere {
        center: Vec3,
        radius: f32,
        material: Material,
    },
    /// Infinite plane through `point`. The normal is stored normalized.
    Plane {
        point: Vec3,
        normal: Vec3,
        material: Material,
    },
}

impl RayObject {
    pub fn sphere(center: Vec3, radius: f32, material: Material) -> Self {
        RayObject::Sphere {
            center,
            radius,
            material,
        }
    }

    pub fn plane(point: Vec3, normal: Vec3, material: Material) -> Self {
        RayObject::Plane {
            point,
            normal: normal.normalize(),
            material,
        }
    }

    pub fn material(&self) -> &Material {
        match self {
            RayObject::Sphere { material, .. } | RayObject::Plane { material, .. } => material,
        }
    }

    /// Ray parameter of the intersection, or `None` on a miss.
    ///
    /// Spheres report the nearer root only, which may be negative when the
    /// ray starts inside or past the sphere; callers filter by range.
    pub fn hit_by(&self, ray: &Ray) -> Option<f32> {
        match self {
            RayObject::Sphere { center, radius, .. } => {
                let d = ray.direction;
                let ec = ray.origin - *center;
                let b = d.dot(ec);
                let dd = d.dot(d);
                let discriminant = b * b - dd * (ec.dot(ec) - radius * radius);
                if discriminant < 0.0 || dd == 0.0 {
                    return None;
                }
                Some((-b - discriminant.sqrt()) / dd)
            }
            RayObject::Plane { point, normal, .. } => {
                let t = (*point - ray.origin).dot(*normal) / ray.direction.dot(*normal);
                t.is_finite().then_some(t)
            }
        }
    }

    /// Unit surface normal at `point`. Spheres point outward; planes are
    /// flipped to face `incoming`'s origin side.
    pub fn normal_at(&self, point: Vec3, incoming: Vec3) -> Vec3 {
        match self {
            RayObject::Sphere { center, .. } => (point - *center).normalize(),
            RayObject::Plane { normal, .. } => {
                if normal.dot(incoming) > 0.0 {
                    -*normal
                } else {
                    *normal
                }
            }
        }
    }
}
