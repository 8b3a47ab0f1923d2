//! Whitted-style shading.
//!
//! A primary hit collects ambient light, then diffuse and Phong specular
//! terms from every light that a shadow ray can reach, then a mirror
//! reflection weighted by the material's reflectivity. Recursion ends at
//! the configured depth or once the accumulated mirror weight is too small
//! to matter.

use super::camera::RayCamera;
use super::light::LightSource;
use super::object::RayObject;
use super::ray::Ray;
use crate::colors::Rgb;
use crate::config::TraceConfig;

/// Objects and lights, owned by the tracer that renders them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RayScene {
    pub objects: Vec<RayObject>,
    pub lights: Vec<LightSource>,
}

impl RayScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, object: RayObject) -> &mut Self {
        self.objects.push(object);
        self
    }

    pub fn add_light(&mut self, light: LightSource) -> &mut Self {
        self.lights.push(light);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub t: f32,
    pub index: usize,
}

/// What [`Tracer::closest_hit`] should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitMode {
    /// The hit with the smallest `t`.
    Closest,
    /// The first qualifying hit in object order, for occlusion tests.
    Any,
}

#[derive(Debug, Clone)]
pub struct Tracer {
    scene: RayScene,
    config: TraceConfig,
}

impl Tracer {
    pub fn new(scene: RayScene, config: TraceConfig) -> Self {
        Self { scene, config }
    }

    pub fn scene(&self) -> &RayScene {
        &self.scene
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Nearest (or, in [`HitMode::Any`], first) object with `t` in
    /// `(t_min, t_max]`, skipping `exclude`. A hit exactly at `t_min` is a
    /// miss, so a primary ray never sees a surface at its own origin.
    pub fn closest_hit(
        &self,
        ray: &Ray,
        t_min: f32,
        t_max: f32,
        exclude: Option<usize>,
        mode: HitMode,
    ) -> Option<Hit> {
        let mut best: Option<Hit> = None;
        for (index, object) in self.scene.objects.iter().enumerate() {
            if exclude == Some(index) {
                continue;
            }
            let Some(t) = object.hit_by(ray) else {
                continue;
            };
            if t <= t_min || t > t_max {
                continue;
            }
            if mode == HitMode::Any {
                return Some(Hit { t, index });
            }
            if best.map_or(true, |b| t < b.t) {
                best = Some(Hit { t, index });
            }
        }
        best
    }

    /// Color seen along a primary ray.
    pub fn trace(&self, ray: &Ray) -> Rgb {
        self.shade(ray, None, 0, 1.0)
    }

    /// Traces the centre of pixel `(i, j)` and packs the result.
    pub fn trace_pixel(&self, camera: &RayCamera, i: u32, j: u32) -> u32 {
        self.trace(&camera.ray(i, j)).to_packed()
    }

    fn shade(&self, ray: &Ray, exclude: Option<usize>, depth: u32, weight: f32) -> Rgb {
        let t_min = if exclude.is_some() { self.config.shadow_epsilon } else { 0.0 };
        let Some(hit) = self.closest_hit(ray, t_min, f32::INFINITY, exclude, HitMode::Closest) else {
            return self.config.background;
        };

        let object = &self.scene.objects[hit.index];
        let material = object.material();
        let point = ray.at(hit.t);
        let normal = object.normal_at(point, ray.direction);
        let view = (-ray.direction).normalize();

        let mut color = material.color * self.config.ambient;

        for light in &self.scene.lights {
            let shadow = Ray::new(point, light.position - point);
            let blocked = self
                .closest_hit(&shadow, self.config.shadow_epsilon, 1.0, Some(hit.index), HitMode::Any)
                .is_some();
            if blocked {
                continue;
            }
            let incident = (point - light.position).normalize();
            let diffuse = (-incident.dot(normal)).max(0.0);
            let reflected = incident.reflect(normal);
            let specular = reflected.dot(view).max(0.0).powf(material.shininess);
            color += material.color * (light.intensity * diffuse);
            color += material.specular * (light.intensity * specular);
        }

        if depth < self.config.max_depth {
            let k = material.reflectivity();
            let next_weight = weight * k;
            if next_weight >= self.config.min_contribution {
                let mirror = Ray::new(point, ray.direction.reflect(normal));
                color += self.shade(&mirror, Some(hit.index), depth + 1, next_weight) * k;
            }
        }

        color
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::raytrace::object::Material;
    use approx::assert_relative_eq;

    fn config() -> TraceConfig {
        TraceConfig {
            ambient: 0.0,
            background: Rgb::new(0.1, 0.2, 0.3),
            ..TraceConfig::default()
        }
    }

    fn red_sphere() -> RayObject {
        RayObject::sphere(Vec3::new(0.0, 0.0, -5.0), 1.0, Material::matte(Rgb::RED))
    }

    #[test]
    fn miss_returns_background() {
        let tracer = Tracer::new(RayScene::new(), config());
        assert_eq!(tracer.trace(&Ray::new(Vec3::ZERO, Vec3::FORWARD)), Rgb::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn closest_hit_prefers_nearer_object() {
        let mut scene = RayScene::new();
        scene
            .add_object(RayObject::sphere(Vec3::new(0.0, 0.0, -10.0), 1.0, Material::matte(Rgb::RED)))
            .add_object(red_sphere());
        let tracer = Tracer::new(scene, config());
        let ray = Ray::new(Vec3::ZERO, Vec3::FORWARD);
        let hit = tracer
            .closest_hit(&ray, 0.0, f32::INFINITY, None, HitMode::Closest)
            .expect("hit");
        assert_eq!(hit.index, 1);
        assert_relative_eq!(hit.t, 4.0, epsilon = 1e-5);

        let first = tracer.closest_hit(&ray, 0.0, f32::INFINITY, None, HitMode::Any).expect("hit");
        assert_eq!(first.index, 0);
        assert!(tracer.closest_hit(&ray, 0.0, f32::INFINITY, Some(1), HitMode::Closest).map(|h| h.index) == Some(0));
        assert!(tracer.closest_hit(&ray, 0.0, 3.0, None, HitMode::Closest).is_none());
    }

    #[test]
    fn surface_at_ray_origin_is_not_hit() {
        let mut scene = RayScene::new();
        scene
            .add_object(RayObject::plane(Vec3::ZERO, Vec3::UP, Material::matte(Rgb::WHITE)))
            .add_object(RayObject::sphere(Vec3::new(0.0, 0.0, -1.0), 1.0, Material::matte(Rgb::RED)));
        let tracer = Tracer::new(scene, config());

        // Starts on both the plane and the sphere's near pole, heading away from each.
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -1.0, 1.0));
        assert!(tracer.closest_hit(&ray, 0.0, f32::INFINITY, None, HitMode::Closest).is_none());
        assert_eq!(tracer.trace(&ray), Rgb::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn lit_sphere_facing_light_is_red() {
        let mut scene = RayScene::new();
        scene
            .add_object(red_sphere())
            .add_light(LightSource::new(Vec3::new(0.0, 0.0, 5.0), 1.0));
        let tracer = Tracer::new(scene, config());
        let c = tracer.trace(&Ray::new(Vec3::ZERO, Vec3::FORWARD));
        assert_relative_eq!(c.r, 1.0, epsilon = 1e-4);
        assert_relative_eq!(c.g, 0.0);
        assert_relative_eq!(c.b, 0.0);
    }

    #[test]
    fn occluded_light_contributes_nothing() {
        let mut scene = RayScene::new();
        scene
            .add_object(red_sphere())
            .add_light(LightSource::new(Vec3::ZERO, 1.0));
        let ambient = TraceConfig {
            ambient: 0.25,
            ..config()
        };
        // Starts past where the blocker will sit, so only shadow rays see it.
        let ray = Ray::new(Vec3::new(0.0, 0.0, -3.5), Vec3::FORWARD);

        let open = Tracer::new(scene.clone(), ambient.clone()).trace(&ray);
        assert_relative_eq!(open.r, 1.25, epsilon = 1e-4);

        scene.add_object(RayObject::sphere(
            Vec3::new(0.0, 0.0, -2.0),
            0.5,
            Material::matte(Rgb::WHITE),
        ));
        let shadowed = Tracer::new(scene, ambient).trace(&ray);
        assert_relative_eq!(shadowed.r, 0.25, epsilon = 1e-6);
        assert_relative_eq!(shadowed.g, 0.0);
    }

    #[test]
    fn specular_peaks_along_mirror_direction() {
        let material = Material::new(Rgb::BLACK, Rgb::WHITE, 20.0);
        let mut scene = RayScene::new();
        scene
            .add_object(RayObject::plane(Vec3::ZERO, Vec3::UP, material))
            .add_light(LightSource::new(Vec3::new(-1.0, 1.0, 0.0), 1.0));
        let tracer = Tracer::new(
            scene,
            TraceConfig {
                max_depth: 0,
                ..config()
            },
        );
        let mirror = tracer.trace(&Ray::new(Vec3::new(1.0, 1.0, 0.0), Vec3::new(-1.0, -1.0, 0.0)));
        let off = tracer.trace(&Ray::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(0.0, -1.0, -1.0)));
        assert_relative_eq!(mirror.g, 1.0, epsilon = 1e-4);
        assert!(off.g < mirror.g);
    }

    #[test]
    fn mirror_picks_up_reflected_object() {
        let floor = Material::new(Rgb::BLACK, Rgb::BLACK, 500.0);
        let mut scene = RayScene::new();
        scene
            .add_object(RayObject::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::UP, floor))
            .add_object(RayObject::sphere(Vec3::new(0.0, 1.0, -4.0), 1.0, Material::matte(Rgb::RED)));
        let base = TraceConfig {
            ambient: 1.0,
            background: Rgb::BLACK,
            ..TraceConfig::default()
        };
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -2.0, -2.0));

        let flat = Tracer::new(scene.clone(), TraceConfig { max_depth: 0, ..base.clone() }).trace(&ray);
        assert_eq!(flat, Rgb::BLACK);

        let reflected = Tracer::new(scene, base).trace(&ray);
        assert_relative_eq!(reflected.r, 0.5, epsilon = 1e-4);
        assert_relative_eq!(reflected.g, 0.0);
    }

    #[test]
    fn weak_reflections_stop_recursing() {
        let dull = Material::new(Rgb::BLACK, Rgb::BLACK, 5.0);
        let mut scene = RayScene::new();
        scene
            .add_object(RayObject::plane(Vec3::new(0.0, -1.0, 0.0), Vec3::UP, dull))
            .add_object(RayObject::sphere(Vec3::new(0.0, 1.0, -4.0), 1.0, Material::matte(Rgb::RED)));
        let tracer = Tracer::new(
            scene,
            TraceConfig {
                ambient: 1.0,
                background: Rgb::BLACK,
                min_contribution: 0.01,
                ..TraceConfig::default()
            },
        );
        // Reflectivity 0.005 is below the minimum contribution.
        let c = tracer.trace(&Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.0, -2.0, -2.0)));
        assert_eq!(c, Rgb::BLACK);
    }
}
