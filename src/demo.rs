//! The built-in scenes both binaries start from.

use crate::camera::Camera;
use crate::colors::Rgb;
use crate::config::RenderConfig;
use crate::math::Vec3;
use crate::mesh::Mesh;
use crate::model::Model;
use crate::raytrace::{LightSource, Material, RayObject, RayScene};
use crate::render::Scene;

pub const EYE: Vec3 = Vec3::new(0.0, 2.0, 8.0);

/// Camera at [`EYE`] looking at the origin, framed for `width x height`.
pub fn camera(config: &RenderConfig, width: u32, height: u32) -> Camera {
    let aspect = width.max(1) as f32 / height.max(1) as f32;
    let mut camera = Camera::new(EYE, Vec3::ZERO, config.frustum(aspect));
    camera.set_mode(config.projection);
    camera
}

/// `mesh` (the cube if `None`) at the origin with a small cube beside it.
pub fn scene(camera: Camera, mesh: Option<Mesh>) -> Scene {
    let mut scene = Scene::new(camera);

    let mut main = Model::new(mesh.unwrap_or_else(Mesh::cube));
    main.entity_mut()
        .set_orientation(Vec3::new(-0.5, 0.0, -1.0), Vec3::UP);
    main.update_world();
    scene.add_model(main);

    let mut side = Model::new(Mesh::cube());
    side.entity_mut().set_position(Vec3::new(2.5, -0.5, -1.0));
    side.set_uniform_scale(0.5).update_world();
    scene.add_model(side);

    scene
}

/// Two spheres over a mirrored floor, lit from above and behind the eye.
pub fn ray_scene() -> RayScene {
    let mut scene = RayScene::new();
    scene
        .add_object(RayObject::sphere(Vec3::ZERO, 1.0, Material::new(Rgb::RED, Rgb::WHITE, 50.0)))
        .add_object(RayObject::sphere(
            Vec3::new(2.2, -0.4, -1.5),
            0.6,
            Material::new(Rgb::new(0.2, 0.8, 0.3), Rgb::WHITE, 200.0),
        ))
        .add_object(RayObject::plane(
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::UP,
            Material::new(Rgb::new(0.6, 0.6, 0.6), Rgb::BLACK, 300.0),
        ))
        .add_light(LightSource::new(Vec3::new(-4.0, 6.0, 6.0), 0.8))
        .add_light(LightSource::new(Vec3::new(5.0, 3.0, 2.0), 0.4));
    scene
}
