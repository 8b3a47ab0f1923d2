//! Scene rasterization.
//!
//! [`SceneRenderer`] walks every visible model, pushes its faces through the
//! transform pipeline and hands the screen-space triangles to the scan-line
//! filler or the line drawer depending on the [`DrawMode`].

use log::debug;

use super::line::{draw_line, draw_line_3d};
use super::scanline::{fill_triangle, signed_area, FillStyle, ShadedVertex};
use super::surface::Surface;
use crate::camera::Camera;
use crate::config::RenderConfig;
use crate::light::DirectionalLight;
use crate::math::Vec3;
use crate::model::{Aabb, Model};
use crate::pipeline::{self, FrameTransforms};

/// How triangles are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawMode {
    /// Gouraud-shaded grey.
    #[default]
    Shaded,
    /// Uniform grey, no lighting.
    Flat,
    /// Depth-tested edges only.
    Wireframe,
    /// Gouraud-shaded with outlined spans.
    ShadedOutline,
}

impl DrawMode {
    /// Cycles through the modes in declaration order.
    pub fn next(self) -> Self {
        match self {
            DrawMode::Shaded => DrawMode::Flat,
            DrawMode::Flat => DrawMode::Wireframe,
            DrawMode::Wireframe => DrawMode::ShadedOutline,
            DrawMode::ShadedOutline => DrawMode::Shaded,
        }
    }
}

/// Models plus the camera looking at them.
#[derive(Debug, Clone)]
pub struct Scene {
    pub models: Vec<Model>,
    pub camera: Camera,
    /// `None` lights along the camera's view direction.
    pub light: Option<DirectionalLight>,
}

impl Scene {
    pub fn new(camera: Camera) -> Self {
        Self {
            models: Vec::new(),
            camera,
            light: None,
        }
    }

    pub fn add_model(&mut self, model: Model) -> usize {
        self.models.push(model);
        self.models.len() - 1
    }

    /// The light the rasterizer uses this frame.
    pub fn effective_light(&self) -> DirectionalLight {
        self.light
            .unwrap_or_else(|| DirectionalLight::new(self.camera.forward()))
    }
}

/// Per-frame triangle counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub drawn: usize,
    pub culled: usize,
    pub near_clipped: usize,
}

pub struct SceneRenderer {
    config: RenderConfig,
}

impl SceneRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    /// Clears `surface` and draws `scene` into it. The world-space caches
    /// of every visible model are refreshed on the way.
    pub fn render(&self, scene: &mut Scene, surface: &mut Surface, selected: Option<usize>) -> FrameStats {
        surface.clear(self.config.background);
        let transforms = FrameTransforms::new(&scene.camera, surface.width(), surface.height());
        let light = match self.config.light_direction {
            Some(direction) => DirectionalLight::new(direction),
            None => scene.effective_light(),
        };

        let mut stats = FrameStats::default();
        for (index, model) in scene.models.iter_mut().enumerate() {
            if !model.is_visible() {
                continue;
            }
            model.update_world();
            self.draw_model(model, &transforms, &light, surface, &mut stats);
            if self.config.show_bounding_box && selected == Some(index) {
                if let Some(bounds) = model.bounds() {
                    self.draw_bounds(bounds, &transforms, surface);
                }
            }
        }
        debug!(
            "frame: {} drawn, {} culled, {} behind near plane",
            stats.drawn, stats.culled, stats.near_clipped
        );
        stats
    }

    fn draw_model(
        &self,
        model: &Model,
        transforms: &FrameTransforms,
        light: &DirectionalLight,
        surface: &mut Surface,
        stats: &mut FrameStats,
    ) {
        let normal_matrix = pipeline::normal_matrix(&model.model_matrix());
        let mesh = model.mesh();
        let world = model.world_vertices();
        let fill = FillStyle {
            base_grey: self.config.base_grey,
            outline: match self.config.draw_mode {
                DrawMode::ShadedOutline => Some(self.config.outline_color),
                _ => None,
            },
        };

        for face in mesh.faces() {
            let world_pos = face.corners.map(|c| world[c.vertex]);
            if world_pos.iter().any(|&p| transforms.in_front_of_near(p)) {
                stats.near_clipped += 1;
                continue;
            }
            let screen = world_pos.map(|p| transforms.to_screen(p));
            if self.config.cull_back_faces && signed_area(screen[0], screen[1], screen[2]) <= 0.0 {
                stats.culled += 1;
                continue;
            }
            stats.drawn += 1;

            match self.config.draw_mode {
                DrawMode::Wireframe => {
                    for i in 0..3 {
                        draw_line_3d(surface, screen[i], screen[(i + 1) % 3], self.config.wireframe_color, 1);
                    }
                }
                DrawMode::Flat => {
                    let vertices = screen.map(|p| ShadedVertex::new(p, 1.0));
                    fill_triangle(surface, vertices, &fill);
                }
                DrawMode::Shaded | DrawMode::ShadedOutline => {
                    let normals = mesh.face_normals(face);
                    let mut vertices = [ShadedVertex::new(Vec3::ZERO, 0.0); 3];
                    for i in 0..3 {
                        let n = normal_matrix * normals[i];
                        vertices[i] = ShadedVertex::new(screen[i], light.intensity(n));
                    }
                    fill_triangle(surface, vertices, &fill);
                }
            }
        }
    }

    fn draw_bounds(&self, bounds: &Aabb, transforms: &FrameTransforms, surface: &mut Surface) {
        let corners = bounds.corners();
        if corners.iter().any(|&p| transforms.in_front_of_near(p)) {
            return;
        }
        let screen = corners.map(|p| transforms.to_screen(p));
        for (a, b) in Aabb::EDGES {
            draw_line(
                surface,
                screen[a].x.round() as i32,
                screen[a].y.round() as i32,
                screen[b].x.round() as i32,
                screen[b].y.round() as i32,
                self.config.bounding_box_color,
                1,
            );
        }
    }
}
