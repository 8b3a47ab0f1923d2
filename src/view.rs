//! Interactive viewport: turns input into camera moves and selection, and
//! produces frames either by rasterizing or from a cached ray-traced image.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::debug;

use crate::camera::{DragGesture, DragKind};
use crate::config::{validate_surface_size, RenderConfig, TraceConfig};
use crate::pick::pick;
use crate::raytrace::{partition, RayCamera, RayScene, TilePool, TileRect, TraceError, Tracer};
use crate::render::{FrameStats, Scene, SceneRenderer, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    Raster,
    RayTrace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Input in window coordinates (origin top-left, `y` down).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    MouseMove { x: i32, y: i32 },
    ButtonDown { button: MouseButton, x: i32, y: i32, shift: bool },
    ButtonUp { button: MouseButton, x: i32, y: i32 },
    /// Positive notches zoom in.
    Scroll { notches: f32 },
}

/// Cursor the host window should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorHint {
    #[default]
    Arrow,
    Orbit,
    Pan,
    Crosshair,
}

/// What one call to [`Viewport::render`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Set when the frame was rasterized.
    pub raster: Option<FrameStats>,
    pub tiles_traced: usize,
    /// Tiles still missing from the ray-traced image.
    pub tiles_pending: usize,
}

pub struct Viewport {
    scene: Scene,
    renderer: SceneRenderer,
    tracer: Tracer,
    pool: TilePool,
    mode: ViewMode,
    size: (u32, u32),
    backbuffer: Surface,
    tiles: Vec<TileRect>,
    complete: Vec<bool>,
    cancel: Arc<AtomicBool>,
    gesture: Option<DragGesture>,
    selected: Option<usize>,
}

impl Viewport {
    pub fn new(
        scene: Scene,
        render_config: RenderConfig,
        ray_scene: RayScene,
        trace_config: TraceConfig,
    ) -> Result<Self, TraceError> {
        render_config.validate()?;
        trace_config.validate()?;
        let pool = TilePool::new(trace_config.threads)?;
        Ok(Self {
            scene,
            renderer: SceneRenderer::new(render_config),
            tracer: Tracer::new(ray_scene, trace_config),
            pool,
            mode: ViewMode::Raster,
            size: (0, 0),
            backbuffer: Surface::new(1, 1),
            tiles: Vec::new(),
            complete: Vec::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            gesture: None,
            selected: None,
        })
    }

    // ============ Accessors ============

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access. Drops the cached ray-traced image.
    pub fn scene_mut(&mut self) -> &mut Scene {
        self.invalidate();
        &mut self.scene
    }

    pub fn tracer(&self) -> &Tracer {
        &self.tracer
    }

    pub fn set_ray_scene(&mut self, ray_scene: RayScene) {
        self.tracer = Tracer::new(ray_scene, self.tracer.config().clone());
        self.invalidate();
    }

    pub fn renderer_mut(&mut self) -> &mut SceneRenderer {
        &mut self.renderer
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Switches modes. Leaving ray tracing raises the cancel flag; unfinished
    /// tiles stay pending and resume when ray tracing is selected again.
    pub fn set_mode(&mut self, mode: ViewMode) {
        if mode == self.mode {
            return;
        }
        let leaving_trace = mode != ViewMode::RayTrace;
        self.cancel.store(leaving_trace, Ordering::Relaxed);
        self.mode = mode;
        debug!("view mode {mode:?}, {} tiles pending", self.pending_tiles());
    }

    pub fn toggle_mode(&mut self) {
        self.set_mode(match self.mode {
            ViewMode::Raster => ViewMode::RayTrace,
            ViewMode::RayTrace => ViewMode::Raster,
        });
    }

    pub fn toggle_projection(&mut self) {
        self.scene.camera.toggle_projection();
        self.invalidate();
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Flag that aborts a trace in flight when set from another thread.
    /// The view raises it when it leaves ray tracing and clears it when ray
    /// tracing is selected again or once an interrupted trace returns.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.cancel)
    }

    /// Marks every tile of the ray-traced image as stale.
    pub fn invalidate(&mut self) {
        self.complete.iter_mut().for_each(|done| *done = false);
    }

    pub fn pending_tiles(&self) -> usize {
        self.complete.iter().filter(|&&done| !done).count()
    }

    pub fn cursor_hint(&self) -> CursorHint {
        match (self.gesture.as_ref().map(DragGesture::kind), self.mode) {
            (Some(DragKind::Orbit), _) => CursorHint::Orbit,
            (Some(DragKind::Pan), _) => CursorHint::Pan,
            (None, ViewMode::Raster) => CursorHint::Crosshair,
            (None, ViewMode::RayTrace) => CursorHint::Arrow,
        }
    }

    // ============ Input ============

    /// Applies one input event. Returns whether the view needs a redraw.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::ButtonDown { button, x, y, shift } => {
                let kind = match (button, shift) {
                    (MouseButton::Left, false) => DragKind::Orbit,
                    (MouseButton::Left, true) | (MouseButton::Middle, _) => DragKind::Pan,
                    (MouseButton::Right, _) => return false,
                };
                self.gesture = Some(DragGesture::begin(kind, &self.scene.camera, x, y));
                true
            }
            InputEvent::MouseMove { x, y } => {
                let Some(gesture) = &self.gesture else {
                    return false;
                };
                gesture.apply(&mut self.scene.camera, x, y, self.size.1);
                self.invalidate();
                true
            }
            InputEvent::ButtonUp { x, y, .. } => {
                let Some(gesture) = self.gesture.take() else {
                    return false;
                };
                if gesture.kind() == DragKind::Orbit && !gesture.moved(x, y) {
                    self.click(x, y);
                }
                true
            }
            InputEvent::Scroll { notches } => {
                self.scene.camera.zoom(notches);
                self.invalidate();
                true
            }
        }
    }

    fn click(&mut self, x: i32, y: i32) {
        let (width, height) = self.size;
        if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
            return;
        }
        let camera = RayCamera::from_camera(&self.scene.camera, width, height);
        let ray = camera.ray(x as u32, height - 1 - y as u32);
        self.selected = pick(&self.scene.models, &ray);
        debug!("picked {:?}", self.selected);
    }

    // ============ Frames ============

    /// Draws the current view into `target`, resizing the view to match.
    pub fn render(&mut self, target: &mut Surface) -> FrameReport {
        let (width, height) = (target.width(), target.height());
        if validate_surface_size(width, height).is_err() {
            return FrameReport::default();
        }
        if (width, height) != self.size || target.take_resized() {
            self.resize(width, height);
        }

        match self.mode {
            ViewMode::Raster => FrameReport {
                raster: Some(self.renderer.render(&mut self.scene, target, self.selected)),
                tiles_traced: 0,
                tiles_pending: self.pending_tiles(),
            },
            ViewMode::RayTrace => {
                let traced = self.trace_pending();
                target.copy_from(&self.backbuffer);
                FrameReport {
                    raster: None,
                    tiles_traced: traced,
                    tiles_pending: self.pending_tiles(),
                }
            }
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.scene.camera.set_aspect_ratio(width as f32 / height as f32);
        self.backbuffer.resize(width, height);
        let config = self.tracer.config();
        self.tiles = partition(width, height, config.tile_columns, config.tile_rows);
        self.complete = vec![false; self.tiles.len()];
        debug!("view resized to {width}x{height}, {} tiles", self.tiles.len());
    }

    /// Traces the next batch of incomplete tiles into the backbuffer.
    fn trace_pending(&mut self) -> usize {
        let batch = self
            .tracer
            .config()
            .tiles_per_frame
            .unwrap_or_else(|| self.pool.threads())
            .max(1);
        let tasks: Vec<(usize, TileRect)> = self
            .tiles
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.complete[*index])
            .map(|(index, rect)| (index, *rect))
            .take(batch)
            .collect();
        if tasks.is_empty() {
            return 0;
        }

        let camera = RayCamera::from_camera(&self.scene.camera, self.size.0, self.size.1);
        let blocks = self.pool.trace(&self.tracer, &camera, &tasks, &self.cancel);
        self.cancel.store(false, Ordering::Relaxed);

        for block in &blocks {
            let r = block.rect;
            self.backbuffer.blit(r.x as i32, r.y as i32, r.width, r.height, &block.pixels);
            self.complete[block.index] = true;
        }
        blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::colors::Rgb;
    use crate::math::Vec3;
    use crate::mesh::Mesh;
    use crate::model::Model;
    use crate::projection::Frustum;
    use crate::raytrace::{LightSource, Material, RayObject};

    fn viewport() -> Viewport {
        viewport_with(Some(4))
    }

    fn viewport_with(tiles_per_frame: Option<usize>) -> Viewport {
        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 6.0),
            Vec3::ZERO,
            Frustum::from_degrees(60.0, 1.0, -0.1, -100.0),
        );
        let mut scene = Scene::new(camera);
        scene.add_model(Model::new(Mesh::cube()));
        let mut rays = RayScene::new();
        rays.add_object(RayObject::sphere(Vec3::ZERO, 1.0, Material::matte(Rgb::RED)))
            .add_light(LightSource::new(Vec3::new(0.0, 0.0, 10.0), 1.0));
        let trace = TraceConfig {
            tile_columns: 2,
            tile_rows: 2,
            threads: Some(2),
            tiles_per_frame,
            ..TraceConfig::default()
        };
        Viewport::new(scene, RenderConfig::default(), rays, trace).expect("viewport")
    }

    #[test]
    fn ray_trace_is_cached_until_invalidated() {
        let mut view = viewport();
        view.set_mode(ViewMode::RayTrace);
        let mut target = Surface::new(16, 16);

        let first = view.render(&mut target);
        assert_eq!(first.tiles_traced, 4);
        assert_eq!(first.tiles_pending, 0);
        let image = target.pixels().to_vec();

        let second = view.render(&mut target);
        assert_eq!(second.tiles_traced, 0);
        assert_eq!(target.pixels(), &image[..]);

        view.handle_input(InputEvent::Scroll { notches: 1.0 });
        assert_eq!(view.pending_tiles(), 4);
        assert_eq!(view.render(&mut target).tiles_traced, 4);
    }

    #[test]
    fn resize_retraces_everything() {
        let mut view = viewport();
        view.set_mode(ViewMode::RayTrace);
        view.render(&mut Surface::new(16, 16));
        let report = view.render(&mut Surface::new(20, 12));
        assert_eq!(report.tiles_traced, 4);
        approx::assert_relative_eq!(view.scene().camera.frustum().aspect_ratio(), 20.0 / 12.0);
    }

    #[test]
    fn cancelled_trace_resumes_on_next_frame() {
        let mut view = viewport();
        view.set_mode(ViewMode::RayTrace);
        let mut target = Surface::new(16, 16);
        view.cancel_flag().store(true, Ordering::Relaxed);
        let report = view.render(&mut target);
        assert_eq!(report.tiles_traced, 0);
        assert_eq!(report.tiles_pending, 4);

        let report = view.render(&mut target);
        assert_eq!(report.tiles_traced, 4);
        assert_eq!(report.tiles_pending, 0);
    }

    #[test]
    fn trace_is_spread_over_frames() {
        let mut view = viewport_with(Some(1));
        view.set_mode(ViewMode::RayTrace);
        let mut target = Surface::new(16, 16);
        for pending in (0..4).rev() {
            let report = view.render(&mut target);
            assert_eq!(report.tiles_traced, 1);
            assert_eq!(report.tiles_pending, pending);
        }
        assert_eq!(view.render(&mut target).tiles_traced, 0);
    }

    #[test]
    fn default_batch_is_one_tile_per_worker() {
        let mut view = viewport_with(None);
        view.set_mode(ViewMode::RayTrace);
        let report = view.render(&mut Surface::new(16, 16));
        assert_eq!(report.tiles_traced, 2);
        assert_eq!(report.tiles_pending, 2);
    }

    #[test]
    fn leaving_ray_trace_cancels_and_keeps_tiles_pending() {
        let mut view = viewport_with(Some(1));
        let mut target = Surface::new(16, 16);
        view.toggle_mode();
        assert_eq!(view.render(&mut target).tiles_pending, 3);

        view.toggle_mode();
        assert_eq!(view.mode(), ViewMode::Raster);
        assert!(view.cancel_flag().load(Ordering::Relaxed));
        let report = view.render(&mut target);
        assert!(report.raster.is_some());
        assert_eq!(report.tiles_traced, 0);
        assert_eq!(report.tiles_pending, 3);

        view.set_mode(ViewMode::RayTrace);
        assert!(!view.cancel_flag().load(Ordering::Relaxed));
        let mut traced = 0;
        for _ in 0..3 {
            traced += view.render(&mut target).tiles_traced;
        }
        assert_eq!(traced, 3);
        assert_eq!(view.pending_tiles(), 0);
    }

    #[test]
    fn click_without_drag_selects_model() {
        let mut view = viewport();
        view.render(&mut Surface::new(32, 32));
        view.handle_input(InputEvent::ButtonDown {
            button: MouseButton::Left,
            x: 16,
            y: 16,
            shift: false,
        });
        assert_eq!(view.cursor_hint(), CursorHint::Orbit);
        view.handle_input(InputEvent::ButtonUp {
            button: MouseButton::Left,
            x: 16,
            y: 16,
        });
        assert_eq!(view.selected(), Some(0));
        assert_eq!(view.cursor_hint(), CursorHint::Crosshair);

        // A click on empty space clears the selection.
        view.handle_input(InputEvent::ButtonDown {
            button: MouseButton::Left,
            x: 0,
            y: 0,
            shift: false,
        });
        view.handle_input(InputEvent::ButtonUp {
            button: MouseButton::Left,
            x: 0,
            y: 0,
        });
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn drag_orbits_without_selecting() {
        let mut view = viewport();
        view.render(&mut Surface::new(32, 32));
        let before = view.scene().camera.position();
        view.handle_input(InputEvent::ButtonDown {
            button: MouseButton::Left,
            x: 16,
            y: 16,
            shift: false,
        });
        assert!(view.handle_input(InputEvent::MouseMove { x: 26, y: 16 }));
        view.handle_input(InputEvent::ButtonUp {
            button: MouseButton::Left,
            x: 26,
            y: 16,
        });
        assert_ne!(view.scene().camera.position(), before);
        assert_eq!(view.selected(), None);
        assert!(!view.handle_input(InputEvent::MouseMove { x: 30, y: 30 }));
    }

    #[test]
    fn shift_drag_pans() {
        let mut view = viewport();
        view.render(&mut Surface::new(32, 32));
        view.handle_input(InputEvent::ButtonDown {
            button: MouseButton::Left,
            x: 0,
            y: 0,
            shift: true,
        });
        assert_eq!(view.cursor_hint(), CursorHint::Pan);
        view.handle_input(InputEvent::MouseMove { x: 8, y: 0 });
        // Panning moves the pivot with the camera.
        assert!(view.scene().camera.pivot().x < 0.0);
    }
}
