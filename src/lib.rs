//! A CPU software renderer with a z-buffered scan-line rasterizer and a
//! recursive ray tracer sharing one camera.
//!
//! The window is optional (the `window` feature pulls in SDL2); everything
//! else renders into a plain [`render::Surface`].
//!
//! # Quick Start
//!
//! ```ignore
//! use rastray::prelude::*;
//!
//! let frustum = Frustum::from_degrees(60.0, 640.0 / 480.0, -0.1, -100.0);
//! let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, frustum);
//! let mut scene = Scene::new(camera);
//! scene.add_model(Model::new(Mesh::cube()));
//! let mut surface = Surface::new(640, 480);
//! SceneRenderer::new(RenderConfig::default()).render(&mut scene, &mut surface, None);
//! ```

pub mod camera;
pub mod colors;
pub mod config;
pub mod demo;
pub mod entity;
pub mod light;
pub mod math;
pub mod mesh;
pub mod model;
pub mod pick;
pub mod pipeline;
pub mod projection;
pub mod raytrace;
pub mod render;
pub mod view;
#[cfg(feature = "window")]
pub mod window;

pub use camera::{Camera, DragGesture, DragKind};
pub use config::{ConfigError, RenderConfig, TraceConfig};
pub use entity::Entity;
pub use mesh::{LoadError, Mesh};
pub use model::Model;
pub use projection::{Frustum, ProjectionMode};
pub use view::{CursorHint, InputEvent, MouseButton, ViewMode, Viewport};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use rastray::prelude::*;
/// ```
pub mod prelude {
    // Camera
    pub use crate::camera::{Camera, DragGesture, DragKind};
    pub use crate::entity::Entity;
    pub use crate::projection::{Frustum, ProjectionMode};

    // Scene
    pub use crate::light::DirectionalLight;
    pub use crate::mesh::Mesh;
    pub use crate::model::{Aabb, Model};

    // Config
    pub use crate::config::{RenderConfig, TraceConfig};

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};

    // Rendering
    pub use crate::colors::Rgb;
    pub use crate::render::{DrawMode, Scene, SceneRenderer, Surface};

    // Ray tracing
    pub use crate::raytrace::{LightSource, Material, RayCamera, RayObject, RayScene, TilePool, Tracer};

    // View
    pub use crate::view::{CursorHint, InputEvent, MouseButton, ViewMode, Viewport};

    // Window
    #[cfg(feature = "window")]
    pub use crate::window::{FrameLimiter, Window, WindowEvent};
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::raytrace::{partition, trace_tile};
    pub use crate::render::{fill_triangle, FillStyle, ShadedVertex};
}
