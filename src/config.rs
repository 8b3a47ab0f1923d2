//! Render and trace settings.
//!
//! Both structs are plain data with a [`Default`] impl; callers tweak the
//! fields they care about and call `validate()` once before use.

use thiserror::Error;

use crate::colors::{self, Rgb};
use crate::math::Vec3;
use crate::projection::{Frustum, ProjectionMode};
use crate::render::DrawMode;

/// Default vertical field angle in degrees.
pub const DEFAULT_FIELD_ANGLE: f32 = 60.0;
pub const DEFAULT_NEAR: f32 = -0.1;
pub const DEFAULT_FAR: f32 = -1000.0;

pub const DEFAULT_MAX_DEPTH: u32 = 3;
pub const DEFAULT_TILE_GRID: u32 = 8;
pub const DEFAULT_AMBIENT: f32 = 0.1;
pub const DEFAULT_MIN_CONTRIBUTION: f32 = 0.01;
pub const DEFAULT_SHADOW_EPSILON: f32 = 1e-3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("near plane {near} must be negative and in front of far plane {far}")]
    FrustumOrder { near: f32, far: f32 },

    #[error("field angle {0} rad must lie strictly between 0 and pi")]
    FieldAngle(f32),

    #[error("aspect ratio {0} must be positive")]
    AspectRatio(f32),

    #[error("surface size {width}x{height} must be non-zero")]
    EmptySurface { width: u32, height: u32 },

    #[error("tile grid {columns}x{rows} must be non-zero")]
    EmptyTileGrid { columns: u32, rows: u32 },

    #[error("tiles per frame must be non-zero")]
    EmptyTileBatch,

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

fn non_negative(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Rasterizer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    /// Vertical field angle in degrees.
    pub field_angle: f32,
    pub near: f32,
    pub far: f32,
    pub projection: ProjectionMode,
    pub draw_mode: DrawMode,
    /// Material grey before lighting.
    pub base_grey: f32,
    pub background: u32,
    pub wireframe_color: u32,
    pub outline_color: u32,
    pub bounding_box_color: u32,
    pub cull_back_faces: bool,
    pub show_bounding_box: bool,
    /// World-space light direction. `None` lights along the view direction.
    pub light_direction: Option<Vec3>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            field_angle: DEFAULT_FIELD_ANGLE,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            projection: ProjectionMode::Perspective,
            draw_mode: DrawMode::Shaded,
            base_grey: colors::BASE_GREY,
            background: colors::BACKGROUND,
            wireframe_color: colors::WIREFRAME,
            outline_color: colors::OUTLINE,
            bounding_box_color: colors::BOUNDING_BOX,
            cull_back_faces: false,
            show_bounding_box: true,
            light_direction: None,
        }
    }
}

impl RenderConfig {
    /// Frustum for a surface of the given aspect ratio.
    pub fn frustum(&self, aspect_ratio: f32) -> Frustum {
        Frustum::from_degrees(self.field_angle, aspect_ratio, self.near, self.far)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.frustum(1.0).validate()?;
        non_negative("base grey", self.base_grey)?;
        if let Some(dir) = self.light_direction {
            if dir.magnitude_squared() <= f32::EPSILON {
                return Err(ConfigError::Negative {
                    name: "light direction length",
                    value: dir.magnitude(),
                });
            }
        }
        Ok(())
    }
}

/// Ray tracer settings.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceConfig {
    /// Reflection bounces after the primary hit.
    pub max_depth: u32,
    pub tile_columns: u32,
    pub tile_rows: u32,
    pub ambient: f32,
    pub background: Rgb,
    /// Reflection chains whose weight drops below this stop recursing.
    pub min_contribution: f32,
    /// Offset keeping secondary rays off the surface they leave.
    pub shadow_epsilon: f32,
    /// Worker threads. `None` uses rayon's default.
    pub threads: Option<usize>,
    /// Tiles the interactive view traces per frame. `None` traces one tile
    /// per worker thread, so a frame costs about one tile of latency.
    pub tiles_per_frame: Option<usize>,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            tile_columns: DEFAULT_TILE_GRID,
            tile_rows: DEFAULT_TILE_GRID,
            ambient: DEFAULT_AMBIENT,
            background: Rgb::from_packed(colors::BACKGROUND),
            min_contribution: DEFAULT_MIN_CONTRIBUTION,
            shadow_epsilon: DEFAULT_SHADOW_EPSILON,
            threads: None,
            tiles_per_frame: None,
        }
    }
}

impl TraceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_columns == 0 || self.tile_rows == 0 {
            return Err(ConfigError::EmptyTileGrid {
                columns: self.tile_columns,
                rows: self.tile_rows,
            });
        }
        non_negative("ambient", self.ambient)?;
        non_negative("minimum contribution", self.min_contribution)?;
        non_negative("shadow epsilon", self.shadow_epsilon)?;
        if self.tiles_per_frame == Some(0) {
            return Err(ConfigError::EmptyTileBatch);
        }
        Ok(())
    }
}

/// Rejects a zero-sized render target.
pub fn validate_surface_size(width: u32, height: u32) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::EmptySurface { width, height });
    }
    Ok(())
}
