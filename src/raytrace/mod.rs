//! Recursive ray tracer: primitives, shading and tiled execution.

pub mod camera;
pub mod light;
pub mod object;
pub mod ray;
pub mod tile;
pub mod tracer;

use thiserror::Error;

use crate::config::ConfigError;

pub use camera::RayCamera;
pub use light::LightSource;
pub use object::{Material, RayObject};
pub use ray::Ray;
pub use tile::{partition, trace_tile, TileBlock, TilePool, TileRect};
pub use tracer::{Hit, HitMode, RayScene, Tracer};

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("failed to start tile workers: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
