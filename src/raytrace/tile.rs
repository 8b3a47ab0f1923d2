//! Tiled tracing.
//!
//! The image is cut into a grid of rectangles. Each tile is traced on its
//! own by a pool worker and comes back as an owned pixel block, so workers
//! share nothing mutable except the cancellation flag.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use log::{info, trace};
use rayon::prelude::*;

use super::camera::RayCamera;
use super::tracer::Tracer;
use super::TraceError;

/// Pixel rectangle in bottom-left addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl TileRect {
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// Splits a `width x height` image into at most `columns x rows` tiles.
///
/// Boundaries fall on `k * width / columns`, so tiles differ in size by at
/// most one pixel and cover the image exactly. Empty tiles (more columns
/// than pixels) are left out.
pub fn partition(width: u32, height: u32, columns: u32, rows: u32) -> Vec<TileRect> {
    let columns = columns.max(1) as u64;
    let rows = rows.max(1) as u64;
    let edge = |k: u64, extent: u32, count: u64| (k * extent as u64 / count) as u32;

    let mut tiles = Vec::with_capacity((columns * rows) as usize);
    for row in 0..rows {
        let y0 = edge(row, height, rows);
        let y1 = edge(row + 1, height, rows);
        for column in 0..columns {
            let x0 = edge(column, width, columns);
            let x1 = edge(column + 1, width, columns);
            if x1 > x0 && y1 > y0 {
                tiles.push(TileRect {
                    x: x0,
                    y: y0,
                    width: x1 - x0,
                    height: y1 - y0,
                });
            }
        }
    }
    tiles
}

/// Traces one tile, rows bottom-up, checking `cancel` before each row.
/// Returns `None` if the tile was abandoned part way.
pub fn trace_tile(rect: TileRect, tracer: &Tracer, camera: &RayCamera, cancel: &AtomicBool) -> Option<Vec<u32>> {
    let mut pixels = Vec::with_capacity(rect.area());
    for j in rect.y..rect.y + rect.height {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        for i in rect.x..rect.x + rect.width {
            pixels.push(tracer.trace_pixel(camera, i, j));
        }
    }
    Some(pixels)
}

/// A finished tile.
#[derive(Debug, Clone, PartialEq)]
pub struct TileBlock {
    /// Position of the tile in the list handed to [`TilePool::trace`].
    pub index: usize,
    pub rect: TileRect,
    /// Row-major, bottom row first, ready for [`Surface::blit`](crate::render::Surface::blit).
    pub pixels: Vec<u32>,
}

/// Worker pool that traces tiles.
pub struct TilePool {
    pool: rayon::ThreadPool,
}

impl TilePool {
    /// `threads` of `None` lets rayon pick.
    pub fn new(threads: Option<usize>) -> Result<Self, TraceError> {
        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("rastray-tile-{i}"));
        if let Some(n) = threads {
            builder = builder.num_threads(n);
        }
        let pool = builder.build()?;
        Ok(Self { pool })
    }

    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Traces the given `(index, rect)` tasks and returns the blocks that
    /// finished. Cancelled tiles are simply missing from the result.
    pub fn trace(
        &self,
        tracer: &Tracer,
        camera: &RayCamera,
        tasks: &[(usize, TileRect)],
        cancel: &AtomicBool,
    ) -> Vec<TileBlock> {
        let start = Instant::now();
        let blocks: Vec<TileBlock> = self.pool.install(|| {
            tasks
                .par_iter()
                .filter_map(|&(index, rect)| {
                    let pixels = trace_tile(rect, tracer, camera, cancel)?;
                    trace!("tile {index} at ({}, {}) done", rect.x, rect.y);
                    Some(TileBlock { index, rect, pixels })
                })
                .collect()
        });
        info!(
            "traced {}/{} tiles on {} threads in {:.1?}",
            blocks.len(),
            tasks.len(),
            self.threads(),
            start.elapsed()
        );
        blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::colors::Rgb;
    use crate::config::TraceConfig;
    use crate::math::Vec3;
    use crate::projection::Frustum;
    use crate::raytrace::tracer::RayScene;

    fn setup(width: u32, height: u32) -> (Tracer, RayCamera) {
        let camera = Camera::new(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::ZERO,
            Frustum::from_degrees(60.0, width as f32 / height as f32, -0.1, -100.0),
        );
        let config = TraceConfig {
            background: Rgb::new(0.0, 0.0, 1.0),
            ..TraceConfig::default()
        };
        (Tracer::new(RayScene::new(), config), RayCamera::from_camera(&camera, width, height))
    }

    #[test]
    fn partition_covers_image_exactly_once() {
        let (w, h) = (37, 23);
        let tiles = partition(w, h, 5, 4);
        assert_eq!(tiles.len(), 20);
        let mut hits = vec![0u8; (w * h) as usize];
        for t in &tiles {
            for y in t.y..t.y + t.height {
                for x in t.x..t.x + t.width {
                    hits[(y * w + x) as usize] += 1;
                }
            }
        }
        assert!(hits.iter().all(|&n| n == 1));
    }

    #[test]
    fn partition_skips_empty_tiles() {
        let tiles = partition(3, 2, 8, 8);
        assert_eq!(tiles.len(), 6);
        assert!(tiles.iter().all(|t| t.width == 1 && t.height == 1));
        assert!(partition(0, 10, 4, 4).is_empty());
    }

    #[test]
    fn tile_block_matches_per_pixel_trace() {
        let (tracer, camera) = setup(16, 8);
        let rect = TileRect {
            x: 4,
            y: 2,
            width: 3,
            height: 2,
        };
        let pixels = trace_tile(rect, &tracer, &camera, &AtomicBool::new(false)).expect("not cancelled");
        assert_eq!(pixels.len(), 6);
        assert_eq!(pixels[0], tracer.trace_pixel(&camera, 4, 2));
        assert_eq!(pixels[5], tracer.trace_pixel(&camera, 6, 3));
    }

    #[test]
    fn cancelled_tiles_yield_nothing() {
        let (tracer, camera) = setup(16, 16);
        let pool = TilePool::new(Some(2)).expect("pool");
        let tasks: Vec<_> = partition(16, 16, 4, 4).into_iter().enumerate().collect();
        let cancel = AtomicBool::new(true);
        assert!(pool.trace(&tracer, &camera, &tasks, &cancel).is_empty());

        cancel.store(false, Ordering::Relaxed);
        let blocks = pool.trace(&tracer, &camera, &tasks, &cancel);
        assert_eq!(blocks.len(), 16);
        let mut indices: Vec<_> = blocks.iter().map(|b| b.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, (0..16).collect::<Vec<_>>());
    }
}
