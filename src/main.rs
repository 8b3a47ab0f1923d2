//! rastray - headless renderer
//!
//! Renders the demo scene with the rasterizer or the ray tracer and writes
//! a PNG.

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::{error, info};

use rastray::config::{validate_surface_size, RenderConfig, TraceConfig};
use rastray::demo;
use rastray::mesh::Mesh;
use rastray::projection::ProjectionMode;
use rastray::raytrace::{partition, RayCamera, TilePool, Tracer};
use rastray::render::{DrawMode, SceneRenderer, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Raster,
    Trace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Projection {
    Perspective,
    Orthographic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Draw {
    Shaded,
    Flat,
    Wireframe,
    Outline,
}

#[derive(Parser)]
#[command(name = "rastray")]
#[command(about = "Software rasterizer and ray tracer", long_about = None)]
struct Cli {
    /// Output PNG
    #[arg(short, long, default_value = "render.png")]
    output: PathBuf,

    #[arg(long, default_value_t = 800)]
    width: u32,

    #[arg(long, default_value_t = 600)]
    height: u32,

    #[arg(short, long, value_enum, default_value_t = Mode::Raster)]
    mode: Mode,

    /// OBJ file to rasterize instead of the built-in cube
    #[arg(long)]
    obj: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Projection::Perspective)]
    projection: Projection,

    #[arg(long, value_enum, default_value_t = Draw::Shaded)]
    draw: Draw,

    /// Skip triangles facing away from the camera
    #[arg(long)]
    cull: bool,

    /// Reflection bounces for the ray tracer
    #[arg(long, default_value_t = rastray::config::DEFAULT_MAX_DEPTH)]
    depth: u32,

    /// Worker threads for the ray tracer (default: one per core)
    #[arg(long)]
    threads: Option<usize>,
}

impl Cli {
    fn render_config(&self) -> RenderConfig {
        RenderConfig {
            projection: match self.projection {
                Projection::Perspective => ProjectionMode::Perspective,
                Projection::Orthographic => ProjectionMode::Orthographic,
            },
            draw_mode: match self.draw {
                Draw::Shaded => DrawMode::Shaded,
                Draw::Flat => DrawMode::Flat,
                Draw::Wireframe => DrawMode::Wireframe,
                Draw::Outline => DrawMode::ShadedOutline,
            },
            cull_back_faces: self.cull,
            ..RenderConfig::default()
        }
    }

    fn trace_config(&self) -> TraceConfig {
        TraceConfig {
            max_depth: self.depth,
            threads: self.threads,
            ..TraceConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = run(Cli::parse()) {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    validate_surface_size(cli.width, cli.height)?;
    let render_config = cli.render_config();
    render_config.validate()?;

    let camera = demo::camera(&render_config, cli.width, cli.height);
    let mut surface = Surface::new(cli.width, cli.height);
    let start = Instant::now();

    match cli.mode {
        Mode::Raster => {
            let mesh = match &cli.obj {
                Some(path) => Some(Mesh::from_obj(path).with_context(|| format!("loading {}", path.display()))?),
                None => None,
            };
            let mut scene = demo::scene(camera, mesh);
            let stats = SceneRenderer::new(render_config).render(&mut scene, &mut surface, Some(0));
            info!(
                "rasterized {} triangles ({} culled, {} behind near plane)",
                stats.drawn, stats.culled, stats.near_clipped
            );
        }
        Mode::Trace => {
            let trace_config = cli.trace_config();
            trace_config.validate()?;
            let tiles: Vec<_> = partition(
                cli.width,
                cli.height,
                trace_config.tile_columns,
                trace_config.tile_rows,
            )
            .into_iter()
            .enumerate()
            .collect();
            let pool = TilePool::new(trace_config.threads)?;
            let tracer = Tracer::new(demo::ray_scene(), trace_config);
            let ray_camera = RayCamera::from_camera(&camera, cli.width, cli.height);
            let cancel = AtomicBool::new(false);
            for block in pool.trace(&tracer, &ray_camera, &tiles, &cancel) {
                let r = block.rect;
                surface.blit(r.x as i32, r.y as i32, r.width, r.height, &block.pixels);
            }
        }
    }

    surface
        .save_png(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!("wrote {} in {:.1?}", cli.output.display(), start.elapsed());
    Ok(())
}
