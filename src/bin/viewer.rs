//! Interactive viewer.
//!
//! Left drag orbits, shift+left or middle drag pans, the wheel zooms and a
//! left click selects. `R` toggles ray tracing, `P` the projection and `M`
//! cycles draw modes.

use anyhow::Result;
use env_logger::Env;
use log::{error, info};

use rastray::config::{RenderConfig, TraceConfig};
use rastray::demo;
use rastray::render::Surface;
use rastray::view::Viewport;
use rastray::window::{FrameLimiter, Window, WindowEvent, WINDOW_HEIGHT, WINDOW_WIDTH};

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    if let Err(e) = run() {
        error!("{e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let mut window = Window::new("rastray", WINDOW_WIDTH, WINDOW_HEIGHT)?;
    let render_config = RenderConfig::default();
    let camera = demo::camera(&render_config, WINDOW_WIDTH, WINDOW_HEIGHT);
    let mut view = Viewport::new(
        demo::scene(camera, None),
        render_config,
        demo::ray_scene(),
        TraceConfig::default(),
    )?;
    let mut surface = Surface::new(WINDOW_WIDTH, WINDOW_HEIGHT);
    let mut limiter = FrameLimiter::new(&window);

    'running: loop {
        for event in window.poll_events() {
            match event {
                WindowEvent::Quit => break 'running,
                WindowEvent::Resize(w, h) => {
                    window.resize(w, h);
                    surface.resize(w, h);
                }
                WindowEvent::Input(input) => {
                    view.handle_input(input);
                }
                WindowEvent::ToggleRayTrace => {
                    view.toggle_mode();
                    info!("view mode: {:?}", view.mode());
                }
                WindowEvent::ToggleProjection => {
                    view.toggle_projection();
                    info!("projection: {:?}", view.scene().camera.mode());
                }
                WindowEvent::CycleDrawMode => {
                    let config = view.renderer_mut().config_mut();
                    config.draw_mode = config.draw_mode.next();
                    info!("draw mode: {:?}", config.draw_mode);
                }
            }
        }

        view.render(&mut surface);
        window.set_cursor(view.cursor_hint())?;
        window.present(&surface)?;
        limiter.wait_and_get_delta(&window);
    }

    Ok(())
}
