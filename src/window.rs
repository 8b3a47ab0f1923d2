//! SDL2 host window: presents a [`Surface`] and translates SDL events into
//! viewport input.

use sdl2::event::Event;
use sdl2::keyboard::{Keycode, Mod};
use sdl2::mouse::{Cursor, MouseButton as SdlButton, SystemCursor};
use sdl2::pixels::PixelFormatEnum;
use sdl2::rect::Rect;
use thiserror::Error;

use crate::render::Surface;
use crate::view::{CursorHint, InputEvent, MouseButton};

pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const FPS: u64 = 60;
pub const FRAME_TARGET_TIME: f64 = 1000.0 / FPS as f64;

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("SDL error: {0}")]
    Sdl(String),
}

impl From<String> for WindowError {
    fn from(message: String) -> Self {
        WindowError::Sdl(message)
    }
}

pub type Result<T> = std::result::Result<T, WindowError>;

fn sdl<E: ToString>(e: E) -> WindowError {
    WindowError::Sdl(e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowEvent {
    Quit,
    Resize(u32, u32),
    Input(InputEvent),
    ToggleRayTrace,
    ToggleProjection,
    CycleDrawMode,
}

pub struct FrameLimiter {
    previous_frame_time: u64,
}

impl FrameLimiter {
    pub fn new(window: &Window) -> Self {
        Self {
            previous_frame_time: window.timer().ticks64(),
        }
    }

    /// Sleeps off the rest of the frame budget and returns the time since
    /// the previous call in milliseconds.
    pub fn wait_and_get_delta(&mut self, window: &Window) -> u64 {
        let mut current_time = window.timer().ticks64();
        let mut delta_time = current_time - self.previous_frame_time;

        if delta_time < FRAME_TARGET_TIME as u64 {
            let time_to_wait = (FRAME_TARGET_TIME as u64) - delta_time;
            std::thread::sleep(std::time::Duration::from_millis(time_to_wait));
            current_time = window.timer().ticks64();
            delta_time = current_time - self.previous_frame_time;
        }

        self.previous_frame_time = current_time;
        delta_time
    }
}

fn map_button(button: SdlButton) -> Option<MouseButton> {
    match button {
        SdlButton::Left => Some(MouseButton::Left),
        SdlButton::Middle => Some(MouseButton::Middle),
        SdlButton::Right => Some(MouseButton::Right),
        _ => None,
    }
}

fn system_cursor(hint: CursorHint) -> SystemCursor {
    match hint {
        CursorHint::Arrow => SystemCursor::Arrow,
        CursorHint::Orbit => SystemCursor::SizeAll,
        CursorHint::Pan => SystemCursor::Hand,
        CursorHint::Crosshair => SystemCursor::Crosshair,
    }
}

pub struct Window {
    // Field order matters: the texture must drop before its creator.
    texture: sdl2::render::Texture<'static>,
    texture_creator: Box<sdl2::render::TextureCreator<sdl2::video::WindowContext>>,
    canvas: sdl2::render::Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    keyboard: sdl2::keyboard::KeyboardUtil,
    timer_subsystem: sdl2::TimerSubsystem,
    cursor: Option<(CursorHint, Cursor)>,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32) -> Result<Self> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;
        let timer_subsystem = sdl_context.timer()?;
        let keyboard = sdl_context.keyboard();

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .resizable()
            .build()
            .map_err(sdl)?;

        let canvas = window.into_canvas().build().map_err(sdl)?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;
        let texture = Self::create_texture(&texture_creator, width, height)?;

        Ok(Self {
            texture,
            texture_creator,
            canvas,
            event_pump,
            keyboard,
            timer_subsystem,
            cursor: None,
            width,
            height,
        })
    }

    fn create_texture(
        creator: &sdl2::render::TextureCreator<sdl2::video::WindowContext>,
        width: u32,
        height: u32,
    ) -> Result<sdl2::render::Texture<'static>> {
        // SAFETY: the creator is boxed and owned by the same Window as the
        // texture, and the texture field is declared (so dropped) first.
        let creator: &'static sdl2::render::TextureCreator<sdl2::video::WindowContext> =
            unsafe { &*(creator as *const _) };
        creator
            .create_texture_streaming(PixelFormatEnum::ARGB8888, width, height)
            .map_err(sdl)
    }

    /// Drains pending SDL events.
    pub fn poll_events(&mut self) -> Vec<WindowEvent> {
        let shift = self.keyboard.mod_state().intersects(Mod::LSHIFTMOD | Mod::RSHIFTMOD);
        let mut events = Vec::new();
        for event in self.event_pump.poll_iter() {
            let mapped = match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => Some(WindowEvent::Quit),
                Event::KeyDown {
                    keycode: Some(Keycode::R),
                    repeat: false,
                    ..
                } => Some(WindowEvent::ToggleRayTrace),
                Event::KeyDown {
                    keycode: Some(Keycode::P),
                    repeat: false,
                    ..
                } => Some(WindowEvent::ToggleProjection),
                Event::KeyDown {
                    keycode: Some(Keycode::M),
                    repeat: false,
                    ..
                } => Some(WindowEvent::CycleDrawMode),
                Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(w, h),
                    ..
                } => Some(WindowEvent::Resize(w.max(1) as u32, h.max(1) as u32)),
                Event::MouseMotion { x, y, .. } => Some(WindowEvent::Input(InputEvent::MouseMove { x, y })),
                Event::MouseButtonDown { mouse_btn, x, y, .. } => map_button(mouse_btn)
                    .map(|button| WindowEvent::Input(InputEvent::ButtonDown { button, x, y, shift })),
                Event::MouseButtonUp { mouse_btn, x, y, .. } => {
                    map_button(mouse_btn).map(|button| WindowEvent::Input(InputEvent::ButtonUp { button, x, y }))
                }
                Event::MouseWheel { y, .. } => Some(WindowEvent::Input(InputEvent::Scroll { notches: y as f32 })),
                _ => None,
            };
            events.extend(mapped);
        }
        events
    }

    /// Shows `surface`, stretched to the window if the sizes differ.
    pub fn present(&mut self, surface: &Surface) -> Result<()> {
        let (width, height) = (surface.width(), surface.height());
        let query = self.texture.query();
        if query.width != width || query.height != height {
            self.texture = Self::create_texture(&self.texture_creator, width, height)?;
        }
        self.texture
            .update(None, surface.as_bytes(), (width * 4) as usize)
            .map_err(sdl)?;

        self.canvas.clear();
        self.canvas
            .copy(&self.texture, None, Some(Rect::new(0, 0, self.width, self.height)))?;
        self.canvas.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Switches the system cursor when the hint changes.
    pub fn set_cursor(&mut self, hint: CursorHint) -> Result<()> {
        if matches!(&self.cursor, Some((current, _)) if *current == hint) {
            return Ok(());
        }
        let cursor = Cursor::from_system(system_cursor(hint))?;
        cursor.set();
        self.cursor = Some((hint, cursor));
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn timer(&self) -> &sdl2::TimerSubsystem {
        &self.timer_subsystem
    }
}
