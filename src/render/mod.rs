//! Software rasterizer.
//!
//! - [`Surface`]: owned color + depth target, bottom-left addressing
//! - [`line`]: Bresenham lines, 2-D overlays and depth-tested 3-D edges
//! - [`scanline`]: Gouraud-shaded, depth-tested triangle fill
//! - [`text`]: glyph compositing
//! - [`SceneRenderer`]: drives the above for a whole [`Scene`]

pub mod line;
pub mod scanline;
pub mod text;

mod renderer;
mod surface;

pub use renderer::{DrawMode, FrameStats, Scene, SceneRenderer};
pub use scanline::{fill_triangle, FillStyle, ShadedVertex};
pub use surface::Surface;
pub use text::{draw_text, BitmapFont, Font, Glyph};
