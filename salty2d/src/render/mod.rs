mod draw_list;
mod text;

use anyhow::Result;

use crate::math::Vector2f;

pub use draw_list::{DrawCommand, DrawList};
pub use text::{GlyphFont, MonospaceFont, TextMeasure};

/// RGBA color, each channel in `0.0..=1.0`.
pub type Color = [f32; 4];

pub const WHITE: Color = [1.0, 1.0, 1.0, 1.0];
pub const BLACK: Color = [0.0, 0.0, 0.0, 1.0];

/// Sink for the draw calls components issue during the render pass.
///
/// Backends (a window surface, an image, a recording list) implement this;
/// the core never depends on how primitives end up on screen.
pub trait RenderTarget {
    /// Draw a single line of text with its top-left corner at `position`.
    fn draw_text(&mut self, text: &str, position: Vector2f, color: Color) -> Result<()>;

    fn fill_polygon(&mut self, points: &[Vector2f], color: Color) -> Result<()>;

    fn outline_polygon(&mut self, points: &[Vector2f], color: Color) -> Result<()>;

    fn draw_line(&mut self, from: Vector2f, to: Vector2f, color: Color) -> Result<()>;
}
