use anyhow::Result;
use serde::Serialize;

use super::{Color, RenderTarget};
use crate::math::Vector2f;

/// A recorded draw call.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DrawCommand {
    Text {
        text: String,
        position: Vector2f,
        color: Color,
    },
    FillPolygon {
        points: Vec<Vector2f>,
        color: Color,
    },
    OutlinePolygon {
        points: Vec<Vector2f>,
        color: Color,
    },
    Line {
        from: Vector2f,
        to: Vector2f,
        color: Color,
    },
}

/// Render target that records every call instead of rasterizing it.
///
/// Useful for headless runs and for backends that batch a whole frame before
/// submitting it.
#[derive(Debug, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all recorded commands, keeping the allocation.
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text of every `Text` command, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Serialize the recorded frame, e.g. for golden-file comparisons.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.commands)?)
    }
}

impl RenderTarget for DrawList {
    fn draw_text(&mut self, text: &str, position: Vector2f, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            position,
            color,
        });
        Ok(())
    }

    fn fill_polygon(&mut self, points: &[Vector2f], color: Color) -> Result<()> {
        self.commands.push(DrawCommand::FillPolygon {
            points: points.to_vec(),
            color,
        });
        Ok(())
    }

    fn outline_polygon(&mut self, points: &[Vector2f], color: Color) -> Result<()> {
        self.commands.push(DrawCommand::OutlinePolygon {
            points: points.to_vec(),
            color,
        });
        Ok(())
    }

    fn draw_line(&mut self, from: Vector2f, to: Vector2f, color: Color) -> Result<()> {
        self.commands.push(DrawCommand::Line { from, to, color });
        Ok(())
    }
}
