use std::any::Any;
use std::rc::Rc;

use anyhow::Result;

use crate::component::{Component, ComponentHeader, ComponentKind, ComponentParent, Phases};
use crate::math::Vector2f;
use crate::render::{Color, MonospaceFont, RenderTarget, TextMeasure, BLACK};

/// Line spacing as a multiple of the font size.
pub const LEADING_FACTOR: f32 = 1.3;

/// Draws word-wrapped text at the parent's position plus an offset.
///
/// Wrapping is recomputed lazily on the next draw after the text, font or
/// line length changes.
pub struct TextRenderComponent {
    header: ComponentHeader,
    font: Rc<dyn TextMeasure>,
    leading: f32,
    text: String,
    lines: Vec<String>,
    recalculate: bool,
    word_separator: String,
    offset: Vector2f,
    line_length: f32,
    color: Color,
}

impl TextRenderComponent {
    pub fn new(name: impl Into<String>, line_length: f32, offset: Vector2f) -> Self {
        let font: Rc<dyn TextMeasure> = Rc::new(MonospaceFont::default());
        Self {
            header: ComponentHeader::new(name, ComponentKind::Render),
            leading: font.size() * LEADING_FACTOR,
            font,
            text: String::new(),
            lines: Vec::new(),
            recalculate: true,
            word_separator: " ".into(),
            offset,
            line_length,
            color: BLACK,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.recalculate = true;
    }

    pub fn set_font(&mut self, font: Rc<dyn TextMeasure>) {
        self.leading = font.size() * LEADING_FACTOR;
        self.font = font;
        self.recalculate = true;
    }

    pub fn leading(&self) -> f32 {
        self.leading
    }

    pub fn word_separator(&self) -> &str {
        &self.word_separator
    }

    pub fn set_word_separator(&mut self, separator: impl Into<String>) {
        self.word_separator = separator.into();
        self.recalculate = true;
    }

    pub fn offset(&self) -> Vector2f {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Vector2f) {
        self.offset = offset;
    }

    pub fn line_length(&self) -> f32 {
        self.line_length
    }

    pub fn set_line_length(&mut self, line_length: f32) {
        self.line_length = line_length;
        self.recalculate = true;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    /// Lines produced by the last layout.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

/// Greedy word wrap: a word moves to the next line when it would cross `line_length`.
///
/// A single word wider than the line gets a line of its own.
pub fn wrap_text(text: &str, separator: &str, line_length: f32, font: &dyn TextMeasure) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut current_x = 0.0;

    let words: Vec<&str> = if separator.is_empty() {
        vec![text]
    } else {
        text.split(separator).collect()
    };

    for word in words {
        let length = font.text_width(word) + font.text_width(separator);

        if line.is_empty() || current_x + length <= line_length {
            if !line.is_empty() {
                line.push_str(separator);
            }
            line.push_str(word);
            current_x += length;
        } else {
            lines.push(std::mem::take(&mut line));
            line.push_str(word);
            current_x = length;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

impl Component for TextRenderComponent {
    fn header(&self) -> &ComponentHeader {
        &self.header
    }

    fn header_mut(&mut self) -> &mut ComponentHeader {
        &mut self.header
    }

    fn phases(&self) -> Phases {
        Phases::DRAW
    }

    fn draw(&mut self, parent: &ComponentParent, target: &mut dyn RenderTarget) -> Result<()> {
        if self.recalculate {
            self.lines = wrap_text(&self.text, &self.word_separator, self.line_length, self.font.as_ref());
            self.recalculate = false;
        }

        let origin = parent.position() + self.offset;
        let mut current_y = 0.0;
        for line in &self.lines {
            target.draw_text(line, Vector2f::new(origin.x, origin.y + current_y), self.color)?;
            current_y += self.leading;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Transform;
    use crate::render::{DrawCommand, DrawList};

    fn unit_font() -> MonospaceFont {
        MonospaceFont::new(10.0).with_advance_ratio(1.0)
    }

    #[test]
    fn wraps_at_line_length() {
        // every word costs (chars + 1) * 10
        let lines = wrap_text("aa bb cc dd", " ", 60.0, &unit_font());
        assert_eq!(lines, vec!["aa bb", "cc dd"]);
    }

    #[test]
    fn long_word_gets_its_own_line() {
        let lines = wrap_text("a enormous b", " ", 30.0, &unit_font());
        assert_eq!(lines, vec!["a", "enormous", "b"]);
    }

    #[test]
    fn empty_text_has_no_lines() {
        assert!(wrap_text("", " ", 100.0, &unit_font()).is_empty());
    }

    #[test]
    fn draws_lines_relative_to_parent() {
        let mut text = TextRenderComponent::new("label", 60.0, Vector2f::new(2.0, 3.0));
        text.set_font(Rc::new(unit_font()));
        text.set_text("aa bb cc dd");

        let parent = ComponentParent::new("box", Transform::new(100.0, 200.0, 80.0, 40.0));
        let mut target = DrawList::new();
        text.draw(&parent, &mut target).unwrap();

        assert_eq!(target.texts(), vec!["aa bb", "cc dd"]);
        match &target.commands()[1] {
            DrawCommand::Text { position, .. } => {
                assert_eq!(position.x, 102.0);
                assert!((position.y - 216.0).abs() < 1e-3);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
