//! Screen-space UI elements. They tick after the scene's objects and draw on top of them.

use std::any::Any;
use std::rc::Rc;

use anyhow::Result;

use crate::component::{Component, ComponentParent};
use crate::components::TextRenderComponent;
use crate::math::{Transform, Vector2f};
use crate::render::{RenderTarget, TextMeasure};

pub const TEXT_BOX_RENDERER_NAME: &str = "text-renderer";
/// Characters revealed per tick by default.
pub const DEFAULT_TYPEWRITER_SPEED: f32 = 0.075;

/// An element owned by a [`World`](crate::world::World)'s UI layer.
pub trait UiElement: Any {
    fn transform(&self) -> &Transform;

    fn on_fixed_tick(&mut self) {}

    fn draw(&mut self, target: &mut dyn RenderTarget) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Text that types itself out, a fraction of a character per tick.
///
/// The wrapped text sits inside the box, shifted by `offset` and wrapped at
/// `width - offset.x`.
pub struct TextBox {
    parent: ComponentParent,
    text: String,
    renderer: TextRenderComponent,
    cursor: f32,
    speed: f32,
}

impl TextBox {
    pub fn new(text: impl Into<String>, transform: Transform, offset: Vector2f) -> Self {
        let renderer = TextRenderComponent::new(TEXT_BOX_RENDERER_NAME, transform.width() - offset.x, offset);
        let mut text_box = Self {
            parent: ComponentParent::new("text-box", transform),
            text: String::new(),
            renderer,
            cursor: 1.0,
            speed: DEFAULT_TYPEWRITER_SPEED,
        };
        text_box.set_text(text);
        text_box
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn with_font(mut self, font: Rc<dyn TextMeasure>) -> Self {
        self.renderer.set_font(font);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text and start typing it from the beginning.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.start();
    }

    /// Restart the typewriter.
    pub fn start(&mut self) {
        self.cursor = 1.0;
        self.renderer.set_text(String::new());
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    /// The part of the text revealed so far.
    pub fn visible_text(&self) -> &str {
        self.renderer.text()
    }

    pub fn is_finished(&self) -> bool {
        self.renderer.text().len() == self.text.len()
    }

    pub fn renderer(&self) -> &TextRenderComponent {
        &self.renderer
    }
}

impl UiElement for TextBox {
    fn transform(&self) -> &Transform {
        self.parent.transform()
    }

    fn on_fixed_tick(&mut self) {
        let total = self.text.chars().count();
        let shown = self.renderer.text().chars().count();
        if shown < total {
            let reveal = (self.cursor.round().max(0.0) as usize).min(total);
            if reveal != shown {
                let end = self.text.char_indices().nth(reveal).map_or(self.text.len(), |(i, _)| i);
                self.renderer.set_text(&self.text[..end]);
            }
        }
        self.cursor += self.speed;
    }

    fn draw(&mut self, target: &mut dyn RenderTarget) -> Result<()> {
        self.renderer.draw(&self.parent, target)
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
    use crate::render::DrawList;

    #[test]
    fn reveals_text_progressively() {
        let mut text_box = TextBox::new("hello", Transform::new(0.0, 0.0, 200.0, 50.0), Vector2f::new(4.0, 4.0))
            .with_speed(1.0);
        assert_eq!(text_box.visible_text(), "");

        text_box.on_fixed_tick();
        assert_eq!(text_box.visible_text(), "h");
        text_box.on_fixed_tick();
        assert_eq!(text_box.visible_text(), "he");

        for _ in 0..10 {
            text_box.on_fixed_tick();
        }
        assert_eq!(text_box.visible_text(), "hello");
        assert!(text_box.is_finished());
    }

    #[test]
    fn set_text_restarts() {
        let mut text_box = TextBox::new("abc", Transform::new(0.0, 0.0, 100.0, 20.0), Vector2f::ZERO).with_speed(1.0);
        for _ in 0..5 {
            text_box.on_fixed_tick();
        }
        text_box.set_text("xyz");
        text_box.on_fixed_tick();
        assert_eq!(text_box.visible_text(), "x");
    }

    #[test]
    fn line_length_accounts_for_offset() {
        let text_box = TextBox::new("", Transform::new(0.0, 0.0, 120.0, 20.0), Vector2f::new(20.0, 0.0));
        assert_eq!(text_box.renderer().line_length(), 100.0);
    }

    #[test]
    fn draws_inside_the_box() {
        let mut text_box = TextBox::new("hi", Transform::new(50.0, 60.0, 100.0, 20.0), Vector2f::new(5.0, 5.0)).with_speed(2.0);
        text_box.on_fixed_tick();
        text_box.on_fixed_tick();

        let mut target = DrawList::new();
        text_box.draw(&mut target).unwrap();
        assert_eq!(target.texts(), vec!["hi"]);
    }
}
