use std::cell::RefCell;
use std::rc::{Rc, Weak};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::shape::{create_shape, draw_shape, ShapeKind};
use crate::math::{Transform, Vector2f};
use crate::render::{Color, RenderTarget};

/// Brightness a light starts with.
pub const DEFAULT_BRIGHTNESS: f32 = 0.35;
/// Concentric rings used to fake the radial gradient.
pub const GRADIENT_RINGS: usize = 4;

/// Outline of the lit area.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum LightShape {
    Oval,
    Rectangle,
    RoundRectangle { arc: f32 },
}

/// A gradient light covering its transform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub transform: Transform,
    /// Opacity of the brightest ring, `0.0..=1.0`.
    brightness: f32,
    /// How much brighter the centre is than the rim. `1.0` is flat.
    pub intensity: f32,
    pub color: [f32; 3],
    pub shape: LightShape,
}

impl Light {
    pub fn new(transform: Transform, shape: LightShape) -> Self {
        Self {
            transform,
            brightness: DEFAULT_BRIGHTNESS,
            intensity: 1.0,
            color: [1.0, 1.0, 1.0],
            shape,
        }
    }

    /// Round light covering `transform`.
    pub fn point(transform: Transform) -> Self {
        Self::new(transform, LightShape::Oval)
    }

    /// Round light of diameter `radius` with its top-left corner at `position`.
    pub fn point_at(position: Vector2f, radius: f32) -> Self {
        Self::point(Transform::new(position.x, position.y, radius, radius))
    }

    #[must_use]
    pub fn with_brightness(mut self, brightness: f32) -> Self {
        self.set_brightness(brightness);
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    #[must_use]
    pub fn with_intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity.max(1.0);
        self
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Clamped to `0.0..=1.0`.
    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = brightness.clamp(0.0, 1.0);
    }

    /// Draw as concentric rings, inner rings more opaque.
    pub fn draw(&self, target: &mut dyn RenderTarget) -> Result<()> {
        let kind = match self.shape {
            LightShape::Oval => ShapeKind::Oval,
            LightShape::Rectangle => ShapeKind::Rectangle,
            LightShape::RoundRectangle { .. } => ShapeKind::RoundRectangle,
        };
        let arc = match self.shape {
            LightShape::RoundRectangle { arc } => Some(arc),
            _ => None,
        };
        let centre = self.transform.centre();

        for ring in 0..GRADIENT_RINGS {
            let t = ring as f32 / GRADIENT_RINGS as f32;
            let scale = 1.0 - t;
            let mut ring_transform = self.transform;
            ring_transform.dimensions.width *= scale;
            ring_transform.dimensions.height *= scale;
            ring_transform.set_centre(centre);

            let alpha = self.brightness * (1.0 + (self.intensity - 1.0) * t) / GRADIENT_RINGS as f32;
            let color: Color = [self.color[0], self.color[1], self.color[2], alpha.min(1.0)];
            draw_shape(target, &create_shape(kind, ring_transform, arc), true, color)?;
        }

        Ok(())
    }
}

/// A light shared between the component that owns it and the light system.
pub type SharedLight = Rc<RefCell<Light>>;

#[derive(Debug, Default)]
struct LightSystemState {
    lights: Vec<Weak<RefCell<Light>>>,
    ambient: Option<(Transform, Color)>,
}

/// Registry of the lights in a scene.
///
/// Cloning yields another handle to the same registry. The system only keeps
/// weak references: a light disappears once its owner drops it. Drawing
/// iterates a snapshot, so lights added while a frame is drawn show up in the
/// next one.
#[derive(Clone, Debug, Default)]
pub struct LightSystem {
    state: Rc<RefCell<LightSystemState>>,
}

impl LightSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Darken `area` with `color` before the lights are drawn on top.
    #[must_use]
    pub fn with_ambient(self, area: Transform, color: Color) -> Self {
        self.state.borrow_mut().ambient = Some((area, color));
        self
    }

    pub fn add_light(&self, light: &SharedLight) {
        self.state.borrow_mut().lights.push(Rc::downgrade(light));
    }

    /// Live lights at the time of the call, in registration order.
    pub fn lights(&self) -> Vec<SharedLight> {
        let mut state = self.state.borrow_mut();
        state.lights.retain(|weak| weak.strong_count() > 0);
        state.lights.iter().filter_map(Weak::upgrade).collect()
    }

    pub fn len(&self) -> usize {
        self.lights().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) -> Result<()> {
        let ambient = self.state.borrow().ambient;
        if let Some((area, color)) = ambient {
            draw_shape(target, &create_shape(ShapeKind::Rectangle, area, None), true, color)?;
        }

        for light in self.lights() {
            light.borrow().draw(target)?;
        }
        Ok(())
    }
}

/// Where a follower sits relative to the transform it follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelationMode {
    #[default]
    Centre,
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// Place `follower` relative to `anchor` according to `mode`.
///
/// Corner modes line up the matching corners of both transforms.
pub fn position_relative_to(mode: RelationMode, anchor: &Transform, follower: &mut Transform) {
    let w = follower.width();
    let h = follower.height();
    follower.position = match mode {
        RelationMode::Centre => {
            let c = anchor.centre();
            Vector2f::new(c.x - w / 2.0, c.y - h / 2.0)
        }
        RelationMode::TopLeft => anchor.position,
        RelationMode::TopRight => Vector2f::new(anchor.max_x() - w, anchor.y()),
        RelationMode::BottomLeft => Vector2f::new(anchor.x(), anchor.max_y() - h),
        RelationMode::BottomRight => Vector2f::new(anchor.max_x() - w, anchor.max_y() - h),
    };
}
