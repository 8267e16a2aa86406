//! Closed shape family and the free functions that give each variant its geometry.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use anyhow::Result;
use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::math::{Transform, Vector2f};
use crate::render::{Color, RenderTarget};

/// Segments used to approximate a full ellipse.
pub const OVAL_SEGMENTS: usize = 32;
/// Segments per rounded corner.
pub const CORNER_SEGMENTS: usize = 4;
/// Corner arc used when a round rectangle is created without one.
pub const DEFAULT_ARC: f32 = 15.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Rectangle,
    Oval,
    RoundRectangle,
    Line,
    Triangle,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rectangle(Transform),
    Oval(Transform),
    RoundRectangle { transform: Transform, arc: f32 },
    /// From the transform's top-left to its bottom-right corner.
    Line(Transform),
    Triangle([Vector2f; 3]),
}

impl Shape {
    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rectangle(_) => ShapeKind::Rectangle,
            Shape::Oval(_) => ShapeKind::Oval,
            Shape::RoundRectangle { .. } => ShapeKind::RoundRectangle,
            Shape::Line(_) => ShapeKind::Line,
            Shape::Triangle(_) => ShapeKind::Triangle,
        }
    }
}

/// Build a shape of `kind` filling `transform`.
///
/// A triangle gets its corners at bottom-left, top-centre and bottom-right.
/// `arc` only applies to round rectangles and defaults to [`DEFAULT_ARC`].
pub fn create_shape(kind: ShapeKind, transform: Transform, arc: Option<f32>) -> Shape {
    match kind {
        ShapeKind::Rectangle => Shape::Rectangle(transform),
        ShapeKind::Oval => Shape::Oval(transform),
        ShapeKind::RoundRectangle => Shape::RoundRectangle {
            transform,
            arc: arc.unwrap_or(DEFAULT_ARC),
        },
        ShapeKind::Line => Shape::Line(transform),
        ShapeKind::Triangle => {
            let centre = transform.centre();
            Shape::Triangle([
                Vector2f::new(transform.x(), transform.max_y()),
                Vector2f::new(centre.x, transform.y()),
                Vector2f::new(transform.max_x(), transform.max_y()),
            ])
        }
    }
}

/// Axis-aligned bounds of a shape.
pub fn bounds(shape: &Shape) -> Transform {
    match shape {
        Shape::Rectangle(t) | Shape::Oval(t) | Shape::Line(t) => *t,
        Shape::RoundRectangle { transform, .. } => *transform,
        Shape::Triangle(points) => {
            let min = points[0].component_min(points[1]).component_min(points[2]);
            let max = points[0].component_max(points[1]).component_max(points[2]);
            Transform::new(min.x, min.y, max.x - min.x, max.y - min.y)
        }
    }
}

/// Polygon approximation of the shape's outline.
pub fn outline(shape: &Shape) -> Vec<Vector2f> {
    match shape {
        Shape::Rectangle(t) => rectangle_points(t),
        Shape::Oval(t) => oval_points(t, OVAL_SEGMENTS),
        Shape::RoundRectangle { transform, arc } => round_rectangle_points(transform, *arc),
        Shape::Line(t) => vec![t.position, Vector2f::new(t.max_x(), t.max_y())],
        Shape::Triangle(points) => points.to_vec(),
    }
}

/// Same shape moved by `delta`.
pub fn translated(shape: &Shape, delta: Vector2f) -> Shape {
    let shift = |t: &Transform| Transform::from_parts(t.position + delta, t.dimensions);
    match shape {
        Shape::Rectangle(t) => Shape::Rectangle(shift(t)),
        Shape::Oval(t) => Shape::Oval(shift(t)),
        Shape::RoundRectangle { transform, arc } => Shape::RoundRectangle {
            transform: shift(transform),
            arc: *arc,
        },
        Shape::Line(t) => Shape::Line(shift(t)),
        Shape::Triangle(points) => Shape::Triangle(points.map(|p| p + delta)),
    }
}

pub fn draw_shape(target: &mut dyn RenderTarget, shape: &Shape, filled: bool, color: Color) -> Result<()> {
    if let Shape::Line(t) = shape {
        return target.draw_line(t.position, Vector2f::new(t.max_x(), t.max_y()), color);
    }

    let points = outline(shape);
    if filled {
        target.fill_polygon(&points, color)
    } else {
        target.outline_polygon(&points, color)
    }
}

fn rectangle_points(t: &Transform) -> Vec<Vector2f> {
    vec![
        t.position,
        Vector2f::new(t.max_x(), t.y()),
        Vector2f::new(t.max_x(), t.max_y()),
        Vector2f::new(t.x(), t.max_y()),
    ]
}

fn oval_points(t: &Transform, segments: usize) -> Vec<Vector2f> {
    let centre = t.centre().to_glam();
    let radii = Vec2::new(t.width() / 2.0, t.height() / 2.0);

    (0..segments)
        .map(|i| {
            let angle = TAU * i as f32 / segments as f32;
            Vector2f::from(centre + Vec2::from_angle(angle) * radii)
        })
        .collect()
}

fn round_rectangle_points(t: &Transform, arc: f32) -> Vec<Vector2f> {
    let radius = (arc / 2.0).min(t.width() / 2.0).min(t.height() / 2.0).max(0.0);
    if radius == 0.0 {
        return rectangle_points(t);
    }

    // corner centres clockwise from top-left, with the angle each quarter arc starts at
    let corners = [
        (Vec2::new(t.x() + radius, t.y() + radius), PI),
        (Vec2::new(t.max_x() - radius, t.y() + radius), PI + FRAC_PI_2),
        (Vec2::new(t.max_x() - radius, t.max_y() - radius), 0.0),
        (Vec2::new(t.x() + radius, t.max_y() - radius), FRAC_PI_2),
    ];

    let mut points = Vec::with_capacity(corners.len() * (CORNER_SEGMENTS + 1));
    for (centre, start) in corners {
        for step in 0..=CORNER_SEGMENTS {
            let angle = start + FRAC_PI_2 * step as f32 / CORNER_SEGMENTS as f32;
            points.push(Vector2f::from(centre + Vec2::from_angle(angle) * radius));
        }
    }
    points
}
