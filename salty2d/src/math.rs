use glam::Vec2 as GlamVec2;
use serde::{Deserialize, Serialize};

/// 2D vector type used throughout Salty2D.
///
/// Unlike most vector types the named arithmetic methods mutate in place and
/// return `&mut Self`, so calls can be chained:
///
/// ```
/// use salty2d::Vector2f;
///
/// let mut v = Vector2f::new(1.0, 2.0);
/// v.add(3.0, 4.0).multiply(2.0, 2.0);
/// assert_eq!(v, Vector2f::new(8.0, 12.0));
/// ```
///
/// The by-value operators (`+`, `-`, `*`, `/`) are available as well and leave
/// their operands untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector2f {
    pub x: f32,
    pub y: f32,
}

impl Vector2f {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn zero() -> Self {
        Self::ZERO
    }

    pub const fn one() -> Self {
        Self::ONE
    }

    /// Both components set to `f32::MAX`.
    pub const fn max() -> Self {
        Self::new(f32::MAX, f32::MAX)
    }

    /// Both components set to the smallest positive (subnormal) `f32`.
    pub fn min() -> Self {
        let smallest = f32::from_bits(1);
        Self::new(smallest, smallest)
    }

    /// A vector whose components are random whole numbers in `min..max`.
    ///
    /// Panics if `min >= max`, like `fastrand::i32` does for empty ranges.
    pub fn random(min: i32, max: i32) -> Self {
        Self::new(fastrand::i32(min..max) as f32, fastrand::i32(min..max) as f32)
    }

    pub fn add(&mut self, x: f32, y: f32) -> &mut Self {
        self.x += x;
        self.y += y;
        self
    }

    pub fn add_vec(&mut self, other: Vector2f) -> &mut Self {
        self.add(other.x, other.y)
    }

    pub fn subtract(&mut self, x: f32, y: f32) -> &mut Self {
        self.x -= x;
        self.y -= y;
        self
    }

    pub fn subtract_vec(&mut self, other: Vector2f) -> &mut Self {
        self.subtract(other.x, other.y)
    }

    pub fn multiply(&mut self, x: f32, y: f32) -> &mut Self {
        self.x *= x;
        self.y *= y;
        self
    }

    pub fn multiply_vec(&mut self, other: Vector2f) -> &mut Self {
        self.multiply(other.x, other.y)
    }

    /// Component-wise division. Dividing by zero yields infinities; nothing
    /// here guards against that.
    pub fn divide(&mut self, x: f32, y: f32) -> &mut Self {
        self.x /= x;
        self.y /= y;
        self
    }

    pub fn divide_vec(&mut self, other: Vector2f) -> &mut Self {
        self.divide(other.x, other.y)
    }

    pub fn length(&self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Computes the distance between two points.
    pub fn distance(self, rhs: Self) -> f32 {
        (rhs.x - self.x).abs().hypot((rhs.y - self.y).abs())
    }

    /// Returns a vector with component-wise minimum values.
    pub fn component_min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y))
    }

    /// Returns a vector with component-wise maximum values.
    pub fn component_max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y))
    }

    pub fn to_glam(self) -> GlamVec2 {
        GlamVec2::new(self.x, self.y)
    }
}

impl From<(f32, f32)> for Vector2f {
    fn from(value: (f32, f32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<GlamVec2> for Vector2f {
    fn from(value: GlamVec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl std::fmt::Display for Vector2f {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Vector2f{{x={}, y={}}}", self.x, self.y)
    }
}

impl std::ops::Add for Vector2f {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vector2f {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vector2f {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vector2f {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Div<f32> for Vector2f {
    type Output = Self;

    fn div(self, rhs: f32) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl std::ops::Neg for Vector2f {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Width and height of a transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Side of a shape, in screen coordinates (y grows downwards).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Axis-aligned position and size. Position is the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vector2f,
    pub dimensions: Dimensions,
}

impl Transform {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vector2f::new(x, y),
            dimensions: Dimensions::new(width, height),
        }
    }

    pub const fn from_parts(position: Vector2f, dimensions: Dimensions) -> Self {
        Self {
            position,
            dimensions,
        }
    }

    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn width(&self) -> f32 {
        self.dimensions.width
    }

    pub fn height(&self) -> f32 {
        self.dimensions.height
    }

    pub fn max_x(&self) -> f32 {
        self.position.x + self.dimensions.width
    }

    pub fn max_y(&self) -> f32 {
        self.position.y + self.dimensions.height
    }

    pub fn centre(&self) -> Vector2f {
        Vector2f::new(
            self.position.x + self.dimensions.width / 2.0,
            self.position.y + self.dimensions.height / 2.0,
        )
    }

    /// Moves the transform so that its centre lands on `centre`.
    pub fn set_centre(&mut self, centre: Vector2f) {
        self.position = Vector2f::new(
            centre.x - self.dimensions.width / 2.0,
            centre.y - self.dimensions.height / 2.0,
        );
    }

    pub fn contains(&self, point: Vector2f) -> bool {
        point.x >= self.position.x
            && point.x <= self.max_x()
            && point.y >= self.position.y
            && point.y <= self.max_y()
    }

    /// Strict overlap test: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Transform) -> bool {
        self.position.x < other.max_x()
            && other.position.x < self.max_x()
            && self.position.y < other.max_y()
            && other.position.y < self.max_y()
    }

    /// On which side of `self` the `other` transform lies.
    ///
    /// The axis with the shallower overlap wins; ties go to the vertical axis.
    /// Returns `None` only when both centres coincide. The result is
    /// antisymmetric: `a.relation(&b) == b.relation(&a).map(Direction::opposite)`.
    pub fn relation(&self, other: &Transform) -> Option<Direction> {
        let own = self.centre();
        let theirs = other.centre();
        let dx = theirs.x - own.x;
        let dy = theirs.y - own.y;

        let overlap_x = (self.width() + other.width()) / 2.0 - dx.abs();
        let overlap_y = (self.height() + other.height()) / 2.0 - dy.abs();

        let horizontal = || {
            if dx > 0.0 {
                Some(Direction::Right)
            } else if dx < 0.0 {
                Some(Direction::Left)
            } else {
                None
            }
        };
        let vertical = || {
            if dy > 0.0 {
                Some(Direction::Down)
            } else if dy < 0.0 {
                Some(Direction::Up)
            } else {
                None
            }
        };

        if overlap_x < overlap_y {
            horizontal().or_else(vertical)
        } else {
            vertical().or_else(horizontal)
        }
    }
}
