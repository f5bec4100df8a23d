//! Screen-space geometry primitives.
//!
//! Everything is expressed in signed integer pixels so windows may sit
//! partially offscreen (tucked floats do), mirroring the signed-origin
//! `FloatRect` used for floating panes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, delta: Vector2d) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
        }
    }

    pub fn delta_from(self, other: Point) -> Vector2d {
        Vector2d {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Vector2d {
    pub x: i32,
    pub y: i32,
}

impl Vector2d {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn length_squared(self) -> i64 {
        let x = self.x as i64;
        let y = self.y as i64;
        x * x + y * y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Axis-aligned rectangle with a signed origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn top_right(&self) -> Point {
        Point::new(self.right(), self.y)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.right(), self.bottom())
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        !self.is_empty()
            && point.x >= self.x
            && point.x < self.right()
            && point.y >= self.y
            && point.y < self.bottom()
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn intersection(&self, other: &Rect) -> Rect {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= x || bottom <= y {
            return Rect::default();
        }
        Rect::new(x, y, right - x, bottom - y)
    }

    /// Shrinks the rectangle by `inset` on every side. Never produces a
    /// negative size.
    pub fn inset(&self, inset: i32) -> Rect {
        Rect::new(
            self.x + inset,
            self.y + inset,
            (self.width - 2 * inset).max(0),
            (self.height - 2 * inset).max(0),
        )
    }

    pub fn offset(&self, delta: Vector2d) -> Rect {
        Rect::new(self.x + delta.x, self.y + delta.y, self.width, self.height)
    }

    pub fn with_origin(&self, origin: Point) -> Rect {
        Rect::new(origin.x, origin.y, self.width, self.height)
    }

    /// Shrinks to fit inside `bounds` and then moves inside it.
    pub fn adjust_to_fit(&self, bounds: &Rect) -> Rect {
        let width = self.width.min(bounds.width);
        let height = self.height.min(bounds.height);
        let x = self.x.clamp(bounds.x, bounds.right() - width);
        let y = self.y.clamp(bounds.y, bounds.bottom() - height);
        Rect::new(x, y, width, height)
    }

    /// Clamps a point into the rectangle (inclusive of the far edge).
    pub fn clamp_point(&self, point: Point) -> Point {
        Point::new(
            point.x.clamp(self.x, self.right().max(self.x)),
            point.y.clamp(self.y, self.bottom().max(self.y)),
        )
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    pub fn is_landscape(self) -> bool {
        matches!(self, Orientation::Landscape)
    }

    pub fn of(rect: &Rect) -> Self {
        if rect.width >= rect.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

/// Scale-then-translate transform applied on top of a window's bounds.
///
/// The visual rectangle of a window with bounds `b` is
/// `(b.x + translate_x, b.y + translate_y, b.width * scale_x, b.height * scale_y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
    };

    pub fn translation(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    /// Uniform scale about the center of `bounds`.
    pub fn scale_about_center(bounds: &Rect, scale: f64) -> Self {
        let dw = bounds.width as f64 * (scale - 1.0);
        let dh = bounds.height as f64 * (scale - 1.0);
        Self {
            translate_x: -dw / 2.0,
            translate_y: -dh / 2.0,
            scale_x: scale,
            scale_y: scale,
        }
    }

    /// Transform that makes a window with bounds `from` look like `to`.
    pub fn between(from: &Rect, to: &Rect) -> Self {
        let scale_x = if from.width == 0 {
            1.0
        } else {
            to.width as f64 / from.width as f64
        };
        let scale_y = if from.height == 0 {
            1.0
        } else {
            to.height as f64 / from.height as f64
        };
        Self {
            translate_x: (to.x - from.x) as f64,
            translate_y: (to.y - from.y) as f64,
            scale_x,
            scale_y,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, bounds: &Rect) -> Rect {
        Rect::new(
            (bounds.x as f64 + self.translate_x).round() as i32,
            (bounds.y as f64 + self.translate_y).round() as i32,
            (bounds.width as f64 * self.scale_x).round() as i32,
            (bounds.height as f64 * self.scale_y).round() as i32,
        )
    }

    pub fn lerp(from: &Transform, to: &Transform, t: f64) -> Transform {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Transform {
            translate_x: mix(from.translate_x, to.translate_x),
            translate_y: mix(from.translate_y, to.translate_y),
            scale_x: mix(from.scale_x, to.scale_x),
            scale_y: mix(from.scale_y, to.scale_y),
        }
    }
}
