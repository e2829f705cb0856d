//! Screen geometry and popup placement strategies

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
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

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Translate this rect so it lies inside `bounds` where possible.
    /// A rect larger than `bounds` is pinned to the bounds' top-left corner.
    pub fn clamp_within(self, bounds: Rect) -> Rect {
        let max_x = (bounds.right() - self.width).max(bounds.x);
        let max_y = (bounds.bottom() - self.height).max(bounds.y);
        Rect {
            x: self.x.clamp(bounds.x, max_x),
            y: self.y.clamp(bounds.y, max_y),
            ..self
        }
    }
}

/// Where a settled popup goes on the screen under the pointer
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Placement {
    /// Centered on the screen
    Centered,
    /// Top-left corner at the pointer, kept on screen
    UnderPointer,
    /// Anchored to the top-left corner of the screen
    TopLeft { margin: f32 },
    /// Anchored to the bottom-left corner of the screen (panel menu style)
    BottomLeft { margin: f32 },
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Centered
    }
}

impl Placement {
    /// Final rect for a surface of `size` on `screen`. Pure function of its inputs.
    pub fn place(&self, screen: Rect, pointer: Point, size: Size) -> Rect {
        let origin = match *self {
            Placement::Centered => Point::new(
                screen.x + (screen.width - size.width) / 2.0,
                screen.y + (screen.height - size.height) / 2.0,
            ),
            Placement::UnderPointer => pointer,
            Placement::TopLeft { margin } => Point::new(screen.x + margin, screen.y + margin),
            Placement::BottomLeft { margin } => Point::new(
                screen.x + margin,
                screen.bottom() - size.height - margin,
            ),
        };
        Rect::from_origin_size(origin, size).clamp_within(screen)
    }
}
