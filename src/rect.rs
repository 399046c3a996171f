//! Rectangles.

use cgmath::{Point2, Vector2};

/// An integer rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Rectangle origin (top left corner).
    pub origin: Point2<i32>,

    /// Rectangle size.
    pub size: Vector2<i32>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<i32>, size: Vector2<i32>) -> Rect {
        Rect { origin, size }
    }

    /// Creates a new rectangle from its components.
    pub fn from_xywh(x: i32, y: i32, width: i32, height: i32) -> Rect {
        Rect {
            origin: Point2::new(x, y),
            size: Vector2::new(width, height),
        }
    }

    /// Returns a zero-sized rectangle at the origin.
    pub fn zero() -> Rect {
        Rect::from_xywh(0, 0, 0, 0)
    }

    pub fn width(&self) -> i32 {
        self.size.x
    }

    pub fn height(&self) -> i32 {
        self.size.y
    }

    /// Returns true if the point is inside the rectangle.
    ///
    /// The right and bottom edges are exclusive.
    pub fn contains(&self, point: Point2<i32>) -> bool {
        point.x >= self.origin.x
            && point.y >= self.origin.y
            && point.x < self.origin.x + self.size.x
            && point.y < self.origin.y + self.size.y
    }
}

/// Componentwise maximum of two sizes.
pub fn max_size(a: Vector2<i32>, b: Vector2<i32>) -> Vector2<i32> {
    Vector2::new(a.x.max(b.x), a.y.max(b.y))
}

/// Converts a point to the offset vector from the origin.
pub fn to_vec(point: Point2<i32>) -> Vector2<i32> {
    Vector2::new(point.x, point.y)
}

#[test]
fn test_rect_contains_excludes_far_edges() {
    let rect = Rect::from_xywh(10, 20, 30, 40);
    assert!(rect.contains(Point2::new(10, 20)));
    assert!(rect.contains(Point2::new(39, 59)));
    assert!(!rect.contains(Point2::new(40, 20)), "right edge is exclusive");
    assert!(!rect.contains(Point2::new(10, 60)), "bottom edge is exclusive");
    assert!(!rect.contains(Point2::new(9, 25)));
}
