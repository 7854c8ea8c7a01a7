//! Geometry value types shared by the driver and the revealer.
//!
//! A [`Rect`] is a snapshot of an element's frame taken when the driver is
//! queried; it never updates on its own. A [`Vector`] is a point expressed
//! relative to an element's own frame, where `(0, 0)` is the top-left corner
//! and `(1, 1)` the bottom-right corner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in screen points.
///
/// The origin is the top-left corner, `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// The x-coordinate of the top-left corner.
    pub x: f64,
    /// The y-coordinate of the top-left corner.
    pub y: f64,
    /// The width in points.
    pub width: f64,
    /// The height in points.
    pub height: f64,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Creates a rectangle from its edges.
    ///
    /// Inverted edges produce a zero-sized rectangle anchored at the min edge.
    pub fn from_edges(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self::new(
            min_x,
            min_y,
            (max_x - min_x).max(0.0),
            (max_y - min_y).max(0.0),
        )
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Returns true if `other` lies entirely within this rectangle.
    ///
    /// Edges are inclusive, so a rectangle contains itself.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.min_x() >= self.min_x()
            && other.min_y() >= self.min_y()
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Cuts `distance` points off the bottom edge and returns what remains.
    ///
    /// `distance` is clamped to `[0, height]`.
    pub fn divided_from_max_y(&self, distance: f64) -> Rect {
        let cut = distance.clamp(0.0, self.height);
        Rect::new(self.x, self.y, self.width, self.height - cut)
    }

    /// Returns a copy moved vertically by `dy` points.
    pub fn offset_y(&self, dy: f64) -> Rect {
        Rect::new(self.x, self.y + dy, self.width, self.height)
    }

    /// Compares two frames component-wise.
    ///
    /// A `tolerance` that is zero, negative or not finite means exact equality.
    pub fn approx_eq(&self, other: &Rect, tolerance: f64) -> bool {
        if !(tolerance.is_finite() && tolerance > 0.0) {
            return self == other;
        }
        (self.x - other.x).abs() <= tolerance
            && (self.y - other.y).abs() <= tolerance
            && (self.width - other.width).abs() <= tolerance
            && (self.height - other.height).abs() <= tolerance
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// A point normalized to an element's frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
}

impl Vector {
    /// The top-left corner of an element.
    pub const ZERO: Vector = Vector { dx: 0.0, dy: 0.0 };

    /// The center of an element.
    pub const CENTER: Vector = Vector { dx: 0.5, dy: 0.5 };

    pub const fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    /// Maps this normalized offset to absolute coordinates within `frame`.
    ///
    /// Components outside `[0, 1]` are mapped linearly and land outside the frame.
    pub fn point_in(&self, frame: &Rect) -> (f64, f64) {
        (
            frame.x + self.dx * frame.width,
            frame.y + self.dy * frame.height,
        )
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.dx, self.dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_derive_from_origin_and_size() {
        let r = Rect::new(10.0, 20.0, 100.0, 44.0);
        assert_eq!(r.min_x(), 10.0);
        assert_eq!(r.min_y(), 20.0);
        assert_eq!(r.max_x(), 110.0);
        assert_eq!(r.max_y(), 64.0);
    }

    #[test]
    fn from_edges_clamps_inverted_input() {
        let r = Rect::from_edges(0.0, 150.0, 100.0, 250.0);
        assert_eq!(r, Rect::new(0.0, 150.0, 100.0, 100.0));

        let inverted = Rect::from_edges(10.0, 10.0, 5.0, 5.0);
        assert_eq!(inverted.width, 0.0);
        assert_eq!(inverted.height, 0.0);
    }

    #[test]
    fn contains_rect_is_inclusive() {
        let region = Rect::new(0.0, 0.0, 100.0, 150.0);
        assert!(region.contains_rect(&region));
        assert!(region.contains_rect(&Rect::new(0.0, 40.0, 100.0, 40.0)));
        assert!(!region.contains_rect(&Rect::new(0.0, 130.0, 100.0, 40.0)));
        assert!(!region.contains_rect(&Rect::new(-1.0, 10.0, 10.0, 10.0)));
    }

    #[test]
    fn divided_from_max_y_removes_bottom_slice() {
        let frame = Rect::new(0.0, 0.0, 100.0, 200.0);
        assert_eq!(frame.divided_from_max_y(50.0), Rect::new(0.0, 0.0, 100.0, 150.0));
        assert_eq!(frame.divided_from_max_y(0.0), frame);
        assert_eq!(frame.divided_from_max_y(-5.0), frame);
        assert_eq!(frame.divided_from_max_y(500.0).height, 0.0);
    }

    #[test]
    fn approx_eq_zero_tolerance_is_exact() {
        let a = Rect::new(0.0, 40.0, 100.0, 40.0);
        let b = Rect::new(0.0, 40.25, 100.0, 40.0);
        assert!(a.approx_eq(&a, 0.0));
        assert!(!a.approx_eq(&b, 0.0));
        assert!(a.approx_eq(&b, 0.5));
        assert!(!a.approx_eq(&b, 0.1));
    }

    #[test]
    fn approx_eq_non_finite_tolerance_is_exact() {
        let a = Rect::new(0.0, 40.0, 100.0, 40.0);
        let b = Rect::new(0.0, 40.25, 100.0, 40.0);
        assert!(a.approx_eq(&a, f64::NAN));
        assert!(!a.approx_eq(&b, f64::NAN));
        assert!(!a.approx_eq(&b, f64::INFINITY));
        assert!(!a.approx_eq(&b, -1.0));
    }

    #[test]
    fn vector_maps_into_frame() {
        let frame = Rect::new(10.0, 20.0, 100.0, 200.0);
        assert_eq!(Vector::CENTER.point_in(&frame), (60.0, 120.0));
        assert_eq!(Vector::ZERO.point_in(&frame), (10.0, 20.0));
        assert_eq!(Vector::new(0.5, 1.5).point_in(&frame), (60.0, 320.0));
    }

    #[test]
    fn rect_serializes_with_frame_field_names() {
        let json = serde_json::to_value(Rect::new(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert_eq!(json["x"], 1.0);
        assert_eq!(json["height"], 4.0);
    }
}
