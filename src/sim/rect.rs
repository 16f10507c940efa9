//! Axis-aligned rectangle geometry for sprites and hit tests
//!
//! The whole simulation is written against screen-space rects:
//! top-left origin, +y down, with edge accessors and exact edge clamping.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A screen-space axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn from_center(center: Vec2, w: f32, h: f32) -> Self {
        Self {
            pos: center - Vec2::new(w / 2.0, h / 2.0),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Move the left edge to `x` without changing the size
    pub fn set_left(&mut self, x: f32) {
        self.pos.x = x;
    }

    /// Move the right edge to `x` without changing the size
    pub fn set_right(&mut self, x: f32) {
        self.pos.x = x - self.size.x;
    }

    pub fn set_top(&mut self, y: f32) {
        self.pos.y = y;
    }

    pub fn set_bottom(&mut self, y: f32) {
        self.pos.y = y - self.size.y;
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.pos += delta;
    }

    /// Overlap test with exclusive edges (touching rects do not intersect)
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_center() {
        let rect = Rect::new(10.0, 20.0, 40.0, 32.0);
        assert_eq!(rect.left(), 10.0);
        assert_eq!(rect.right(), 50.0);
        assert_eq!(rect.top(), 20.0);
        assert_eq!(rect.bottom(), 52.0);
        assert_eq!(rect.center(), Vec2::new(30.0, 36.0));
    }

    #[test]
    fn test_from_center_round_trips() {
        let rect = Rect::from_center(Vec2::new(100.0, 50.0), 20.0, 30.0);
        assert_eq!(rect.center(), Vec2::new(100.0, 50.0));
        assert_eq!(rect.left(), 90.0);
        assert_eq!(rect.top(), 35.0);
    }

    #[test]
    fn test_edge_clamps_are_exact() {
        let mut rect = Rect::new(-7.5, 0.0, 40.0, 32.0);
        rect.set_left(0.0);
        assert_eq!(rect.left(), 0.0);

        rect.set_right(1280.0);
        assert_eq!(rect.right(), 1280.0);
        assert_eq!(rect.left(), 1240.0);
    }

    #[test]
    fn test_intersects_overlap_and_touch() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let c = Rect::new(10.0, 0.0, 10.0, 10.0);
        let d = Rect::new(30.0, 30.0, 5.0, 5.0);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        // Shared edge only is not an overlap
        assert!(!a.intersects(&c));
        assert!(!a.intersects(&d));
    }
}
