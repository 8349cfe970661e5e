//! Axis-aligned rectangle geometry
//!
//! Screen space: x grows right, y grows down. A rect is defined by its
//! left/top/right/bottom edges with left <= right and top <= bottom.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    /// Build a rect from its edges, swapping reversed pairs so the
    /// ordering invariant always holds
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left: left.min(right),
            top: top.min(bottom),
            right: left.max(right),
            bottom: top.max(bottom),
        }
    }

    /// Rect centred on `center` extending `half` in each direction
    #[inline]
    pub fn from_center(center: Vec2, half: Vec2) -> Self {
        let half = half.abs();
        Self {
            left: center.x - half.x,
            top: center.y - half.y,
            right: center.x + half.x,
            bottom: center.y + half.y,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Strict overlap test: rects that only share an edge do not intersect
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }
}
