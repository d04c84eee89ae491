//! Collision geometry for axis-aligned boxes and circles
//!
//! Everything in the playfield is either a box (paddle, bricks, the ball's
//! bounding box) or the ball's circle. Y grows downward.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Square of side `2 * radius` centered on `center`
    pub fn around_circle(center: Vec2, radius: f32) -> Self {
        Self::new(center.x - radius, center.y - radius, radius * 2.0, radius * 2.0)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Strict overlap test: rectangles that only share an edge do not collide
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// Point on (or inside) the rectangle closest to `p`
    pub fn nearest_point(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left(), self.right()),
            p.y.clamp(self.top(), self.bottom()),
        )
    }
}

/// Axis along which a reflection was applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    /// Side hit: horizontal velocity inverted
    Horizontal,
    /// Top/bottom hit: vertical velocity inverted
    Vertical,
}

/// Contact between a circle and a rectangle, measured at the nearest point
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    /// Circle center minus nearest point on the rectangle
    pub offset: Vec2,
    /// `radius - |offset|` per axis
    pub penetration: Vec2,
}

impl Contact {
    pub fn between(center: Vec2, radius: f32, rect: &Rect) -> Self {
        let offset = center - rect.nearest_point(center);
        Self {
            offset,
            penetration: Vec2::splat(radius) - offset.abs(),
        }
    }

    /// Shallower axis wins; ties go vertical
    pub fn reflection_axis(&self) -> Axis {
        if self.penetration.x < self.penetration.y {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }
}
