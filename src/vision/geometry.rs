//! Rectangles and affine transforms for OCR geometry
//!
//! OCR engines report boxes in their own coordinate space (often normalized,
//! bottom-left origin). Everything downstream of the fragment source works in
//! display space, where `y` grows downward.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (x, y, width, height)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Build a rectangle from two opposite corners in any order
    pub fn from_corners(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x: x0.min(x1),
            y: y0.min(y1),
            width: (x1 - x0).abs(),
            height: (y1 - y0).abs(),
        }
    }

    pub fn min_x(&self) -> f64 {
        self.x
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn min_y(&self) -> f64 {
        self.y
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn mid_x(&self) -> f64 {
        self.x + self.width / 2.0
    }

    pub fn mid_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Whether `y` lies inside the closed vertical span of this rectangle
    pub fn spans_y(&self, y: f64) -> bool {
        self.min_y() <= y && y <= self.max_y()
    }

    /// Smallest rectangle containing both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_corners(
            self.min_x().min(other.min_x()),
            self.min_y().min(other.min_y()),
            self.max_x().max(other.max_x()),
            self.max_y().max(other.max_y()),
        )
    }
}

/// 2D affine transform: `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineTransform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for AffineTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineTransform {
    pub fn identity() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx: 0.0, ty: 0.0 }
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self { a: sx, b: 0.0, c: 0.0, d: sy, tx: 0.0, ty: 0.0 }
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, tx, ty }
    }

    /// Unit-space vertical flip (`y' = 1 - y`), bottom-left origin to top-left
    pub fn flip_vertical() -> Self {
        Self::scale(1.0, -1.0).then(&Self::translation(0.0, 1.0))
    }

    /// Swap the axes (`x' = y`, `y' = x`), used for sideways still images
    pub fn transpose() -> Self {
        Self { a: 0.0, b: 1.0, c: 1.0, d: 0.0, tx: 0.0, ty: 0.0 }
    }

    /// Apply `self` first, then `next`
    pub fn then(&self, next: &AffineTransform) -> Self {
        Self {
            a: self.a * next.a + self.b * next.c,
            b: self.a * next.b + self.b * next.d,
            c: self.c * next.a + self.d * next.c,
            d: self.c * next.b + self.d * next.d,
            tx: self.tx * next.a + self.ty * next.c + next.tx,
            ty: self.tx * next.b + self.ty * next.d + next.ty,
        }
    }

    pub fn apply_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Bounding box of the transformed corners
    pub fn apply_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.apply_point(rect.min_x(), rect.min_y()),
            self.apply_point(rect.max_x(), rect.min_y()),
            self.apply_point(rect.min_x(), rect.max_y()),
            self.apply_point(rect.max_x(), rect.max_y()),
        ];

        let min_x = corners.iter().map(|p| p.0).fold(f64::INFINITY, f64::min);
        let min_y = corners.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max_x = corners.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        let max_y = corners.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);

        Rect::from_corners(min_x, min_y, max_x, max_y)
    }
}
