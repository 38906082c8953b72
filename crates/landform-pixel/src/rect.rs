//! Axis-aligned pixel-space rectangles.

use glam::{IVec2, Vec2};

/// An axis-aligned rectangle in pixel space.
///
/// `min` is inclusive, `max` is exclusive. A rectangle covering a single
/// pixel at `(x, y)` has `min == (x, y)` and `max == (x + 1, y + 1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelRect {
    /// Inclusive lower corner.
    pub min: IVec2,
    /// Exclusive upper corner.
    pub max: IVec2,
}

/// A rectangle normalized to `[0, 1]` texture coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UvRect {
    /// Lower corner in UV space.
    pub min: Vec2,
    /// Extent in UV space.
    pub size: Vec2,
}

impl PixelRect {
    /// Creates a rectangle from corners.
    pub fn new(min: IVec2, max: IVec2) -> Self {
        Self { min, max }
    }

    /// Creates an inverted rectangle primed for accumulation over a buffer of
    /// the given extent: the first [`PixelRect::include`] call snaps it to
    /// that pixel.
    pub fn collector(extent: IVec2) -> Self {
        Self {
            min: extent,
            max: IVec2::ZERO,
        }
    }

    /// Returns `true` if no pixel has been included yet.
    pub fn is_empty(&self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Expands the rectangle to cover `pos`.
    pub fn include(&mut self, pos: IVec2) {
        self.min = self.min.min(pos);
        self.max = self.max.max(pos + IVec2::ONE);
    }

    /// Width in pixels.
    pub fn width(&self) -> i32 {
        self.max.x - self.min.x
    }

    /// Height in pixels.
    pub fn height(&self) -> i32 {
        self.max.y - self.min.y
    }

    /// Returns `true` if `pos` lies inside (min inclusive, max exclusive).
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= self.min.x && pos.x < self.max.x && pos.y >= self.min.y && pos.y < self.max.y
    }

    /// The four corner points: both min-edge corners and both max-edge
    /// corners (the latter on the exclusive boundary).
    pub fn corners(&self) -> [IVec2; 4] {
        [
            self.min,
            IVec2::new(self.max.x, self.min.y),
            IVec2::new(self.min.x, self.max.y),
            self.max,
        ]
    }

    /// Returns `true` if every corner of `other` lies inside this rectangle.
    ///
    /// Containment is strict on the max side, matching [`PixelRect::contains`]:
    /// a rectangle does not contain another that touches its exclusive edge.
    pub fn contains_rect(&self, other: &PixelRect) -> bool {
        other.corners().iter().all(|&corner| self.contains(corner))
    }

    /// Returns a copy grown by `margin` pixels on every side.
    pub fn padded(&self, margin: i32) -> Self {
        Self {
            min: self.min - IVec2::splat(margin),
            max: self.max + IVec2::splat(margin),
        }
    }

    /// Normalizes the rectangle against a buffer extent, yielding the
    /// `[0, 1]` UV-space variant.
    pub fn to_uv(&self, extent: IVec2) -> UvRect {
        let extent = extent.as_vec2();
        UvRect {
            min: self.min.as_vec2() / extent,
            size: IVec2::new(self.width(), self.height()).as_vec2() / extent,
        }
    }
}
