//! Integer and floating pixel boxes.
//!
//! Pixel centers sit at integer positions, so integer pixel `i` covers the floating
//! interval `[i - 0.5, i + 0.5)`. [`Box2I`] is inclusive on both ends.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Floating pixel position.
pub type PixelPos = Point2<f64>;

/// Integer pixel position.
pub type PixelIndex = [i64; 2];

/// Round a floating pixel position to the integer pixel containing it.
pub fn pixel_index(pos: &PixelPos) -> PixelIndex {
    [(pos.x + 0.5).floor() as i64, (pos.y + 0.5).floor() as i64]
}

/// Inclusive integer pixel box. An empty box has `min > max` on some axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Box2I {
    min: PixelIndex,
    max: PixelIndex,
}

impl Default for Box2I {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box2I {
    pub fn empty() -> Self {
        Box2I {
            min: [0, 0],
            max: [-1, -1],
        }
    }

    /// Box starting at `min` with the given `dimensions` (non-positive dimensions give an empty box).
    pub fn from_min_dimensions(min: PixelIndex, dimensions: [i64; 2]) -> Self {
        if dimensions[0] <= 0 || dimensions[1] <= 0 {
            return Self::empty();
        }
        Box2I {
            min,
            max: [min[0] + dimensions[0] - 1, min[1] + dimensions[1] - 1],
        }
    }

    /// Box spanning `min..=max` on both axes.
    pub fn from_corners(min: PixelIndex, max: PixelIndex) -> Self {
        if min[0] > max[0] || min[1] > max[1] {
            return Self::empty();
        }
        Box2I { min, max }
    }

    /// Smallest integer box containing every pixel touched by `bbox`.
    pub fn expand_from(bbox: &Box2D) -> Self {
        if bbox.is_empty() {
            return Self::empty();
        }
        let min = [
            (bbox.min.x + 0.5).floor() as i64,
            (bbox.min.y + 0.5).floor() as i64,
        ];
        // A degenerate axis sitting on a half-pixel boundary keeps the pixel holding it
        let max = [
            ((bbox.max.x - 0.5).ceil() as i64).max(min[0]),
            ((bbox.max.y - 0.5).ceil() as i64).max(min[1]),
        ];
        Self::from_corners(min, max)
    }

    pub fn is_empty(&self) -> bool {
        self.min[0] > self.max[0] || self.min[1] > self.max[1]
    }

    pub fn min(&self) -> PixelIndex {
        self.min
    }

    pub fn max(&self) -> PixelIndex {
        self.max
    }

    pub fn dimensions(&self) -> [i64; 2] {
        if self.is_empty() {
            return [0, 0];
        }
        [
            self.max[0] - self.min[0] + 1,
            self.max[1] - self.min[1] + 1,
        ]
    }

    /// Number of pixels in the box.
    pub fn area(&self) -> i64 {
        let [w, h] = self.dimensions();
        w * h
    }

    pub fn contains(&self, index: PixelIndex) -> bool {
        !self.is_empty()
            && (self.min[0]..=self.max[0]).contains(&index[0])
            && (self.min[1]..=self.max[1]).contains(&index[1])
    }

    pub fn contains_box(&self, other: &Box2I) -> bool {
        other.is_empty() || (self.contains(other.min) && self.contains(other.max))
    }

    pub fn overlaps(&self, other: &Box2I) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min[0] <= other.max[0]
            && other.min[0] <= self.max[0]
            && self.min[1] <= other.max[1]
            && other.min[1] <= self.max[1]
    }

    /// Grow by `border` pixels on every side.
    pub fn grow(&self, border: i64) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_corners(
            [self.min[0] - border, self.min[1] - border],
            [self.max[0] + border, self.max[1] + border],
        )
    }

    /// Intersection with `other`.
    pub fn clip(&self, other: &Box2I) -> Self {
        if self.is_empty() || other.is_empty() {
            return Self::empty();
        }
        Self::from_corners(
            [self.min[0].max(other.min[0]), self.min[1].max(other.min[1])],
            [self.max[0].min(other.max[0]), self.max[1].min(other.max[1])],
        )
    }
}

/// Floating pixel box. An empty box has NaN corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2D {
    min: PixelPos,
    max: PixelPos,
}

impl Default for Box2D {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<&Box2I> for Box2D {
    fn from(bbox: &Box2I) -> Self {
        if bbox.is_empty() {
            return Box2D::empty();
        }
        Box2D {
            min: PixelPos::new(bbox.min[0] as f64 - 0.5, bbox.min[1] as f64 - 0.5),
            max: PixelPos::new(bbox.max[0] as f64 + 0.5, bbox.max[1] as f64 + 0.5),
        }
    }
}

impl Box2D {
    pub fn empty() -> Self {
        Box2D {
            min: PixelPos::new(f64::NAN, f64::NAN),
            max: PixelPos::new(f64::NAN, f64::NAN),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y)
    }

    pub fn min(&self) -> PixelPos {
        self.min
    }

    pub fn max(&self) -> PixelPos {
        self.max
    }

    /// Extend the box so it includes `pos`; non-finite positions are ignored.
    pub fn include(&mut self, pos: &PixelPos) {
        if !pos.x.is_finite() || !pos.y.is_finite() {
            return;
        }
        if self.is_empty() {
            self.min = *pos;
            self.max = *pos;
            return;
        }
        self.min = PixelPos::new(self.min.x.min(pos.x), self.min.y.min(pos.y));
        self.max = PixelPos::new(self.max.x.max(pos.x), self.max.y.max(pos.y));
    }

    /// Grow (or shrink, for a negative `amount`) on every side.
    pub fn grow(&self, amount: f64) -> Self {
        if self.is_empty() {
            return *self;
        }
        Box2D {
            min: PixelPos::new(self.min.x - amount, self.min.y - amount),
            max: PixelPos::new(self.max.x + amount, self.max.y + amount),
        }
    }

    /// Half-open containment test: `min <= pos < max`.
    pub fn contains(&self, pos: &PixelPos) -> bool {
        !self.is_empty()
            && pos.x >= self.min.x
            && pos.x < self.max.x
            && pos.y >= self.min.y
            && pos.y < self.max.y
    }

    /// Corners in counter-clockwise order starting at `min`.
    pub fn corners(&self) -> [PixelPos; 4] {
        [
            self.min,
            PixelPos::new(self.max.x, self.min.y),
            self.max,
            PixelPos::new(self.min.x, self.max.y),
        ]
    }
}

#[cfg(test)]
mod bbox_test {
    use super::*;

    #[test]
    fn test_box2i_dimensions() {
        let bbox = Box2I::from_min_dimensions([0, 0], [10, 4]);
        assert_eq!(bbox.max(), [9, 3]);
        assert_eq!(bbox.dimensions(), [10, 4]);
        assert_eq!(bbox.area(), 40);
        assert!(bbox.contains([9, 3]));
        assert!(!bbox.contains([10, 3]));
        assert!(Box2I::from_min_dimensions([0, 0], [0, 4]).is_empty());
        assert_eq!(Box2I::empty().dimensions(), [0, 0]);
    }

    #[test]
    fn test_grow_and_clip() {
        let tract = Box2I::from_min_dimensions([0, 0], [100, 100]);
        let patch = Box2I::from_min_dimensions([0, 50], [50, 50]);
        let outer = patch.grow(5).clip(&tract);
        assert_eq!(outer.min(), [0, 45]);
        assert_eq!(outer.max(), [54, 99]);

        let disjoint = Box2I::from_min_dimensions([200, 200], [5, 5]);
        assert!(tract.clip(&disjoint).is_empty());
        assert!(!tract.overlaps(&disjoint));
        assert!(tract.overlaps(&patch));
        assert!(tract.contains_box(&patch));
        assert!(!patch.contains_box(&tract));
    }

    #[test]
    fn test_expand_from_box2d() {
        let mut bbox = Box2D::empty();
        assert!(bbox.is_empty());
        bbox.include(&PixelPos::new(-3.2, 1.6));
        bbox.include(&PixelPos::new(4.4, -0.6));
        bbox.include(&PixelPos::new(f64::NAN, 100.0));
        let ibox = Box2I::expand_from(&bbox);
        assert_eq!(ibox.min(), [-3, -1]);
        assert_eq!(ibox.max(), [4, 2]);

        let back = Box2D::from(&ibox);
        assert_eq!(back.min(), PixelPos::new(-3.5, -1.5));
        assert_eq!(back.max(), PixelPos::new(4.5, 2.5));
    }

    #[test]
    fn test_expand_from_degenerate_box() {
        let mut bbox = Box2D::empty();
        bbox.include(&PixelPos::new(2.5, 7.5));
        let ibox = Box2I::expand_from(&bbox);
        assert!(!ibox.is_empty());
        assert_eq!(ibox.min(), pixel_index(&PixelPos::new(2.5, 7.5)));
        assert_eq!(ibox.max(), [3, 8]);

        bbox.include(&PixelPos::new(2.5, 9.2));
        let ibox = Box2I::expand_from(&bbox);
        assert_eq!(ibox.min(), [3, 8]);
        assert_eq!(ibox.max(), [3, 9]);
    }

    #[test]
    fn test_pixel_index_rounding() {
        assert_eq!(pixel_index(&PixelPos::new(0.49, -0.5)), [0, 0]);
        assert_eq!(pixel_index(&PixelPos::new(0.5, -0.51)), [1, -1]);
    }

    #[test]
    fn test_box2d_contains_and_corners() {
        let bbox = Box2D::from(&Box2I::from_min_dimensions([0, 0], [4, 2])).grow(-0.001);
        assert!(bbox.contains(&PixelPos::new(0.0, 0.0)));
        assert!(!bbox.contains(&PixelPos::new(3.5, 0.0)));
        let corners = bbox.corners();
        assert_eq!(corners[0], bbox.min());
        assert_eq!(corners[2], bbox.max());
    }
}
