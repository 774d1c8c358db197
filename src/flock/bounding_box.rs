//! Axis-aligned bounding boxes used to prune flock-to-flock neighbour scans.

use crate::vector::Vec2;

/// An axis-aligned box: `top_left.x <= bottom_right.x` and similarly for `y`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub top_left: Vec2,
    pub bottom_right: Vec2,
}

impl BoundingBox {
    /// Builds the tightest box enclosing every position in `positions`,
    /// inflated by `radius` on every side. Returns `None` for an empty
    /// slice — an empty flock has no bounding box and is left invalid
    /// rather than given a degenerate one.
    pub fn enclosing(positions: impl Iterator<Item = Vec2>, radius: f64) -> Option<Self> {
        let mut iter = positions.peekable();
        iter.peek()?;

        let mut min = Vec2::new(f64::INFINITY, f64::INFINITY);
        let mut max = Vec2::new(f64::NEG_INFINITY, f64::NEG_INFINITY);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(BoundingBox {
            top_left: Vec2::new(min.x - radius, min.y - radius),
            bottom_right: Vec2::new(max.x + radius, max.y + radius),
        })
    }

    /// `true` if every member position lies within this box. Used by tests
    /// to check bounding-box correctness.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.top_left.x && p.x <= self.bottom_right.x && p.y >= self.top_left.y && p.y <= self.bottom_right.y
    }

    /// Overlap test against `other` after inflating `other` by `radius` on
    /// each side. Inflation is applied to `other`, not `self`, matching the
    /// asymmetric `IntersectsBB(other, radius)` signature used throughout
    /// the sense/delegate scans (self's own bbox is already inflated by the
    /// boid radius at construction; `radius` here is the neighbourhood
    /// radius the caller is pruning by).
    pub fn intersects(&self, other: &BoundingBox, radius: f64) -> bool {
        let other_top_left = Vec2::new(other.top_left.x - radius, other.top_left.y - radius);
        let other_bottom_right = Vec2::new(other.bottom_right.x + radius, other.bottom_right.y + radius);

        self.top_left.x <= other_bottom_right.x
            && self.bottom_right.x >= other_top_left.x
            && self.top_left.y <= other_bottom_right.y
            && self.bottom_right.y >= other_top_left.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enclosing_is_none_for_empty_iterator() {
        assert!(BoundingBox::enclosing(std::iter::empty(), 1.0).is_none());
    }

    #[test]
    fn enclosing_covers_every_point_and_inflates_by_radius() {
        let points = vec![Vec2::new(0.0, 0.0), Vec2::new(10.0, 5.0)];
        let bb = BoundingBox::enclosing(points.iter().copied(), 2.0).unwrap();
        assert_eq!(bb.top_left, Vec2::new(-2.0, -2.0));
        assert_eq!(bb.bottom_right, Vec2::new(12.0, 7.0));
        assert!(bb.contains(Vec2::new(0.0, 0.0)));
        assert!(bb.contains(Vec2::new(10.0, 5.0)));
    }

    #[test]
    fn intersects_detects_overlap_and_gap() {
        let a = BoundingBox {
            top_left: Vec2::new(0.0, 0.0),
            bottom_right: Vec2::new(10.0, 10.0),
        };
        let b = BoundingBox {
            top_left: Vec2::new(20.0, 20.0),
            bottom_right: Vec2::new(30.0, 30.0),
        };
        assert!(!a.intersects(&b, 1.0));
        assert!(a.intersects(&b, 15.0));
    }

    #[test]
    fn intersects_is_true_for_touching_boxes() {
        let a = BoundingBox {
            top_left: Vec2::new(0.0, 0.0),
            bottom_right: Vec2::new(10.0, 10.0),
        };
        let b = BoundingBox {
            top_left: Vec2::new(10.0, 0.0),
            bottom_right: Vec2::new(20.0, 10.0),
        };
        assert!(a.intersects(&b, 0.0));
    }
}
