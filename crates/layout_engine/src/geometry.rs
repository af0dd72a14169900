//! Pixel geometry and the collision predicate

use deck_model::Geometry;
use serde::{Deserialize, Serialize};

/// Resolution the host reports geometry in
pub const SOURCE_DPI: f64 = 72.0;

/// Resolution all comparisons are made in
pub const TARGET_DPI: f64 = 96.0;

/// Convert points to whole pixels
pub fn px(points: f64) -> f64 {
    (points / SOURCE_DPI * TARGET_DPI).round()
}

/// A rectangle in pixel coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Convert declared point geometry without any adjustment
    pub fn from_points(geometry: Geometry) -> Self {
        Self {
            left: px(geometry.left),
            top: px(geometry.top),
            width: px(geometry.width),
            height: px(geometry.height),
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Whether the two boxes share any interior area.
    ///
    /// Boxes that only touch along an edge do not collide.
    pub fn collides(&self, other: &BoundingBox) -> bool {
        self.right() > other.left
            && self.left < other.right()
            && self.bottom() > other.top
            && self.top < other.bottom()
    }
}

/// Free-function form of [`BoundingBox::collides`]
pub fn collides(a: &BoundingBox, b: &BoundingBox) -> bool {
    a.collides(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_px_reference_points() {
        assert_eq!(px(72.0), 96.0);
        assert_eq!(px(0.0), 0.0);
        assert_eq!(px(960.0), 1280.0);
        assert_eq!(px(540.0), 720.0);
    }

    #[test]
    fn test_px_rounds_to_whole_pixels() {
        // 10pt = 13.33px
        assert_eq!(px(10.0), 13.0);
        // 11pt = 14.67px
        assert_eq!(px(11.0), 15.0);
    }

    #[test]
    fn test_from_points() {
        let bbox = BoundingBox::from_points(Geometry::new(36.0, 72.0, 144.0, 18.0));
        assert_eq!(bbox, BoundingBox::new(48.0, 96.0, 192.0, 24.0));
    }

    #[test]
    fn test_overlapping_boxes_collide() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
        assert!(collides(&a, &b));
        assert!(collides(&b, &a));
    }

    #[test]
    fn test_touching_edges_do_not_collide() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let right = BoundingBox::new(10.0, 0.0, 10.0, 10.0);
        let below = BoundingBox::new(0.0, 10.0, 10.0, 10.0);
        assert!(!collides(&a, &right));
        assert!(!collides(&a, &below));
    }

    #[test]
    fn test_contained_box_collides() {
        let outer = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        let inner = BoundingBox::new(40.0, 40.0, 10.0, 10.0);
        assert!(outer.collides(&inner));
        assert!(inner.collides(&outer));
    }

    #[test]
    fn test_disjoint_boxes() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(50.0, 50.0, 10.0, 10.0);
        assert!(!a.collides(&b));
    }

    fn bbox_strategy() -> impl Strategy<Value = BoundingBox> {
        (-500.0..500.0f64, -500.0..500.0f64, 0.0..500.0f64, 0.0..500.0f64)
            .prop_map(|(l, t, w, h)| BoundingBox::new(l, t, w, h))
    }

    proptest! {
        #[test]
        fn prop_px_is_monotonic(a in 0.0..10_000.0f64, b in 0.0..10_000.0f64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(px(lo) <= px(hi));
        }

        #[test]
        fn prop_collides_is_symmetric(a in bbox_strategy(), b in bbox_strategy()) {
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }

        #[test]
        fn prop_box_placed_past_right_edge_never_collides(a in bbox_strategy(), gap in 0.0..100.0f64) {
            let b = BoundingBox::new(a.right() + gap, a.top, a.width, a.height);
            prop_assert!(!collides(&a, &b));
        }
    }
}
