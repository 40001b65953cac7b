use cgmath::*;

/// Axis-aligned rectangle in world space. World space follows screen convention,
/// +y points down, so `top()` is the smaller y coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub origin: Point2<f32>,
    pub extent: Vector2<f32>,
}

impl Default for Bounds {
    fn default() -> Self {
        Self {
            origin: point2(0.0, 0.0),
            extent: vec2(0.0, 0.0),
        }
    }
}

impl Bounds {
    pub fn new(origin: Point2<f32>, extent: Vector2<f32>) -> Self {
        Self { origin, extent }
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(point2(x, y), vec2(width, height))
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }
    pub fn right(&self) -> f32 {
        self.origin.x + self.extent.x
    }
    pub fn top(&self) -> f32 {
        self.origin.y
    }
    pub fn bottom(&self) -> f32 {
        self.origin.y + self.extent.y
    }
    pub fn width(&self) -> f32 {
        self.extent.x
    }
    pub fn height(&self) -> f32 {
        self.extent.y
    }

    pub fn is_empty(&self) -> bool {
        self.extent.x <= 0.0 || self.extent.y <= 0.0
    }

    /// Center point, halving the extent the way whole-unit rectangles do (rounding down).
    pub fn center(&self) -> Point2<f32> {
        point2(
            self.origin.x + (self.extent.x / 2.0).floor(),
            self.origin.y + (self.extent.y / 2.0).floor(),
        )
    }

    pub fn offset(&self, by: Vector2<f32>) -> Bounds {
        Bounds::new(self.origin + by, self.extent)
    }

    /// True if the two rects overlap. Rects which only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        other.left() < self.right()
            && self.left() < other.right()
            && other.top() < self.bottom()
            && self.top() < other.bottom()
    }

    /// Returns the overlapping region of the two rects, or None if they don't overlap.
    pub fn intersection(&self, other: &Bounds) -> Option<Bounds> {
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Bounds::from_xywh(left, top, right - left, bottom - top))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod bounds_tests {
    use super::*;

    #[test]
    fn edges_are_screen_space() {
        let b = Bounds::from_xywh(10.0, 20.0, 30.0, 40.0);
        assert_eq!(b.left(), 10.0);
        assert_eq!(b.right(), 40.0);
        assert_eq!(b.top(), 20.0);
        assert_eq!(b.bottom(), 60.0);
        assert_eq!(b.center(), point2(25.0, 40.0));
    }

    #[test]
    fn center_rounds_half_extent_down() {
        let b = Bounds::from_xywh(0.0, 0.0, 73.0, 135.0);
        assert_eq!(b.center(), point2(36.0, 67.0));
    }

    #[test]
    fn intersection_works() {
        let a = Bounds::from_xywh(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::from_xywh(5.0, 8.0, 10.0, 10.0);
        assert_eq!(a.intersection(&b), Some(Bounds::from_xywh(5.0, 8.0, 5.0, 2.0)));
        assert!(a.intersects(&b));

        // touching edges don't count
        let c = Bounds::from_xywh(10.0, 0.0, 10.0, 10.0);
        assert_eq!(a.intersection(&c), None);
        assert!(!a.intersects(&c));

        let d = Bounds::from_xywh(50.0, 50.0, 1.0, 1.0);
        assert_eq!(a.intersection(&d), None);
    }
}
