//! Integer lattice geometry shared by the terrain crates.
#![forbid(unsafe_code)]

use core::ops::{Add, AddAssign, Mul, Sub, SubAssign};

/// A point on the integer tile lattice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(test, derive(proptest_derive::Arbitrary))]
pub struct Point2 {
    pub x: i32,
    pub y: i32,
}

impl Point2 {
    pub const ZERO: Point2 = Point2 { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Dot product widened to `i64` so lattice-scale vectors never overflow.
    #[inline]
    pub fn dot(self, rhs: Point2) -> i64 {
        i64::from(self.x) * i64::from(rhs.x) + i64::from(self.y) * i64::from(rhs.y)
    }

    #[inline]
    pub fn distance_sq(self, other: Point2) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }
}

impl Add for Point2 {
    type Output = Point2;
    #[inline]
    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point2 {
    #[inline]
    fn add_assign(&mut self, rhs: Point2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point2 {
    type Output = Point2;
    #[inline]
    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Point2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Point2) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Mul<i32> for Point2 {
    type Output = Point2;
    #[inline]
    fn mul(self, rhs: i32) -> Point2 {
        Point2::new(self.x * rhs, self.y * rhs)
    }
}

impl From<(i32, i32)> for Point2 {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Point2> for (i32, i32) {
    fn from(value: Point2) -> Self {
        (value.x, value.y)
    }
}

/// Inclusive lattice rectangle: both `min` and `max` are inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect2 {
    pub min: Point2,
    pub max: Point2,
}

impl Rect2 {
    #[inline]
    pub const fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    /// Smallest rectangle holding every point, `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Rect2>
    where
        I: IntoIterator<Item = Point2>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut rect = Rect2::new(first, first);
        for p in iter {
            rect.min.x = rect.min.x.min(p.x);
            rect.min.y = rect.min.y.min(p.y);
            rect.max.x = rect.max.x.max(p.x);
            rect.max.y = rect.max.y.max(p.y);
        }
        Some(rect)
    }

    #[inline]
    pub fn width(&self) -> usize {
        (i64::from(self.max.x) - i64::from(self.min.x) + 1).max(0) as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        (i64::from(self.max.y) - i64::from(self.min.y) + 1).max(0) as usize
    }

    #[inline]
    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Row-major walk over every lattice point of the rectangle.
    pub fn points(&self) -> impl Iterator<Item = Point2> + use<> {
        let Rect2 { min, max } = *self;
        (min.y..=max.y).flat_map(move |y| (min.x..=max.x).map(move |x| Point2::new(x, y)))
    }
}

/// Half-plane test against the perpendicular bisector of `germ` and `neighbor`.
///
/// Returns true when `p` lies on the germ's side. Worked in doubled
/// coordinates so the midpoint stays on the integer lattice; a point on the
/// bisector (including the midpoint itself) counts as inside.
#[inline]
pub fn on_germ_side(p: Point2, germ: Point2, neighbor: Point2) -> bool {
    let check = (
        2 * i64::from(p.x) - i64::from(germ.x) - i64::from(neighbor.x),
        2 * i64::from(p.y) - i64::from(germ.y) - i64::from(neighbor.y),
    );
    let base = (
        i64::from(germ.x) - i64::from(neighbor.x),
        i64::from(germ.y) - i64::from(neighbor.y),
    );
    check.0 * base.0 + check.1 * base.1 >= 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn rect_dimensions_are_inclusive() {
        let r = Rect2::new(Point2::new(-2, 3), Point2::new(2, 3));
        assert_eq!(r.width(), 5);
        assert_eq!(r.height(), 1);
        assert_eq!(r.points().count(), 5);
    }

    #[test]
    fn midpoint_counts_as_inside() {
        let g = Point2::new(0, 0);
        let n = Point2::new(4, 0);
        assert!(on_germ_side(Point2::new(2, 0), g, n));
        assert!(on_germ_side(Point2::new(2, 0), n, g));
        assert!(!on_germ_side(Point2::new(3, 0), g, n));
    }

    proptest! {
        #[test]
        fn point_sub_add_roundtrip(a in any::<Point2>().prop_map(|p| Point2::new(p.x / 4, p.y / 4)),
                                   b in any::<Point2>().prop_map(|p| Point2::new(p.x / 4, p.y / 4))) {
            prop_assert_eq!((a - b) + b, a);
        }
    }
}
