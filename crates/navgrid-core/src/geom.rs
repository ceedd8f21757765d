//! Grid coordinates and the rectangles they index into.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A cell coordinate. `x` grows to the right and `y` grows downwards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    /// Sentinel for "no coordinate"; it lies outside every grid.
    pub const INVALID: Self = Self::new(-1, -1);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Cardinal neighbours in expansion order: right, left, down, up.
    #[inline]
    pub fn neighbors_4(self) -> [Point; 4] {
        let Point { x, y } = self;
        [
            Point::new(x + 1, y),
            Point::new(x - 1, y),
            Point::new(x, y + 1),
            Point::new(x, y - 1),
        ]
    }

    /// Whether `other` is exactly one cardinal step from `self`.
    #[inline]
    pub fn is_adjacent_4(self, other: Point) -> bool {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y) == 1
    }
}

/// Row-major: by `y`, then by `x`.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Half-open rectangle of cells: `min` is inside, `max` is not.
///
/// Every range without cells compares and hashes equal to
/// `Range::default()`.
#[derive(Copy, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Rectangle spanned by two corners, given in any order.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    /// `width × height` cells starting at the origin; empty unless both
    /// dimensions are positive.
    pub fn with_size(width: i32, height: i32) -> Self {
        if width > 0 && height > 0 {
            Self::new(0, 0, width, height)
        } else {
            Self::default()
        }
    }

    /// Width and height packed into a `Point`.
    #[inline]
    pub fn size(self) -> Point {
        Point::new(self.width(), self.height())
    }

    #[inline]
    pub fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    /// Number of cells.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Row-major offset of `p` from `min`, `None` outside the range.
    #[inline]
    pub fn index_of(self, p: Point) -> Option<usize> {
        self.contains(p).then(|| {
            (p.y - self.min.y) as usize * self.width() as usize + (p.x - self.min.x) as usize
        })
    }

    /// Inverse of [`index_of`](Self::index_of); `idx` must be below
    /// [`len`](Self::len).
    #[inline]
    pub fn point_at(self, idx: usize) -> Point {
        let w = self.width() as usize;
        Point::new(self.min.x + (idx % w) as i32, self.min.y + (idx / w) as i32)
    }

    /// Every cell in row-major order.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            end: self.len(),
        }
    }
}

impl PartialEq for Range {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_empty(), other.is_empty()) {
            (true, true) => true,
            (false, false) => self.min == other.min && self.max == other.max,
            _ => false,
        }
    }
}

impl Eq for Range {}

impl Hash for Range {
    fn hash<H: Hasher>(&self, state: &mut H) {
        let r = if self.is_empty() { Range::default() } else { *self };
        (r.min, r.max).hash(state);
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;

    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// Iterator returned by [`Range::iter`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    end: usize,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.next >= self.end {
            return None;
        }
        let p = self.range.point_at(self.next);
        self.next += 1;
        Some(p)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn neighbours_come_in_expansion_order() {
        let p = Point::new(5, 5);
        assert_eq!(
            p.neighbors_4(),
            [Point::new(6, 5), Point::new(4, 5), Point::new(5, 6), Point::new(5, 4)]
        );
        assert!(p.neighbors_4().iter().all(|&n| p.is_adjacent_4(n)));
        assert!(!p.is_adjacent_4(Point::new(6, 6)));
        assert!(!p.is_adjacent_4(p));
    }

    #[test]
    fn points_sort_row_major() {
        let mut pts = vec![Point::new(2, 1), Point::new(0, 1), Point::new(3, 0)];
        pts.sort();
        assert_eq!(pts, vec![Point::new(3, 0), Point::new(0, 1), Point::new(2, 1)]);
        assert_eq!(Point::new(-1, 4).to_string(), "(-1, 4)");
    }

    #[test]
    fn half_open_containment() {
        let r = Range::new(3, 2, 0, 0);
        assert_eq!(r.min, Point::ZERO);
        assert_eq!(r.size(), Point::new(3, 2));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
        assert!(!r.contains(Point::new(0, 2)));
        assert!(!r.contains(Point::INVALID));
    }

    #[test]
    fn with_size_rejects_degenerate_dimensions() {
        assert!(Range::with_size(0, 5).is_empty());
        assert!(Range::with_size(5, -1).is_empty());
        assert_eq!(Range::with_size(5, -1).len(), 0);
        assert_eq!(Range::with_size(4, 3).len(), 12);
    }

    #[test]
    fn index_and_point_are_inverse() {
        let r = Range::new(2, 1, 6, 4);
        assert_eq!(r.index_of(Point::new(2, 1)), Some(0));
        assert_eq!(r.index_of(Point::new(3, 2)), Some(5));
        assert_eq!(r.index_of(Point::new(6, 1)), None);
        let it = r.iter();
        assert_eq!(it.len(), 12);
        for (i, p) in it.enumerate() {
            assert_eq!(r.index_of(p), Some(i));
            assert_eq!(r.point_at(i), p);
        }
    }

    #[test]
    fn empty_ranges_compare_and_hash_equal() {
        let a = Range::default();
        let b = Range::new(5, 5, 5, 9);
        assert_eq!(a, b);
        assert_ne!(a, Range::with_size(1, 1));
        let set: HashSet<Range> = [a].into_iter().collect();
        assert!(set.contains(&b));
        assert_eq!(b.iter().count(), 0);
    }
}
