use navgrid_core::Point;

/// Manhattan (L1) distance between two points.
#[inline]
pub fn manhattan(a: Point, b: Point) -> i32 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// Euclidean (L2) distance between two points.
#[inline]
pub fn euclidean(a: Point, b: Point) -> f64 {
    let dx = f64::from(a.x - b.x);
    let dy = f64::from(a.y - b.y);
    dx.hypot(dy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_never_exceeds_manhattan() {
        let a = Point::new(1, 2);
        for b in [Point::new(4, 6), Point::new(1, 2), Point::new(-3, 2)] {
            assert!(euclidean(a, b) <= manhattan(a, b) as f64);
        }
        assert_eq!(euclidean(Point::new(0, 0), Point::new(3, 4)), 5.0);
        assert_eq!(manhattan(Point::new(0, 0), Point::new(3, -4)), 7);
    }
}
