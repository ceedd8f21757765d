use navgrid_core::Point;

/// Cached neighbour computation helper.
///
/// Enumerates the four axis-aligned neighbours of a grid point, filtered by a
/// predicate, into a reusable buffer.
pub struct Neighbors {
    buf: Vec<Point>,
}

impl Default for Neighbors {
    fn default() -> Self {
        Self::new()
    }
}

impl Neighbors {
    /// Create a new `Neighbors` helper.
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(4),
        }
    }

    /// Return 4-directional (cardinal) neighbours of `p`, keeping only those
    /// for which `keep` returns `true`.
    pub fn cardinal(&mut self, p: Point, keep: impl Fn(Point) -> bool) -> &[Point] {
        self.buf.clear();
        for n in p.neighbors_4() {
            if keep(n) {
                self.buf.push(n);
            }
        }
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cardinal_filters_with_predicate() {
        let mut nb = Neighbors::new();
        let all = nb.cardinal(Point::new(0, 0), |_| true).to_vec();
        assert_eq!(all.len(), 4);
        let inside = nb.cardinal(Point::new(0, 0), |p| p.x >= 0 && p.y >= 0);
        assert_eq!(inside, &[Point::new(1, 0), Point::new(0, 1)]);
    }
}
