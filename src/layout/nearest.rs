//! Nearest-point hit-testing.
//!
//! Resolving a pointer to the closest plotted point is equivalent to finding
//! the Voronoi cell that contains it. [`RTreeIndex`] answers the query with an
//! R-tree in `O(log n)` expected time and can also produce the clipped cell
//! polygons for drawing hit regions. [`LinearScan`] is the `O(n)` reference.

use std::collections::HashSet;

use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::geometry::{Point, Rect};

/// Nearest-point lookup restricted to a bounding rectangle.
pub trait NearestPoint {
    /// Index of the point closest to `query`, or `None` if `query` lies
    /// outside the bounds or there are no points.
    fn nearest(&self, query: Point) -> Option<usize>;
}

type IndexedPoint = GeomWithData<[f32; 2], usize>;

/// R-tree backed nearest-point index with Voronoi cell extraction.
#[derive(Debug, Clone)]
pub struct RTreeIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<Point>,
    bounds: Rect,
}

impl RTreeIndex {
    /// Index `points` (by position in the slice) for queries inside `bounds`.
    ///
    /// Non-finite points are not indexed and never returned. Of several
    /// coincident points only the lowest index is indexed.
    #[must_use]
    pub fn new(points: &[Point], bounds: Rect) -> Self {
        let mut seen = HashSet::new();
        let entries: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x.is_finite() && p.y.is_finite())
            .filter(|(_, p)| seen.insert(((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits())))
            .map(|(i, p)| GeomWithData::new([p.x, p.y], i))
            .collect();
        Self { tree: RTree::bulk_load(entries), points: points.to_vec(), bounds }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Query bounds.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Voronoi cell of point `index`, clipped to the bounds.
    ///
    /// Returns `None` for unindexed points, including duplicates of an
    /// earlier point, so the cells tile the bounds.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<Vec<Point>> {
        let site = *self.points.get(index)?;
        if !site.x.is_finite() || !site.y.is_finite() {
            return None;
        }
        let owner = self.tree.locate_at_point(&[site.x, site.y]).map(|p| p.data);
        if owner != Some(index) {
            return None;
        }

        let mut cell: Vec<Point> = self.bounds.corners().to_vec();
        for neighbor in self.tree.nearest_neighbor_iter(&[site.x, site.y]) {
            if neighbor.data == index {
                continue;
            }
            let [nx, ny] = *neighbor.geom();
            let other = Point::new(nx, ny);
            let d2 = site.distance_squared(other);
            // Neighbours farther than twice the cell radius cannot cut the cell.
            let reach = cell.iter().map(|v| site.distance_squared(*v)).fold(0.0f32, f32::max);
            if d2 > 4.0 * reach {
                break;
            }
            cell = clip_to_bisector(&cell, site, other);
            if cell.is_empty() {
                break;
            }
        }
        Some(cell)
    }

    /// Clipped cells for every point, `None` for unindexed ones.
    #[must_use]
    pub fn cells(&self) -> Vec<Option<Vec<Point>>> {
        (0..self.points.len()).map(|i| self.cell(i)).collect()
    }
}

impl NearestPoint for RTreeIndex {
    fn nearest(&self, query: Point) -> Option<usize> {
        if !self.bounds.contains(query) {
            return None;
        }
        self.tree.nearest_neighbor(&[query.x, query.y]).map(|p| p.data)
    }
}

/// Brute-force nearest-point search.
#[derive(Debug, Clone)]
pub struct LinearScan {
    points: Vec<Point>,
    bounds: Rect,
}

impl LinearScan {
    /// Create a scan over `points` for queries inside `bounds`.
    #[must_use]
    pub fn new(points: &[Point], bounds: Rect) -> Self {
        Self { points: points.to_vec(), bounds }
    }
}

impl NearestPoint for LinearScan {
    fn nearest(&self, query: Point) -> Option<usize> {
        if !self.bounds.contains(query) {
            return None;
        }
        self.points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.x.is_finite() && p.y.is_finite())
            .min_by(|(_, a), (_, b)| {
                query.distance_squared(**a).total_cmp(&query.distance_squared(**b))
            })
            .map(|(i, _)| i)
    }
}

/// Keep the part of a convex polygon closer to `site` than to `other`.
fn clip_to_bisector(polygon: &[Point], site: Point, other: Point) -> Vec<Point> {
    // Half-plane: dot(p - mid, other - site) <= 0
    let mid = Point::new((site.x + other.x) / 2.0, (site.y + other.y) / 2.0);
    let (nx, ny) = (other.x - site.x, other.y - site.y);
    let side = |p: Point| (p.x - mid.x) * nx + (p.y - mid.y) * ny;

    let mut out = Vec::with_capacity(polygon.len() + 1);
    for (i, &current) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (sc, sn) = (side(current), side(next));
        if sc <= 0.0 {
            out.push(current);
        }
        if (sc <= 0.0) != (sn <= 0.0) {
            let t = sc / (sc - sn);
            let (dx, dy) = (next.x - current.x, next.y - current.y);
            out.push(Point::new(current.x + t * dx, current.y + t * dy));
        }
    }
    out
}

/// Area of a simple polygon (absolute value of the shoelace sum).
#[must_use]
pub fn polygon_area(polygon: &[Point]) -> f32 {
    let n = polygon.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| {
            let (a, b) = (polygon[i], polygon[(i + 1) % n]);
            a.x * b.y - b.x * a.y
        })
        .sum();
    twice.abs() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> Rect {
        Rect::new(0.0, 0.0, 100.0, 100.0)
    }

    #[test]
    fn test_nearest_basic() {
        let points = [Point::new(10.0, 10.0), Point::new(90.0, 90.0)];
        let index = RTreeIndex::new(&points, bounds());
        assert_eq!(index.nearest(Point::new(20.0, 20.0)), Some(0));
        assert_eq!(index.nearest(Point::new(80.0, 70.0)), Some(1));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_outside_bounds_is_none() {
        let index = RTreeIndex::new(&[Point::new(10.0, 10.0)], bounds());
        assert_eq!(index.nearest(Point::new(-1.0, 10.0)), None);
        assert_eq!(index.nearest(Point::new(10.0, 101.0)), None);
    }

    #[test]
    fn test_empty_index() {
        let index = RTreeIndex::new(&[], bounds());
        assert!(index.is_empty());
        assert_eq!(index.nearest(Point::new(50.0, 50.0)), None);
        assert!(index.cells().is_empty());
    }

    #[test]
    fn test_non_finite_points_skipped() {
        let points = [Point::new(f32::NAN, 1.0), Point::new(50.0, 50.0)];
        let index = RTreeIndex::new(&points, bounds());
        assert_eq!(index.len(), 1);
        assert_eq!(index.nearest(Point::new(0.0, 0.0)), Some(1));
        assert!(index.cell(0).is_none());
    }

    #[test]
    fn test_two_cells_split_bounds() {
        let points = [Point::new(25.0, 50.0), Point::new(75.0, 50.0)];
        let index = RTreeIndex::new(&points, bounds());
        let left = index.cell(0).unwrap();
        let right = index.cell(1).unwrap();
        assert!((polygon_area(&left) - 5000.0).abs() < 1e-2);
        assert!((polygon_area(&right) - 5000.0).abs() < 1e-2);
        assert!(left.iter().all(|p| p.x <= 50.0 + 1e-4));
    }

    #[test]
    fn test_cells_tile_bounds() {
        let points: Vec<Point> = (0..25)
            .map(|i| Point::new(((i * 37) % 100) as f32 + 0.5, ((i * 61) % 100) as f32 + 0.5))
            .collect();
        let index = RTreeIndex::new(&points, bounds());
        let total: f32 = index.cells().iter().flatten().map(|c| polygon_area(c)).sum();
        assert!((total - 10_000.0).abs() < 1.0, "total area {total}");
    }

    #[test]
    fn test_coincident_points_keep_lowest_index() {
        let points = [Point::new(70.0, 50.0), Point::new(30.0, 50.0), Point::new(30.0, 50.0)];
        let index = RTreeIndex::new(&points, bounds());
        assert_eq!(index.len(), 2);
        assert_eq!(index.nearest(Point::new(20.0, 50.0)), Some(1));
        assert!(index.cell(2).is_none());

        let cells = index.cells();
        let total: f32 = cells.iter().flatten().map(|c| polygon_area(c)).sum();
        assert!((total - 10_000.0).abs() < 1e-2, "total area {total}");
        assert!((polygon_area(cells[1].as_ref().unwrap()) - 5000.0).abs() < 1e-2);
    }

    #[test]
    fn test_single_point_cell_is_bounds() {
        let index = RTreeIndex::new(&[Point::new(30.0, 40.0)], bounds());
        let cell = index.cell(0).unwrap();
        assert!((polygon_area(&cell) - 10_000.0).abs() < 1e-3);
    }

    #[test]
    fn test_linear_scan_agrees() {
        let points = [Point::new(10.0, 80.0), Point::new(60.0, 20.0), Point::new(90.0, 90.0)];
        let tree = RTreeIndex::new(&points, bounds());
        let scan = LinearScan::new(&points, bounds());
        let queries = [
            Point::new(0.0, 0.0),
            Point::new(50.0, 50.0),
            Point::new(100.0, 100.0),
            Point::new(15.0, 70.0),
        ];
        for q in queries {
            assert_eq!(tree.nearest(q), scan.nearest(q));
        }
    }
}
