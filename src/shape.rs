//! Path geometry and the uniform cubic B-spline ("basis") area generator.
//!
//! The basis curve passes through the first and last points and is
//! approximated elsewhere, which smooths stepped data such as histogram
//! bins. Path data is kept as commands so the same shape can be written as
//! SVG path data or flattened into polygons for rasterization.

use std::fmt::Write as FmtWrite;

use crate::geometry::Point;

/// Segments used when flattening one cubic Bézier for rasterization.
const CUBIC_FLATTEN_STEPS: usize = 12;

/// A single path drawing command in absolute coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    /// Start a new subpath.
    MoveTo(Point),
    /// Straight segment to a point.
    LineTo(Point),
    /// Cubic Bézier with two control points and an end point.
    CubicTo(Point, Point, Point),
    /// Close the current subpath.
    Close,
}

/// A sequence of path commands.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Closed polygon through `points`.
    #[must_use]
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Self::new();
        for (i, &p) in points.iter().enumerate() {
            let command = if i == 0 { PathCommand::MoveTo(p) } else { PathCommand::LineTo(p) };
            path.commands.push(command);
        }
        if !points.is_empty() {
            path.commands.push(PathCommand::Close);
        }
        path
    }

    /// The recorded commands.
    #[must_use]
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Whether the path draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// SVG path data (`d` attribute), coordinates rounded to two decimals.
    #[must_use]
    pub fn to_svg_data(&self) -> String {
        let mut d = String::with_capacity(self.commands.len() * 16);
        for command in &self.commands {
            let _ = match command {
                PathCommand::MoveTo(p) => write!(d, "M{},{}", num(p.x), num(p.y)),
                PathCommand::LineTo(p) => write!(d, "L{},{}", num(p.x), num(p.y)),
                PathCommand::CubicTo(c1, c2, p) => write!(
                    d,
                    "C{},{},{},{},{},{}",
                    num(c1.x),
                    num(c1.y),
                    num(c2.x),
                    num(c2.y),
                    num(p.x),
                    num(p.y)
                ),
                PathCommand::Close => write!(d, "Z"),
            };
        }
        d
    }

    /// Flatten into one polygon per subpath, sampling curves.
    #[must_use]
    pub fn flatten(&self) -> Vec<Vec<Point>> {
        let mut polygons = Vec::new();
        let mut current: Vec<Point> = Vec::new();

        for command in &self.commands {
            match *command {
                PathCommand::MoveTo(p) => {
                    if current.len() > 1 {
                        polygons.push(std::mem::take(&mut current));
                    }
                    current.clear();
                    current.push(p);
                }
                PathCommand::LineTo(p) => current.push(p),
                PathCommand::CubicTo(c1, c2, p) => {
                    let p0 = current.last().copied().unwrap_or(c1);
                    for step in 1..=CUBIC_FLATTEN_STEPS {
                        let t = step as f32 / CUBIC_FLATTEN_STEPS as f32;
                        current.push(cubic_point(p0, c1, c2, p, t));
                    }
                }
                PathCommand::Close => {
                    if current.len() > 1 {
                        polygons.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if current.len() > 1 {
            polygons.push(current);
        }
        polygons
    }

    fn move_to(&mut self, p: Point) {
        self.commands.push(PathCommand::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(PathCommand::LineTo(p));
    }

    fn cubic_to(&mut self, c1: Point, c2: Point, p: Point) {
        self.commands.push(PathCommand::CubicTo(c1, c2, p));
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}

fn cubic_point(p0: Point, c1: Point, c2: Point, p1: Point, t: f32) -> Point {
    let mt = 1.0 - t;
    let a = mt * mt * mt;
    let b = 3.0 * mt * mt * t;
    let c = 3.0 * mt * t * t;
    let d = t * t * t;
    Point::new(
        a * p0.x + b * c1.x + c * c2.x + d * p1.x,
        a * p0.y + b * c1.y + c * c2.y + d * p1.y,
    )
}

fn num(v: f32) -> f32 {
    let rounded = (v * 100.0).round() / 100.0;
    // Avoid printing "-0".
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Streaming basis-spline writer. Feeds points one line at a time; an area is
/// two lines where the second continues the first and closes the shape.
struct BasisCurve<'a> {
    path: &'a mut Path,
    /// Whether the current line continues an open subpath.
    continues: bool,
    count: usize,
    p0: Point,
    p1: Point,
}

impl<'a> BasisCurve<'a> {
    fn new(path: &'a mut Path) -> Self {
        Self { path, continues: false, count: 0, p0: Point::ORIGIN, p1: Point::ORIGIN }
    }

    fn line_start(&mut self) {
        self.count = 0;
    }

    fn point(&mut self, p: Point) {
        match self.count {
            0 => {
                self.count = 1;
                if self.continues {
                    self.path.line_to(p);
                } else {
                    self.path.move_to(p);
                }
            }
            1 => self.count = 2,
            2 => {
                self.count = 3;
                self.path.line_to(Point::new(
                    (5.0 * self.p0.x + self.p1.x) / 6.0,
                    (5.0 * self.p0.y + self.p1.y) / 6.0,
                ));
                self.bezier(p);
            }
            _ => self.bezier(p),
        }
        self.p0 = self.p1;
        self.p1 = p;
    }

    fn bezier(&mut self, p: Point) {
        let (p0, p1) = (self.p0, self.p1);
        self.path.cubic_to(
            Point::new((2.0 * p0.x + p1.x) / 3.0, (2.0 * p0.y + p1.y) / 3.0),
            Point::new((p0.x + 2.0 * p1.x) / 3.0, (p0.y + 2.0 * p1.y) / 3.0),
            Point::new((p0.x + 4.0 * p1.x + p.x) / 6.0, (p0.y + 4.0 * p1.y + p.y) / 6.0),
        );
    }

    fn line_end(&mut self) {
        if self.count >= 3 {
            let last = self.p1;
            self.point(last);
        }
        if self.count >= 2 {
            self.path.line_to(self.p1);
        }
        if self.continues {
            self.path.close();
        }
        self.continues = !self.continues;
    }
}

/// Basis-spline area between a top line and a baseline.
///
/// `top` and `baseline` are given in the same left-to-right order; the
/// baseline is traced backwards so the outline closes. Empty input yields an
/// empty path.
#[must_use]
pub fn area_basis(top: &[Point], baseline: &[Point]) -> Path {
    let mut path = Path::new();
    if top.is_empty() {
        return path;
    }

    let mut curve = BasisCurve::new(&mut path);
    curve.line_start();
    for &p in top {
        curve.point(p);
    }
    curve.line_end();

    curve.line_start();
    for &p in baseline.iter().rev() {
        curve.point(p);
    }
    curve.line_end();

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(coords: &[(f32, f32)]) -> Vec<Point> {
        coords.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_area_basis_svg_data() {
        let top = pts(&[(0.0, 0.0), (6.0, 6.0), (12.0, 0.0)]);
        let base = pts(&[(0.0, 10.0), (6.0, 10.0), (12.0, 10.0)]);
        let d = area_basis(&top, &base).to_svg_data();

        assert!(d.starts_with("M0,0L1,1C2,2,4,4,6,4C8,4,10,2,11,1L12,0L12,10L11,10C"), "{d}");
        assert!(d.ends_with("L0,10Z"), "{d}");
    }

    #[test]
    fn test_area_basis_two_points_is_straight() {
        let top = pts(&[(0.0, 0.0), (10.0, 5.0)]);
        let base = pts(&[(0.0, 20.0), (10.0, 20.0)]);
        assert_eq!(area_basis(&top, &base).to_svg_data(), "M0,0L10,5L10,20L0,20Z");
    }

    #[test]
    fn test_area_basis_empty() {
        assert!(area_basis(&[], &[]).is_empty());
    }

    #[test]
    fn test_polygon_and_flatten() {
        let square = Path::polygon(&pts(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)]));
        assert_eq!(square.to_svg_data(), "M0,0L4,0L4,4L0,4Z");
        let rings = square.flatten();
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
    }

    #[test]
    fn test_flatten_samples_curves() {
        let top = pts(&[(0.0, 0.0), (6.0, 6.0), (12.0, 0.0)]);
        let base = pts(&[(0.0, 10.0), (6.0, 10.0), (12.0, 10.0)]);
        let rings = area_basis(&top, &base).flatten();
        assert_eq!(rings.len(), 1);
        assert!(rings[0].len() > 6 * CUBIC_FLATTEN_STEPS / 2);
    }
}
