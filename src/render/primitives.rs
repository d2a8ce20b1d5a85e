//! Primitive rendering functions.
//!
//! Implements rasterization algorithms for the shapes a widget scene can hold.
//! Every fill honors the color's alpha channel, so faded elements composite
//! over whatever was drawn before them.

use crate::color::Rgba;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::shape::Path;

/// Trait for drawable primitives.
pub trait Drawable {
    /// Draw this primitive to a framebuffer.
    fn draw(&self, fb: &mut Framebuffer, color: Rgba);

    /// Draw this primitive with anti-aliasing if supported.
    fn draw_aa(&self, fb: &mut Framebuffer, color: Rgba) {
        self.draw(fb, color);
    }
}

// ============================================================================
// Line Drawing
// ============================================================================

/// Draw a line using Bresenham's algorithm (non-antialiased).
pub fn draw_line(fb: &mut Framebuffer, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let (mut x, mut y) = (x0, y0);

    loop {
        if x >= 0 && y >= 0 {
            fb.blend_pixel(x as u32, y as u32, color);
        }
        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw an anti-aliased line using Wu's algorithm.
///
/// # References
///
/// Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
pub fn draw_line_aa(fb: &mut Framebuffer, x0: f32, y0: f32, x1: f32, y1: f32, color: Rgba) {
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    let (x0, y0, x1, y1) = if steep { (y0, x0, y1, x1) } else { (x0, y0, x1, y1) };
    let (x0, y0, x1, y1) = if x0 > x1 { (x1, y1, x0, y0) } else { (x0, y0, x1, y1) };

    let dx = x1 - x0;
    let dy = y1 - y0;
    let gradient = if dx.abs() < f32::EPSILON { 1.0 } else { dy / dx };

    let mut plot_pair = |major: i32, minor: f32, coverage: f32| {
        let ipart = minor.floor() as i32;
        if steep {
            plot(fb, ipart, major, color, rfpart(minor) * coverage);
            plot(fb, ipart + 1, major, color, fpart(minor) * coverage);
        } else {
            plot(fb, major, ipart, color, rfpart(minor) * coverage);
            plot(fb, major, ipart + 1, color, fpart(minor) * coverage);
        }
    };

    let xend = x0.round();
    let yend = y0 + gradient * (xend - x0);
    let xpxl1 = xend as i32;
    plot_pair(xpxl1, yend, rfpart(x0 + 0.5));
    let mut intery = yend + gradient;

    let xend = x1.round();
    let yend = y1 + gradient * (xend - x1);
    let xpxl2 = xend as i32;
    plot_pair(xpxl2, yend, fpart(x1 + 0.5));

    for x in (xpxl1 + 1)..xpxl2 {
        plot_pair(x, intery, 1.0);
        intery += gradient;
    }
}

#[inline]
fn plot(fb: &mut Framebuffer, x: i32, y: i32, color: Rgba, intensity: f32) {
    if x >= 0 && y >= 0 {
        fb.blend_pixel(x as u32, y as u32, color.faded(intensity));
    }
}

#[inline]
fn fpart(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn rfpart(x: f32) -> f32 {
    1.0 - fpart(x)
}

// ============================================================================
// Spans, Rectangles and Polygons
// ============================================================================

/// Fill the pixels `x1..=x2` on row `y`, blending unless the color is opaque.
fn draw_span(fb: &mut Framebuffer, x1: i32, x2: i32, y: i32, color: Rgba) {
    if y < 0 || y >= fb.height() as i32 || color.a == 0 {
        return;
    }
    let x_start = x1.max(0);
    let x_end = (x2 + 1).min(fb.width() as i32);
    if x_start >= x_end {
        return;
    }

    if color.a == 255 {
        fb.fill_rect(x_start as u32, y as u32, (x_end - x_start) as u32, 1, color);
    } else {
        for x in x_start..x_end {
            fb.blend_pixel(x as u32, y as u32, color);
        }
    }
}

/// Draw a filled rectangle.
pub fn draw_rect(fb: &mut Framebuffer, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
    for row in y..y.saturating_add(height as i32) {
        draw_span(fb, x, x + width as i32 - 1, row, color);
    }
}

/// Draw a rectangle outline with the given border thickness.
pub fn draw_rect_outline(
    fb: &mut Framebuffer,
    x: i32,
    y: i32,
    width: u32,
    height: u32,
    color: Rgba,
    thickness: u32,
) {
    let t = thickness.max(1).min(width.max(1)).min(height.max(1));
    draw_rect(fb, x, y, width, t, color);
    if height > t {
        draw_rect(fb, x, y + (height - t) as i32, width, t, color);
    }
    if height > 2 * t {
        let inner_h = height - 2 * t;
        draw_rect(fb, x, y + t as i32, t, inner_h, color);
        if width > t {
            draw_rect(fb, x + (width - t) as i32, y + t as i32, t, inner_h, color);
        }
    }
}

/// Fill a polygon with the even-odd rule, sampling at pixel centers.
pub fn fill_polygon(fb: &mut Framebuffer, points: &[Point], color: Rgba) {
    if points.len() < 3 {
        return;
    }

    let (min_y, max_y) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
    let first_row = min_y.floor().max(0.0) as i32;
    let last_row = max_y.ceil().min(fb.height() as f32) as i32;

    let mut crossings: Vec<f32> = Vec::new();
    for row in first_row..last_row {
        let sample_y = row as f32 + 0.5;
        crossings.clear();

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if (a.y <= sample_y && b.y > sample_y) || (b.y <= sample_y && a.y > sample_y) {
                let t = (sample_y - a.y) / (b.y - a.y);
                crossings.push(a.x + t * (b.x - a.x));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let x1 = (pair[0] - 0.5).ceil() as i32;
            let x2 = (pair[1] - 0.5).floor() as i32;
            draw_span(fb, x1, x2, row, color);
        }
    }
}

// ============================================================================
// Circles
// ============================================================================

/// Draw a filled circle using the midpoint algorithm.
///
/// Each row is filled once, so translucent colors blend uniformly.
pub fn draw_circle(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        if radius == 0 {
            draw_span(fb, cx, cx, cy, color);
        }
        return;
    }

    let r2 = radius * radius + radius;
    for dy in -radius..=radius {
        let half = f64::from(r2 - dy * dy).sqrt() as i32;
        draw_span(fb, cx - half, cx + half, cy + dy, color);
    }
}

/// Draw a circle outline.
pub fn draw_circle_outline(fb: &mut Framebuffer, cx: i32, cy: i32, radius: i32, color: Rgba) {
    if radius <= 0 {
        return;
    }

    let mut x = radius;
    let mut y = 0;
    let mut err = 1 - radius;
    let mut plotted = std::collections::HashSet::new();

    while x >= y {
        for (px, py) in [(x, y), (-x, y), (x, -y), (-x, -y), (y, x), (-y, x), (y, -x), (-y, -x)] {
            let (px, py) = (cx + px, cy + py);
            if px >= 0 && py >= 0 && plotted.insert((px, py)) {
                fb.blend_pixel(px as u32, py as u32, color);
            }
        }

        y += 1;
        if err < 0 {
            err += 2 * y + 1;
        } else {
            x -= 1;
            err += 2 * (y - x) + 1;
        }
    }
}

impl Drawable for Rect {
    fn draw(&self, fb: &mut Framebuffer, color: Rgba) {
        let (x, y) = (self.x.round() as i32, self.y.round() as i32);
        draw_rect(fb, x, y, self.width.round() as u32, self.height.round() as u32, color);
    }
}

impl Drawable for Path {
    fn draw(&self, fb: &mut Framebuffer, color: Rgba) {
        for ring in self.flatten() {
            fill_polygon(fb, &ring, color);
        }
    }
}

/// Stroke every segment of a path's flattened outline.
pub fn stroke_path(fb: &mut Framebuffer, path: &Path, color: Rgba) {
    for ring in path.flatten() {
        for pair in ring.windows(2) {
            draw_line_aa(fb, pair[0].x, pair[0].y, pair[1].x, pair[1].y, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> Framebuffer {
        let mut fb = Framebuffer::new(100, 100).expect("framebuffer creation should succeed");
        fb.clear(Rgba::WHITE);
        fb
    }

    #[test]
    fn test_draw_line_horizontal() {
        let mut fb = canvas();
        draw_line(&mut fb, 10, 50, 90, 50, Rgba::BLACK);
        assert_eq!(fb.get_pixel(10, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(90, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_line_out_of_bounds() {
        let mut fb = canvas();
        draw_line(&mut fb, -10, -10, 110, 110, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
    }

    #[test]
    fn test_draw_line_aa_touches_path() {
        let mut fb = canvas();
        draw_line_aa(&mut fb, 10.0, 10.0, 90.0, 10.0, Rgba::BLACK);
        let px = fb.get_pixel(50, 10).unwrap();
        assert!(px.r < 255);
    }

    #[test]
    fn test_draw_rect_blends_translucent() {
        let mut fb = canvas();
        draw_rect(&mut fb, 20, 20, 30, 30, Rgba::BLACK.faded(0.5));
        let px = fb.get_pixel(25, 25).unwrap();
        assert!(px.r > 100 && px.r < 150);
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_rect_outline() {
        let mut fb = canvas();
        draw_rect_outline(&mut fb, 20, 20, 30, 30, Rgba::BLACK, 2);
        assert_eq!(fb.get_pixel(20, 20), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(49, 35), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(35, 35), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_circle() {
        let mut fb = canvas();
        draw_circle(&mut fb, 50, 50, 20, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(70, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(5, 5), Some(Rgba::WHITE));
    }

    #[test]
    fn test_draw_circle_outline() {
        let mut fb = canvas();
        draw_circle_outline(&mut fb, 50, 50, 20, Rgba::BLACK);
        assert_eq!(fb.get_pixel(70, 50), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::WHITE));
    }

    #[test]
    fn test_circle_zero_radius() {
        let mut fb = canvas();
        draw_circle(&mut fb, 50, 50, 0, Rgba::BLACK);
        assert_eq!(fb.get_pixel(50, 50), Some(Rgba::BLACK));
        assert_eq!(fb.count_ink(Rgba::WHITE), 1);
    }

    #[test]
    fn test_fill_polygon_square() {
        let mut fb = canvas();
        let square = [
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(20.0, 20.0),
            Point::new(10.0, 20.0),
        ];
        fill_polygon(&mut fb, &square, Rgba::BLACK);
        assert_eq!(fb.count_ink(Rgba::WHITE), 100);
        assert_eq!(fb.get_pixel(10, 10), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(20, 20), Some(Rgba::WHITE));
    }

    #[test]
    fn test_fill_polygon_degenerate() {
        let mut fb = canvas();
        fill_polygon(&mut fb, &[Point::new(1.0, 1.0), Point::new(5.0, 5.0)], Rgba::BLACK);
        assert_eq!(fb.count_ink(Rgba::WHITE), 0);
    }

    #[test]
    fn test_drawable_rect_and_path() {
        let mut fb = canvas();
        Rect::new(0.0, 0.0, 10.0, 10.0).draw(&mut fb, Rgba::BLACK);
        assert_eq!(fb.count_ink(Rgba::WHITE), 100);

        let corners = [Point::new(50.0, 50.0), Point::new(90.0, 50.0), Point::new(50.0, 90.0)];
        let triangle = Path::polygon(&corners);
        triangle.draw(&mut fb, Rgba::BLACK);
        assert_eq!(fb.get_pixel(55, 55), Some(Rgba::BLACK));
        assert_eq!(fb.get_pixel(85, 85), Some(Rgba::WHITE));
    }
}
