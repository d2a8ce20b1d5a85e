//! Rasterization of scene primitives.
//!
//! # Algorithms
//!
//! - **Wu's Anti-aliased Line**: link and axis strokes
//! - **Bresenham's Line**: hairlines
//! - **Midpoint Circle**: node and point markers
//! - **Even-odd scanline fill**: histogram areas and Voronoi cells
//!
//! # References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Bresenham, J. E. (1965). "Algorithm for computer control of a digital plotter."

mod primitives;

pub use primitives::{
    draw_circle, draw_circle_outline, draw_line, draw_line_aa, draw_rect, draw_rect_outline,
    fill_polygon, stroke_path, Drawable,
};
