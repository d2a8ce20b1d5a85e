//! SVG output encoder.
//!
//! Writes a [`Scene`] as standalone vector SVG. Element classes become `class`
//! attributes, hidden elements are emitted with `visibility="hidden"` so the
//! document mirrors the retained scene, and gradients are written to `<defs>`.

use crate::color::Rgba;
use crate::error::Result;
use crate::scene::{Element, LinearGradient, Paint, Scene, Shape, Style, TextAnchor};
use std::fmt::Write as FmtWrite;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// SVG encoder for widget scenes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgEncoder;

impl SvgEncoder {
    /// Render a scene to an SVG document.
    #[must_use]
    pub fn encode(scene: &Scene) -> String {
        let mut svg = String::with_capacity(4096 + scene.len() * 96);

        let (w, h) = (scene.width(), scene.height());
        let _ = write!(svg, r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}""#);
        let _ = writeln!(svg, r#" viewBox="0 0 {w} {h}">"#);

        if !scene.gradients().is_empty() {
            svg.push_str("  <defs>\n");
            for gradient in scene.gradients() {
                write_gradient(&mut svg, gradient);
            }
            svg.push_str("  </defs>\n");
        }

        if let Some(bg) = scene.background() {
            let fill = rgba_to_css(bg);
            let _ = writeln!(svg, r#"  <rect width="100%" height="100%" fill="{fill}"/>"#);
        }

        for element in scene.elements() {
            let _ = writeln!(svg, "  {}", element_to_svg(element));
        }

        svg.push_str("</svg>\n");
        svg
    }

    /// Write a scene to an SVG file.
    ///
    /// # Errors
    ///
    /// Returns an error if file writing fails.
    pub fn write_to_file<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(Self::encode(scene).as_bytes())?;
        Ok(())
    }
}

fn write_gradient(svg: &mut String, gradient: &LinearGradient) {
    let _ = writeln!(svg, r#"    <linearGradient id="{}">"#, escape(&gradient.id));
    for (offset, color) in &gradient.stops {
        let _ = writeln!(
            svg,
            r#"      <stop offset="{}%" stop-color="{}"/>"#,
            (offset * 1000.0).round() / 10.0,
            rgba_to_css(*color)
        );
    }
    svg.push_str("    </linearGradient>\n");
}

/// Convert RGBA to CSS color string.
fn rgba_to_css(color: Rgba) -> String {
    if color.a == 255 {
        format!("rgb({},{},{})", color.r, color.g, color.b)
    } else {
        format!("rgba({},{},{},{:.3})", color.r, color.g, color.b, f32::from(color.a) / 255.0)
    }
}

/// Escape XML special characters.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn paint_attr(paint: Option<&Paint>) -> String {
    match paint {
        Some(Paint::Solid(color)) => rgba_to_css(*color),
        Some(Paint::Gradient(id)) => format!("url(#{})", escape(id)),
        None => "none".to_string(),
    }
}

/// Attributes shared by every element: class, fill, stroke, opacity, visibility.
fn common_attrs(class: &str, style: &Style, with_fill: bool) -> String {
    let mut attrs = format!(r#" class="{}""#, escape(class));
    if with_fill {
        let _ = write!(attrs, r#" fill="{}""#, paint_attr(style.fill.as_ref()));
    }
    if let Some(stroke) = style.stroke {
        let (css, width) = (rgba_to_css(stroke), style.stroke_width);
        let _ = write!(attrs, r#" stroke="{css}" stroke-width="{width}""#);
    }
    if style.opacity < 1.0 {
        let _ = write!(attrs, r#" opacity="{}""#, style.opacity);
    }
    if !style.visible {
        attrs.push_str(r#" visibility="hidden""#);
    }
    attrs
}

/// Convert a scene element to its SVG string representation.
fn element_to_svg(element: &Element) -> String {
    let Element { class, shape, style } = element;
    match shape {
        Shape::Rect(r) => {
            let attrs = common_attrs(class, style, true);
            let (x, y, w, h) = (r.x, r.y, r.width, r.height);
            format!(r#"<rect x="{x}" y="{y}" width="{w}" height="{h}"{attrs}/>"#)
        }
        Shape::Circle { center, radius } => {
            let attrs = common_attrs(class, style, true);
            format!(r#"<circle cx="{}" cy="{}" r="{radius}"{attrs}/>"#, center.x, center.y)
        }
        Shape::Line { from, to } => {
            let attrs = common_attrs(class, style, false);
            format!(r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{attrs}/>"#, from.x, from.y, to.x, to.y)
        }
        Shape::Path(path) => {
            let attrs = common_attrs(class, style, true);
            format!(r#"<path d="{}"{attrs}/>"#, path.to_svg_data())
        }
        Shape::Text { at, content, font_size, anchor } => {
            let anchor_str = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let attrs = common_attrs(class, style, true);
            format!(
                concat!(
                    r#"<text x="{}" y="{}" font-size="{}" text-anchor="{}""#,
                    r#" font-family="sans-serif"{}>{}</text>"#,
                ),
                at.x,
                at.y,
                font_size,
                anchor_str,
                attrs,
                escape(content)
            )
        }
    }
}
