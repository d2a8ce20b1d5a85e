//! Retained scene: the element tree a widget owns and redraws into.
//!
//! Elements are addressed by a stable [`ElementId`] and grouped by a class
//! name, so a widget can remove everything it previously rendered under a
//! class before binding fresh elements. A scene is encoded to SVG by
//! [`crate::output::SvgEncoder`] or rasterized with [`Scene::rasterize`].

use crate::color::Rgba;
use crate::error::Result;
use crate::framebuffer::Framebuffer;
use crate::geometry::{Point, Rect};
use crate::render::{
    draw_circle, draw_circle_outline, draw_line_aa, draw_rect, draw_rect_outline, stroke_path,
    Drawable,
};
use crate::shape::Path;

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor.
    #[default]
    Start,
    /// Text is centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Horizontal linear gradient, referenced from a [`Paint::Gradient`].
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradient {
    /// Identifier unique within the scene.
    pub id: String,
    /// Offset (`0..=1`) and color pairs, sorted by offset.
    pub stops: Vec<(f32, Rgba)>,
}

impl LinearGradient {
    /// Evenly spaced stops sampled from `color_at(t)` for `t` in `[0, 1]`.
    #[must_use]
    pub fn sampled(id: impl Into<String>, count: usize, color_at: impl Fn(f32) -> Rgba) -> Self {
        let count = count.max(2);
        let stops = (0..count)
            .map(|i| {
                let t = i as f32 / (count - 1) as f32;
                (t, color_at(t))
            })
            .collect();
        Self { id: id.into(), stops }
    }

    /// Color at offset `t`, interpolating between neighbouring stops.
    #[must_use]
    pub fn sample(&self, t: f32) -> Rgba {
        let Some(&(first_offset, first)) = self.stops.first() else {
            return Rgba::TRANSPARENT;
        };
        if t <= first_offset {
            return first;
        }
        for pair in self.stops.windows(2) {
            let ((o0, c0), (o1, c1)) = (pair[0], pair[1]);
            if t <= o1 {
                let span = (o1 - o0).max(f32::EPSILON);
                return c0.lerp(c1, (t - o0) / span);
            }
        }
        self.stops.last().map_or(first, |&(_, c)| c)
    }
}

/// Fill paint.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    /// A single color.
    Solid(Rgba),
    /// A scene gradient, by id.
    Gradient(String),
}

/// Geometry of an element, in scene (pixel) coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect(Rect),
    /// Circle.
    Circle {
        /// Center.
        center: Point,
        /// Radius in pixels.
        radius: f32,
    },
    /// Straight segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
    },
    /// Arbitrary path.
    Path(Path),
    /// Single line of text.
    Text {
        /// Anchor point (baseline).
        at: Point,
        /// Text content.
        content: String,
        /// Font size in pixels.
        font_size: f32,
        /// Alignment relative to `at`.
        anchor: TextAnchor,
    },
}

/// Presentation attributes of an element.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    /// Fill paint, if any.
    pub fill: Option<Paint>,
    /// Stroke color, if any.
    pub stroke: Option<Rgba>,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// Element opacity in `[0, 1]`.
    pub opacity: f32,
    /// Hidden elements stay in the scene but are not drawn.
    pub visible: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self { fill: None, stroke: None, stroke_width: 1.0, opacity: 1.0, visible: true }
    }
}

impl Style {
    /// Solid fill, no stroke.
    #[must_use]
    pub fn filled(color: Rgba) -> Self {
        Self { fill: Some(Paint::Solid(color)), ..Self::default() }
    }

    /// Stroke only.
    #[must_use]
    pub fn stroked(color: Rgba, width: f32) -> Self {
        Self { stroke: Some(color), stroke_width: width, ..Self::default() }
    }

    /// Add a stroke.
    #[must_use]
    pub fn with_stroke(mut self, color: Rgba, width: f32) -> Self {
        self.stroke = Some(color);
        self.stroke_width = width;
        self
    }

    /// Set opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Start hidden.
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A drawable element tagged with a class name.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Class used to address groups of elements.
    pub class: String,
    /// Geometry.
    pub shape: Shape,
    /// Presentation.
    pub style: Style,
}

impl Element {
    /// Create an element.
    #[must_use]
    pub fn new(class: impl Into<String>, shape: Shape, style: Style) -> Self {
        Self { class: class.into(), shape, style }
    }
}

/// Stable handle to an element in a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ElementId(usize);

/// A widget's retained drawing container.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f32,
    height: f32,
    background: Option<Rgba>,
    gradients: Vec<LinearGradient>,
    /// Kept sorted by id, which is also paint order.
    elements: Vec<(ElementId, Element)>,
    next_id: usize,
}

impl Scene {
    /// Create an empty scene with a white background.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            background: Some(Rgba::WHITE),
            gradients: Vec::new(),
            elements: Vec::new(),
            next_id: 0,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Background color (`None` for transparent).
    #[must_use]
    pub const fn background(&self) -> Option<Rgba> {
        self.background
    }

    /// Set the background color.
    pub fn set_background(&mut self, color: Option<Rgba>) {
        self.background = color;
    }

    /// Register a gradient, replacing any with the same id.
    pub fn add_gradient(&mut self, gradient: LinearGradient) {
        self.gradients.retain(|g| g.id != gradient.id);
        self.gradients.push(gradient);
    }

    /// Registered gradients.
    #[must_use]
    pub fn gradients(&self) -> &[LinearGradient] {
        &self.gradients
    }

    /// Gradient by id.
    #[must_use]
    pub fn gradient(&self, id: &str) -> Option<&LinearGradient> {
        self.gradients.iter().find(|g| g.id == id)
    }

    /// Append an element on top of everything drawn so far.
    pub fn push(&mut self, element: Element) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.push((id, element));
        id
    }

    /// Element by id, if it has not been removed.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        let idx = self.elements.binary_search_by_key(&id, |(eid, _)| *eid).ok()?;
        Some(&self.elements[idx].1)
    }

    /// Mutable element by id.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        let idx = self.elements.binary_search_by_key(&id, |(eid, _)| *eid).ok()?;
        Some(&mut self.elements[idx].1)
    }

    /// Remove every element with the given class; returns how many were removed.
    pub fn remove_by_class(&mut self, class: &str) -> usize {
        let before = self.elements.len();
        self.elements.retain(|(_, e)| e.class != class);
        before - self.elements.len()
    }

    /// Elements with the given class, in paint order.
    pub fn by_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.elements.iter().map(|(_, e)| e).filter(move |e| e.class == class)
    }

    /// Number of elements with the given class.
    #[must_use]
    pub fn count_class(&self, class: &str) -> usize {
        self.by_class(class).count()
    }

    /// All elements in paint order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter().map(|(_, e)| e)
    }

    /// Remove all elements and gradients.
    pub fn clear(&mut self) {
        self.elements.clear();
        self.gradients.clear();
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the scene holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Rasterize visible elements in paint order.
    ///
    /// Text is vector-only and is skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if the scene has a zero-sized extent.
    pub fn rasterize(&self) -> Result<Framebuffer> {
        let mut fb = Framebuffer::new(self.width.round() as u32, self.height.round() as u32)?;
        if let Some(bg) = self.background {
            fb.clear(bg);
        }
        for element in self.elements().filter(|e| e.style.visible && e.style.opacity > 0.0) {
            self.draw_element(&mut fb, element);
        }
        Ok(fb)
    }

    fn draw_element(&self, fb: &mut Framebuffer, element: &Element) {
        let style = &element.style;
        let stroke = style.stroke.map(|c| c.faded(style.opacity));
        let thickness = style.stroke_width.round().max(1.0) as u32;

        match &element.shape {
            Shape::Rect(rect) => {
                match &style.fill {
                    Some(Paint::Solid(color)) => rect.draw(fb, color.faded(style.opacity)),
                    Some(Paint::Gradient(id)) => {
                        if let Some(gradient) = self.gradient(id) {
                            let (x0, y0) = (rect.x.round() as i32, rect.y.round() as i32);
                            let height = rect.height.round() as u32;
                            let columns = rect.width.round().max(0.0) as i32;
                            for col in 0..columns {
                                let t = (col as f32 + 0.5) / rect.width.max(1.0);
                                let color = gradient.sample(t).faded(style.opacity);
                                draw_rect(fb, x0 + col, y0, 1, height, color);
                            }
                        }
                    }
                    None => {}
                }
                if let Some(color) = stroke {
                    draw_rect_outline(
                        fb,
                        rect.x.round() as i32,
                        rect.y.round() as i32,
                        rect.width.round() as u32,
                        rect.height.round() as u32,
                        color,
                        thickness,
                    );
                }
            }
            Shape::Circle { center, radius } => {
                let (cx, cy) = (center.x.round() as i32, center.y.round() as i32);
                let r = radius.round() as i32;
                if let Some(color) = self.solid_fill(style) {
                    draw_circle(fb, cx, cy, r, color);
                }
                if let Some(color) = stroke {
                    draw_circle_outline(fb, cx, cy, r, color);
                }
            }
            Shape::Line { from, to } => {
                if let Some(color) = stroke {
                    draw_line_aa(fb, from.x, from.y, to.x, to.y, color);
                }
            }
            Shape::Path(path) => {
                if let Some(color) = self.solid_fill(style) {
                    path.draw(fb, color);
                }
                if let Some(color) = stroke {
                    stroke_path(fb, path, color);
                }
            }
            Shape::Text { .. } => {}
        }
    }

    /// Fill color for shapes without per-pixel gradient support.
    fn solid_fill(&self, style: &Style) -> Option<Rgba> {
        let color = match style.fill.as_ref()? {
            Paint::Solid(color) => *color,
            Paint::Gradient(id) => self.gradient(id)?.sample(0.5),
        };
        Some(color.faded(style.opacity))
    }
}
