//! Axis rendering for widget scenes.
//!
//! An [`Axis`] is a list of tick positions with labels along one edge of the
//! plot area. It is built from a scale and drawn as a domain line, one tick
//! mark per tick and one text label per tick, all tagged with the caller's
//! class so the axis can be removed and redrawn with the rest of the chart.

use crate::color::Rgba;
use crate::geometry::Point;
use crate::scale::{BandScale, LinearScale, Scale};
use crate::scene::{Element, Scene, Shape, Style, TextAnchor};

const TICK_SIZE: f32 = 6.0;
const LABEL_PADDING: f32 = 3.0;
const FONT_SIZE: f32 = 10.0;

/// Edge the axis is drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    /// Horizontal axis, ticks pointing down.
    Bottom,
    /// Vertical axis, ticks pointing left.
    Left,
}

/// A single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Offset along the axis in pixels.
    pub position: f32,
    /// Label text.
    pub label: String,
}

/// A positioned axis ready to be drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    orient: AxisOrient,
    range: (f32, f32),
    ticks: Vec<Tick>,
    origin: Point,
}

impl Axis {
    /// Axis with one tick per band, at the band centers.
    #[must_use]
    pub fn band(scale: &BandScale, range: (f32, f32), orient: AxisOrient) -> Self {
        let ticks = scale
            .labels()
            .iter()
            .filter_map(|label| {
                scale.center(label).map(|position| Tick { position, label: label.clone() })
            })
            .collect();
        Self { orient, range, ticks, origin: Point::ORIGIN }
    }

    /// Axis with about `count` round ticks from a linear scale.
    #[must_use]
    pub fn linear(scale: &LinearScale, count: usize, orient: AxisOrient) -> Self {
        Self::linear_with(scale, count, orient, format_tick)
    }

    /// Linear axis with a custom label formatter.
    #[must_use]
    pub fn linear_with(
        scale: &LinearScale,
        count: usize,
        orient: AxisOrient,
        format: impl Fn(f32) -> String,
    ) -> Self {
        let ticks = scale
            .ticks(count)
            .into_iter()
            .map(|v| Tick { position: scale.scale(v), label: format(v) })
            .collect();
        Self { orient, range: scale.range(), ticks, origin: Point::ORIGIN }
    }

    /// Translate the axis so its zero offset sits at `origin`.
    #[must_use]
    pub fn at(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Ticks along the axis.
    #[must_use]
    pub fn ticks(&self) -> &[Tick] {
        &self.ticks
    }

    /// Push the axis into `scene` under `class`.
    pub fn render(&self, scene: &mut Scene, class: &str) {
        let stroke = Style::stroked(Rgba::BLACK, 1.0);
        let text = Style::filled(Rgba::BLACK);
        let o = self.origin;

        let (from, to) = match self.orient {
            AxisOrient::Bottom => (o.offset(self.range.0, 0.0), o.offset(self.range.1, 0.0)),
            AxisOrient::Left => (o.offset(0.0, self.range.0), o.offset(0.0, self.range.1)),
        };
        scene.push(Element::new(class, Shape::Line { from, to }, stroke.clone()));

        for tick in &self.ticks {
            let (from, to, at, anchor) = match self.orient {
                AxisOrient::Bottom => {
                    let base = o.offset(tick.position, 0.0);
                    let label = base.offset(0.0, TICK_SIZE + LABEL_PADDING + FONT_SIZE);
                    (base, base.offset(0.0, TICK_SIZE), label, TextAnchor::Middle)
                }
                AxisOrient::Left => {
                    let base = o.offset(0.0, tick.position);
                    let label = base.offset(-(TICK_SIZE + LABEL_PADDING), FONT_SIZE / 3.0);
                    (base, base.offset(-TICK_SIZE, 0.0), label, TextAnchor::End)
                }
            };
            scene.push(Element::new(class, Shape::Line { from, to }, stroke.clone()));
            scene.push(Element::new(
                class,
                Shape::Text { at, content: tick.label.clone(), font_size: FONT_SIZE, anchor },
                text.clone(),
            ));
        }
    }
}

/// Default tick label: integers without a fraction, thousands as `k`.
fn format_tick(value: f32) -> String {
    if value.abs() >= 1_000_000.0 {
        format!("{}M", trim_float(value / 1_000_000.0))
    } else if value.abs() >= 1_000.0 {
        format!("{}k", trim_float(value / 1_000.0))
    } else {
        trim_float(value)
    }
}

fn trim_float(value: f32) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded == rounded.trunc() {
        format!("{}", rounded as i64)
    } else {
        format!("{rounded}")
    }
}
