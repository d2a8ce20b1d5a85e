//! Daily temperature scatter plot with marginal histograms and a day-of-year
//! legend brush.
//!
//! Each observation is a dot at (minimum, maximum) temperature, colored by the
//! day of the year on a cyclical rainbow. Marginal histograms of both
//! temperatures sit above and to the right of the plot. Moving the pointer
//! over the plot highlights the nearest observation and fills a tooltip;
//! moving it over the legend selects a window of days, dims everything outside
//! it and overlays the window's own histograms.
//!
//! Interaction state lives in [`ScatterState`] and changes only through the
//! pure [`transition`] function; the widget applies the returned [`Effect`]s
//! to its scene. Dot opacity and radius animate with [`Tween`]s sampled at
//! caller-supplied times.

mod state;

pub use state::{transition, DayWindow, Effect, LegendAxis, ScatterEvent, ScatterState};

use std::time::Duration;

use chrono::NaiveDate;

use crate::color::Rgba;
use crate::data::{
    date_for_reference_day, reference_day, Observation, WeatherData, DAYS_IN_REFERENCE_YEAR,
    REFERENCE_YEAR,
};
use crate::error::{Error, Result};
use crate::geometry::{Margin, Point, Rect};
use crate::layout::{bin_counts, count_extent, Bin, NearestPoint, RTreeIndex};
use crate::scale::{CyclicalColorScale, LinearScale, Scale};
use crate::scene::{Element, ElementId, LinearGradient, Paint, Scene, Shape, Style, TextAnchor};
use crate::shape::{area_basis, Path};
use crate::transition::Tween;
use crate::widgets::axis::{Axis, AxisOrient};

/// Element classes owned by the scatter plot.
pub mod class {
    /// Plot area background.
    pub const BACKGROUND: &str = "bounds-background";
    /// Observation dots.
    pub const DOT: &str = "dot";
    /// Per-dot hit regions.
    pub const VORONOI: &str = "voronoi";
    /// Bottom axis.
    pub const X_AXIS: &str = "x-axis";
    /// Left axis.
    pub const Y_AXIS: &str = "y-axis";
    /// Axis captions.
    pub const AXIS_LABEL: &str = "axis-label";
    /// Legend gradient.
    pub const LEGEND: &str = "legend";
    /// Legend month labels.
    pub const LEGEND_VALUE: &str = "legend-value";
    /// Legend month ticks.
    pub const LEGEND_TICK: &str = "legend-tick";
    /// Legend window bar.
    pub const LEGEND_BAR: &str = "legend-highlight-bar";
    /// Legend window label.
    pub const LEGEND_TEXT: &str = "legend-highlight-text";
    /// Full-dataset histograms.
    pub const HISTOGRAM: &str = "histogram-area";
    /// Window histograms.
    pub const HISTOGRAM_WINDOW: &str = "histogram-window";
    /// Hovered-point marker.
    pub const TOOLTIP_DOT: &str = "tooltip-dot";
    /// Tooltip text lines.
    pub const TOOLTIP: &str = "tooltip";
}

/// Bins per marginal histogram.
pub const HISTOGRAM_BINS: usize = 40;

/// Id of the legend gradient.
pub const LEGEND_GRADIENT_ID: &str = "legend-gradient";

const LEGEND_WIDTH: f32 = 250.0;
const LEGEND_HEIGHT: f32 = 26.0;
const HISTOGRAM_MARGIN: f32 = 10.0;
const HISTOGRAM_HEIGHT: f32 = 80.0;
const GRADIENT_STOPS: usize = 10;
const HIGHLIGHT_RADIUS: f32 = 5.0;
const QUICK: Duration = Duration::from_millis(100);
const SLOW: Duration = Duration::from_millis(500);

/// Opacity and radius of a dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DotStyle {
    /// Opacity.
    pub opacity: f32,
    /// Radius in pixels.
    pub radius: f32,
}

impl DotStyle {
    /// Resting style.
    pub const RESTING: Self = Self { opacity: 1.0, radius: 4.0 };
    /// Outside the legend window.
    pub const DIMMED: Self = Self { opacity: 0.1, radius: 3.0 };
    /// Inside the legend window.
    pub const FOCUSED: Self = Self { opacity: 1.0, radius: 5.0 };
}

/// Tooltip contents for the hovered observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tooltip {
    /// Maximum temperature, one decimal.
    pub max_temperature: String,
    /// Minimum temperature, one decimal.
    pub min_temperature: String,
    /// Long date, e.g. `Wednesday, June 20, 2018`.
    pub date: String,
}

impl Tooltip {
    /// Tooltip for an observation.
    #[must_use]
    pub fn for_observation(observation: &Observation) -> Self {
        Self {
            max_temperature: format!("{:.1}", observation.temperature_max),
            min_temperature: format!("{:.1}", observation.temperature_min),
            date: observation.date.format("%A, %B %d, %Y").to_string(),
        }
    }
}

/// Scatter plot builder.
#[derive(Debug, Clone)]
pub struct ScatterPlot {
    data: WeatherData,
    width: u32,
    height: u32,
    margin: Margin,
    hit_regions: bool,
}

impl ScatterPlot {
    /// Create a 600×600 scatter plot.
    #[must_use]
    pub fn new(data: WeatherData) -> Self {
        Self {
            data,
            width: 600,
            height: 600,
            margin: Margin::new(90.0, 90.0, 50.0, 50.0),
            hit_regions: false,
        }
    }

    /// Square side length.
    #[must_use]
    pub fn side(mut self, side: u32) -> Self {
        self.width = side;
        self.height = side;
        self
    }

    /// Set the margins.
    #[must_use]
    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Also draw each dot's nearest-point cell as an unfilled path.
    #[must_use]
    pub fn hit_regions(mut self, enabled: bool) -> Self {
        self.hit_regions = enabled;
        self
    }

    /// Lay out scales, index and scene.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the inner area is too small for
    /// the legend.
    pub fn build(self) -> Result<BuiltScatterPlot> {
        let inner = self.margin.inner(self.width as f32, self.height as f32);
        if inner.width < LEGEND_WIDTH || inner.height < LEGEND_HEIGHT {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }

        let temperatures = self
            .data
            .observations
            .iter()
            .flat_map(|o| [o.temperature_min as f32, o.temperature_max as f32]);
        let x = LinearScale::from_extent(temperatures, (0.0, inner.width)).nice(10);
        let y = x.with_range((inner.height, 0.0));
        let color = CyclicalColorScale::new((0.0, DAYS_IN_REFERENCE_YEAR - 1.0))?;

        let screen: Vec<Point> = self
            .data
            .observations
            .iter()
            .map(|o| {
                Point::new(
                    inner.x + x.scale(o.temperature_min as f32),
                    inner.y + y.scale(o.temperature_max as f32),
                )
            })
            .collect();
        let days: Vec<f32> =
            self.data.observations.iter().map(Observation::reference_day).collect();
        let index = RTreeIndex::new(&screen, inner);

        let n = self.data.observations.len();
        let mut plot = BuiltScatterPlot {
            x,
            y,
            color,
            legend: LegendAxis::new(LEGEND_WIDTH),
            legend_origin: Point::new(inner.max_x() - LEGEND_WIDTH - 9.0, inner.max_y() - 37.0),
            top_counts: count_scale(&[]),
            right_counts: count_scale(&[]),
            margin: self.margin,
            inner,
            screen,
            days,
            index,
            data: self.data,
            state: ScatterState::default(),
            opacity: vec![Tween::still(DotStyle::RESTING.opacity); n],
            radius: vec![Tween::still(DotStyle::RESTING.radius); n],
            tooltip: None,
            window_label: None,
            scene: Scene::new(self.width as f32, self.height as f32),
            handles: Handles::default(),
        };
        let all: Vec<usize> = (0..n).collect();
        let (top, right) = plot.histograms(&all);
        plot.top_counts = count_scale(&top);
        plot.right_counts = count_scale(&right);
        plot.draw(&top, &right, self.hit_regions);
        Ok(plot)
    }
}

impl batuta_common::display::WithDimensions for ScatterPlot {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// Heights scale for a histogram: `[min count, max count] -> [80, 0]`.
fn count_scale(bins: &[Bin]) -> LinearScale {
    let (lo, hi) = count_extent(bins);
    let hi = if hi > lo { hi } else { lo + 1 };
    LinearScale::from_extent([lo as f32, hi as f32], (HISTOGRAM_HEIGHT, 0.0))
}

#[derive(Debug, Clone, Default)]
struct Handles {
    dots: Vec<ElementId>,
    legend_marks: Vec<ElementId>,
    bar: Option<ElementId>,
    bar_text: Option<ElementId>,
    top_window: Option<ElementId>,
    right_window: Option<ElementId>,
    tooltip_dot: Option<ElementId>,
    tooltip_lines: Vec<ElementId>,
}

/// A laid-out scatter plot reacting to pointer events.
#[derive(Debug, Clone)]
pub struct BuiltScatterPlot {
    data: WeatherData,
    margin: Margin,
    inner: Rect,
    x: LinearScale,
    y: LinearScale,
    color: CyclicalColorScale,
    legend: LegendAxis,
    legend_origin: Point,
    top_counts: LinearScale,
    right_counts: LinearScale,
    screen: Vec<Point>,
    days: Vec<f32>,
    index: RTreeIndex,
    state: ScatterState,
    opacity: Vec<Tween>,
    radius: Vec<Tween>,
    tooltip: Option<Tooltip>,
    window_label: Option<String>,
    scene: Scene,
    handles: Handles,
}

impl BuiltScatterPlot {
    /// The rendered scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Current interaction state.
    #[must_use]
    pub const fn state(&self) -> ScatterState {
        self.state
    }

    /// Plotted observations.
    #[must_use]
    pub const fn data(&self) -> &WeatherData {
        &self.data
    }

    /// Inner plotting area; pointer queries outside it hit nothing.
    #[must_use]
    pub const fn inner(&self) -> Rect {
        self.inner
    }

    /// Margins around the plot.
    #[must_use]
    pub const fn margin(&self) -> Margin {
        self.margin
    }

    /// Screen position of every observation.
    #[must_use]
    pub fn screen_points(&self) -> &[Point] {
        &self.screen
    }

    /// Shared temperature scale of the x axis.
    #[must_use]
    pub const fn x_scale(&self) -> LinearScale {
        self.x
    }

    /// Legend geometry.
    #[must_use]
    pub const fn legend(&self) -> LegendAxis {
        self.legend
    }

    /// Top-left corner of the legend.
    #[must_use]
    pub const fn legend_origin(&self) -> Point {
        self.legend_origin
    }

    /// Nearest-point index over the dots.
    #[must_use]
    pub const fn index(&self) -> &RTreeIndex {
        &self.index
    }

    /// Tooltip of the hovered point, if any.
    #[must_use]
    pub const fn tooltip(&self) -> Option<&Tooltip> {
        self.tooltip.as_ref()
    }

    /// Where the tooltip is anchored: centered, 5 px above the hovered dot.
    #[must_use]
    pub fn tooltip_anchor(&self) -> Option<Point> {
        self.state.hovered_point.and_then(|i| self.screen.get(i)).map(|p| p.offset(0.0, -5.0))
    }

    /// Legend window label, e.g. `Jun 13 - Jul 19`.
    #[must_use]
    pub fn window_label(&self) -> Option<&str> {
        self.window_label.as_deref()
    }

    /// Observation whose nearest-point cell contains `pointer`.
    #[must_use]
    pub fn point_at(&self, pointer: Point) -> Option<usize> {
        self.index.nearest(pointer)
    }

    /// Observations inside the legend window around legend x.
    #[must_use]
    pub fn in_window(&self, legend_x: f32) -> Vec<usize> {
        let window = self.legend.window(legend_x);
        self.days
            .iter()
            .enumerate()
            .filter(|&(_, day)| window.contains(*day))
            .map(|(i, _)| i)
            .collect()
    }

    /// Marginal histograms (minimum, maximum temperature) over a subset.
    #[must_use]
    pub fn histograms(&self, subset: &[usize]) -> (Vec<Bin>, Vec<Bin>) {
        let picked = || subset.iter().filter_map(|&i| self.data.observations.get(i));
        let mins = picked().map(|o| o.temperature_min as f32);
        let maxs = picked().map(|o| o.temperature_max as f32);
        let top = bin_counts(mins, self.x.domain(), HISTOGRAM_BINS);
        let right = bin_counts(maxs, self.y.domain(), HISTOGRAM_BINS);
        (top, right)
    }

    /// Dot style at time `now`.
    #[must_use]
    pub fn dot_style(&self, index: usize, now: Duration) -> Option<DotStyle> {
        Some(DotStyle {
            opacity: self.opacity.get(index)?.value_at(now),
            radius: self.radius.get(index)?.value_at(now),
        })
    }

    /// Whether any dot is still animating at `now`.
    #[must_use]
    pub fn is_animating(&self, now: Duration) -> bool {
        self.opacity.iter().chain(&self.radius).any(|t| !t.is_settled(now))
    }

    /// Resolve a pointer position over the plot into enter/leave events.
    pub fn pointer_move(&mut self, pointer: Point, now: Duration) -> Vec<Effect> {
        match (self.point_at(pointer), self.state.hovered_point) {
            (Some(i), hovered) if hovered != Some(i) => {
                self.handle(ScatterEvent::PointEnter(i), now)
            }
            (None, Some(_)) => self.handle(ScatterEvent::PointLeave, now),
            _ => Vec::new(),
        }
    }

    /// Apply an event at time `now`; returns the effects applied.
    pub fn handle(&mut self, event: ScatterEvent, now: Duration) -> Vec<Effect> {
        let event = match event {
            ScatterEvent::PointEnter(i) if i >= self.screen.len() => return Vec::new(),
            ScatterEvent::LegendMove(x) => ScatterEvent::LegendMove(self.legend.clamp_x(x)),
            other => other,
        };
        let (state, effects) = transition(self.state, event);
        self.state = state;
        for effect in &effects {
            self.apply(*effect, now);
        }
        self.sample(now);
        tracing::debug!(?event, effects = effects.len(), "scatter transition");
        effects
    }

    /// Write dot tweens at time `now` into the scene.
    pub fn sample(&mut self, now: Duration) {
        for (i, id) in self.handles.dots.iter().enumerate() {
            let Some(element) = self.scene.get_mut(*id) else { continue };
            element.style.opacity = self.opacity[i].value_at(now);
            if let Shape::Circle { radius, .. } = &mut element.shape {
                *radius = self.radius[i].value_at(now);
            }
        }
    }

    fn apply(&mut self, effect: Effect, now: Duration) {
        match effect {
            Effect::ShowHighlight(i) => self.show_highlight(i),
            Effect::HideHighlight => {
                self.tooltip = None;
                let ids: Vec<ElementId> = self
                    .handles
                    .tooltip_dot
                    .iter()
                    .chain(&self.handles.tooltip_lines)
                    .copied()
                    .collect();
                self.set_visible(&ids, false);
            }
            Effect::ShowWindow(x) => self.show_window(x),
            Effect::DimPoints => {
                for i in 0..self.screen.len() {
                    self.restyle(i, DotStyle::DIMMED, now, QUICK);
                }
            }
            Effect::HighlightWindow(x) => {
                for i in self.in_window(x) {
                    self.restyle(i, DotStyle::FOCUSED, now, QUICK);
                }
            }
            Effect::RestorePoints => {
                for i in 0..self.screen.len() {
                    self.restyle(i, DotStyle::RESTING, now, SLOW);
                }
            }
            Effect::HideWindow => {
                self.window_label = None;
                let marks = self.handles.legend_marks.clone();
                self.set_visible(&marks, true);
                let overlay: Vec<ElementId> = [
                    self.handles.bar,
                    self.handles.bar_text,
                    self.handles.top_window,
                    self.handles.right_window,
                ]
                .into_iter()
                .flatten()
                .collect();
                self.set_visible(&overlay, false);
            }
        }
    }

    fn restyle(&mut self, i: usize, style: DotStyle, now: Duration, duration: Duration) {
        self.opacity[i].retarget(style.opacity, now, duration);
        self.radius[i].retarget(style.radius, now, duration);
    }

    fn set_visible(&mut self, ids: &[ElementId], visible: bool) {
        for id in ids {
            if let Some(element) = self.scene.get_mut(*id) {
                element.style.visible = visible;
            }
        }
    }

    fn show_highlight(&mut self, i: usize) {
        let (Some(&point), Some(observation)) = (self.screen.get(i), self.data.observations.get(i))
        else {
            return;
        };
        let tooltip = Tooltip::for_observation(observation);
        let anchor = point.offset(0.0, -5.0);

        if let Some(dot) = self.handles.tooltip_dot.and_then(|id| self.scene.get_mut(id)) {
            dot.shape = Shape::Circle { center: point, radius: HIGHLIGHT_RADIUS };
            dot.style.visible = true;
        }
        let lines = [
            (tooltip.date.clone(), -36.0),
            (format!("Maximum Temperature: {}°F", tooltip.max_temperature), -20.0),
            (format!("Minimum Temperature: {}°F", tooltip.min_temperature), -6.0),
        ];
        for (id, (content, dy)) in self.handles.tooltip_lines.iter().zip(lines) {
            if let Some(element) = self.scene.get_mut(*id) {
                element.shape = Shape::Text {
                    at: anchor.offset(0.0, dy),
                    content,
                    font_size: 12.0,
                    anchor: TextAnchor::Middle,
                };
                element.style.visible = true;
            }
        }
        self.tooltip = Some(tooltip);
    }

    fn show_window(&mut self, x: f32) {
        let window = self.legend.window(x);
        let label = format!(
            "{} - {}",
            date_for_reference_day(window.start).format("%b %d"),
            date_for_reference_day(window.end).format("%b %d")
        );

        let bar_x = self.legend_origin.x + self.legend.bar_position(x);
        if let Some(bar) = self.handles.bar.and_then(|id| self.scene.get_mut(id)) {
            let (y, width) = (self.legend_origin.y, self.legend.bar_width);
            bar.shape = Shape::Rect(Rect::new(bar_x, y, width, LEGEND_HEIGHT));
            bar.style.visible = true;
        }
        if let Some(text) = self.handles.bar_text.and_then(|id| self.scene.get_mut(id)) {
            text.shape = Shape::Text {
                at: Point::new(bar_x + self.legend.bar_width / 2.0, self.legend_origin.y - 6.0),
                content: label.clone(),
                font_size: 10.0,
                anchor: TextAnchor::Middle,
            };
            text.style.visible = true;
        }
        let marks = self.handles.legend_marks.clone();
        self.set_visible(&marks, false);

        let subset = self.in_window(x);
        let (top, right) = self.histograms(&subset);
        let tint = self.color.scale(self.legend.day_at(x));
        let paths = [
            (self.handles.top_window, self.top_path(&top)),
            (self.handles.right_window, self.right_path(&right)),
        ];
        for (handle, path) in paths {
            if let Some(element) = handle.and_then(|id| self.scene.get_mut(id)) {
                element.shape = Shape::Path(path);
                element.style = Style::filled(tint).with_stroke(Rgba::WHITE, 1.0);
            }
        }

        self.window_label = Some(label);
    }

    fn top_path(&self, bins: &[Bin]) -> Path {
        let base_y = self.inner.y - HISTOGRAM_MARGIN;
        let column = |b: &Bin| self.inner.x + self.x.scale(b.center());
        let top: Vec<Point> = bins
            .iter()
            .map(|b| {
                let y = base_y - HISTOGRAM_HEIGHT + self.top_counts.scale(b.count as f32);
                Point::new(column(b), y)
            })
            .collect();
        let baseline: Vec<Point> = bins.iter().map(|b| Point::new(column(b), base_y)).collect();
        area_basis(&top, &baseline)
    }

    fn right_path(&self, bins: &[Bin]) -> Path {
        let base_x = self.inner.max_x() + HISTOGRAM_MARGIN;
        let row = |b: &Bin| self.inner.y + self.y.scale(b.center());
        let top: Vec<Point> = bins
            .iter()
            .map(|b| {
                let x = base_x + HISTOGRAM_HEIGHT - self.right_counts.scale(b.count as f32);
                Point::new(x, row(b))
            })
            .collect();
        let baseline: Vec<Point> = bins.iter().map(|b| Point::new(base_x, row(b))).collect();
        area_basis(&top, &baseline)
    }

    fn draw(&mut self, top: &[Bin], right: &[Bin], hit_regions: bool) {
        let inner = self.inner;
        let background = Style::filled(Rgba::rgb(0xf8, 0xf8, 0xf8));
        self.scene.push(Element::new(class::BACKGROUND, Shape::Rect(inner), background));

        for (i, &center) in self.screen.iter().enumerate() {
            let fill = self.color.scale(self.days[i]);
            let shape = Shape::Circle { center, radius: DotStyle::RESTING.radius };
            let dot = Element::new(class::DOT, shape, Style::filled(fill));
            let id = self.scene.push(dot);
            self.handles.dots.push(id);
        }
        if hit_regions {
            for cell in self.index.cells().into_iter().flatten() {
                let shape = Shape::Path(Path::polygon(&cell));
                self.scene.push(Element::new(class::VORONOI, shape, Style::default()));
            }
        }

        Axis::linear(&self.x, 4, AxisOrient::Bottom)
            .at(Point::new(inner.x, inner.max_y()))
            .render(&mut self.scene, class::X_AXIS);
        Axis::linear(&self.y, 4, AxisOrient::Left)
            .at(Point::new(inner.x, inner.y))
            .render(&mut self.scene, class::Y_AXIS);
        let captions = [
            (
                Point::new(inner.x + inner.width / 2.0, inner.max_y() + self.margin.bottom - 10.0),
                TextAnchor::Middle,
                "Minimum Temperature (°F)",
            ),
            (
                Point::new(inner.x - self.margin.left + 10.0, inner.y - 4.0),
                TextAnchor::Start,
                "Maximum Temperature (°F)",
            ),
        ];
        for (at, anchor, caption) in captions {
            self.scene.push(Element::new(
                class::AXIS_LABEL,
                Shape::Text { at, content: caption.to_string(), font_size: 12.0, anchor },
                Style::filled(Rgba::BLACK),
            ));
        }

        self.draw_legend();

        let full = Style::filled(Rgba::rgb(0xcb, 0xd2, 0xd7));
        for path in [self.top_path(top), self.right_path(right)] {
            self.scene.push(Element::new(class::HISTOGRAM, Shape::Path(path), full.clone()));
        }
        let hidden = Style::default().hidden();
        let window =
            || Element::new(class::HISTOGRAM_WINDOW, Shape::Path(Path::new()), hidden.clone());
        self.handles.top_window = Some(self.scene.push(window()));
        self.handles.right_window = Some(self.scene.push(window()));

        self.handles.tooltip_dot = Some(self.scene.push(Element::new(
            class::TOOLTIP_DOT,
            Shape::Circle { center: Point::ORIGIN, radius: HIGHLIGHT_RADIUS },
            Style::filled(Rgba::rgb(0x5a, 0x6e, 0x7a)).with_stroke(Rgba::WHITE, 2.0).hidden(),
        )));
        for _ in 0..3 {
            let text = Shape::Text {
                at: Point::ORIGIN,
                content: String::new(),
                font_size: 12.0,
                anchor: TextAnchor::Middle,
            };
            let style = Style::filled(Rgba::BLACK).hidden();
            let id = self.scene.push(Element::new(class::TOOLTIP, text, style));
            self.handles.tooltip_lines.push(id);
        }

        tracing::debug!(
            points = self.screen.len(),
            elements = self.scene.len(),
            "rendered scatter plot"
        );
    }

    fn draw_legend(&mut self) {
        let origin = self.legend_origin;
        let color = self.color;
        self.scene.add_gradient(LinearGradient::sampled(LEGEND_GRADIENT_ID, GRADIENT_STOPS, |t| {
            color.scale(t * (DAYS_IN_REFERENCE_YEAR - 1.0))
        }));
        self.scene.push(Element::new(
            class::LEGEND,
            Shape::Rect(Rect::new(origin.x, origin.y, self.legend.width, LEGEND_HEIGHT)),
            Style {
                fill: Some(Paint::Gradient(LEGEND_GRADIENT_ID.to_string())),
                ..Style::default()
            },
        ));

        let months =
            [4, 7, 10].into_iter().filter_map(|m| NaiveDate::from_ymd_opt(REFERENCE_YEAR, m, 1));
        for date in months {
            let x = origin.x + self.legend.x_for_day(reference_day(date));
            let value = Shape::Text {
                at: Point::new(x, origin.y - 6.0),
                content: date.format("%b").to_string(),
                font_size: 10.0,
                anchor: TextAnchor::Middle,
            };
            let style = Style::filled(Rgba::BLACK);
            let id = self.scene.push(Element::new(class::LEGEND_VALUE, value, style));
            self.handles.legend_marks.push(id);
            let tick =
                Shape::Line { from: Point::new(x, origin.y), to: Point::new(x, origin.y + 6.0) };
            let style = Style::stroked(Rgba::WHITE, 1.0);
            let id = self.scene.push(Element::new(class::LEGEND_TICK, tick, style));
            self.handles.legend_marks.push(id);
        }

        self.handles.bar = Some(self.scene.push(Element::new(
            class::LEGEND_BAR,
            Shape::Rect(Rect::new(origin.x, origin.y, self.legend.bar_width, LEGEND_HEIGHT)),
            Style::stroked(Rgba::WHITE, 2.0).hidden(),
        )));
        self.handles.bar_text = Some(self.scene.push(Element::new(
            class::LEGEND_TEXT,
            Shape::Text {
                at: origin,
                content: String::new(),
                font_size: 10.0,
                anchor: TextAnchor::Middle,
            },
            Style::filled(Rgba::BLACK).hidden(),
        )));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"date": "2018-01-15", "temperatureMin": 20, "temperatureMax": 35},
        {"date": "2018-06-20", "temperatureMin": 60, "temperatureMax": 85},
        {"date": "2018-12-20", "temperatureMin": 25, "temperatureMax": 40}
    ]"#;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn plot() -> BuiltScatterPlot {
        ScatterPlot::new(WeatherData::from_json_str(SAMPLE).unwrap()).build().unwrap()
    }

    fn visible(plot: &BuiltScatterPlot, class: &str) -> Vec<bool> {
        plot.scene().by_class(class).map(|e| e.style.visible).collect()
    }

    #[test]
    fn test_build_draws_dots_and_histograms() {
        let plot = plot();
        assert_eq!(plot.scene().count_class(class::DOT), 3);
        assert_eq!(plot.scene().count_class(class::HISTOGRAM), 2);
        assert_eq!(plot.scene().count_class(class::LEGEND_VALUE), 3);
        assert!(plot.scene().gradient(LEGEND_GRADIENT_ID).is_some());
        assert_eq!(plot.index().len(), 3);
        assert!((plot.inner().width - 460.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_legend_month_labels() {
        let plot = plot();
        let labels: Vec<String> = plot
            .scene()
            .by_class(class::LEGEND_VALUE)
            .filter_map(|e| match &e.shape {
                Shape::Text { content, .. } => Some(content.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Apr", "Jul", "Oct"]);
    }

    #[test]
    fn test_pointer_enters_nearest_point() {
        let mut plot = plot();
        let target = plot.screen_points()[1];
        let effects = plot.pointer_move(target.offset(2.0, 2.0), ms(0));
        assert_eq!(effects, vec![Effect::ShowHighlight(1)]);
        assert_eq!(plot.state().hovered_point, Some(1));

        let tooltip = plot.tooltip().unwrap();
        assert_eq!(tooltip.max_temperature, "85.0");
        assert_eq!(tooltip.min_temperature, "60.0");
        assert_eq!(tooltip.date, "Wednesday, June 20, 2018");
        assert_eq!(plot.tooltip_anchor(), Some(target.offset(0.0, -5.0)));
        assert_eq!(visible(&plot, class::TOOLTIP_DOT), vec![true]);

        // Moving within the same cell does not re-enter.
        assert!(plot.pointer_move(target, ms(10)).is_empty());
    }

    #[test]
    fn test_pointer_outside_plot_leaves() {
        let mut plot = plot();
        let target = plot.screen_points()[0];
        plot.pointer_move(target, ms(0));
        let effects = plot.pointer_move(Point::new(1.0, 1.0), ms(10));
        assert_eq!(effects, vec![Effect::HideHighlight]);
        assert!(plot.tooltip().is_none());
        assert!(visible(&plot, class::TOOLTIP).iter().all(|v| !v));
    }

    #[test]
    fn test_legend_move_focuses_window() {
        let mut plot = plot();
        plot.handle(ScatterEvent::LegendMove(125.0), ms(0));
        assert_eq!(plot.window_label(), Some("Jun 13 - Jul 19"));
        assert_eq!(plot.in_window(125.0), vec![1]);
        assert!(plot.is_animating(ms(50)));
        assert!(!plot.is_animating(ms(100)));

        plot.sample(ms(100));
        assert_eq!(plot.dot_style(0, ms(100)), Some(DotStyle::DIMMED));
        assert_eq!(plot.dot_style(1, ms(100)), Some(DotStyle::FOCUSED));
        let radii: Vec<f32> = plot
            .scene()
            .by_class(class::DOT)
            .filter_map(|e| match e.shape {
                Shape::Circle { radius, .. } => Some(radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![3.0, 5.0, 3.0]);

        assert!(visible(&plot, class::LEGEND_VALUE).iter().all(|v| !v));
        assert_eq!(visible(&plot, class::LEGEND_BAR), vec![true]);
        assert_eq!(visible(&plot, class::HISTOGRAM_WINDOW), vec![true, true]);
    }

    #[test]
    fn test_legend_window_wraps_year_end() {
        let plot = plot();
        // At the left edge the window reaches back into December.
        assert_eq!(plot.in_window(0.0), vec![0, 2]);
    }

    #[test]
    fn test_legend_leave_restores() {
        let mut plot = plot();
        plot.handle(ScatterEvent::LegendMove(125.0), ms(0));
        plot.handle(ScatterEvent::LegendLeave, ms(200));
        assert!(plot.is_animating(ms(400)));
        plot.sample(ms(700));
        for i in 0..3 {
            assert_eq!(plot.dot_style(i, ms(700)), Some(DotStyle::RESTING));
        }
        assert!(plot.window_label().is_none());
        assert!(visible(&plot, class::LEGEND_TICK).iter().all(|v| *v));
        assert_eq!(visible(&plot, class::LEGEND_BAR), vec![false]);
        assert_eq!(visible(&plot, class::HISTOGRAM_WINDOW), vec![false, false]);
    }

    #[test]
    fn test_histograms_count_subset() {
        let plot = plot();
        let (top, right) = plot.histograms(&[0, 1, 2]);
        assert_eq!(top.len(), HISTOGRAM_BINS);
        assert_eq!(top.iter().map(|b| b.count).sum::<usize>(), 3);
        assert_eq!(right.iter().map(|b| b.count).sum::<usize>(), 3);
        let (top, _) = plot.histograms(&plot.in_window(125.0));
        assert_eq!(top.iter().map(|b| b.count).sum::<usize>(), 1);
    }

    #[test]
    fn test_empty_dataset() {
        let mut plot = ScatterPlot::new(WeatherData::default()).build().unwrap();
        assert_eq!(plot.scene().count_class(class::DOT), 0);
        assert!(plot.index().is_empty());
        let center = plot.inner().center();
        assert!(plot.pointer_move(center, ms(0)).is_empty());
        let (top, right) = plot.histograms(&[]);
        assert!(top.iter().chain(&right).all(|b| b.count == 0));
        plot.handle(ScatterEvent::LegendMove(10.0), ms(0));
        assert!(plot.window_label().is_some());
    }

    #[test]
    fn test_extreme_legend_positions() {
        let mut plot =
            ScatterPlot::new(WeatherData::from_json_str(SAMPLE).unwrap()).build().unwrap();
        for x in [1.0e15, -1.0e15, f32::INFINITY, f32::NAN] {
            let effects = plot.handle(ScatterEvent::LegendMove(x), ms(0));
            assert!(!effects.is_empty());
            assert!(plot.window_label().is_some());
        }
        plot.handle(ScatterEvent::LegendLeave, ms(0));
    }

    #[test]
    fn test_hit_regions_drawn() {
        let plot = ScatterPlot::new(WeatherData::from_json_str(SAMPLE).unwrap())
            .hit_regions(true)
            .build()
            .unwrap();
        assert_eq!(plot.scene().count_class(class::VORONOI), 3);
    }

    #[test]
    fn test_too_small_for_legend() {
        let err = ScatterPlot::new(WeatherData::default()).side(300).build().unwrap_err();
        assert!(matches!(err, Error::InvalidDimensions { .. }));
    }
}
