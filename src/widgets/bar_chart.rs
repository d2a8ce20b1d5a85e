//! Bar and stacked-bar chart of category totals.
//!
//! One band per category along x and a linear `[0, max total]` scale along
//! y. In [`DisplayMode::Bar`] every category is one rect of its total; the
//! stacked modes tile each category into one rect per sub-group and add a
//! legend. [`DisplayMode::Sorted`] additionally orders bands by descending
//! total.
//!
//! # Example
//!
//! ```rust,ignore
//! use trueno_widgets::prelude::*;
//!
//! let table = CategoryTable::load("population.csv")?;
//! let mut chart = BarChart::new(table).dimensions(1200, 800).build()?;
//! chart.set_mode(DisplayMode::Sorted);
//! let svg = SvgEncoder::encode(chart.scene());
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Rgba, SET3};
use crate::data::{CategoryRow, CategoryTable};
use crate::error::{Error, Result};
use crate::geometry::{Margin, Point, Rect};
use crate::layout::{stack, StackSeries};
use crate::scale::{BandScale, LinearScale, OrdinalScale, Scale};
use crate::scene::{Element, Scene, Shape, Style, TextAnchor};
use crate::widgets::axis::{Axis, AxisOrient};

/// Fill of single-series bars.
pub const BAR_FILL: Rgba = Rgba::rgb(0xbb, 0x77, 0x33);

/// Element classes owned by the chart.
pub mod class {
    /// Bar and segment rects.
    pub const BAR: &str = "bar";
    /// Legend swatches and labels.
    pub const LEGEND: &str = "legend";
    /// Bottom axis.
    pub const X_AXIS: &str = "x-axis";
    /// Left axis.
    pub const Y_AXIS: &str = "y-axis";
    /// Y axis caption.
    pub const Y_LABEL: &str = "ylabel";
}

const BAND_PADDING: f32 = 0.1;
const LEGEND_SWATCH: f32 = 19.0;
const LEGEND_SPACING: f32 = 20.0;
const LEGEND_FONT_SIZE: f32 = 10.0;

/// How the chart lays out its rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayMode {
    /// One bar per row, load order.
    #[default]
    Bar,
    /// Stacked sub-groups, load order.
    Stacked,
    /// Stacked sub-groups, descending total.
    Sorted,
}

impl DisplayMode {
    /// Whether rows are drawn as stacked segments.
    #[must_use]
    pub const fn is_stacked(self) -> bool {
        !matches!(self, Self::Bar)
    }
}

impl FromStr for DisplayMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Bar" => Ok(Self::Bar),
            "Stacked" => Ok(Self::Stacked),
            "Sorted" => Ok(Self::Sorted),
            other => Err(Error::MalformedData(format!("unknown display mode '{other}'"))),
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bar => "Bar",
            Self::Stacked => "Stacked",
            Self::Sorted => "Sorted",
        })
    }
}

/// Rows in the order `mode` displays them.
///
/// `Sorted` is a stable sort by descending total; every other mode restores
/// load order from each row's original index.
#[must_use]
pub fn display_order(rows: &[CategoryRow], mode: DisplayMode) -> Vec<&CategoryRow> {
    let mut ordered: Vec<&CategoryRow> = rows.iter().collect();
    match mode {
        DisplayMode::Sorted => ordered.sort_by(|a, b| {
            b.total.total_cmp(&a.total).then_with(|| a.original_index.cmp(&b.original_index))
        }),
        DisplayMode::Bar | DisplayMode::Stacked => ordered.sort_by_key(|r| r.original_index),
    }
    ordered
}

/// Bar chart builder.
#[derive(Debug, Clone)]
pub struct BarChart {
    table: CategoryTable,
    mode: DisplayMode,
    width: u32,
    height: u32,
    margin: Margin,
}

impl BarChart {
    /// Create a chart over `table` with the default 1200×800 layout.
    #[must_use]
    pub fn new(table: CategoryTable) -> Self {
        Self {
            table,
            mode: DisplayMode::Bar,
            width: 1200,
            height: 800,
            margin: Margin::new(20.0, 40.0, 60.0, 40.0),
        }
    }

    /// Set the initial display mode.
    #[must_use]
    pub fn mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the margins.
    #[must_use]
    pub fn margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Lay out and render the chart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimensions`] if the margins leave no inner area.
    pub fn build(self) -> Result<BuiltBarChart> {
        let inner = self.margin.inner(self.width as f32, self.height as f32);
        if inner.width <= 0.0 || inner.height <= 0.0 {
            return Err(Error::InvalidDimensions { width: self.width, height: self.height });
        }

        let colors = OrdinalScale::new(self.table.keys.iter().cloned(), &SET3)?;
        let mut chart = BuiltBarChart {
            scene: Scene::new(self.width as f32, self.height as f32),
            table: self.table,
            mode: self.mode,
            inner,
            colors,
        };
        chart.render();
        Ok(chart)
    }
}

impl batuta_common::display::WithDimensions for BarChart {
    fn set_dimensions(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}

/// A rendered bar chart that redraws on mode changes.
#[derive(Debug, Clone)]
pub struct BuiltBarChart {
    table: CategoryTable,
    mode: DisplayMode,
    inner: Rect,
    colors: OrdinalScale<String>,
    scene: Scene,
}

impl BuiltBarChart {
    /// Current display mode.
    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Switch mode and redraw.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        self.render();
    }

    /// The rendered scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Underlying data.
    #[must_use]
    pub const fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Inner plotting area.
    #[must_use]
    pub const fn inner(&self) -> Rect {
        self.inner
    }

    /// Row labels in the current display order.
    #[must_use]
    pub fn order(&self) -> Vec<&str> {
        display_order(&self.table.rows, self.mode).into_iter().map(|r| r.label.as_str()).collect()
    }

    /// Stack layout of the rows in display order.
    #[must_use]
    pub fn stacked(&self) -> Vec<StackSeries> {
        stack(&display_order(&self.table.rows, self.mode), &self.table.keys)
    }

    /// Color of a sub-group.
    #[must_use]
    pub fn key_color(&self, key: &str) -> Rgba {
        self.colors.get(&key.to_string())
    }

    /// Remove the previous rendering and bind fresh elements.
    pub fn render(&mut self) {
        let Self { table, mode, inner, colors, scene } = self;
        for class in [class::BAR, class::LEGEND, class::X_AXIS, class::Y_AXIS, class::Y_LABEL] {
            scene.remove_by_class(class);
        }

        let rows = display_order(&table.rows, *mode);
        let labels: Vec<String> = rows.iter().map(|r| r.label.clone()).collect();
        let x = BandScale::new(labels, (0.0, inner.width)).padding(BAND_PADDING);
        let max_total = table.max_total();
        let top = if max_total > 0.0 { max_total as f32 } else { 1.0 };
        let y = LinearScale::from_extent([0.0, top], (inner.height, 0.0));

        if mode.is_stacked() {
            render_stacked(scene, *inner, colors, &table.keys, &rows, &x, &y);
        } else {
            render_bars(scene, *inner, &rows, &x, &y);
        }

        let origin = Point::new(inner.x, inner.y);
        Axis::band(&x, (0.0, inner.width), AxisOrient::Bottom)
            .at(origin.offset(0.0, inner.height))
            .render(scene, class::X_AXIS);
        Axis::linear(&y, 10, AxisOrient::Left).at(origin).render(scene, class::Y_AXIS);
        scene.push(Element::new(
            class::Y_LABEL,
            Shape::Text {
                at: Point::new(0.0, 14.0),
                content: "Population".to_string(),
                font_size: 9.0,
                anchor: TextAnchor::Start,
            },
            Style::filled(Rgba::BLACK),
        ));

        if mode.is_stacked() {
            render_legend(scene, *inner, colors, &table.keys);
        }

        tracing::debug!(
            mode = %mode,
            rows = rows.len(),
            elements = scene.len(),
            "rendered bar chart"
        );
    }
}

fn render_bars(
    scene: &mut Scene,
    inner: Rect,
    rows: &[&CategoryRow],
    x: &BandScale,
    y: &LinearScale,
) {
    let bandwidth = x.bandwidth();
    for row in rows {
        let Some(left) = x.position(&row.label) else { continue };
        let top = y.scale(row.total as f32);
        let rect = Rect::new(inner.x + left, inner.y + top, bandwidth, inner.height - top);
        scene.push(Element::new(class::BAR, Shape::Rect(rect), Style::filled(BAR_FILL)));
    }
}

fn render_stacked(
    scene: &mut Scene,
    inner: Rect,
    colors: &OrdinalScale<String>,
    keys: &[String],
    rows: &[&CategoryRow],
    x: &BandScale,
    y: &LinearScale,
) {
    let bandwidth = x.bandwidth();
    for series in stack(rows, keys) {
        let fill = colors.get(&series.key);
        for (row, [start, end]) in rows.iter().zip(&series.segments) {
            let Some(left) = x.position(&row.label) else { continue };
            let (y0, y1) = (y.scale(*start as f32), y.scale(*end as f32));
            let rect = Rect::new(inner.x + left, inner.y + y1, bandwidth, y0 - y1);
            scene.push(Element::new(class::BAR, Shape::Rect(rect), Style::filled(fill)));
        }
    }
}

/// Legend swatches in reverse key order, right-aligned to the inner width.
fn render_legend(scene: &mut Scene, inner: Rect, colors: &OrdinalScale<String>, keys: &[String]) {
    let right = inner.width;
    for (i, key) in keys.iter().rev().enumerate() {
        let row_y = i as f32 * LEGEND_SPACING;
        scene.push(Element::new(
            class::LEGEND,
            Shape::Rect(Rect::new(right - LEGEND_SWATCH, row_y, LEGEND_SWATCH, LEGEND_SWATCH)),
            Style::filled(colors.get(key)),
        ));
        scene.push(Element::new(
            class::LEGEND,
            Shape::Text {
                at: Point::new(right - 24.0, row_y + LEGEND_SWATCH / 2.0 + LEGEND_FONT_SIZE * 0.32),
                content: key.clone(),
                font_size: LEGEND_FONT_SIZE,
                anchor: TextAnchor::End,
            },
            Style::filled(Rgba::BLACK),
        ));
    }
}
