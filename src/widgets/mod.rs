//! Interactive chart widgets.
//!
//! Each widget is built from a dataset with a builder, owns one [`Scene`] and
//! redraws into it on state changes:
//!
//! - **Bar chart**: totals per category, optionally stacked by sub-group and
//!   sorted by total
//! - **Force graph**: node/link network laid out by a force simulation, with
//!   neighbour highlighting on hover
//! - **Scatter plot**: daily min/max temperatures with marginal histograms, a
//!   nearest-point tooltip and a day-of-year legend brush
//!
//! # Example
//!
//! ```rust,ignore
//! use trueno_widgets::widgets::{ForceGraph, ScatterPlot};
//!
//! let mut graph = ForceGraph::new(graph_data).dimensions(800, 800).build()?;
//! graph.settle();
//! graph.hover(Some(0));
//! ```
//!
//! [`Scene`]: crate::scene::Scene

/// Axis rendering shared by the charts.
pub mod axis;
/// Bar and stacked-bar chart.
pub mod bar_chart;
/// Force-directed network graph.
pub mod force_graph;
/// Temperature scatter plot.
pub mod scatter;

pub use axis::{Axis, AxisOrient, Tick};
pub use bar_chart::{display_order, BarChart, BuiltBarChart, DisplayMode};
pub use force_graph::{BuiltForceGraph, ForceGraph};
pub use scatter::{
    transition, BuiltScatterPlot, DayWindow, DotStyle, Effect, LegendAxis, ScatterEvent,
    ScatterPlot, ScatterState, Tooltip,
};
