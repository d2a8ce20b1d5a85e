//! Page controller owning the three widgets.
//!
//! The [`Dashboard`] holds each widget behind a [`LoadState`] and receives UI
//! input as explicit [`UiEvent`] values. Widgets never see each other; a
//! failed load only affects its own container, which shows the error message
//! instead of a chart. Events aimed at a widget that is not ready are dropped.

use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

use batuta_common::display::WithDimensions;

use crate::color::Rgba;
use crate::config::Config;
use crate::data::{CategoryTable, Graph, WeatherData};
use crate::error::Result;
use crate::geometry::Point;
use crate::output::SvgEncoder;
use crate::scene::{Element, Scene, Shape, Style, TextAnchor};
use crate::widgets::{
    BarChart, BuiltBarChart, BuiltForceGraph, BuiltScatterPlot, DisplayMode, ForceGraph,
    ScatterEvent, ScatterPlot,
};

/// Simulation ticks run per animation frame.
pub const GRAPH_TICKS_PER_FRAME: usize = 10;

/// Load progress of one widget.
#[derive(Debug, Clone)]
pub enum LoadState<T> {
    /// Data has not arrived yet.
    Loading,
    /// Widget is built and interactive.
    Ready(T),
    /// Loading or building failed with this message.
    Failed(String),
}

impl<T> Default for LoadState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> LoadState<T> {
    /// Wrap a load result, logging failures.
    pub fn from_result(widget: WidgetKind, result: Result<T>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(e) => {
                tracing::warn!(widget = %widget, error = %e, "widget failed to load");
                Self::Failed(e.to_string())
            }
        }
    }

    /// Whether the widget is ready.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The widget, if ready.
    #[must_use]
    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The widget mutably, if ready.
    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Failure message, if loading failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// The three widget containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// Bar chart.
    BarChart,
    /// Force graph.
    Graph,
    /// Scatter plot.
    Scatter,
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::BarChart => "bar-chart",
            Self::Graph => "force-graph",
            Self::Scatter => "scatter",
        })
    }
}

/// UI input routed by the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    /// Display-type selector changed to this value (`Bar`, `Stacked`, `Sorted`).
    SelectMode(String),
    /// Pointer moved over the graph container.
    GraphPointer(Point),
    /// Pointer left the graph container.
    GraphLeave,
    /// Pointer moved over the scatter plot area.
    ScatterPointer(Point),
    /// Pointer left the scatter plot area.
    ScatterLeave,
    /// Pointer moved over the scatter legend, at this legend x.
    LegendMove(f32),
    /// Pointer left the scatter legend.
    LegendLeave,
}

impl UiEvent {
    /// Widget the event is aimed at.
    #[must_use]
    pub const fn target(&self) -> WidgetKind {
        match self {
            Self::SelectMode(_) => WidgetKind::BarChart,
            Self::GraphPointer(_) | Self::GraphLeave => WidgetKind::Graph,
            Self::ScatterPointer(_)
            | Self::ScatterLeave
            | Self::LegendMove(_)
            | Self::LegendLeave => WidgetKind::Scatter,
        }
    }
}

/// Controller for the three widgets.
#[derive(Debug, Default)]
pub struct Dashboard {
    config: Config,
    bar_chart: LoadState<BuiltBarChart>,
    graph: LoadState<BuiltForceGraph>,
    scatter: LoadState<BuiltScatterPlot>,
}

impl Dashboard {
    /// Dashboard with every widget still loading.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config, ..Self::default() }
    }

    /// Load every dataset named in the configuration.
    ///
    /// Each widget loads independently; failures are recorded per widget.
    #[must_use]
    pub fn load(config: Config) -> Self {
        let mut dashboard = Self::new(config);
        let paths = dashboard.config.data.clone();
        dashboard.set_categories(CategoryTable::load(&paths.categories));
        dashboard.set_graph(Graph::load(&paths.graph));
        dashboard.set_weather(WeatherData::load(&paths.weather));
        dashboard
    }

    /// Load from a YAML configuration file; relative data paths resolve
    /// against the file's directory.
    #[must_use]
    pub fn load_from_config_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let config = Config::load_or_default(path);
        let config = match path.parent() {
            Some(dir) => config.with_base_dir(dir),
            None => config,
        };
        Self::load(config)
    }

    /// Deliver the bar chart's dataset.
    pub fn set_categories(&mut self, table: Result<CategoryTable>) {
        let settings = &self.config.bar_chart;
        let built = table.and_then(|t| {
            BarChart::new(t).mode(settings.mode).dimensions(settings.width, settings.height).build()
        });
        self.bar_chart = LoadState::from_result(WidgetKind::BarChart, built);
    }

    /// Deliver the graph's dataset. The simulation starts but is not run.
    pub fn set_graph(&mut self, graph: Result<Graph>) {
        let settings = &self.config.graph;
        let built = graph.and_then(|g| {
            ForceGraph::new(g)
                .params(settings.force_params())
                .dimensions(settings.width, settings.height)
                .build()
        });
        self.graph = LoadState::from_result(WidgetKind::Graph, built);
    }

    /// Deliver the scatter plot's dataset.
    pub fn set_weather(&mut self, data: Result<WeatherData>) {
        let settings = &self.config.scatter;
        let built = data.and_then(|d| {
            ScatterPlot::new(d).side(settings.side).hit_regions(settings.hit_regions).build()
        });
        self.scatter = LoadState::from_result(WidgetKind::Scatter, built);
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Bar chart state.
    #[must_use]
    pub const fn bar_chart(&self) -> &LoadState<BuiltBarChart> {
        &self.bar_chart
    }

    /// Graph state.
    #[must_use]
    pub const fn graph(&self) -> &LoadState<BuiltForceGraph> {
        &self.graph
    }

    /// Scatter plot state.
    #[must_use]
    pub const fn scatter(&self) -> &LoadState<BuiltScatterPlot> {
        &self.scatter
    }

    /// Route an event; returns whether a ready widget handled it.
    pub fn dispatch(&mut self, event: UiEvent, now: Duration) -> bool {
        let target = event.target();
        let handled = match event {
            UiEvent::SelectMode(value) => match (
                self.bar_chart.ready_mut(),
                value.parse::<DisplayMode>(),
            ) {
                (Some(chart), Ok(mode)) => {
                    chart.set_mode(mode);
                    true
                }
                (Some(_), Err(e)) => {
                    tracing::warn!(error = %e, "ignoring display mode selection");
                    false
                }
                (None, _) => false,
            },
            UiEvent::GraphPointer(p) => self.graph.ready_mut().is_some_and(|graph| {
                let node = graph.node_at(p);
                if node != graph.hovered() {
                    graph.hover(node);
                }
                true
            }),
            UiEvent::GraphLeave => self.graph.ready_mut().is_some_and(|graph| {
                graph.hover(None);
                true
            }),
            UiEvent::ScatterPointer(p) => self.scatter.ready_mut().is_some_and(|plot| {
                plot.pointer_move(p, now);
                true
            }),
            UiEvent::ScatterLeave => self.scatter_event(ScatterEvent::PointLeave, now),
            UiEvent::LegendMove(x) => self.scatter_event(ScatterEvent::LegendMove(x), now),
            UiEvent::LegendLeave => self.scatter_event(ScatterEvent::LegendLeave, now),
        };
        if !handled {
            tracing::debug!(widget = %target, "event dropped");
        }
        handled
    }

    /// Advance animations to `now`: a slice of the graph simulation and the
    /// scatter plot's dot transitions.
    pub fn frame(&mut self, now: Duration) {
        if let Some(graph) = self.graph.ready_mut() {
            graph.advance(GRAPH_TICKS_PER_FRAME);
        }
        if let Some(plot) = self.scatter.ready_mut() {
            plot.sample(now);
        }
    }

    /// Run the graph simulation to completion.
    pub fn settle_graph(&mut self) {
        if let Some(graph) = self.graph.ready_mut() {
            graph.settle();
        }
    }

    /// Current contents of a widget container.
    ///
    /// A failed widget shows its error message; a loading one shows a notice.
    #[must_use]
    pub fn scene(&self, widget: WidgetKind) -> Cow<'_, Scene> {
        let (ready, error, (width, height)) = match widget {
            WidgetKind::BarChart => (
                self.bar_chart.ready().map(BuiltBarChart::scene),
                self.bar_chart.error(),
                (self.config.bar_chart.width, self.config.bar_chart.height),
            ),
            WidgetKind::Graph => (
                self.graph.ready().map(BuiltForceGraph::scene),
                self.graph.error(),
                (self.config.graph.width, self.config.graph.height),
            ),
            WidgetKind::Scatter => (
                self.scatter.ready().map(BuiltScatterPlot::scene),
                self.scatter.error(),
                (self.config.scatter.side, self.config.scatter.side),
            ),
        };
        match (ready, error) {
            (Some(scene), _) => Cow::Borrowed(scene),
            (None, Some(message)) => {
                let text = format!("Could not load data: {message}");
                Cow::Owned(message_scene(width, height, &text))
            }
            (None, None) => Cow::Owned(message_scene(width, height, "Loading…")),
        }
    }

    /// SVG markup of a widget container.
    #[must_use]
    pub fn svg(&self, widget: WidgetKind) -> String {
        SvgEncoder::encode(&self.scene(widget))
    }

    fn scatter_event(&mut self, event: ScatterEvent, now: Duration) -> bool {
        self.scatter.ready_mut().is_some_and(|plot| {
            plot.handle(event, now);
            true
        })
    }
}

fn message_scene(width: u32, height: u32, message: &str) -> Scene {
    let mut scene = Scene::new(width as f32, height as f32);
    scene.push(Element::new(
        "message",
        Shape::Text {
            at: Point::new(width as f32 / 2.0, height as f32 / 2.0),
            content: message.to_string(),
            font_size: 14.0,
            anchor: TextAnchor::Middle,
        },
        Style::filled(Rgba::rgb(0xb0, 0x00, 0x20)),
    ));
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const CSV: &str = "State,Under 18,18 and over\nA,10,20\nB,5,5\n";
    const GRAPH: &str = r#"{
        "nodes": [{"id": "a", "group": 1}, {"id": "b", "group": 2}],
        "links": [{"source": "a", "target": "b", "value": 1}]
    }"#;
    const WEATHER: &str =
        r#"[{"date": "2018-06-20", "temperatureMin": 60, "temperatureMax": 85}]"#;

    fn loaded() -> Dashboard {
        let mut dashboard = Dashboard::new(Config::default());
        dashboard.set_categories(CategoryTable::from_csv_str(CSV));
        dashboard.set_graph(Graph::from_json_str(GRAPH));
        dashboard.set_weather(WeatherData::from_json_str(WEATHER));
        dashboard
    }

    #[test]
    fn test_new_dashboard_is_loading() {
        let dashboard = Dashboard::new(Config::default());
        assert!(matches!(dashboard.bar_chart(), LoadState::Loading));
        assert!(dashboard.svg(WidgetKind::Graph).contains("Loading"));
    }

    #[test]
    fn test_select_mode_redraws() {
        let mut dashboard = loaded();
        assert!(dashboard.dispatch(UiEvent::SelectMode("Sorted".into()), Duration::ZERO));
        let chart = dashboard.bar_chart().ready().unwrap();
        assert_eq!(chart.mode(), DisplayMode::Sorted);
        assert_eq!(chart.order(), vec!["A", "B"]);
        assert!(!dashboard.dispatch(UiEvent::SelectMode("Pie".into()), Duration::ZERO));
    }

    #[test]
    fn test_failed_widget_shows_message() {
        let mut dashboard = loaded();
        let broken = r#"{"nodes": [], "links": [{"source": "x", "target": "y"}]}"#;
        dashboard.set_graph(Graph::from_json_str(broken));
        assert!(dashboard.graph().error().unwrap().contains("unknown node"));
        assert!(dashboard.svg(WidgetKind::Graph).contains("Could not load data"));
        assert!(!dashboard.dispatch(UiEvent::GraphLeave, Duration::ZERO));
        // Other widgets are unaffected.
        assert!(dashboard.dispatch(UiEvent::LegendMove(10.0), Duration::ZERO));
    }

    #[test]
    fn test_far_legend_pointer_is_contained() {
        let mut dashboard = loaded();
        assert!(dashboard.dispatch(UiEvent::LegendMove(1.0e15), Duration::ZERO));
        assert!(dashboard.dispatch(UiEvent::LegendMove(-1.0e15), Duration::ZERO));
        assert!(dashboard.dispatch(UiEvent::LegendLeave, Duration::ZERO));
    }

    #[test]
    fn test_events_for_loading_widgets_are_dropped() {
        let mut dashboard = Dashboard::new(Config::default());
        assert!(!dashboard.dispatch(UiEvent::SelectMode("Bar".into()), Duration::ZERO));
        assert!(!dashboard.dispatch(UiEvent::ScatterPointer(Point::new(1.0, 1.0)), Duration::ZERO));
        assert!(!dashboard.dispatch(UiEvent::LegendLeave, Duration::ZERO));
    }

    #[test]
    fn test_graph_hover_through_dashboard() {
        let mut dashboard = loaded();
        dashboard.settle_graph();
        let position = dashboard.graph().ready().unwrap().positions()[1];
        assert!(dashboard.dispatch(UiEvent::GraphPointer(position), Duration::ZERO));
        assert_eq!(dashboard.graph().ready().unwrap().hovered(), Some(1));
        dashboard.dispatch(UiEvent::GraphLeave, Duration::ZERO);
        assert_eq!(dashboard.graph().ready().unwrap().hovered(), None);
    }

    #[test]
    fn test_frame_advances_graph() {
        let mut dashboard = loaded();
        for i in 0..40 {
            dashboard.frame(Duration::from_millis(i * 16));
        }
        assert!(dashboard.graph().ready().unwrap().is_settled());
    }

    #[test]
    fn test_scatter_tooltip_through_dashboard() {
        let mut dashboard = loaded();
        let point = dashboard.scatter().ready().unwrap().screen_points()[0];
        assert!(dashboard.dispatch(UiEvent::ScatterPointer(point), Duration::ZERO));
        let plot = dashboard.scatter().ready().unwrap();
        assert_eq!(plot.tooltip().unwrap().max_temperature, "85.0");
        dashboard.dispatch(UiEvent::ScatterLeave, Duration::from_millis(5));
        assert!(dashboard.scatter().ready().unwrap().tooltip().is_none());
    }

    #[test]
    fn test_load_missing_files_fail_independently() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("population.csv"), CSV).unwrap();
        let mut config = Config::default();
        config.data.categories = dir.path().join("population.csv");
        config.data.graph = dir.path().join("missing.json");
        config.data.weather = dir.path().join("missing-too.json");
        let dashboard = Dashboard::load(config);
        assert!(dashboard.bar_chart().is_ready());
        assert!(matches!(dashboard.graph(), LoadState::Failed(_)));
        assert!(matches!(dashboard.scatter(), LoadState::Failed(_)));
    }

    #[test]
    fn test_from_result_keeps_message() {
        let state: LoadState<()> =
            LoadState::from_result(WidgetKind::Scatter, Err(Error::EmptyData));
        assert_eq!(state.error(), Some("Empty data provided"));
    }
}
