//! Dashboard integration tests over the bundled datasets.
//!
//! Run: cargo test --test dashboard_test

#![allow(clippy::unwrap_used)]

use std::path::PathBuf;
use std::time::Duration;

use trueno_widgets::prelude::*;
use trueno_widgets::widgets::bar_chart::class as bar_class;
use trueno_widgets::widgets::force_graph::class as graph_class;
use trueno_widgets::widgets::scatter::class as scatter_class;

fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}

fn bundled_config() -> Config {
    Config::default().with_base_dir(env!("CARGO_MANIFEST_DIR"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn test_bundled_datasets_load() {
    let table = CategoryTable::load(data_dir().join("population.csv")).unwrap();
    assert_eq!(table.rows.len(), 8);
    assert_eq!(table.keys.len(), 7);
    assert_eq!(table.skipped, 0);

    let graph = Graph::load(data_dir().join("miserables.json")).unwrap();
    assert_eq!(graph.nodes.len(), 14);
    assert_eq!(graph.links.len(), 23);

    let weather = WeatherData::load(data_dir().join("weather.json")).unwrap();
    assert_eq!(weather.len(), 365);
    assert_eq!(weather.skipped, 0);
}

#[test]
fn test_dashboard_loads_all_widgets() {
    init_tracing();
    let dashboard = Dashboard::load(bundled_config());
    assert!(dashboard.bar_chart().is_ready());
    assert!(dashboard.graph().is_ready());
    assert!(dashboard.scatter().is_ready());
}

#[test]
fn test_bar_chart_modes_on_population() {
    let mut dashboard = Dashboard::load(bundled_config());
    let bars = |d: &Dashboard| d.bar_chart().ready().unwrap().scene().count_class(bar_class::BAR);
    assert_eq!(bars(&dashboard), 8);

    dashboard.dispatch(UiEvent::SelectMode("Stacked".into()), Duration::ZERO);
    assert_eq!(bars(&dashboard), 8 * 7);
    let legend =
        |d: &Dashboard| d.bar_chart().ready().unwrap().scene().count_class(bar_class::LEGEND);
    assert_eq!(legend(&dashboard), 2 * 7);

    dashboard.dispatch(UiEvent::SelectMode("Sorted".into()), Duration::ZERO);
    let chart = dashboard.bar_chart().ready().unwrap();
    assert_eq!(chart.order(), vec!["CA", "TX", "NY", "FL", "IL", "PA", "OH", "MI"]);
    assert_eq!(chart.scene().count_class(bar_class::BAR), 8 * 7);
    assert_eq!(chart.scene().count_class(bar_class::LEGEND), 2 * 7);

    dashboard.dispatch(UiEvent::SelectMode("Bar".into()), Duration::ZERO);
    assert_eq!(bars(&dashboard), 8);
    assert_eq!(legend(&dashboard), 0);
}

#[test]
fn test_graph_settles_and_highlights_neighbours() {
    let mut dashboard = Dashboard::load(bundled_config());
    dashboard.settle_graph();
    let graph = dashboard.graph().ready().unwrap();
    assert!(graph.is_settled());
    assert_eq!(graph.scene().count_class(graph_class::NODE), 14);
    assert_eq!(graph.scene().count_class(graph_class::LINK), 23);
    assert!(graph.positions().iter().all(|p| p.x.is_finite() && p.y.is_finite()));

    let valjean = graph.graph().nodes.iter().position(|n| n.id == "Valjean").unwrap();
    let at = graph.positions()[valjean];
    dashboard.dispatch(UiEvent::GraphPointer(at), Duration::ZERO);
    let graph = dashboard.graph().ready().unwrap();
    assert_eq!(graph.hovered(), Some(valjean));

    let neighbours = (0..14).filter(|&i| graph.adjacency().connected(valjean, i)).count();
    let labels_shown =
        graph.scene().by_class(graph_class::LABEL).filter(|e| e.style.visible).count();
    assert_eq!(labels_shown, neighbours);
    let faded = graph.scene().by_class(graph_class::NODE).filter(|e| e.style.opacity < 1.0).count();
    assert_eq!(faded, 14 - neighbours);
}

#[test]
fn test_scatter_legend_brushing_round_trip() {
    let mut dashboard = Dashboard::load(bundled_config());
    let total = dashboard.scatter().ready().unwrap().data().len();

    dashboard.dispatch(UiEvent::LegendMove(125.0), ms(0));
    let plot = dashboard.scatter().ready().unwrap();
    let subset = plot.in_window(125.0);
    assert!(!subset.is_empty() && subset.len() < total);
    assert!(plot.window_label().is_some());
    let (top, _) = plot.histograms(&subset);
    assert_eq!(top.iter().map(|b| b.count).sum::<usize>(), subset.len());

    dashboard.frame(ms(200));
    let plot = dashboard.scatter().ready().unwrap();
    let focused = subset[0];
    assert!((plot.dot_style(focused, ms(200)).unwrap().radius - 5.0).abs() < 1e-4);

    dashboard.dispatch(UiEvent::LegendLeave, ms(300));
    dashboard.frame(ms(1000));
    let plot = dashboard.scatter().ready().unwrap();
    assert!(plot.window_label().is_none());
    assert!(!plot.is_animating(ms(1000)));
    assert!((plot.dot_style(focused, ms(1000)).unwrap().radius - 4.0).abs() < 1e-4);
    let windows = plot.scene().by_class(scatter_class::HISTOGRAM_WINDOW);
    assert_eq!(windows.filter(|e| e.style.visible).count(), 0);
}

#[test]
fn test_failed_load_is_contained() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("weather.json");
    std::fs::write(&broken, "{\"not\": \"an array\"}").unwrap();

    let mut config = bundled_config();
    config.data.weather = broken;
    let mut dashboard = Dashboard::load(config);
    assert!(dashboard.bar_chart().is_ready());
    assert!(dashboard.scatter().error().unwrap().contains("array"));
    assert!(!dashboard.dispatch(UiEvent::LegendMove(10.0), Duration::ZERO));
    assert!(dashboard.svg(WidgetKind::Scatter).contains("Could not load data"));
}

#[test]
fn test_svg_and_png_outputs() {
    let mut dashboard = Dashboard::load(bundled_config());
    dashboard.settle_graph();
    let dir = tempfile::tempdir().unwrap();
    for widget in [WidgetKind::BarChart, WidgetKind::Graph, WidgetKind::Scatter] {
        let svg = dashboard.svg(widget);
        assert!(svg.starts_with("<svg"));
        let fb = dashboard.scene(widget).rasterize().unwrap();
        let (min, max, mean) = fb.luminance_stats();
        assert!(max > min, "{widget} rasterized to a flat image");
        assert!((min..=max).contains(&mean));
        let path = dir.path().join(format!("{widget}.png"));
        PngEncoder::write_scene(&dashboard.scene(widget), &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}

#[test]
fn test_config_file_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(data_dir().join("population.csv"), dir.path().join("pop.csv")).unwrap();
    let config_path = dir.path().join("widgets.yaml");
    let yaml = "data:\n  categories: pop.csv\nbar_chart:\n  mode: Sorted\n";
    std::fs::write(&config_path, yaml).unwrap();

    let dashboard = Dashboard::load_from_config_file(&config_path);
    let chart = dashboard.bar_chart().ready().unwrap();
    assert_eq!(chart.mode(), DisplayMode::Sorted);
    assert_eq!(chart.order()[0], "CA");
    assert!(!dashboard.graph().is_ready());
}
