#![allow(clippy::expect_used, clippy::unwrap_used)]
//! Dashboard Example
//!
//! Loads the bundled datasets, drives each widget through a few interactions,
//! and writes every container as SVG and PNG.
//!
//! Run with: `cargo run --example dashboard [config.yaml]`
//! Set `RUST_LOG=trueno_widgets=debug` for event tracing.

use std::time::Duration;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use trueno_widgets::prelude::*;

fn save(dashboard: &Dashboard, widget: WidgetKind, stem: &str) {
    let scene = dashboard.scene(widget);
    SvgEncoder::write_to_file(&scene, format!("{stem}.svg")).expect("Failed to write SVG");
    PngEncoder::write_scene(&scene, format!("{stem}.png")).expect("Failed to write PNG");
    println!("   Saved: {stem}.svg, {stem}.png");
}

fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("trueno_widgets=info")),
        )
        .init();

    println!("Trueno Widgets Dashboard");
    println!("========================\n");

    let mut dashboard = match std::env::args().nth(1) {
        Some(path) => Dashboard::load_from_config_file(path),
        None => Dashboard::load(Config::default().with_base_dir(env!("CARGO_MANIFEST_DIR"))),
    };

    // Bar chart in each display mode
    println!("1. Bar chart");
    for mode in ["Bar", "Stacked", "Sorted"] {
        dashboard.dispatch(UiEvent::SelectMode(mode.to_string()), Duration::ZERO);
        save(&dashboard, WidgetKind::BarChart, &format!("bar_chart_{}", mode.to_lowercase()));
    }

    // Force graph: relax, then hover the best-connected node
    println!("\n2. Force graph");
    let mut now = Duration::ZERO;
    while dashboard.graph().ready().is_some_and(|g| !g.is_settled()) {
        dashboard.frame(now);
        now += Duration::from_millis(16);
    }
    let hub = dashboard.graph().ready().and_then(|g| {
        let degrees = g.graph().degrees();
        let hub = (0..degrees.len()).max_by_key(|&i| degrees[i])?;
        Some((g.graph().nodes[hub].id.clone(), g.positions()[hub]))
    });
    if let Some((id, at)) = hub {
        dashboard.dispatch(UiEvent::GraphPointer(at), now);
        println!("   Hovering {id}");
    }
    save(&dashboard, WidgetKind::Graph, "force_graph");

    // Scatter plot: tooltip on the first day, then brush mid-year
    println!("\n3. Scatter plot");
    let first = dashboard.scatter().ready().and_then(|p| p.screen_points().first().copied());
    if let Some(first) = first {
        dashboard.dispatch(UiEvent::ScatterPointer(first), now);
        if let Some(tooltip) = dashboard.scatter().ready().and_then(|p| p.tooltip()) {
            let (high, low) = (&tooltip.max_temperature, &tooltip.min_temperature);
            println!("   {}: {high} / {low}", tooltip.date);
        }
        dashboard.dispatch(UiEvent::ScatterLeave, now);
    }
    dashboard.dispatch(UiEvent::LegendMove(125.0), now);
    now += Duration::from_millis(600);
    dashboard.frame(now);
    if let Some(label) = dashboard.scatter().ready().and_then(|p| p.window_label()) {
        println!("   Window: {label}");
    }
    save(&dashboard, WidgetKind::Scatter, "scatter_brushed");

    for (name, error) in [
        ("bar chart", dashboard.bar_chart().error()),
        ("force graph", dashboard.graph().error()),
        ("scatter", dashboard.scatter().error()),
    ] {
        if let Some(error) = error {
            println!("\n   {name} failed to load: {error}");
        }
    }
}
