//! WebAssembly bindings for trueno-widgets.
//!
//! Exposes the [`Dashboard`] to a host page: datasets are handed over as text
//! once fetched, UI events are forwarded as they occur, and each container's
//! current contents are read back as SVG (or PNG bytes).
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { WidgetDashboard } from 'trueno-widgets';
//!
//! await init();
//! const dash = new WidgetDashboard();
//! dash.load_categories(await (await fetch('population.csv')).text());
//! document.getElementById('bars').innerHTML = dash.svg('bar-chart');
//! dash.select_mode('Stacked');
//! ```

use std::time::Duration;

use wasm_bindgen::prelude::*;

use crate::app::{Dashboard, UiEvent, WidgetKind};
use crate::config::Config;
use crate::data::{CategoryTable, Graph, WeatherData};
use crate::geometry::Point;
use crate::output::PngEncoder;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // WASM module initialized
}

fn widget_kind(name: &str) -> Result<WidgetKind, JsValue> {
    match name {
        "bar-chart" => Ok(WidgetKind::BarChart),
        "force-graph" => Ok(WidgetKind::Graph),
        "scatter" => Ok(WidgetKind::Scatter),
        other => Err(JsValue::from_str(&format!("unknown widget '{other}'"))),
    }
}

fn millis(now_ms: f64) -> Duration {
    let fallback = if now_ms > 0.0 { Duration::MAX } else { Duration::ZERO };
    Duration::try_from_secs_f64(now_ms / 1000.0).unwrap_or(fallback)
}

/// Browser-facing dashboard handle.
#[wasm_bindgen]
#[derive(Debug)]
pub struct WidgetDashboard {
    inner: Dashboard,
}

#[wasm_bindgen]
impl WidgetDashboard {
    /// Dashboard with default settings and every widget loading.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { inner: Dashboard::new(Config::default()) }
    }

    /// Dashboard configured from YAML text.
    #[wasm_bindgen]
    pub fn with_config(yaml: &str) -> Result<WidgetDashboard, JsValue> {
        let config = Config::parse(yaml).map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self { inner: Dashboard::new(config) })
    }

    /// Deliver the category CSV. Failures are shown in the container.
    #[wasm_bindgen]
    pub fn load_categories(&mut self, csv: &str) {
        self.inner.set_categories(CategoryTable::from_csv_str(csv));
    }

    /// Deliver the graph JSON.
    #[wasm_bindgen]
    pub fn load_graph(&mut self, json: &str) {
        self.inner.set_graph(Graph::from_json_str(json));
    }

    /// Deliver the weather JSON.
    #[wasm_bindgen]
    pub fn load_weather(&mut self, json: &str) {
        self.inner.set_weather(WeatherData::from_json_str(json));
    }

    /// Display-type selector changed.
    #[wasm_bindgen]
    pub fn select_mode(&mut self, value: &str) -> bool {
        self.inner.dispatch(UiEvent::SelectMode(value.to_string()), Duration::ZERO)
    }

    /// Pointer over the graph container (`leave` when it exits).
    #[wasm_bindgen]
    pub fn graph_pointer(&mut self, x: f32, y: f32, leave: bool) -> bool {
        let event =
            if leave { UiEvent::GraphLeave } else { UiEvent::GraphPointer(Point::new(x, y)) };
        self.inner.dispatch(event, Duration::ZERO)
    }

    /// Pointer over the scatter plot area.
    #[wasm_bindgen]
    pub fn scatter_pointer(&mut self, x: f32, y: f32, leave: bool, now_ms: f64) -> bool {
        let event =
            if leave { UiEvent::ScatterLeave } else { UiEvent::ScatterPointer(Point::new(x, y)) };
        self.inner.dispatch(event, millis(now_ms))
    }

    /// Pointer over the scatter legend, at legend-relative `x`.
    #[wasm_bindgen]
    pub fn legend_pointer(&mut self, x: f32, leave: bool, now_ms: f64) -> bool {
        let event = if leave { UiEvent::LegendLeave } else { UiEvent::LegendMove(x) };
        self.inner.dispatch(event, millis(now_ms))
    }

    /// Advance animations; call from `requestAnimationFrame`.
    #[wasm_bindgen]
    pub fn frame(&mut self, now_ms: f64) {
        self.inner.frame(millis(now_ms));
    }

    /// Current SVG of a container (`bar-chart`, `force-graph`, `scatter`).
    #[wasm_bindgen]
    pub fn svg(&self, widget: &str) -> Result<String, JsValue> {
        Ok(self.inner.svg(widget_kind(widget)?))
    }

    /// Current PNG bytes of a container. Text is not rasterized.
    #[wasm_bindgen]
    pub fn png(&self, widget: &str) -> Result<Vec<u8>, JsValue> {
        let scene = self.inner.scene(widget_kind(widget)?);
        let fb = scene.rasterize().map_err(|e| JsValue::from_str(&e.to_string()))?;
        PngEncoder::to_bytes(&fb).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl Default for WidgetDashboard {
    fn default() -> Self {
        Self::new()
    }
}
