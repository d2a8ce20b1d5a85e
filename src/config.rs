//! Dashboard configuration.
//!
//! YAML file naming the three datasets and the size of each widget. Every
//! field has a default, so an empty document is a valid configuration.
//!
//! ```yaml
//! data:
//!   categories: data/population.csv
//! bar_chart:
//!   mode: Sorted
//! scatter:
//!   side: 720
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::layout::ForceParams;
use crate::widgets::DisplayMode;

/// Dataset locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPaths {
    /// CSV table for the bar chart.
    #[serde(default = "default_categories")]
    pub categories: PathBuf,

    /// Graph JSON for the force graph.
    #[serde(default = "default_graph")]
    pub graph: PathBuf,

    /// Observation JSON for the scatter plot.
    #[serde(default = "default_weather")]
    pub weather: PathBuf,
}

fn default_categories() -> PathBuf {
    PathBuf::from("data/population.csv")
}
fn default_graph() -> PathBuf {
    PathBuf::from("data/miserables.json")
}
fn default_weather() -> PathBuf {
    PathBuf::from("data/weather.json")
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            graph: default_graph(),
            weather: default_weather(),
        }
    }
}

/// Bar chart settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarChartConfig {
    /// Container width.
    #[serde(default = "default_bar_width")]
    pub width: u32,

    /// Container height.
    #[serde(default = "default_bar_height")]
    pub height: u32,

    /// Initial display mode.
    #[serde(default)]
    pub mode: DisplayMode,
}

fn default_bar_width() -> u32 {
    1200
}
fn default_bar_height() -> u32 {
    800
}

impl Default for BarChartConfig {
    fn default() -> Self {
        Self {
            width: default_bar_width(),
            height: default_bar_height(),
            mode: DisplayMode::default(),
        }
    }
}

/// Force graph settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Container width.
    #[serde(default = "default_graph_side")]
    pub width: u32,

    /// Container height.
    #[serde(default = "default_graph_side")]
    pub height: u32,

    /// Rest length of link springs.
    #[serde(default = "default_link_distance")]
    pub link_distance: f64,

    /// Many-body strength (negative repels).
    #[serde(default = "default_charge")]
    pub charge: f64,
}

fn default_graph_side() -> u32 {
    800
}
fn default_link_distance() -> f64 {
    30.0
}
fn default_charge() -> f64 {
    -30.0
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            width: default_graph_side(),
            height: default_graph_side(),
            link_distance: default_link_distance(),
            charge: default_charge(),
        }
    }
}

impl GraphConfig {
    /// Simulation parameters with this configuration's overrides.
    #[must_use]
    pub fn force_params(&self) -> ForceParams {
        ForceParams {
            link_distance: self.link_distance,
            charge: self.charge,
            ..ForceParams::default()
        }
    }
}

/// Scatter plot settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// Side of the square container.
    #[serde(default = "default_scatter_side")]
    pub side: u32,

    /// Draw nearest-point cells.
    #[serde(default)]
    pub hit_regions: bool,
}

fn default_scatter_side() -> u32 {
    600
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self { side: default_scatter_side(), hit_regions: false }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset locations.
    #[serde(default)]
    pub data: DataPaths,

    /// Bar chart settings.
    #[serde(default)]
    pub bar_chart: BarChartConfig,

    /// Force graph settings.
    #[serde(default)]
    pub graph: GraphConfig,

    /// Scatter plot settings.
    #[serde(default)]
    pub scatter: ScatterConfig,
}

impl Config {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigParse`] with the line number if parsing fails.
    pub fn parse(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(yaml).map_err(|e| {
            let line = e.location().map_or(0, |l| l.line());
            Error::ConfigParse { line, message: e.to_string() }
        })
    }

    /// Loads configuration with fallback to defaults.
    #[must_use]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!(path = %path.display(), error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Resolve dataset paths relative to `base`.
    #[must_use]
    pub fn with_base_dir(mut self, base: impl AsRef<Path>) -> Self {
        let base = base.as_ref();
        for path in [&mut self.data.categories, &mut self.data.graph, &mut self.data.weather] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
        self
    }
}
