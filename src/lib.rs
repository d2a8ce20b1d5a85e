//! # Trueno-Widgets
//!
//! Interactive data-visualization widgets rendered to a retained scene that
//! encodes to SVG or PNG, in native code or in the browser through WASM.
//!
//! Three independent widgets share one dashboard:
//!
//! - **Stacked bar chart**: category totals as bars, stacked by key, or sorted
//!   by total, switchable at runtime
//! - **Force-directed graph**: a relaxed node-link layout with neighbour
//!   highlighting on hover
//! - **Brushable scatter plot**: daily min/max temperatures with marginal
//!   histograms, a cyclical day-of-year colour legend, and a tooltip
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use trueno_widgets::prelude::*;
//!
//! let table = CategoryTable::load("data/population.csv")?;
//! let mut chart = BarChart::new(table).dimensions(1200, 800).build()?;
//! chart.set_mode(DisplayMode::Stacked);
//! SvgEncoder::write_to_file(chart.scene(), "population.svg")?;
//! ```
//!
//! ## Feature Flags
//!
//! - `wasm`: browser bindings via wasm-bindgen
//!
//! ## References
//!
//! - Wu, X. (1991). "An Efficient Antialiasing Technique." SIGGRAPH '91.
//! - Fruchterman, T. M. J., & Reingold, E. M. (1991). Force-directed graph layout.
//! - Guttman, A. (1984). "R-trees: A Dynamic Index Structure for Spatial Searching."

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
// Allow unwrap() in tests only - banned in production code (Cloudflare incident 2025-11-18)
#![cfg_attr(test, allow(clippy::unwrap_used))]
// Allow common patterns in graphics/visualization code
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Core Modules
// ============================================================================

/// Color types, palettes, and interpolators.
pub mod color;

/// Core framebuffer for pixel rendering.
pub mod framebuffer;

/// Geometric primitives (points, rectangles, margins).
pub mod geometry;

/// Scale functions for data-to-visual mappings.
pub mod scale;

/// Path construction and curve interpolation.
pub mod shape;

/// Retained scene of classed, styled elements.
pub mod scene;

/// Timed attribute transitions.
pub mod transition;

// ============================================================================
// Data and Layout
// ============================================================================

/// Dataset loaders (CSV categories, JSON graph, JSON weather).
pub mod data;

/// Stacking, force simulation, binning, and hit-testing.
pub mod layout;

// ============================================================================
// Rendering Modules
// ============================================================================

/// Rasterization of scene primitives.
pub mod render;

/// Output encoders (SVG, PNG).
pub mod output;

// ============================================================================
// Widgets and Application
// ============================================================================

/// The bar chart, force graph, and scatter plot widgets.
pub mod widgets;

/// Dashboard controller routing UI events to widgets.
pub mod app;

/// Dashboard configuration (YAML).
pub mod config;

/// WebAssembly bindings for browser usage.
#[cfg(feature = "wasm")]
#[cfg_attr(docsrs, doc(cfg(feature = "wasm")))]
pub mod wasm;

// ============================================================================
// Error Types
// ============================================================================

/// Error types for trueno-widgets operations.
pub mod error;

pub use error::{Error, Result};

// ============================================================================
// Prelude
// ============================================================================

/// Commonly used types and traits for convenient imports.
///
/// ```rust,ignore
/// use trueno_widgets::prelude::*;
/// ```
pub mod prelude {
    pub use batuta_common::display::WithDimensions;
    pub use crate::app::{Dashboard, LoadState, UiEvent, WidgetKind};
    pub use crate::color::Rgba;
    pub use crate::config::Config;
    pub use crate::data::{CategoryTable, Graph, WeatherData};
    pub use crate::error::{Error, Result};
    pub use crate::framebuffer::Framebuffer;
    pub use crate::geometry::{Margin, Point, Rect};
    pub use crate::output::{PngEncoder, SvgEncoder};
    pub use crate::scale::{BandScale, LinearScale, OrdinalScale, Scale};
    pub use crate::scene::Scene;
    pub use crate::widgets::{
        BarChart, BuiltBarChart, BuiltForceGraph, BuiltScatterPlot, DisplayMode, ForceGraph,
        ScatterEvent, ScatterPlot,
    };
}

// ============================================================================
// Re-exports
// ============================================================================

/// Re-export trueno for direct access to SIMD operations.
pub use trueno;
