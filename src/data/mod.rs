//! Dataset loaders.
//!
//! Each loader reads its format once, validates rows, and reports how many
//! malformed rows it dropped. Nothing is written back.

mod categories;
mod graph;
mod weather;

pub use categories::{CategoryRow, CategoryTable};
pub use graph::{Adjacency, Graph, GraphLink, GraphNode};
pub use weather::{
    date_for_reference_day, reference_day, Observation, WeatherData, DAYS_IN_REFERENCE_YEAR,
    REFERENCE_YEAR,
};
