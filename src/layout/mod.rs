//! Layout algorithms that turn data into positions.
//!
//! - [`stack`]: contiguous stacked bands per category row
//! - [`ForceSimulation`]: force-directed node placement
//! - [`NearestPoint`]: pointer hit-testing over plotted points
//! - [`bin_counts`]: fixed-width histogram binning

mod force;
mod histogram;
mod nearest;
mod stack;

pub use force::{ForceParams, ForceSimulation, SimNode, TickOutcome};
pub use histogram::{bin_counts, count_extent, Bin};
pub use nearest::{polygon_area, LinearScan, NearestPoint, RTreeIndex};
pub use stack::{stack, StackSeries};
