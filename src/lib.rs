//! plot-rs: computational core of a 2-D plotting engine.
//!
//! Tabular trace rows and declarative axis configuration go in; screen-space
//! geometry comes out (axis lines, ticks and labels, polylines, markers, bar
//! rectangles and hover regions) for a rendering layer to paint.

pub mod api;
pub mod core;
pub mod error;
pub mod telemetry;

pub use api::{Plot, PlotConfig, PlotEngine, PlotLayout};
pub use error::{ChartError, ChartResult};
