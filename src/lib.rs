//! chart-series: series rendering and coordinate pipeline for financial charts.
//!
//! Data flows one way. Input items are normalized into plot rows and kept in
//! an index-ordered store per series. Each frame, a pane view projects the
//! visible rows through the time and price scales, and a renderer turns the
//! projected items into path commands on a [`render::DrawingSurface`].

pub mod core;
pub mod error;
pub mod model;
pub mod render;
pub mod telemetry;
pub mod views;

pub use error::{ChartError, ChartResult};
pub use model::{IndexedItem, Pane, Series, SeriesId};
