//! Presentation surfaces
//!
//! Two alternative outputs, both external collaborators:
//! - `chart`: a multi-series vector chart (Plotly on the web)
//! - `raster`: a 2D drawing context (Canvas2D on the web)
//!
//! `recording` holds in-memory implementations for headless runs and tests.

pub mod chart;
pub mod raster;
pub mod recording;

pub use chart::{ChartSurface, Layout, LayoutColors, SeriesUpdate, Trace, TraceMode};
pub use raster::{RasterSurface, StrokeStyle};
pub use recording::{DrawOp, RecordingCanvas, RecordingChart};
