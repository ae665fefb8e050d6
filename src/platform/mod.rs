//! Platform abstraction layer
//!
//! The engine only sees `ChartSurface`, `RasterSurface` and `Presenter`.
//! In the browser these are backed by:
//! - Plotly (`PlotlyChart`)
//! - a 2D canvas context (`CanvasSurface`)
//! - DOM elements looked up by id (`DomPresenter`)
//!
//! Native builds use the in-memory surfaces from `crate::surface`.

#[cfg(target_arch = "wasm32")]
pub mod web;
