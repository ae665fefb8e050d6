//! Mapping trajectory samples onto presentation surfaces
//!
//! - `trace`: compare-mode chart series (path, direction segment, marker)
//! - `canvas`: throw-mode raster scene (ground, figure, ball, trail)
//! - `theme`: light/dark colors

pub mod canvas;
pub mod theme;
pub mod trace;

pub use canvas::{CanvasAnimator, FrameOutcome, SceneGeometry};
pub use theme::Theme;
pub use trace::{SeriesKind, TraceRenderer};
