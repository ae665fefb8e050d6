//! In-memory surfaces
//!
//! `RecordingChart` applies updates to its own copy of the traces so callers
//! can inspect what a real chart would show. `RecordingCanvas` keeps the draw
//! operations issued since the last clear.

use glam::DVec2;

use super::chart::{ChartSurface, Layout, LayoutColors, SeriesUpdate, Trace};
use super::raster::{RasterSurface, StrokeStyle};

#[derive(Debug, Default, Clone)]
pub struct RecordingChart {
    pub traces: Vec<Trace>,
    pub layout: Option<Layout>,
    /// Number of full re-initializations
    pub plots: usize,
    /// Number of incremental coordinate updates
    pub restyles: usize,
}

impl RecordingChart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visible_count(&self) -> usize {
        self.traces.iter().filter(|t| t.visible).count()
    }
}

impl ChartSurface for RecordingChart {
    fn new_plot(&mut self, traces: &[Trace], layout: &Layout) {
        self.traces = traces.to_vec();
        self.layout = Some(layout.clone());
        self.plots += 1;
    }

    fn restyle_points(&mut self, updates: &[SeriesUpdate]) {
        for update in updates {
            if let Some(trace) = self.traces.get_mut(update.index) {
                trace.x = update.x.clone();
                trace.y = update.y.clone();
            } else {
                log::warn!("Restyle of missing series {}", update.index);
            }
        }
        self.restyles += 1;
    }

    fn restyle_visibility(&mut self, visible: &[bool]) {
        for (trace, &on) in self.traces.iter_mut().zip(visible) {
            trace.visible = on;
        }
    }

    fn relayout_colors(&mut self, colors: &LayoutColors) {
        if let Some(layout) = self.layout.as_mut() {
            layout.colors = colors.clone();
        }
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Rect { origin: DVec2, size: DVec2, color: String },
    Circle { center: DVec2, radius: f64, color: String },
    Path { points: Vec<DVec2>, style: StrokeStyle },
    Text { text: String, at: DVec2 },
}

#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    /// Operations since the last clear
    pub ops: Vec<DrawOp>,
    /// Number of clears (one per rendered frame)
    pub clears: usize,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
            clears: 0,
        }
    }

    /// Circles drawn since the last clear
    pub fn circles(&self) -> Vec<(DVec2, f64)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Circle { center, radius, .. } => Some((*center, *radius)),
                _ => None,
            })
            .collect()
    }

    /// Dashed paths drawn since the last clear
    pub fn dashed_paths(&self) -> Vec<&[DVec2]> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Path { points, style } if !style.dash.is_empty() => {
                    Some(points.as_slice())
                }
                _ => None,
            })
            .collect()
    }

    pub fn has_text(&self, needle: &str) -> bool {
        self.ops
            .iter()
            .any(|op| matches!(op, DrawOp::Text { text, .. } if text == needle))
    }
}

impl RasterSurface for RecordingCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear(&mut self) {
        self.ops.clear();
        self.clears += 1;
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: &str) {
        self.ops.push(DrawOp::Rect {
            origin,
            size,
            color: color.to_string(),
        });
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: &str) {
        self.ops.push(DrawOp::Circle {
            center,
            radius,
            color: color.to_string(),
        });
    }

    fn stroke_path(&mut self, points: &[DVec2], style: &StrokeStyle) {
        self.ops.push(DrawOp::Path {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn fill_text(&mut self, text: &str, at: DVec2, _font: &str, _color: &str) {
        self.ops.push(DrawOp::Text {
            text: text.to_string(),
            at,
        });
    }
}
