//! 2D raster surface
//!
//! Pixel coordinates, origin at the top-left, y growing downward.

use glam::DVec2;

/// Stroke settings for a polyline
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeStyle {
    pub color: String,
    pub width: f64,
    /// Dash pattern in pixels; empty for a solid line
    pub dash: Vec<f64>,
}

impl StrokeStyle {
    pub fn solid(color: &str, width: f64) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: Vec::new(),
        }
    }

    pub fn dashed(color: &str, width: f64, dash: &[f64]) -> Self {
        Self {
            color: color.to_string(),
            width,
            dash: dash.to_vec(),
        }
    }
}

/// Primitive drawing operations
pub trait RasterSurface {
    fn width(&self) -> f64;
    fn height(&self) -> f64;
    /// Clear the whole surface
    fn clear(&mut self);
    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: &str);
    fn fill_circle(&mut self, center: DVec2, radius: f64, color: &str);
    /// Stroke a connected polyline through `points`
    fn stroke_path(&mut self, points: &[DVec2], style: &StrokeStyle);
    fn fill_text(&mut self, text: &str, at: DVec2, font: &str, color: &str);
}
