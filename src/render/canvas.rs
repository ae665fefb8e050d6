//! Throw-mode raster scene
//!
//! A stick figure stands on a ground band and throws a ball along a single
//! trajectory. One sample is drawn per rendered frame, so playback speed here
//! follows the display refresh rate rather than `dt`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::model::SimulationResult;
use crate::surface::raster::{RasterSurface, StrokeStyle};

const GROUND_COLOR: &str = "#888";
const FIGURE_SKIN: &str = "#fde68a";
const FIGURE_INK: &str = "#333";
const BALL_COLOR: &str = "#f87171";
const TRAIL_COLOR: &str = "rgba(59,130,246,0.6)";
const TRAIL_DASH: [f64; 2] = [8.0, 8.0];
const IDLE_LABEL: &str = "Ready to throw!";

/// Fixed scene layout, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneGeometry {
    /// Horizontal room kept free of trajectory
    pub margin_x: f64,
    /// Vertical room kept free of trajectory
    pub margin_y: f64,
    /// Scale used when a trajectory has no horizontal or vertical extent
    pub fallback_scale: f64,
    pub ground_height: f64,
    /// Figure origin: x from the left edge, y above the bottom edge
    pub figure_x: f64,
    pub figure_lift: f64,
    pub ball_radius: f64,
}

impl Default for SceneGeometry {
    fn default() -> Self {
        Self {
            margin_x: 140.0,
            margin_y: 80.0,
            fallback_scale: 2.5,
            ground_height: 40.0,
            figure_x: 70.0,
            figure_lift: 60.0,
            ball_radius: 10.0,
        }
    }
}

impl SceneGeometry {
    pub fn ground_y(&self, height: f64) -> f64 {
        height - self.ground_height
    }

    pub fn figure_origin(&self, height: f64) -> DVec2 {
        DVec2::new(self.figure_x, height - self.figure_lift)
    }

    /// Uniform pixels-per-meter fitting the trajectory's extents on the surface
    pub fn scale_for(&self, max_x: f64, max_y: f64, width: f64, height: f64) -> f64 {
        if max_x <= 0.0 || max_y <= 0.0 {
            return self.fallback_scale;
        }
        let scale = ((width - self.margin_x) / max_x).min((height - self.margin_y) / max_y);
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            self.fallback_scale
        }
    }

    /// Map a simulation-space sample to pixels (raster y grows downward)
    pub fn to_screen(&self, x: f64, y: f64, scale: f64, height: f64) -> DVec2 {
        DVec2::new(self.figure_x + x * scale, self.ground_y(height) - y * scale)
    }
}

/// Result of drawing one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// More samples remain; schedule another frame
    Continue,
    /// The last sample was just drawn
    Finished,
    /// Nothing to animate (never started, finished, or cancelled)
    Idle,
}

/// Path being thrown, with the next sample to draw
#[derive(Debug, Clone)]
struct ThrowPath {
    x: Vec<f64>,
    y: Vec<f64>,
    scale: f64,
    cursor: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CanvasAnimator {
    geometry: SceneGeometry,
    path: Option<ThrowPath>,
}

impl CanvasAnimator {
    pub fn new(geometry: SceneGeometry) -> Self {
        Self {
            geometry,
            path: None,
        }
    }

    pub fn geometry(&self) -> &SceneGeometry {
        &self.geometry
    }

    /// Begin throwing `result`. Any pending animation must be cancelled first.
    pub fn start(&mut self, result: &SimulationResult, surface: &dyn RasterSurface) -> f64 {
        debug_assert!(self.path.is_none(), "start() over a live animation");
        let scale = self.geometry.scale_for(
            result.max_x(),
            result.max_y(),
            surface.width(),
            surface.height(),
        );
        self.path = Some(ThrowPath {
            x: result.x.clone(),
            y: result.y.clone(),
            scale,
            cursor: 0,
        });
        log::info!(
            "Throw animation started: {} samples at {:.2} px/m",
            result.len(),
            scale
        );
        scale
    }

    /// Drop path state. Returns whether an animation was pending.
    pub fn cancel(&mut self) -> bool {
        self.path.take().is_some()
    }

    pub fn is_animating(&self) -> bool {
        self.path.is_some()
    }

    /// Next sample to be drawn
    pub fn cursor(&self) -> Option<usize> {
        self.path.as_ref().map(|p| p.cursor)
    }

    /// Draw one frame and advance by exactly one sample
    pub fn draw_frame(&mut self, surface: &mut dyn RasterSurface) -> FrameOutcome {
        let Some(path) = self.path.as_mut() else {
            return FrameOutcome::Idle;
        };
        let height = surface.height();
        let geometry = self.geometry;

        surface.clear();
        draw_backdrop(&geometry, surface);

        // Trail through every sample already visited
        if path.cursor > 1 {
            let points: Vec<DVec2> = (0..path.cursor)
                .map(|t| geometry.to_screen(path.x[t], path.y[t], path.scale, height))
                .collect();
            surface.stroke_path(&points, &StrokeStyle::dashed(TRAIL_COLOR, 3.0, &TRAIL_DASH));
        }

        let ball = geometry.to_screen(path.x[path.cursor], path.y[path.cursor], path.scale, height);
        surface.fill_circle(ball, geometry.ball_radius, BALL_COLOR);

        path.cursor += 1;
        if path.cursor < path.x.len() {
            FrameOutcome::Continue
        } else {
            self.path = None;
            log::debug!("Throw animation finished");
            FrameOutcome::Finished
        }
    }

    /// Static scene shown before a throw
    pub fn draw_idle(&self, surface: &mut dyn RasterSurface) {
        let height = surface.height();
        surface.clear();
        draw_backdrop(&self.geometry, surface);
        surface.fill_text(
            IDLE_LABEL,
            DVec2::new(self.geometry.figure_x + 50.0, height - self.geometry.figure_lift - 5.0),
            "18px sans-serif",
            FIGURE_INK,
        );
    }
}

fn draw_backdrop(geometry: &SceneGeometry, surface: &mut dyn RasterSurface) {
    let width = surface.width();
    let height = surface.height();
    surface.fill_rect(
        DVec2::new(0.0, geometry.ground_y(height)),
        DVec2::new(width, geometry.ground_height),
        GROUND_COLOR,
    );
    draw_figure(surface, geometry.figure_origin(height));
}

/// Side-view stick figure, arm raised toward the throw
fn draw_figure(surface: &mut dyn RasterSurface, at: DVec2) {
    let p = |dx: f64, dy: f64| at + DVec2::new(dx, dy);
    let limb = |width: f64| StrokeStyle::solid(FIGURE_INK, width);

    surface.fill_circle(p(0.0, -25.0), 14.0, FIGURE_SKIN);
    surface.stroke_path(&[p(0.0, -11.0), p(0.0, 24.0)], &limb(4.0));
    surface.stroke_path(&[p(0.0, 0.0), p(22.0, -15.0)], &limb(3.0));
    surface.stroke_path(&[p(0.0, 4.0), p(-16.0, 12.0)], &limb(3.0));
    surface.stroke_path(&[p(0.0, 24.0), p(14.0, 50.0)], &limb(4.0));
    surface.stroke_path(&[p(0.0, 25.0), p(-13.0, 50.0)], &limb(4.0));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::result;
    use crate::surface::RecordingCanvas;

    fn sample() -> SimulationResult {
        result(45.0, vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 2.0, 3.0, 0.0])
    }

    #[test]
    fn test_scale_fits_smaller_axis() {
        let g = SceneGeometry::default();
        // (800-140)/3 = 220, (400-80)/3 = 106.67
        let scale = g.scale_for(3.0, 3.0, 800.0, 400.0);
        assert!((scale - 320.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_scale_falls_back_on_zero_extent() {
        let g = SceneGeometry::default();
        assert_eq!(g.scale_for(0.0, 5.0, 800.0, 400.0), 2.5);
        assert_eq!(g.scale_for(5.0, 0.0, 800.0, 400.0), 2.5);
    }

    #[test]
    fn test_screen_y_is_inverted() {
        let g = SceneGeometry::default();
        let ground = g.to_screen(0.0, 0.0, 10.0, 400.0);
        let high = g.to_screen(0.0, 5.0, 10.0, 400.0);
        assert_eq!(ground, DVec2::new(70.0, 360.0));
        assert!(high.y < ground.y);
    }

    #[test]
    fn test_draws_one_frame_per_sample() {
        let mut canvas = RecordingCanvas::new(800.0, 400.0);
        let mut animator = CanvasAnimator::default();
        animator.start(&sample(), &canvas);

        let mut outcomes = Vec::new();
        for _ in 0..6 {
            outcomes.push(animator.draw_frame(&mut canvas));
        }
        assert_eq!(
            outcomes,
            vec![
                FrameOutcome::Continue,
                FrameOutcome::Continue,
                FrameOutcome::Continue,
                FrameOutcome::Finished,
                FrameOutcome::Idle,
                FrameOutcome::Idle,
            ]
        );
        assert_eq!(canvas.clears, 4);
    }

    #[test]
    fn test_trail_covers_visited_samples() {
        let mut canvas = RecordingCanvas::new(800.0, 400.0);
        let mut animator = CanvasAnimator::default();
        animator.start(&sample(), &canvas);

        animator.draw_frame(&mut canvas);
        animator.draw_frame(&mut canvas);
        assert!(canvas.dashed_paths().is_empty());

        animator.draw_frame(&mut canvas);
        let trails = canvas.dashed_paths();
        assert_eq!(trails.len(), 1);
        assert_eq!(trails[0].len(), 2);

        animator.draw_frame(&mut canvas);
        assert_eq!(canvas.dashed_paths()[0].len(), 3);
        // Last ball sits on the ground at x = 3 m
        let scale = 320.0 / 3.0;
        let (ball, radius) = *canvas.circles().last().unwrap();
        assert_eq!(radius, 10.0);
        assert!((ball.x - (70.0 + 3.0 * scale)).abs() < 1e-9);
        assert!((ball.y - 360.0).abs() < 1e-9);
    }

    #[test]
    fn test_cancel_discards_path() {
        let mut canvas = RecordingCanvas::new(800.0, 400.0);
        let mut animator = CanvasAnimator::default();
        animator.start(&sample(), &canvas);
        animator.draw_frame(&mut canvas);

        assert!(animator.cancel());
        assert!(!animator.is_animating());
        assert_eq!(animator.draw_frame(&mut canvas), FrameOutcome::Idle);
        assert_eq!(canvas.clears, 1);
        assert!(!animator.cancel());
    }

    #[test]
    fn test_idle_scene_has_label() {
        let mut canvas = RecordingCanvas::new(800.0, 400.0);
        CanvasAnimator::default().draw_idle(&mut canvas);
        assert!(canvas.has_text("Ready to throw!"));
        // Head of the figure
        assert_eq!(canvas.circles(), vec![(DVec2::new(70.0, 315.0), 14.0)]);
    }
}
