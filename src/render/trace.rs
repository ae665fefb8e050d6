//! Compare-mode chart series
//!
//! Each trajectory `i` owns three consecutive series:
//! - `3i`: the full path
//! - `3i + 1`: a short direction segment from the current sample to the next
//! - `3i + 2`: a marker at the current sample
//!
//! Playback only ever patches the last two in place.

use crate::model::{SimulationResponse, SimulationResult};
use crate::palette_color;
use crate::render::theme::Theme;
use crate::surface::chart::{
    Axis, AxisTitle, ChartSurface, Layout, LineStyle, Margin, MarkerOutline, MarkerStyle,
    SeriesUpdate, Trace, TraceMode,
};

/// Series emitted per trajectory
pub const SERIES_PER_TRAJECTORY: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Path,
    Direction,
    Marker,
}

impl SeriesKind {
    fn offset(&self) -> usize {
        match self {
            SeriesKind::Path => 0,
            SeriesKind::Direction => 1,
            SeriesKind::Marker => 2,
        }
    }
}

/// Chart index of one trajectory's series
#[inline]
pub fn series_index(trajectory: usize, kind: SeriesKind) -> usize {
    SERIES_PER_TRAJECTORY * trajectory + kind.offset()
}

/// Segment from sample `i` to `i + 1`; collapses to a point at the last sample
pub fn direction_segment(result: &SimulationResult, i: usize) -> ([f64; 2], [f64; 2]) {
    let (x0, y0) = result.point(i);
    let (x1, y1) = result.point(i + 1);
    ([x0, x1], [y0, y1])
}

#[derive(Debug, Clone, Default)]
pub struct TraceRenderer {
    palette: Vec<String>,
}

impl TraceRenderer {
    pub fn new(palette: Vec<String>) -> Self {
        Self { palette }
    }

    /// Whether trajectory `i`'s series are shown
    pub fn is_visible(trajectory: usize, compare_all: bool) -> bool {
        compare_all || trajectory == 0
    }

    /// Visibility of every series for `count` trajectories
    pub fn visibility(count: usize, compare_all: bool) -> Vec<bool> {
        (0..count * SERIES_PER_TRAJECTORY)
            .map(|series| Self::is_visible(series / SERIES_PER_TRAJECTORY, compare_all))
            .collect()
    }

    /// Build all series with cursors at the first sample
    pub fn build_traces(&self, response: &SimulationResponse, compare_all: bool) -> Vec<Trace> {
        let mut traces = Vec::with_capacity(response.results.len() * SERIES_PER_TRAJECTORY);
        for (idx, r) in response.results.iter().enumerate() {
            let color = palette_color(&self.palette, idx).to_string();
            let visible = Self::is_visible(idx, compare_all);
            let hover = format!("x=%{{x:.2f}} m<br>y=%{{y:.2f}} m<extra>{}°</extra>", r.angle);

            traces.push(Trace {
                x: r.x.clone(),
                y: r.y.clone(),
                mode: TraceMode::Lines,
                name: format!("{}° path", r.angle),
                line: Some(LineStyle {
                    color: color.clone(),
                    width: 2.0,
                    dash: None,
                }),
                marker: None,
                hovertemplate: Some(hover.clone()),
                hoverinfo: None,
                showlegend: true,
                visible,
            });

            let (dx, dy) = direction_segment(r, 0);
            traces.push(Trace {
                x: dx.to_vec(),
                y: dy.to_vec(),
                mode: TraceMode::Lines,
                name: format!("{}° dir", r.angle),
                line: Some(LineStyle {
                    color: color.clone(),
                    width: 4.0,
                    dash: Some("dot".to_string()),
                }),
                marker: None,
                hovertemplate: None,
                hoverinfo: Some("skip".to_string()),
                showlegend: false,
                visible,
            });

            let (mx, my) = r.point(0);
            traces.push(Trace {
                x: vec![mx],
                y: vec![my],
                mode: TraceMode::Markers,
                name: format!("{}° ball", r.angle),
                line: None,
                marker: Some(MarkerStyle {
                    color,
                    size: 16.0,
                    line: MarkerOutline {
                        width: 2.0,
                        color: "#fff".to_string(),
                    },
                }),
                hovertemplate: Some(hover),
                hoverinfo: None,
                showlegend: false,
                visible,
            });
        }
        traces
    }

    pub fn layout(theme: Theme) -> Layout {
        Layout {
            margin: Margin {
                l: 40,
                r: 20,
                b: 40,
                t: 10,
            },
            xaxis: Axis {
                title: AxisTitle {
                    text: "x (m)".to_string(),
                },
                rangemode: None,
            },
            yaxis: Axis {
                title: AxisTitle {
                    text: "y (m)".to_string(),
                },
                rangemode: Some("tozero".to_string()),
            },
            showlegend: true,
            colors: theme.layout_colors(),
        }
    }

    /// Replace the chart's series list with `response`
    pub fn initialize(
        &self,
        chart: &mut dyn ChartSurface,
        response: &SimulationResponse,
        compare_all: bool,
        theme: Theme,
    ) {
        let traces = self.build_traces(response, compare_all);
        chart.new_plot(&traces, &Self::layout(theme));
    }

    /// Empty chart with the default layout
    pub fn clear(&self, chart: &mut dyn ChartSurface, theme: Theme) {
        chart.new_plot(&[], &Self::layout(theme));
    }

    pub fn apply_visibility(chart: &mut dyn ChartSurface, count: usize, compare_all: bool) {
        chart.restyle_visibility(&Self::visibility(count, compare_all));
    }

    pub fn apply_theme(chart: &mut dyn ChartSurface, theme: Theme) {
        chart.relayout_colors(&theme.layout_colors());
    }

    /// Marker and direction updates for trajectory `trajectory` at sample `i`
    pub fn cursor_updates(
        result: &SimulationResult,
        trajectory: usize,
        i: usize,
    ) -> [SeriesUpdate; 2] {
        let (mx, my) = result.point(i);
        let (dx, dy) = direction_segment(result, i);
        [
            SeriesUpdate {
                index: series_index(trajectory, SeriesKind::Marker),
                x: vec![mx],
                y: vec![my],
            },
            SeriesUpdate {
                index: series_index(trajectory, SeriesKind::Direction),
                x: dx.to_vec(),
                y: dy.to_vec(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PALETTE;
    use crate::model::tests::{response, result};
    use crate::surface::RecordingChart;

    #[test]
    fn test_only_first_angle_visible_without_compare_all() {
        let response = response(&[(30.0, 5), (45.0, 6), (60.0, 7)]);
        let traces = TraceRenderer::default().build_traces(&response, false);

        assert_eq!(traces.len(), 9);
        let visible: Vec<usize> = (0..9).filter(|&i| traces[i].visible).collect();
        assert_eq!(visible, vec![0, 1, 2]);
        assert!(traces[..3].iter().all(|t| t.name.starts_with("30°")));
    }

    #[test]
    fn test_compare_all_shows_every_series() {
        let response = response(&[(30.0, 5), (45.0, 6)]);
        let traces = TraceRenderer::default().build_traces(&response, true);
        assert!(traces.iter().all(|t| t.visible));
    }

    #[test]
    fn test_series_layout_and_colors() {
        let response = response(&[(10.0, 3); 7]);
        let traces = TraceRenderer::default().build_traces(&response, true);

        assert_eq!(traces[series_index(0, SeriesKind::Path)].mode, TraceMode::Lines);
        assert_eq!(traces[series_index(0, SeriesKind::Marker)].mode, TraceMode::Markers);
        assert!(traces[series_index(0, SeriesKind::Path)].showlegend);
        assert!(!traces[series_index(0, SeriesKind::Direction)].showlegend);

        // Palette wraps after six trajectories
        let color = |i: usize| {
            traces[series_index(i, SeriesKind::Path)]
                .line
                .as_ref()
                .unwrap()
                .color
                .clone()
        };
        assert_eq!(color(0), PALETTE[0]);
        assert_eq!(color(6), PALETTE[0]);
        assert_eq!(color(5), PALETTE[5]);
    }

    #[test]
    fn test_cursor_starts_at_first_sample() {
        let response = response(&[(45.0, 4)]);
        let traces = TraceRenderer::default().build_traces(&response, false);
        assert_eq!(traces[1].x, vec![0.0, 1.0]);
        assert_eq!(traces[2].x, vec![0.0]);
        assert_eq!(traces[2].y, vec![0.0]);
    }

    #[test]
    fn test_single_sample_direction_is_degenerate() {
        let r = result(45.0, vec![0.0], vec![0.0]);
        assert_eq!(direction_segment(&r, 0), ([0.0, 0.0], [0.0, 0.0]));
    }

    #[test]
    fn test_cursor_updates_address_marker_and_direction() {
        let r = result(45.0, vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 2.0, 3.0, 0.0]);
        let [marker, direction] = TraceRenderer::cursor_updates(&r, 2, 3);
        assert_eq!(marker.index, 8);
        assert_eq!((marker.x[0], marker.y[0]), (3.0, 0.0));
        assert_eq!(direction.index, 7);
        assert_eq!(direction.x, vec![3.0, 3.0]);
    }

    #[test]
    fn test_visibility_toggle_leaves_coordinates() {
        let response = response(&[(30.0, 5), (45.0, 6), (60.0, 7)]);
        let renderer = TraceRenderer::default();
        let mut chart = RecordingChart::new();
        renderer.initialize(&mut chart, &response, false, Theme::Light);
        let before: Vec<Vec<f64>> = chart.traces.iter().map(|t| t.x.clone()).collect();

        TraceRenderer::apply_visibility(&mut chart, 3, true);
        assert_eq!(chart.visible_count(), 9);
        TraceRenderer::apply_visibility(&mut chart, 3, false);
        assert_eq!(chart.visible_count(), 3);

        let after: Vec<Vec<f64>> = chart.traces.iter().map(|t| t.x.clone()).collect();
        assert_eq!(before, after);
        assert_eq!(chart.plots, 1);
    }
}
