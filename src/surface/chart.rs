//! Vector chart surface
//!
//! Traces and layout serialize to the JSON shape Plotly expects, so the web
//! platform can hand them over unchanged.

use serde::Serialize;

/// How a trace draws its points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Lines,
    Markers,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerOutline {
    pub width: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerStyle {
    pub color: String,
    pub size: f64,
    pub line: MarkerOutline,
}

/// One chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub mode: TraceMode,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<MarkerStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hovertemplate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
    pub showlegend: bool,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Margin {
    pub l: u32,
    pub r: u32,
    pub b: u32,
    pub t: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: AxisTitle,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangemode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub color: String,
}

/// Theme-dependent part of the layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutColors {
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font: Font,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub margin: Margin,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub showlegend: bool,
    #[serde(flatten)]
    pub colors: LayoutColors,
}

/// Replacement coordinates for one series
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesUpdate {
    pub index: usize,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// A chart that can be rebuilt wholesale or patched by series index
pub trait ChartSurface {
    /// Replace every series and the layout
    fn new_plot(&mut self, traces: &[Trace], layout: &Layout);
    /// Replace the coordinates of the addressed series only
    fn restyle_points(&mut self, updates: &[SeriesUpdate]);
    /// Set the visibility of every series, in series order
    fn restyle_visibility(&mut self, visible: &[bool]);
    /// Update background and font colors
    fn relayout_colors(&mut self, colors: &LayoutColors);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_flattens_colors() {
        let layout = Layout {
            margin: Margin { l: 40, r: 20, b: 40, t: 10 },
            xaxis: Axis {
                title: AxisTitle { text: "x (m)".into() },
                rangemode: None,
            },
            yaxis: Axis {
                title: AxisTitle { text: "y (m)".into() },
                rangemode: Some("tozero".into()),
            },
            showlegend: true,
            colors: LayoutColors {
                paper_bgcolor: "#fff".into(),
                plot_bgcolor: "#fff".into(),
                font: Font { color: "#111".into() },
            },
        };
        let json = serde_json::to_value(&layout).unwrap();
        assert_eq!(json["paper_bgcolor"], "#fff");
        assert_eq!(json["font"]["color"], "#111");
        assert_eq!(json["yaxis"]["rangemode"], "tozero");
        assert!(json["xaxis"].get("rangemode").is_none());
    }
}
