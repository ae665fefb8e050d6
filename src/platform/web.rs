//! Browser bindings

use glam::DVec2;
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement,
    HtmlSelectElement,
};

use crate::presenter::{Field, Presenter};
use crate::render::Theme;
use crate::surface::{ChartSurface, Layout, LayoutColors, RasterSurface, SeriesUpdate, StrokeStyle, Trace};

/// Container the per-trajectory summary rows are appended to
const STATS_TABLE_ID: &str = "statsTable";
const HIDDEN_CLASS: &str = "hidden";
const DARK_CLASS: &str = "dark";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Plotly, js_name = newPlot)]
    fn plotly_new_plot(div: &str, data: &JsValue, layout: &JsValue, config: &JsValue);

    #[wasm_bindgen(js_namespace = Plotly, js_name = restyle)]
    fn plotly_restyle(div: &str, update: &JsValue, indices: &JsValue);

    #[wasm_bindgen(js_namespace = Plotly, js_name = relayout)]
    fn plotly_relayout(div: &str, update: &JsValue);
}

/// Hand a serde value to JS as a plain object
fn to_js<T: Serialize + ?Sized>(value: &T) -> Option<JsValue> {
    let json = match serde_json::to_string(value) {
        Ok(json) => json,
        Err(err) => {
            log::warn!("Cannot serialize chart update: {}", err);
            return None;
        }
    };
    match js_sys::JSON::parse(&json) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Cannot parse chart update: {:?}", err);
            None
        }
    }
}

pub fn window() -> Result<web_sys::Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

/// `performance.now()` in seconds
pub fn now_seconds() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now() / 1000.0)
        .unwrap_or(0.0)
}

/// Origin the page was served from, e.g. `http://127.0.0.1:5000`
pub fn page_origin() -> Option<String> {
    web_sys::window()?.location().origin().ok()
}

/// Current value of a `<select>`
pub fn select_value(document: &Document, id: &str) -> Option<String> {
    document
        .get_element_by_id(id)?
        .dyn_into::<HtmlSelectElement>()
        .ok()
        .map(|select| select.value())
}

pub fn set_select_value(document: &Document, id: &str, value: &str) {
    if let Some(select) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
    {
        select.set_value(value);
    }
}

/// Toggle the page-wide dark class
pub fn apply_page_theme(document: &Document, theme: Theme) {
    if let Some(root) = document.document_element() {
        let _ = root
            .class_list()
            .toggle_with_force(DARK_CLASS, theme.is_dark());
    }
}

/// Plotly chart in the element `element_id`
pub struct PlotlyChart {
    element_id: String,
}

impl PlotlyChart {
    pub fn new(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl ChartSurface for PlotlyChart {
    fn new_plot(&mut self, traces: &[Trace], layout: &Layout) {
        let config = serde_json::json!({ "responsive": true, "displayModeBar": false });
        if let (Some(data), Some(layout), Some(config)) = (to_js(traces), to_js(layout), to_js(&config)) {
            plotly_new_plot(&self.element_id, &data, &layout, &config);
        }
    }

    fn restyle_points(&mut self, updates: &[SeriesUpdate]) {
        let xs: Vec<&[f64]> = updates.iter().map(|u| u.x.as_slice()).collect();
        let ys: Vec<&[f64]> = updates.iter().map(|u| u.y.as_slice()).collect();
        let indices: Vec<usize> = updates.iter().map(|u| u.index).collect();
        let update = serde_json::json!({ "x": xs, "y": ys });
        if let (Some(update), Some(indices)) = (to_js(&update), to_js(&indices)) {
            plotly_restyle(&self.element_id, &update, &indices);
        }
    }

    fn restyle_visibility(&mut self, visible: &[bool]) {
        let indices: Vec<usize> = (0..visible.len()).collect();
        let update = serde_json::json!({ "visible": visible });
        if let (Some(update), Some(indices)) = (to_js(&update), to_js(&indices)) {
            plotly_restyle(&self.element_id, &update, &indices);
        }
    }

    fn relayout_colors(&mut self, colors: &LayoutColors) {
        if let Some(update) = to_js(colors) {
            plotly_relayout(&self.element_id, &update);
        }
    }
}

/// 2D context of a `<canvas>`
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let mut surface = Self { canvas, ctx };
        surface.fit_to_element();
        Ok(surface)
    }

    pub fn from_id(document: &Document, id: &str) -> Result<Self, JsValue> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("no #{}", id)))?
            .dyn_into::<HtmlCanvasElement>()?;
        Self::new(canvas)
    }

    /// Match the drawing buffer to the element's layout size
    pub fn fit_to_element(&mut self) {
        let width = self.canvas.client_width().max(0) as u32;
        let height = self.canvas.client_height().max(0) as u32;
        if width > 0 && height > 0 {
            self.canvas.set_width(width);
            self.canvas.set_height(height);
        }
    }
}

impl RasterSurface for CanvasSurface {
    fn width(&self) -> f64 {
        self.canvas.width() as f64
    }

    fn height(&self) -> f64 {
        self.canvas.height() as f64
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(0.0, 0.0, self.width(), self.height());
    }

    fn fill_rect(&mut self, origin: DVec2, size: DVec2, color: &str) {
        self.ctx.set_fill_style_str(color);
        self.ctx.fill_rect(origin.x, origin.y, size.x, size.y);
    }

    fn fill_circle(&mut self, center: DVec2, radius: f64, color: &str) {
        self.ctx.begin_path();
        let _ = self
            .ctx
            .arc(center.x, center.y, radius, 0.0, std::f64::consts::TAU);
        self.ctx.set_fill_style_str(color);
        self.ctx.fill();
    }

    fn stroke_path(&mut self, points: &[DVec2], style: &StrokeStyle) {
        let Some((first, rest)) = points.split_first() else {
            return;
        };
        let dash: js_sys::Array = style.dash.iter().map(|&d| JsValue::from_f64(d)).collect();
        let _ = self.ctx.set_line_dash(&dash);
        self.ctx.set_stroke_style_str(&style.color);
        self.ctx.set_line_width(style.width);

        self.ctx.begin_path();
        self.ctx.move_to(first.x, first.y);
        for p in rest {
            self.ctx.line_to(p.x, p.y);
        }
        self.ctx.stroke();
        let _ = self.ctx.set_line_dash(&js_sys::Array::new());
    }

    fn fill_text(&mut self, text: &str, at: DVec2, font: &str, color: &str) {
        self.ctx.set_font(font);
        self.ctx.set_fill_style_str(color);
        let _ = self.ctx.fill_text(text, at.x, at.y);
    }
}

/// Page elements looked up by `Field::element_id`
pub struct DomPresenter {
    document: Document,
}

impl DomPresenter {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// Check or uncheck a toggle input
    pub fn set_checked(&self, field: Field, checked: bool) {
        if let Some(input) = self.input(field) {
            input.set_checked(checked);
        }
    }

    fn element(&self, field: Field) -> Option<Element> {
        self.document.get_element_by_id(&field.element_id())
    }

    fn input(&self, field: Field) -> Option<HtmlInputElement> {
        self.element(field)?.dyn_into::<HtmlInputElement>().ok()
    }

    /// Row elements are created on first use
    fn stat_row(&self, i: usize) -> Option<Element> {
        let field = Field::StatRow(i);
        if let Some(row) = self.element(field) {
            return Some(row);
        }
        let table = self.document.get_element_by_id(STATS_TABLE_ID)?;
        let row = self.document.create_element("div").ok()?;
        row.set_id(&field.element_id());
        row.set_class_name("stat-row");
        table.append_child(&row).ok()?;
        Some(row)
    }
}

impl Presenter for DomPresenter {
    fn get_number(&self, field: Field) -> Option<f64> {
        self.get_text(field)?.trim().parse::<f64>().ok()
    }

    fn get_text(&self, field: Field) -> Option<String> {
        self.input(field).map(|input| input.value())
    }

    fn get_flag(&self, field: Field) -> bool {
        self.input(field).is_some_and(|input| input.checked())
    }

    fn set_text(&mut self, field: Field, value: &str) {
        match field {
            Field::Velocity | Field::VelocitySlider => {
                if let Some(input) = self.input(field) {
                    input.set_value(value);
                }
            }
            Field::Message => {
                if let Some(el) = self.element(field) {
                    el.set_text_content(Some(value));
                }
                if !value.is_empty() {
                    if let Some(window) = web_sys::window() {
                        let _ = window.alert_with_message(value);
                    }
                }
            }
            Field::StatRow(i) => {
                if let Some(row) = self.stat_row(i) {
                    row.set_text_content(Some(value));
                }
            }
            _ => match self.element(field) {
                Some(el) => el.set_text_content(Some(value)),
                None => log::warn!("Missing element #{}", field.element_id()),
            },
        }
    }

    fn set_visible(&mut self, field: Field, visible: bool) {
        if let Some(el) = self.element(field) {
            let _ = el.class_list().toggle_with_force(HIDDEN_CLASS, !visible);
        }
    }
}
