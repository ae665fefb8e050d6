//! Page access for the engine
//!
//! The engine never touches page elements directly. It reads inputs and writes
//! text/visibility through `Presenter`, which the web platform implements over
//! the DOM and tests implement with `MemoryPresenter`.

use std::collections::HashMap;

/// Page elements the engine reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Inputs
    Velocity,
    VelocitySlider,
    Gravity,
    Angle,
    Angles,
    CompareAll,
    // Summary
    StatHeight,
    StatTime,
    StatRange,
    /// One line of the per-trajectory summary table
    StatRow(usize),
    /// User-facing error text
    Message,
    // Layout blocks
    AnglesBlock,
    AngleBlock,
    CompareBlock,
    Chart,
    Canvas,
}

impl Field {
    /// DOM element id
    pub fn element_id(&self) -> String {
        match self {
            Field::Velocity => "velocity".into(),
            Field::VelocitySlider => "velocitySlider".into(),
            Field::Gravity => "gravity".into(),
            Field::Angle => "angle".into(),
            Field::Angles => "angles".into(),
            Field::CompareAll => "compareToggle".into(),
            Field::StatHeight => "statHeight".into(),
            Field::StatTime => "statTime".into(),
            Field::StatRange => "statRange".into(),
            Field::StatRow(i) => format!("statRow{}", i),
            Field::Message => "message".into(),
            Field::AnglesBlock => "anglesBlock".into(),
            Field::AngleBlock => "angleBlock".into(),
            Field::CompareBlock => "compareBlock".into(),
            Field::Chart => "plot".into(),
            Field::Canvas => "boyCanvas".into(),
        }
    }
}

/// Narrow interface over the page
pub trait Presenter {
    /// Numeric value of an input, `None` when empty or not a number
    fn get_number(&self, field: Field) -> Option<f64>;
    /// Raw text of an input
    fn get_text(&self, field: Field) -> Option<String>;
    /// Checked state of a toggle
    fn get_flag(&self, field: Field) -> bool;
    fn set_text(&mut self, field: Field, value: &str);
    fn set_visible(&mut self, field: Field, visible: bool);
}

/// In-memory page, used headlessly and in tests
#[derive(Debug, Default, Clone)]
pub struct MemoryPresenter {
    inputs: HashMap<Field, String>,
    flags: HashMap<Field, bool>,
    texts: HashMap<Field, String>,
    visible: HashMap<Field, bool>,
}

impl MemoryPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(mut self, field: Field, value: impl Into<String>) -> Self {
        self.set_input(field, value);
        self
    }

    pub fn set_input(&mut self, field: Field, value: impl Into<String>) {
        self.inputs.insert(field, value.into());
    }

    pub fn set_flag(&mut self, field: Field, on: bool) {
        self.flags.insert(field, on);
    }

    /// Last text written to `field`
    pub fn text(&self, field: Field) -> Option<&str> {
        self.texts.get(&field).map(String::as_str)
    }

    /// Visibility last set for `field` (`None` if never touched)
    pub fn is_visible(&self, field: Field) -> Option<bool> {
        self.visible.get(&field).copied()
    }

    /// Non-empty summary rows, in row order
    pub fn stat_rows(&self) -> Vec<&str> {
        let mut rows: Vec<(usize, &str)> = self
            .texts
            .iter()
            .filter_map(|(field, text)| match field {
                Field::StatRow(i) if !text.is_empty() => Some((*i, text.as_str())),
                _ => None,
            })
            .collect();
        rows.sort_by_key(|(i, _)| *i);
        rows.into_iter().map(|(_, text)| text).collect()
    }
}

impl Presenter for MemoryPresenter {
    fn get_number(&self, field: Field) -> Option<f64> {
        self.inputs.get(&field)?.trim().parse::<f64>().ok()
    }

    fn get_text(&self, field: Field) -> Option<String> {
        self.inputs.get(&field).cloned()
    }

    fn get_flag(&self, field: Field) -> bool {
        self.flags.get(&field).copied().unwrap_or(false)
    }

    fn set_text(&mut self, field: Field, value: &str) {
        // Inputs written by the engine (slider sync) read back like user input
        if matches!(field, Field::Velocity | Field::VelocitySlider) {
            self.inputs.insert(field, value.to_string());
        }
        self.texts.insert(field, value.to_string());
    }

    fn set_visible(&mut self, field: Field, visible: bool) {
        self.visible.insert(field, visible);
    }
}
