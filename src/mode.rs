//! Presentation mode switching
//!
//! Switching only changes which inputs and which output surface are shown.
//! It never submits a simulation and never touches playback state.

use crate::model::Mode;
use crate::presenter::{Field, Presenter};

#[derive(Debug, Default, Clone)]
pub struct ModeController {
    mode: Mode,
}

impl ModeController {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Show the inputs and surface for `mode`. Safe to repeat.
    /// Returns whether the mode changed.
    pub fn apply(&mut self, mode: Mode, presenter: &mut dyn Presenter) -> bool {
        let compare = mode == Mode::Compare;
        presenter.set_visible(Field::AnglesBlock, compare);
        presenter.set_visible(Field::CompareBlock, compare);
        presenter.set_visible(Field::AngleBlock, !compare);
        presenter.set_visible(Field::Chart, compare);
        presenter.set_visible(Field::Canvas, !compare);

        let changed = self.mode != mode;
        if changed {
            log::info!("Mode: {} -> {}", self.mode.as_str(), mode.as_str());
        }
        self.mode = mode;
        changed
    }
}
