//! Light/dark theme
//!
//! Only colors change with the theme; trajectory data never does.

use serde::{Deserialize, Serialize};

use crate::surface::chart::{Font, LayoutColors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark { Theme::Dark } else { Theme::Light }
    }

    pub fn is_dark(&self) -> bool {
        *self == Theme::Dark
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Page/plot background
    pub fn background(&self) -> &'static str {
        match self {
            Theme::Light => "#ffffff",
            Theme::Dark => "#0f172a",
        }
    }

    /// Text and axis color
    pub fn foreground(&self) -> &'static str {
        match self {
            Theme::Light => "#111827",
            Theme::Dark => "#e5e7eb",
        }
    }

    pub fn layout_colors(&self) -> LayoutColors {
        LayoutColors {
            paper_bgcolor: self.background().to_string(),
            plot_bgcolor: self.background().to_string(),
            font: Font {
                color: self.foreground().to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Light.toggled().toggled(), Theme::Light);
        assert!(Theme::from_dark(true).is_dark());
    }

    #[test]
    fn test_dark_colors_differ() {
        assert_ne!(
            Theme::Light.layout_colors(),
            Theme::Dark.layout_colors()
        );
    }
}
