//! Color theme shared by every rendering path. The active variant is loaded
//! from the persisted `theme` setting at startup and can be flipped from the
//! settings screen at runtime.

use ratatui::style::{Color, Modifier, Style};

/// Setting key under which the chosen variant is persisted.
pub(crate) const THEME_SETTING_KEY: &str = "theme";

#[derive(Copy, Clone, PartialEq, Eq, Default)]
pub(crate) enum ThemeVariant {
    #[default]
    Dark,
    Light,
}

/// Resolved style palette handed to all draw functions.
#[derive(Copy, Clone)]
pub(crate) struct Theme {
    pub(crate) variant: ThemeVariant,
    accent: Color,
    text: Color,
    muted: Color,
    info: Color,
    error: Color,
    warning: Color,
}

impl Theme {
    /// Resolve the theme from the stored setting value. Anything other than
    /// `"light"` falls back to the dark palette, which keeps old or
    /// hand-edited values harmless.
    pub(crate) fn from_setting(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::light(),
            _ => Self::dark(),
        }
    }

    pub(crate) fn dark() -> Self {
        Self {
            variant: ThemeVariant::Dark,
            accent: Color::Yellow,
            text: Color::Reset,
            muted: Color::DarkGray,
            info: Color::Green,
            error: Color::Red,
            warning: Color::Magenta,
        }
    }

    pub(crate) fn light() -> Self {
        Self {
            variant: ThemeVariant::Light,
            accent: Color::Blue,
            text: Color::Black,
            muted: Color::Gray,
            info: Color::Green,
            error: Color::LightRed,
            warning: Color::Magenta,
        }
    }

    /// The opposite variant, used by the settings-screen toggle.
    pub(crate) fn toggled(&self) -> Self {
        match self.variant {
            ThemeVariant::Dark => Self::light(),
            ThemeVariant::Light => Self::dark(),
        }
    }

    /// Value persisted to the settings table for this variant.
    pub(crate) fn setting_value(&self) -> &'static str {
        match self.variant {
            ThemeVariant::Dark => "dark",
            ThemeVariant::Light => "light",
        }
    }

    pub(crate) fn text(&self) -> Style {
        Style::default().fg(self.text)
    }

    pub(crate) fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub(crate) fn selected(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn active_field(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub(crate) fn pane_focus(&self) -> Style {
        Style::default().fg(self.accent)
    }

    pub(crate) fn key_hint(&self) -> Style {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    }

    pub(crate) fn info(&self) -> Style {
        Style::default().fg(self.info)
    }

    pub(crate) fn error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub(crate) fn out_of_range(&self) -> Style {
        Style::default().fg(self.warning).add_modifier(Modifier::BOLD)
    }
}
