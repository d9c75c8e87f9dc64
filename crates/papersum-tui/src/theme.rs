use ratatui::style::{Color, Modifier, Style};

use papersum_core::SlotState;

use crate::model::models::StatusKind;

/// Color theme for the TUI.
pub struct Theme {
    pub done: Color,
    pub failed: Color,
    pub warning: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub pending: Color,
    pub spinner: Color,
    pub tag_fg: Color,
    pub tag_bg: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Resolve a theme by name, falling back to `hacker`.
    pub fn by_name(name: &str) -> Self {
        match name {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            done: Color::Rgb(0, 210, 0),
            failed: Color::Red,
            warning: Color::Yellow,

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            pending: Color::DarkGray,
            spinner: Color::Cyan,
            tag_fg: Color::Black,
            tag_bg: Color::Rgb(0, 140, 0),
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Modern theme: white text, electric blue accents, dark blue header.
    pub fn modern() -> Self {
        Self {
            done: Color::Rgb(0, 200, 80),
            failed: Color::Rgb(255, 80, 80),
            warning: Color::Rgb(255, 200, 0),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            pending: Color::Rgb(80, 80, 100),
            spinner: Color::Rgb(60, 140, 255),
            tag_fg: Color::White,
            tag_bg: Color::Rgb(102, 126, 234),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    pub fn slot_color(&self, state: &SlotState) -> Color {
        match state {
            SlotState::Pending => self.pending,
            SlotState::Done(_) => self.done,
            SlotState::Failed(_) => self.failed,
        }
    }

    pub fn status_color(&self, kind: StatusKind) -> Color {
        match kind {
            StatusKind::Success => self.done,
            StatusKind::Error => self.failed,
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn tag_style(&self) -> Style {
        Style::default().fg(self.tag_fg).bg(self.tag_bg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
