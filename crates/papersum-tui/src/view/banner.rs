use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::App;
use crate::view::truncate;

/// Render the error banner, or the standing health warning when there is no error.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let width = area.width as usize;

    let line = if let Some(error) = &app.error {
        Line::from(vec![
            Span::styled(
                " \u{2717} ",
                Style::default().fg(theme.failed).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                truncate(error, width.saturating_sub(16)),
                Style::default().fg(theme.failed),
            ),
            Span::styled("  (Esc dismiss)", Style::default().fg(theme.dim)),
        ])
    } else if let Some(warning) = &app.warning {
        Line::from(vec![
            Span::styled(
                " \u{26A0} ",
                Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                truncate(warning, width.saturating_sub(4)),
                Style::default().fg(theme.warning),
            ),
        ])
    } else {
        return;
    };

    f.render_widget(Paragraph::new(line), area);
}
