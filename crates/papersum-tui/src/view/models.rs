use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::App;
use crate::model::models::StatusKind;
use crate::view::{spinner_char, truncate};

/// Model controls: type, name, active model and the last status message.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let panel = &app.models;

    let choice = panel.selected_choice();
    let name = match &choice {
        Some(c) if c.label != c.value => format!("{} ({})", c.label, c.value),
        Some(c) => c.value.clone(),
        None => "-".to_string(),
    };

    let mut spans = vec![
        Span::styled(" Type: ", Style::default().fg(theme.dim)),
        Span::styled(
            panel.selected_type.label(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled("  Model: ", Style::default().fg(theme.dim)),
        Span::styled(name, Style::default().fg(theme.text)),
        Span::styled("  \u{2502} Current: ", Style::default().fg(theme.dim)),
        Span::styled(
            panel.current_label(),
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(busy) = panel.busy {
        spans.push(Span::styled(
            format!("  {} {}", spinner_char(app.tick), busy.label()),
            Style::default().fg(theme.spinner),
        ));
    } else if let Some(status) = &panel.status {
        let icon = match status.kind {
            StatusKind::Success => "\u{2713}",
            StatusKind::Error => "\u{2717}",
        };
        let icon_style = if status.flash_until.is_some() {
            Style::default()
                .fg(theme.status_color(status.kind))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.dim)
        };
        let used: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let room = (area.width as usize).saturating_sub(used + 6);
        spans.push(Span::raw("  "));
        spans.push(Span::styled(icon, icon_style));
        spans.push(Span::styled(
            format!(" {}", truncate(&status.message, room)),
            Style::default().fg(theme.text),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(" Model ", Style::default().fg(theme.active)));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
