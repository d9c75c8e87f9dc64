pub mod banner;
pub mod help;
pub mod models;
pub mod search;
pub mod summary;

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode, Tab};
use crate::theme::Theme;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Publication date in the local timezone, `YYYY-MM-DD`.
pub fn format_date(published: &DateTime<Utc>) -> String {
    published.with_timezone(&Local).format("%Y-%m-%d").to_string()
}

pub fn join_authors(authors: &[String]) -> String {
    authors.join(", ")
}

/// One styled tag per category, separated by spaces.
pub fn category_tags(categories: &[String], theme: &Theme) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(categories.len() * 2);
    for (i, cat) in categories.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(format!(" {cat} "), theme.tag_style()));
    }
    spans
}

/// Title bar with the two tabs.
pub fn render_tabs(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let tab_span = |label: &'static str, tab: Tab| {
        if app.tab == tab {
            Span::styled(
                format!(" {label} "),
                Style::default()
                    .fg(theme.active)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
        } else {
            Span::styled(format!(" {label} "), Style::default().fg(theme.dim))
        }
    };

    let mut spans = vec![
        Span::styled(" PAPERSUM ", theme.header_style()),
        Span::raw(" "),
        tab_span("Search", Tab::Search),
        Span::styled("\u{2502}", Style::default().fg(theme.border)),
        tab_span("Summary", Tab::Summary),
    ];
    if app.batch_running {
        spans.push(Span::styled(
            format!(" {} batch running", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let hints = match (&app.input_mode, app.tab) {
        (InputMode::Query, _) => " Enter:search  Esc:cancel",
        (InputMode::Normal, Tab::Search) => {
            " /:query  +/-:max  o:sort  Space:select  a/A:all/none  Enter:summarize  b:batch  Tab:summary  ?:help  q:quit"
        }
        (InputMode::Normal, Tab::Summary) => {
            " j/k:scroll  Tab:search  m/n:model  t:test  w:switch  ?:help  q:quit"
        }
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        truncate(hints, area.width as usize),
        app.theme.footer_style(),
    )));
    f.render_widget(footer, area);
}
