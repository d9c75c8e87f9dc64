use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use papersum_core::{SingleSummary, SlotBoard, SlotState};

use crate::app::{App, SummaryMode};
use crate::theme::Theme;
use crate::view::spinner_char;

/// Render the Summary tab: the single-paper block or the batch board.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let area = if let Some(hint) = &app.inline_hint {
        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(3)]).split(area);
        let line = Line::from(vec![
            Span::styled(" \u{26A0} ", Style::default().fg(theme.warning)),
            Span::styled(hint.as_str(), Style::default().fg(theme.warning)),
        ]);
        f.render_widget(Paragraph::new(line), chunks[0]);
        chunks[1]
    } else {
        area
    };

    let (title, lines) = content(app);

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(Span::styled(title, Style::default().fg(theme.active))),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.summary_scroll, 0));
    f.render_widget(paragraph, area);
}

/// Title and unwrapped lines of the Summary tab body.
fn content(app: &App) -> (String, Vec<Line<'_>>) {
    let theme = &app.theme;
    match (app.summary_mode, &app.batch) {
        (SummaryMode::Batch, Some(board)) => (
            format!(
                " Batch summary {}/{} ",
                board.completed_count(),
                board.len()
            ),
            batch_lines(board, app.tick, theme),
        ),
        _ => (" Summary ".to_string(), single_lines(app.single.state(), app.tick, theme)),
    }
}

/// Number of unwrapped lines the Summary tab body renders.
pub fn line_count(app: &App) -> usize {
    content(app).1.len()
}

fn single_lines<'a>(state: &'a SingleSummary, tick: usize, theme: &Theme) -> Vec<Line<'a>> {
    match state {
        SingleSummary::Empty => vec![Line::from(Span::styled(
            "Press Enter on a paper to summarize it, or select papers and press b.",
            Style::default().fg(theme.dim),
        ))],
        SingleSummary::Loading { paper } => vec![
            title_line(&paper.title, theme),
            Line::from(""),
            Line::from(Span::styled(
                format!("{} Generating summary...", spinner_char(tick)),
                Style::default().fg(theme.spinner),
            )),
        ],
        SingleSummary::Done { paper, text } => {
            let mut lines = vec![title_line(&paper.title, theme), Line::from("")];
            lines.extend(text_lines(text, theme));
            lines
        }
        // Detail is in the error banner.
        SingleSummary::Failed { paper, .. } => vec![
            title_line(&paper.title, theme),
            Line::from(""),
            Line::from(Span::styled(
                "No summary available.",
                Style::default().fg(theme.failed),
            )),
        ],
    }
}

fn batch_lines<'a>(board: &'a SlotBoard, tick: usize, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    for slot in board.slots() {
        let in_flight = board.in_flight() == Some(slot.position);
        let (icon, label) = match (&slot.state, in_flight) {
            (SlotState::Pending, true) => (spinner_char(tick).to_string(), "summarizing"),
            (SlotState::Pending, false) => ("\u{00B7}".to_string(), "queued"),
            (SlotState::Done(_), _) => ("\u{2713}".to_string(), "done"),
            (SlotState::Failed(_), _) => ("\u{2717}".to_string(), "failed"),
        };
        let color = theme.slot_color(&slot.state);

        lines.push(Line::from(vec![
            Span::styled(
                format!("{icon} "),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{}. {}", slot.position + 1, slot.title),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  [{label}]"), Style::default().fg(color)),
        ]));

        match &slot.state {
            SlotState::Done(text) => lines.extend(text_lines(text, theme)),
            SlotState::Failed(error) => lines.push(Line::from(Span::styled(
                format!("  Summary generation failed: {error}"),
                Style::default().fg(theme.failed),
            ))),
            SlotState::Pending => {}
        }
        lines.push(Line::from(""));
    }
    lines
}

fn title_line<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        title,
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
    ))
}

fn text_lines<'a>(text: &'a str, theme: &Theme) -> impl Iterator<Item = Line<'a>> {
    let style = Style::default().fg(theme.text);
    text.lines()
        .map(move |l| Line::from(Span::styled(format!("  {l}"), style)))
}
