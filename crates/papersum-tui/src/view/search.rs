use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use papersum_core::Paper;

use crate::app::{App, InputMode};
use crate::model::status::OpStatus;
use crate::theme::Theme;
use crate::view::{category_tags, format_date, join_authors, spinner_char, truncate};

/// Render the Search tab: controls on top, then whichever of loading/results/nothing applies.
pub fn render(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let mut constraints = vec![Constraint::Length(3)];
    if app.inline_hint.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Min(3));
    let chunks = Layout::vertical(constraints).split(area);

    render_controls(f, chunks[0], app, theme);
    let body = if let Some(hint) = &app.inline_hint {
        let line = Line::from(vec![
            Span::styled(" \u{26A0} ", Style::default().fg(theme.warning)),
            Span::styled(hint.as_str(), Style::default().fg(theme.warning)),
        ]);
        f.render_widget(Paragraph::new(line), chunks[1]);
        chunks[2]
    } else {
        chunks[1]
    };

    match &app.search_status {
        OpStatus::Idle => {
            let msg = Paragraph::new(Line::from(Span::styled(
                "  Press / to type a query, then Enter to search arXiv.",
                Style::default().fg(theme.dim),
            )));
            f.render_widget(msg, body);
        }
        OpStatus::Loading => {
            let msg = Paragraph::new(Line::from(Span::styled(
                format!("  {} Searching...", spinner_char(app.tick)),
                Style::default().fg(theme.spinner),
            )));
            f.render_widget(msg, body);
        }
        // The error itself is in the banner.
        OpStatus::Failed(_) => {}
        OpStatus::Ready if app.store.is_empty() => {
            let msg = Paragraph::new(Line::from(Span::styled(
                "  No papers found",
                Style::default().fg(theme.dim),
            )));
            f.render_widget(msg, body);
        }
        OpStatus::Ready => render_cards(f, body, app, theme),
    }
}

fn render_controls(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let editing = app.input_mode == InputMode::Query;

    let mut spans = vec![Span::styled(" ", Style::default())];
    if app.query.is_empty() && !editing {
        spans.push(Span::styled("search arXiv...", Style::default().fg(theme.dim)));
    } else {
        spans.push(Span::styled(
            app.query.as_str(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ));
    }
    if editing {
        spans.push(Span::styled("\u{2588}", Style::default().fg(theme.active)));
    }

    spans.push(Span::styled("   max: ", Style::default().fg(theme.dim)));
    spans.push(Span::styled(
        app.max_results.to_string(),
        Style::default().fg(theme.text),
    ));
    spans.push(Span::styled("  sort: ", Style::default().fg(theme.dim)));
    spans.push(Span::styled(app.sort_by.label(), Style::default().fg(theme.text)));

    if app.search_status.is_ready() && !app.store.is_empty() {
        spans.push(Span::styled(
            format!(
                "  selected: {}/{}",
                app.store.selection_len(),
                app.store.len()
            ),
            Style::default().fg(theme.active),
        ));
    }

    let border = if editing {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Search ");
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_cards(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let width = area.width as usize;
    let items: Vec<ListItem> = app
        .store
        .papers()
        .iter()
        .enumerate()
        .map(|(i, paper)| card(i, paper, app.store.is_selected(i), width, theme))
        .collect();

    let list = List::new(items).highlight_style(theme.highlight_style());
    let mut state = ListState::default().with_selected(Some(app.cursor));
    f.render_stateful_widget(list, area, &mut state);
}

fn card<'a>(
    index: usize,
    paper: &'a Paper,
    selected: bool,
    width: usize,
    theme: &Theme,
) -> ListItem<'a> {
    let checkbox = if selected { "[x]" } else { "[ ]" };
    let check_style = if selected {
        Style::default().fg(theme.done).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.dim)
    };
    let indent = "      ";
    let body_width = width.saturating_sub(indent.len());

    let title = Line::from(vec![
        Span::styled(format!(" {checkbox} "), check_style),
        Span::styled(
            truncate(
                &format!("{}. {}", index + 1, paper.title),
                width.saturating_sub(6),
            ),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
    ]);
    let authors = Line::from(vec![
        Span::raw(indent),
        Span::styled(
            truncate(&join_authors(&paper.authors), body_width),
            Style::default().fg(theme.active),
        ),
    ]);
    let abstract_line = Line::from(vec![
        Span::raw(indent),
        Span::styled(
            truncate(&paper.abstract_text.replace('\n', " "), body_width),
            Style::default().fg(theme.dim),
        ),
    ]);
    let mut meta = vec![
        Span::raw(indent),
        Span::styled(format_date(&paper.published), Style::default().fg(theme.text)),
        Span::raw("  "),
    ];
    meta.extend(category_tags(&paper.categories, theme));

    ListItem::new(vec![title, authors, abstract_line, Line::from(meta)])
}
