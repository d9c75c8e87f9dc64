use std::time::Instant;

use papersum_core::{SearchRequest, SlotBoard};

use super::{App, InputMode, MAX_RESULTS_LIMIT, SummaryMode, Tab};
use crate::action::Action;
use crate::model::models::{ModelBusy, StatusKind};
use crate::model::status::OpStatus;
use crate::tui_event::BackendCommand;
use crate::view;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Help overlay swallows everything except closing it
        if self.show_help {
            match action {
                Action::Quit => self.should_quit = true,
                Action::ToggleHelp | Action::NavigateBack => self.show_help = false,
                Action::Tick => self.on_tick(),
                Action::Resize(_w, h) => self.on_resize(h),
                _ => {}
            }
            return self.should_quit;
        }

        match action {
            Action::None => {}
            Action::Tick => self.on_tick(),
            Action::Resize(_w, h) => self.on_resize(h),
            Action::Quit => self.should_quit = true,

            Action::MoveDown => self.move_cursor(1),
            Action::MoveUp => self.move_cursor(-1),
            Action::PageDown => self.move_cursor(self.visible_rows.max(1) as isize),
            Action::PageUp => self.move_cursor(-(self.visible_rows.max(1) as isize)),
            Action::GoTop => match self.tab {
                Tab::Search => self.cursor = 0,
                Tab::Summary => self.summary_scroll = 0,
            },
            Action::GoBottom => match self.tab {
                Tab::Search => self.cursor = self.store.len().saturating_sub(1),
                Tab::Summary => self.summary_scroll = self.max_summary_scroll(),
            },
            Action::SwitchTab => {
                self.tab = match self.tab {
                    Tab::Search => Tab::Summary,
                    Tab::Summary => Tab::Search,
                };
            }
            Action::NavigateBack => {
                if self.error.is_some() {
                    self.error = None;
                } else if self.inline_hint.is_some() {
                    self.inline_hint = None;
                } else {
                    self.tab = Tab::Search;
                }
            }
            Action::ToggleHelp => self.show_help = true,

            Action::StartQueryEdit => {
                self.tab = Tab::Search;
                self.input_mode = InputMode::Query;
            }
            Action::QueryInput(ch) => self.query.push(ch),
            Action::QueryBackspace => {
                self.query.pop();
            }
            Action::QueryConfirm => {
                self.input_mode = InputMode::Normal;
                self.start_search();
            }
            Action::QueryCancel => self.input_mode = InputMode::Normal,
            Action::IncreaseMaxResults => {
                self.max_results = if self.max_results < 5 {
                    self.max_results + 1
                } else {
                    (self.max_results + 5).min(MAX_RESULTS_LIMIT)
                };
            }
            Action::DecreaseMaxResults => {
                self.max_results = if self.max_results > 5 {
                    self.max_results - 5
                } else {
                    self.max_results.saturating_sub(1).max(1)
                };
            }
            Action::CycleSort => self.sort_by = self.sort_by.next(),

            Action::ToggleSelect => {
                if self.results_visible() {
                    self.store.toggle(self.cursor);
                }
            }
            Action::SelectAll => {
                if self.results_visible() {
                    self.store.select_all();
                }
            }
            Action::DeselectAll => self.store.deselect_all(),

            Action::SummarizeCurrent => self.summarize_current(),
            Action::SummarizeSelected => self.summarize_selected(),

            Action::CycleModelType => {
                if self.models.busy.is_none() {
                    self.models.cycle_type();
                }
            }
            Action::NextModelName => self.models.next_name(),
            Action::PrevModelName => self.models.prev_name(),
            Action::TestModel => self.test_model(),
            Action::SwitchModel => self.switch_model(),
        }
        self.should_quit
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.models.expire_status(Instant::now());
    }

    fn on_resize(&mut self, height: u16) {
        // Each paper card is four rows; leave room for header, panels and footer.
        self.visible_rows = ((height as usize).saturating_sub(10) / 4).max(1);
    }

    fn move_cursor(&mut self, delta: isize) {
        match self.tab {
            Tab::Search => {
                let len = self.store.len();
                if len == 0 {
                    return;
                }
                let next = (self.cursor as isize + delta).clamp(0, len as isize - 1);
                self.cursor = next as usize;
            }
            Tab::Summary => {
                let next = (self.summary_scroll as isize + delta).max(0);
                self.summary_scroll = next.min(self.max_summary_scroll() as isize) as u16;
            }
        }
    }

    /// Scroll offset that puts the last summary line at the bottom of the viewport.
    fn max_summary_scroll(&self) -> u16 {
        let viewport = self.visible_rows.max(1) * 4;
        let lines = view::summary::line_count(self);
        lines.saturating_sub(viewport).min(u16::MAX as usize) as u16
    }

    /// Cards are only actionable while the result list is on screen.
    fn results_visible(&self) -> bool {
        self.search_status.is_ready() && !self.store.is_empty()
    }

    pub(crate) fn start_search(&mut self) {
        let request = match SearchRequest::new(&self.query, self.max_results, self.sort_by) {
            Ok(request) => request,
            Err(e) => {
                self.inline_hint = Some(e.to_string());
                return;
            }
        };

        let ticket = self.search_tickets.issue();
        tracing::info!(query = request.query(), ticket = ticket.value(), "search requested");

        self.inline_hint = None;
        self.error = None;
        self.search_status = OpStatus::Loading;
        self.tab = Tab::Search;
        self.store.deselect_all();
        // A new search hides the previous summary; a running batch keeps its board.
        self.single.clear();
        if !self.batch_running {
            self.batch = None;
            self.summary_mode = SummaryMode::Single;
        }
        self.summary_scroll = 0;

        self.send(BackendCommand::Search { ticket, request });
    }

    fn summarize_current(&mut self) {
        if self.tab != Tab::Search || !self.results_visible() {
            return;
        }
        let Some(paper) = self.store.get(self.cursor).cloned() else {
            return;
        };

        let ticket = self.single.begin(paper.clone());
        tracing::info!(paper_id = %paper.id, ticket = ticket.value(), "summary requested");

        self.error = None;
        self.summary_mode = SummaryMode::Single;
        self.summary_scroll = 0;
        self.tab = Tab::Summary;
        self.send(BackendCommand::Summarize { ticket, paper });
    }

    fn summarize_selected(&mut self) {
        if self.batch_running {
            self.inline_hint = Some("a batch summarization is already running".to_string());
            return;
        }
        if !self.results_visible() {
            self.inline_hint = Some("no search results to summarize".to_string());
            return;
        }

        let papers = self.store.selected_papers();
        let board = match SlotBoard::new(&papers) {
            Ok(board) => board,
            Err(e) => {
                self.inline_hint = Some(e.to_string());
                return;
            }
        };

        tracing::info!(count = papers.len(), "batch summary requested");
        self.inline_hint = None;
        self.error = None;
        self.batch = Some(board);
        self.batch_running = true;
        self.summary_mode = SummaryMode::Batch;
        self.summary_scroll = 0;
        self.tab = Tab::Summary;
        self.send(BackendCommand::SummarizeBatch { papers });
    }

    fn test_model(&mut self) {
        if self.models.busy.is_some() {
            return;
        }
        self.models.busy = Some(ModelBusy::Testing);
        self.send(BackendCommand::TestModel);
    }

    fn switch_model(&mut self) {
        if self.models.busy.is_some() {
            return;
        }
        match self.models.selected_config() {
            Ok(config) => {
                tracing::info!(model = %config.display_name(), "model switch requested");
                self.models.busy = Some(ModelBusy::Switching);
                self.send(BackendCommand::SwitchModel { config });
            }
            Err(e) => {
                self.models
                    .set_status(StatusKind::Error, e.to_string(), Instant::now());
            }
        }
    }
}
