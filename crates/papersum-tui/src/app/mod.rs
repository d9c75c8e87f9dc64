mod backend;
mod update;

use ratatui::layout::{Constraint, Layout};
use tokio::sync::mpsc;

use papersum_core::config_file::Settings;
use papersum_core::{PaperStore, SlotBoard, SortBy, SummaryTarget, TicketCounter};

use crate::model::models::ModelPanel;
use crate::model::status::OpStatus;
use crate::theme::Theme;
use crate::tui_event::BackendCommand;
use crate::view;

/// Largest page size the +/- keys will reach.
pub const MAX_RESULTS_LIMIT: u32 = 100;

/// Which tab is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Search,
    Summary,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the search box.
    Query,
}

/// What the Summary tab shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryMode {
    Single,
    Batch,
}

/// Main application state.
pub struct App {
    pub theme: Theme,
    pub tab: Tab,
    pub input_mode: InputMode,
    pub should_quit: bool,
    pub show_help: bool,
    pub tick: usize,
    pub visible_rows: usize,

    pub query: String,
    pub max_results: u32,
    pub sort_by: SortBy,
    pub search_status: OpStatus,
    pub(crate) search_tickets: TicketCounter,
    pub store: PaperStore,
    pub cursor: usize,
    /// Validation feedback shown next to the control that caused it.
    pub inline_hint: Option<String>,

    pub summary_mode: SummaryMode,
    pub single: SummaryTarget,
    pub batch: Option<SlotBoard>,
    pub batch_running: bool,
    pub summary_scroll: u16,

    pub models: ModelPanel,

    /// Shared error banner for failed requests.
    pub error: Option<String>,
    /// Standing warning raised by the startup health probe.
    pub warning: Option<String>,

    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            tab: Tab::Search,
            input_mode: InputMode::Normal,
            should_quit: false,
            show_help: false,
            tick: 0,
            visible_rows: 20,

            query: String::new(),
            max_results: 10,
            sort_by: SortBy::Relevance,
            search_status: OpStatus::Idle,
            search_tickets: TicketCounter::default(),
            store: PaperStore::new(),
            cursor: 0,
            inline_hint: None,

            summary_mode: SummaryMode::Single,
            single: SummaryTarget::new(),
            batch: None,
            batch_running: false,
            summary_scroll: 0,

            models: ModelPanel::new(),

            error: None,
            warning: None,

            backend_cmd_tx: None,
        }
    }

    /// Seed search defaults from resolved settings.
    pub fn with_settings(mut self, settings: &Settings) -> Self {
        self.max_results = settings.max_results.clamp(1, MAX_RESULTS_LIMIT);
        self.sort_by = settings.sort_by;
        self
    }

    /// Send a command to the backend. Dropped silently when no backend is attached (tests).
    pub(crate) fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx {
            if tx.send(cmd).is_err() {
                tracing::warn!("backend command channel closed");
            }
        }
    }

    /// Render the whole UI.
    pub fn view(&self, f: &mut ratatui::Frame) {
        let area = f.area();

        let has_banner = self.error.is_some() || self.warning.is_some();
        let mut constraints = vec![
            Constraint::Length(1), // tab header
            Constraint::Length(3), // model panel
        ];
        if has_banner {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(5)); // tab body
        constraints.push(Constraint::Length(1)); // footer

        let chunks = Layout::vertical(constraints).split(area);
        let mut idx = 0;

        view::render_tabs(f, chunks[idx], self);
        idx += 1;
        view::models::render(f, chunks[idx], self);
        idx += 1;
        if has_banner {
            view::banner::render(f, chunks[idx], self);
            idx += 1;
        }
        match self.tab {
            Tab::Search => view::search::render(f, chunks[idx], self),
            Tab::Summary => view::summary::render(f, chunks[idx], self),
        }
        idx += 1;
        view::render_footer(f, chunks[idx], self);

        if self.show_help {
            view::help::render(f, &self.theme);
        }
    }
}
