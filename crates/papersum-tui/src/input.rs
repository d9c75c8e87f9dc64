use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Query => map_key_query(key),
            }
        }
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('/') | KeyCode::Char('i') => Action::StartQueryEdit,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::IncreaseMaxResults,
        KeyCode::Char('-') => Action::DecreaseMaxResults,
        KeyCode::Char('o') => Action::CycleSort,
        KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('a') => Action::SelectAll,
        KeyCode::Char('A') => Action::DeselectAll,
        KeyCode::Enter => Action::SummarizeCurrent,
        KeyCode::Char('b') => Action::SummarizeSelected,
        KeyCode::Char('m') => Action::CycleModelType,
        KeyCode::Char('n') => Action::NextModelName,
        KeyCode::Char('N') => Action::PrevModelName,
        KeyCode::Char('t') => Action::TestModel,
        KeyCode::Char('w') => Action::SwitchModel,
        KeyCode::Tab => Action::SwitchTab,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_query(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::QueryCancel,
        KeyCode::Enter => Action::QueryConfirm,
        KeyCode::Backspace => Action::QueryBackspace,
        KeyCode::Char(c) => Action::QueryInput(c),
        _ => Action::None,
    }
}
