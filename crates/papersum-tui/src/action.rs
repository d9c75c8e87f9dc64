/// Everything the user can ask the TUI to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    None,
    Tick,
    Resize(u16, u16),
    Quit,

    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoTop,
    GoBottom,
    SwitchTab,
    NavigateBack,
    ToggleHelp,

    // Query editing
    StartQueryEdit,
    QueryInput(char),
    QueryBackspace,
    QueryConfirm,
    QueryCancel,
    IncreaseMaxResults,
    DecreaseMaxResults,
    CycleSort,

    // Selection
    ToggleSelect,
    SelectAll,
    DeselectAll,

    // Summaries
    SummarizeCurrent,
    SummarizeSelected,

    // Model panel
    CycleModelType,
    NextModelName,
    PrevModelName,
    TestModel,
    SwitchModel,
}
