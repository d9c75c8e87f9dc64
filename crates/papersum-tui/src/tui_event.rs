use papersum_core::{
    ModelConfig, ModelInfo, ModelTestOutcome, Paper, SearchRequest, SlotState, Ticket,
};

/// Commands sent from the TUI to the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCommand {
    Search {
        ticket: Ticket,
        request: SearchRequest,
    },
    /// Summarize one paper on demand.
    Summarize { ticket: Ticket, paper: Paper },
    /// Summarize every paper in order, one request at a time.
    SummarizeBatch { papers: Vec<Paper> },
    TestModel,
    SwitchModel { config: ModelConfig },
    LoadModels,
    CheckHealth,
}

/// Events flowing from backend tasks to the TUI.
///
/// Errors travel as display strings; the TUI only ever shows them.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    SearchComplete {
        ticket: Ticket,
        result: Result<Vec<Paper>, String>,
    },
    SummaryComplete {
        ticket: Ticket,
        result: Result<String, String>,
    },
    /// A batch slot's request has been sent.
    BatchSlotStarted { position: usize },
    /// A batch slot reached a terminal state.
    BatchSlotFinished { position: usize, state: SlotState },
    /// Every slot of the running batch is terminal.
    BatchComplete,
    ModelTested(Result<ModelTestOutcome, String>),
    ModelSwitched(Result<ModelConfig, String>),
    ModelsLoaded(Result<ModelInfo, String>),
    HealthChecked(Result<(), String>),
}
