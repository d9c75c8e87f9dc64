use std::time::Instant;

use papersum_core::{ModelTestOutcome, Operation, Resolution, SlotState};

use super::App;
use crate::model::models::StatusKind;
use crate::model::status::OpStatus;
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::SearchComplete { ticket, result } => {
                if !self.search_tickets.is_current(ticket) {
                    tracing::debug!(ticket = ticket.value(), "dropping stale search response");
                    return;
                }
                match result {
                    Ok(papers) => {
                        tracing::info!(count = papers.len(), "search results received");
                        self.store.set_results(papers);
                        self.cursor = 0;
                        self.search_status = OpStatus::Ready;
                    }
                    Err(msg) => {
                        self.error = Some(Operation::Search.failure_message(&msg));
                        self.search_status = OpStatus::Failed(msg);
                    }
                }
            }
            BackendEvent::SummaryComplete { ticket, result } => {
                let failure = result.as_ref().err().cloned();
                if self.single.resolve(ticket, result) == Resolution::Applied {
                    if let Some(msg) = failure {
                        self.error = Some(Operation::Summarize.failure_message(msg));
                    }
                }
            }
            BackendEvent::BatchSlotStarted { position } => {
                if let Some(board) = &mut self.batch {
                    board.mark_started(position);
                }
            }
            BackendEvent::BatchSlotFinished { position, state } => {
                let outcome = match state {
                    SlotState::Done(text) => Ok(text),
                    SlotState::Failed(error) => Err(error),
                    SlotState::Pending => return,
                };
                if let Some(board) = &mut self.batch {
                    board.record(position, outcome);
                }
            }
            BackendEvent::BatchComplete => {
                self.batch_running = false;
                if let Some(board) = &self.batch {
                    tracing::info!(
                        done = board.completed_count(),
                        failed = board.failed_count(),
                        "batch finished"
                    );
                }
            }
            BackendEvent::ModelTested(result) => {
                self.models.busy = None;
                let (kind, message) = match result {
                    Ok(ModelTestOutcome::Success { response }) => {
                        (StatusKind::Success, format!("Model test passed: {response}"))
                    }
                    Ok(ModelTestOutcome::Failure { error }) => {
                        (StatusKind::Error, format!("Model test failed: {error}"))
                    }
                    Err(msg) => (StatusKind::Error, Operation::ModelTest.failure_message(msg)),
                };
                self.models.set_status(kind, message, Instant::now());
            }
            BackendEvent::ModelSwitched(result) => {
                self.models.busy = None;
                match result {
                    Ok(config) => {
                        let message = format!("Switched to {}", config.display_name());
                        self.models.set_current(config);
                        self.models
                            .set_status(StatusKind::Success, message, Instant::now());
                    }
                    Err(msg) => {
                        self.models.set_status(
                            StatusKind::Error,
                            Operation::ModelSwitch.failure_message(msg),
                            Instant::now(),
                        );
                    }
                }
            }
            BackendEvent::ModelsLoaded(result) => match result {
                Ok(info) => self.models.apply_info(&info),
                Err(msg) => tracing::warn!(error = %msg, "could not load model info"),
            },
            BackendEvent::HealthChecked(result) => match result {
                Ok(()) => {
                    tracing::debug!("backend is healthy");
                    self.warning = None;
                }
                Err(msg) => {
                    tracing::warn!(error = %msg, "health check failed");
                    self.warning = Some(format!(
                        "Cannot reach the backend service; make sure it is running ({msg})"
                    ));
                }
            },
        }
    }
}
