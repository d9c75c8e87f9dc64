//! Bridge between the TUI and the papersum API.
//!
//! The UI loop never awaits the network. Each [`BackendCommand`] is run on its
//! own task and reports back through [`BackendEvent`]s; a batch is one task
//! that summarizes its papers strictly one after another.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use papersum_core::{BatchEvent, PaperApi, run_batch};

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands until the channel closes or `cancel` fires.
pub async fn run(
    api: Arc<dyn PaperApi>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    loop {
        let cmd = tokio::select! {
            _ = cancel.cancelled() => break,
            cmd = cmd_rx.recv() => match cmd {
                Some(cmd) => cmd,
                None => break,
            },
        };

        let api = Arc::clone(&api);
        let tx = event_tx.clone();
        tokio::spawn(async move {
            execute(api.as_ref(), cmd, &tx).await;
        });
    }
    tracing::debug!("backend command loop stopped");
}

/// Run one command to completion and report its outcome.
pub async fn execute(
    api: &dyn PaperApi,
    cmd: BackendCommand,
    tx: &mpsc::UnboundedSender<BackendEvent>,
) {
    let event = match cmd {
        BackendCommand::Search { ticket, request } => BackendEvent::SearchComplete {
            ticket,
            result: api.search(&request).await.map_err(|e| e.to_string()),
        },
        BackendCommand::Summarize { ticket, paper } => BackendEvent::SummaryComplete {
            ticket,
            result: api.summarize(&paper).await.map_err(|e| e.to_string()),
        },
        BackendCommand::SummarizeBatch { papers } => {
            let slot_tx = tx.clone();
            let outcome = run_batch(api, papers, move |event| {
                let event = match event {
                    BatchEvent::SlotStarted { position, .. } => {
                        BackendEvent::BatchSlotStarted { position }
                    }
                    BatchEvent::SlotFinished { position, state } => {
                        BackendEvent::BatchSlotFinished { position, state }
                    }
                };
                let _ = slot_tx.send(event);
            })
            .await;
            if let Err(e) = outcome {
                tracing::warn!(error = %e, "batch rejected");
            }
            BackendEvent::BatchComplete
        }
        BackendCommand::TestModel => {
            BackendEvent::ModelTested(api.test_model().await.map_err(|e| e.to_string()))
        }
        BackendCommand::SwitchModel { config } => BackendEvent::ModelSwitched(
            api.switch_model(&config).await.map_err(|e| e.to_string()),
        ),
        BackendCommand::LoadModels => {
            BackendEvent::ModelsLoaded(api.list_models().await.map_err(|e| e.to_string()))
        }
        BackendCommand::CheckHealth => {
            BackendEvent::HealthChecked(api.health().await.map_err(|e| e.to_string()))
        }
    };

    // The UI may already be gone on shutdown.
    let _ = tx.send(event);
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::{TimeZone, Utc};
    use papersum_core::api::mock::MockApi;
    use papersum_core::{ModelConfig, ModelType, Paper, SlotState, TicketCounter};

    use super::*;

    fn paper(n: usize) -> Paper {
        Paper {
            id: format!("p{n}"),
            title: format!("Paper {n}"),
            authors: vec![],
            abstract_text: String::new(),
            pdf_url: Some(format!("http://arxiv.org/pdf/{n}")),
            published: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            categories: vec![],
        }
    }

    async fn collect_until_batch_complete(
        rx: &mut mpsc::UnboundedReceiver<BackendEvent>,
    ) -> Vec<BackendEvent> {
        let mut events = Vec::new();
        while let Some(evt) = rx.recv().await {
            let done = evt == BackendEvent::BatchComplete;
            events.push(evt);
            if done {
                break;
            }
        }
        events
    }

    #[tokio::test]
    async fn batch_reports_each_slot_then_completes() {
        let api = MockApi::new().with_summaries(vec![Ok("one".into()), Err("boom".into())]);
        let (tx, mut rx) = mpsc::unbounded_channel();

        execute(
            &api,
            BackendCommand::SummarizeBatch {
                papers: vec![paper(0), paper(1)],
            },
            &tx,
        )
        .await;

        let events = collect_until_batch_complete(&mut rx).await;
        assert_eq!(
            events,
            vec![
                BackendEvent::BatchSlotStarted { position: 0 },
                BackendEvent::BatchSlotFinished {
                    position: 0,
                    state: SlotState::Done("one".into())
                },
                BackendEvent::BatchSlotStarted { position: 1 },
                BackendEvent::BatchSlotFinished {
                    position: 1,
                    state: SlotState::Failed("boom".into())
                },
                BackendEvent::BatchComplete,
            ]
        );
    }

    #[tokio::test]
    async fn empty_batch_still_completes() {
        let api = MockApi::new();
        let (tx, mut rx) = mpsc::unbounded_channel();
        execute(&api, BackendCommand::SummarizeBatch { papers: vec![] }, &tx).await;
        assert_eq!(rx.recv().await, Some(BackendEvent::BatchComplete));
        assert_eq!(api.summarize_count(), 0);
    }

    #[tokio::test]
    async fn search_error_becomes_message() {
        let api = MockApi::new().with_search_error("arXiv unavailable");
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticket = TicketCounter::default().issue();
        let request = papersum_core::SearchRequest::new("q", 3, Default::default()).unwrap();

        execute(&api, BackendCommand::Search { ticket, request }, &tx).await;

        assert_eq!(
            rx.recv().await,
            Some(BackendEvent::SearchComplete {
                ticket,
                result: Err("arXiv unavailable".into())
            })
        );
    }

    #[tokio::test]
    async fn command_loop_runs_commands_concurrently() {
        let api: Arc<dyn PaperApi> = Arc::new(
            MockApi::new()
                .with_delay(Duration::from_millis(20))
                .with_model(ModelConfig::new(ModelType::Ollama, "mistral").unwrap()),
        );
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(api, cmd_rx, event_tx, cancel.clone()));

        cmd_tx.send(BackendCommand::CheckHealth).unwrap();
        cmd_tx.send(BackendCommand::LoadModels).unwrap();

        let mut saw_health = false;
        let mut saw_models = false;
        for _ in 0..2 {
            match event_rx.recv().await {
                Some(BackendEvent::HealthChecked(Ok(()))) => saw_health = true,
                Some(BackendEvent::ModelsLoaded(Ok(info))) => {
                    assert_eq!(info.current().display_name(), "Ollama mistral");
                    saw_models = true;
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert!(saw_health && saw_models);

        cancel.cancel();
        handle.await.unwrap();
    }
}
