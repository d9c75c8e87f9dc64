//! Sequential batch summarization.
//!
//! A [`SummaryQueue`] hands out one [`SummaryTask`] at a time and refuses to
//! hand out the next until the in-flight one is finished. [`run_batch`] drives
//! the queue against a [`PaperApi`]; every outcome lands in its own slot, so a
//! failing paper never stops the rest of the batch.

use std::collections::VecDeque;

use crate::api::PaperApi;
use crate::{Paper, ValidationError};

/// State of one paper's slot in a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    Done(String),
    Failed(String),
}

impl SlotState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done(_) => "done",
            Self::Failed(_) => "failed",
        }
    }
}

/// One paper's render slot, identified by its position in the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySlot {
    pub position: usize,
    pub paper_id: String,
    pub title: String,
    pub state: SlotState,
}

/// Ordered slots of a batch plus the position currently in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotBoard {
    slots: Vec<SummarySlot>,
    in_flight: Option<usize>,
}

impl SlotBoard {
    /// One pending slot per paper, in input order.
    pub fn new(papers: &[Paper]) -> Result<Self, ValidationError> {
        if papers.is_empty() {
            return Err(ValidationError::NoSelection);
        }
        let slots = papers
            .iter()
            .enumerate()
            .map(|(position, p)| SummarySlot {
                position,
                paper_id: p.id.clone(),
                title: p.title.clone(),
                state: SlotState::Pending,
            })
            .collect();
        Ok(Self {
            slots,
            in_flight: None,
        })
    }

    pub fn slots(&self) -> &[SummarySlot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn in_flight(&self) -> Option<usize> {
        self.in_flight
    }

    /// Mark a pending slot as in flight. Fails if another slot is in flight.
    pub fn mark_started(&mut self, position: usize) -> bool {
        if self.in_flight.is_some() {
            return false;
        }
        match self.slots.get(position) {
            Some(slot) if slot.state == SlotState::Pending => {
                self.in_flight = Some(position);
                true
            }
            _ => false,
        }
    }

    /// Move a pending slot to `done` or `failed`. Terminal slots are never rewritten.
    pub fn record(&mut self, position: usize, outcome: Result<String, String>) -> bool {
        let Some(slot) = self.slots.get_mut(position) else {
            return false;
        };
        if slot.state.is_terminal() {
            return false;
        }
        slot.state = match outcome {
            Ok(text) => SlotState::Done(text),
            Err(error) => SlotState::Failed(error),
        };
        if self.in_flight == Some(position) {
            self.in_flight = None;
        }
        true
    }

    pub fn states(&self) -> Vec<SlotState> {
        self.slots.iter().map(|s| s.state.clone()).collect()
    }

    pub fn completed_count(&self) -> usize {
        self.slots.iter().filter(|s| s.state.is_terminal()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| matches!(s.state, SlotState::Failed(_)))
            .count()
    }

    pub fn is_finished(&self) -> bool {
        self.slots.iter().all(|s| s.state.is_terminal())
    }
}

/// A paper waiting for its summarize call.
#[derive(Debug, Clone)]
pub struct SummaryTask {
    pub position: usize,
    pub paper: Paper,
}

/// Queue that allows at most one task in flight.
#[derive(Debug)]
pub struct SummaryQueue {
    pending: VecDeque<SummaryTask>,
    board: SlotBoard,
}

impl SummaryQueue {
    pub fn new(papers: Vec<Paper>) -> Result<Self, ValidationError> {
        let board = SlotBoard::new(&papers)?;
        let pending = papers
            .into_iter()
            .enumerate()
            .map(|(position, paper)| SummaryTask { position, paper })
            .collect();
        Ok(Self { pending, board })
    }

    /// Next task, or `None` while a task is still in flight or the queue is drained.
    pub fn next_task(&mut self) -> Option<SummaryTask> {
        if self.board.in_flight().is_some() {
            return None;
        }
        let task = self.pending.pop_front()?;
        self.board.mark_started(task.position);
        Some(task)
    }

    /// Resolve the in-flight task.
    pub fn finish(&mut self, position: usize, outcome: Result<String, String>) {
        if self.board.in_flight() != Some(position) {
            tracing::debug!(position, "finish called for a slot that is not in flight");
            return;
        }
        self.board.record(position, outcome);
    }

    pub fn board(&self) -> &SlotBoard {
        &self.board
    }

    pub fn into_board(self) -> SlotBoard {
        self.board
    }

    pub fn is_drained(&self) -> bool {
        self.pending.is_empty() && self.board.in_flight().is_none()
    }
}

/// Progress notifications from [`run_batch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchEvent {
    SlotStarted { position: usize, paper_id: String },
    SlotFinished { position: usize, state: SlotState },
}

/// Summarize `papers` one at a time, in order.
///
/// Returns [`ValidationError::NoSelection`] without touching the network when
/// `papers` is empty. Otherwise always returns the final board: per-paper
/// failures are recorded in their slot.
pub async fn run_batch<F>(
    api: &dyn PaperApi,
    papers: Vec<Paper>,
    mut on_event: F,
) -> Result<SlotBoard, ValidationError>
where
    F: FnMut(BatchEvent) + Send,
{
    let mut queue = SummaryQueue::new(papers)?;
    let total = queue.board().len();
    tracing::info!(total, "starting batch summarization");

    while let Some(task) = queue.next_task() {
        on_event(BatchEvent::SlotStarted {
            position: task.position,
            paper_id: task.paper.id.clone(),
        });

        let outcome = api.summarize(&task.paper).await.map_err(|e| e.to_string());
        if let Err(error) = &outcome {
            tracing::warn!(position = task.position, paper_id = %task.paper.id, %error, "summary failed");
        }
        queue.finish(task.position, outcome);

        let state = queue.board().slots()[task.position].state.clone();
        on_event(BatchEvent::SlotFinished {
            position: task.position,
            state,
        });
    }

    let board = queue.into_board();
    tracing::info!(
        total,
        failed = board.failed_count(),
        "batch summarization finished"
    );
    Ok(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn paper(n: usize) -> Paper {
        Paper {
            id: format!("id-{n}"),
            title: format!("Paper {n}"),
            authors: vec![],
            abstract_text: String::new(),
            pdf_url: None,
            published: Utc.with_ymd_and_hms(2023, 5, 1, 0, 0, 0).unwrap(),
            categories: vec![],
        }
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(
            SummaryQueue::new(vec![]).unwrap_err(),
            ValidationError::NoSelection
        );
        assert_eq!(SlotBoard::new(&[]).unwrap_err(), ValidationError::NoSelection);
    }

    #[test]
    fn queue_hands_out_one_task_at_a_time() {
        let mut queue = SummaryQueue::new((0..3).map(paper).collect()).unwrap();
        let first = queue.next_task().unwrap();
        assert_eq!(first.position, 0);
        assert!(queue.next_task().is_none(), "second task while first in flight");

        queue.finish(0, Ok("a".into()));
        let second = queue.next_task().unwrap();
        assert_eq!(second.position, 1);
        queue.finish(1, Err("boom".into()));
        let third = queue.next_task().unwrap();
        queue.finish(third.position, Ok("c".into()));

        assert!(queue.next_task().is_none());
        assert!(queue.is_drained());
        assert_eq!(
            queue.board().states(),
            vec![
                SlotState::Done("a".into()),
                SlotState::Failed("boom".into()),
                SlotState::Done("c".into()),
            ]
        );
    }

    #[test]
    fn finish_ignores_slots_not_in_flight() {
        let mut queue = SummaryQueue::new((0..2).map(paper).collect()).unwrap();
        queue.finish(1, Ok("early".into()));
        assert_eq!(queue.board().slots()[1].state, SlotState::Pending);
    }

    #[test]
    fn board_never_rewrites_terminal_slots() {
        let mut board = SlotBoard::new(&[paper(0)]).unwrap();
        assert!(board.mark_started(0));
        assert!(board.record(0, Ok("first".into())));
        assert!(!board.record(0, Err("late".into())));
        assert_eq!(board.slots()[0].state, SlotState::Done("first".into()));
        assert!(board.is_finished());
        assert!(!board.mark_started(0));
    }

    #[test]
    fn board_rejects_second_in_flight_slot() {
        let mut board = SlotBoard::new(&[paper(0), paper(1)]).unwrap();
        assert!(board.mark_started(0));
        assert!(!board.mark_started(1));
        assert!(!board.mark_started(5));
        assert_eq!(board.in_flight(), Some(0));
    }
}
