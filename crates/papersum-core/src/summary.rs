//! Single-paper summary target and request-generation tickets.
//!
//! Network calls are never cancelled, so a response can arrive after a newer
//! request has already been started. Each request carries a [`Ticket`]; only
//! the most recently issued ticket may write to the target.

use crate::Paper;

/// Request-generation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets.
#[derive(Debug, Clone, Default)]
pub struct TicketCounter {
    latest: u64,
}

impl TicketCounter {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    /// Whether `ticket` is the most recently issued one.
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Invalidate every outstanding ticket.
    pub fn invalidate(&mut self) {
        self.latest += 1;
    }
}

/// What the single-summary view shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SingleSummary {
    #[default]
    Empty,
    Loading { paper: Paper },
    Done { paper: Paper, text: String },
    Failed { paper: Paper, error: String },
}

impl SingleSummary {
    pub fn paper(&self) -> Option<&Paper> {
        match self {
            Self::Empty => None,
            Self::Loading { paper } | Self::Done { paper, .. } | Self::Failed { paper, .. } => {
                Some(paper)
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }
}

/// Whether a response was applied or dropped as stale.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Applied,
    Stale,
}

/// The shared single-paper summary view. Last request started wins.
#[derive(Debug, Clone, Default)]
pub struct SummaryTarget {
    tickets: TicketCounter,
    state: SingleSummary,
}

impl SummaryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start summarizing `paper`, superseding any earlier request.
    pub fn begin(&mut self, paper: Paper) -> Ticket {
        let ticket = self.tickets.issue();
        self.state = SingleSummary::Loading { paper };
        ticket
    }

    /// Apply a response if `ticket` is still current.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<String, String>) -> Resolution {
        if !self.tickets.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), "dropping stale summary response");
            return Resolution::Stale;
        }
        match std::mem::take(&mut self.state) {
            SingleSummary::Loading { paper } => {
                self.state = match outcome {
                    Ok(text) => SingleSummary::Done { paper, text },
                    Err(error) => SingleSummary::Failed { paper, error },
                };
                Resolution::Applied
            }
            other => {
                tracing::debug!(ticket = ticket.value(), "summary already resolved");
                self.state = other;
                Resolution::Stale
            }
        }
    }

    /// Hide the view; responses still in flight will be dropped.
    pub fn clear(&mut self) {
        self.tickets.invalidate();
        self.state = SingleSummary::Empty;
    }

    pub fn state(&self) -> &SingleSummary {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn paper(title: &str) -> Paper {
        Paper {
            id: title.to_lowercase(),
            title: title.to_string(),
            authors: vec![],
            abstract_text: String::new(),
            pdf_url: None,
            published: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            categories: vec![],
        }
    }

    #[test]
    fn latest_request_wins_even_if_older_resolves_last() {
        let mut target = SummaryTarget::new();
        let old = target.begin(paper("Old"));
        let new = target.begin(paper("New"));

        assert_eq!(target.resolve(new, Ok("new summary".into())), Resolution::Applied);
        assert_eq!(target.resolve(old, Ok("old summary".into())), Resolution::Stale);

        match target.state() {
            SingleSummary::Done { paper, text } => {
                assert_eq!(paper.title, "New");
                assert_eq!(text, "new summary");
            }
            other => panic!("unexpected state {other:?}"),
        }
    }

    #[test]
    fn failure_is_recorded_for_current_ticket() {
        let mut target = SummaryTarget::new();
        let t = target.begin(paper("A"));
        assert!(target.state().is_loading());
        assert_eq!(target.resolve(t, Err("timeout".into())), Resolution::Applied);
        assert!(matches!(target.state(), SingleSummary::Failed { error, .. } if error == "timeout"));
    }

    #[test]
    fn clear_invalidates_in_flight_request() {
        let mut target = SummaryTarget::new();
        let t = target.begin(paper("A"));
        target.clear();
        assert_eq!(target.resolve(t, Ok("late".into())), Resolution::Stale);
        assert_eq!(target.state(), &SingleSummary::Empty);
    }

    #[test]
    fn ticket_resolves_only_once() {
        let mut target = SummaryTarget::new();
        let t = target.begin(paper("A"));
        assert_eq!(target.resolve(t, Ok("one".into())), Resolution::Applied);
        assert_eq!(target.resolve(t, Ok("two".into())), Resolution::Stale);
        assert!(matches!(target.state(), SingleSummary::Done { text, .. } if text == "one"));
    }

    #[test]
    fn failed_summary_is_not_overwritten_by_repeat() {
        let mut target = SummaryTarget::new();
        let t = target.begin(paper("A"));
        assert_eq!(target.resolve(t, Err("timeout".into())), Resolution::Applied);
        assert_eq!(target.resolve(t, Ok("late".into())), Resolution::Stale);
        assert!(matches!(target.state(), SingleSummary::Failed { error, .. } if error == "timeout"));
    }
}
