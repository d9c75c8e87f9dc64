//! Scripted [`PaperApi`] implementation for tests and offline demos.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ApiFuture, PaperApi};
use crate::{ModelConfig, ModelInfo, ModelTestOutcome, ModelType, Paper, RequestError, SearchRequest};

/// One observed call, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Search(String),
    SummarizeStarted(String),
    SummarizeFinished(String),
    TestModel,
    ListModels,
    SwitchModel(ModelConfig),
    Health,
}

/// A hand-rolled mock implementing [`PaperApi`].
///
/// Summaries are served from a sequence (`Ok(text)` or `Err(server message)`),
/// falling back to `"Summary of <title>"` once exhausted. Every call is
/// recorded, and the number of concurrently running summarize calls is tracked
/// so tests can assert on sequencing.
pub struct MockApi {
    papers: Vec<Paper>,
    search_error: Option<String>,
    summaries: Mutex<VecDeque<Result<String, String>>>,
    model: Mutex<ModelConfig>,
    model_test: ModelTestOutcome,
    healthy: bool,
    delay: Option<Duration>,
    calls: Mutex<Vec<MockCall>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            papers: Vec::new(),
            search_error: None,
            summaries: Mutex::new(VecDeque::new()),
            model: Mutex::new(ModelConfig {
                model_type: ModelType::OpenAi,
                model_name: "gpt-3.5-turbo".to_string(),
            }),
            model_test: ModelTestOutcome::Success {
                response: "ok".to_string(),
            },
            healthy: true,
            delay: None,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Papers served by `search` (truncated to `max_results`).
    pub fn with_papers(mut self, papers: Vec<Paper>) -> Self {
        self.papers = papers;
        self
    }

    pub fn with_search_error(mut self, message: impl Into<String>) -> Self {
        self.search_error = Some(message.into());
        self
    }

    /// Responses for successive `summarize` calls.
    pub fn with_summaries(self, summaries: Vec<Result<String, String>>) -> Self {
        *self.summaries.lock().unwrap() = summaries.into();
        self
    }

    pub fn with_model(self, model: ModelConfig) -> Self {
        *self.model.lock().unwrap() = model;
        self
    }

    pub fn with_model_test(mut self, outcome: ModelTestOutcome) -> Self {
        self.model_test = outcome;
        self
    }

    pub fn unhealthy(mut self) -> Self {
        self.healthy = false;
        self
    }

    /// Simulated latency for every summarize call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn summarize_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, MockCall::SummarizeStarted(_)))
            .count()
    }

    /// Highest number of summarize calls observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }
}

fn server_error(message: String) -> RequestError {
    RequestError::Server {
        status: 500,
        message,
    }
}

impl PaperApi for MockApi {
    fn search<'a>(&'a self, request: &'a SearchRequest) -> ApiFuture<'a, Vec<Paper>> {
        self.record(MockCall::Search(request.query().to_string()));
        Box::pin(async move {
            if let Some(message) = &self.search_error {
                return Err(server_error(message.clone()));
            }
            Ok(self
                .papers
                .iter()
                .take(request.max_results() as usize)
                .cloned()
                .collect())
        })
    }

    fn summarize<'a>(&'a self, paper: &'a Paper) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.record(MockCall::SummarizeStarted(paper.id.clone()));

            if let Some(d) = self.delay {
                tokio::time::sleep(d).await;
            }
            let scripted = self.summaries.lock().unwrap().pop_front();

            self.record(MockCall::SummarizeFinished(paper.id.clone()));
            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            match scripted {
                Some(Ok(text)) => Ok(text),
                Some(Err(message)) => Err(server_error(message)),
                None => Ok(format!("Summary of {}", paper.title)),
            }
        })
    }

    fn test_model(&self) -> ApiFuture<'_, ModelTestOutcome> {
        self.record(MockCall::TestModel);
        Box::pin(async move { Ok(self.model_test.clone()) })
    }

    fn list_models(&self) -> ApiFuture<'_, ModelInfo> {
        self.record(MockCall::ListModels);
        Box::pin(async move {
            let current = self.model.lock().unwrap().clone();
            Ok(ModelInfo {
                current_model_type: current.model_type,
                current_model: current.model_name,
                available_models: Default::default(),
            })
        })
    }

    fn switch_model<'a>(&'a self, config: &'a ModelConfig) -> ApiFuture<'a, ModelConfig> {
        self.record(MockCall::SwitchModel(config.clone()));
        Box::pin(async move {
            *self.model.lock().unwrap() = config.clone();
            Ok(config.clone())
        })
    }

    fn health(&self) -> ApiFuture<'_, ()> {
        self.record(MockCall::Health);
        Box::pin(async move {
            if self.healthy {
                Ok(())
            } else {
                Err(server_error("backend service is not responding".to_string()))
            }
        })
    }
}
