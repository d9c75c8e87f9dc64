use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod api;
pub mod batch;
pub mod catalog;
pub mod config_file;
pub mod store;
pub mod summary;

// Re-export for convenience
pub use api::{ApiClient, DEFAULT_BASE_URL, PaperApi};
pub use batch::{BatchEvent, SlotBoard, SlotState, SummaryQueue, SummarySlot, SummaryTask, run_batch};
pub use store::PaperStore;
pub use summary::{Resolution, SingleSummary, SummaryTarget, Ticket, TicketCounter};

/// A paper as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paper {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(rename = "abstract", default)]
    pub abstract_text: String,
    /// Absent for some arXiv entries; the backend then summarizes the abstract.
    #[serde(default)]
    pub pdf_url: Option<String>,
    pub published: DateTime<Utc>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Result ordering requested from the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    #[default]
    Relevance,
    /// Most recently submitted first.
    Latest,
}

impl SortBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Latest => "latest",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::Latest => "Latest",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Relevance => Self::Latest,
            Self::Latest => Self::Relevance,
        }
    }
}

impl FromStr for SortBy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "relevance" => Ok(Self::Relevance),
            "latest" => Ok(Self::Latest),
            other => Err(ValidationError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// A validated search request. Only constructible through [`SearchRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    query: String,
    max_results: u32,
    sort_by: SortBy,
}

impl SearchRequest {
    /// Trim the query and reject empty queries or a zero result limit.
    pub fn new(
        query: impl AsRef<str>,
        max_results: u32,
        sort_by: SortBy,
    ) -> Result<Self, ValidationError> {
        let query = query.as_ref().trim();
        if query.is_empty() {
            return Err(ValidationError::EmptyQuery);
        }
        if max_results == 0 {
            return Err(ValidationError::ZeroMaxResults);
        }
        Ok(Self {
            query: query.to_string(),
            max_results,
            sort_by,
        })
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn sort_by(&self) -> SortBy {
        self.sort_by
    }
}

/// LLM provider behind the summarization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ModelType {
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "ollama")]
    Ollama,
}

impl ModelType {
    pub fn all() -> &'static [ModelType] {
        &[ModelType::OpenAi, ModelType::Ollama]
    }

    /// Wire name used by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::OpenAi => "OpenAI",
            Self::Ollama => "Ollama",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::OpenAi => Self::Ollama,
            Self::Ollama => Self::OpenAi,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ModelType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "ollama" => Ok(Self::Ollama),
            other => Err(ValidationError::UnknownModelType(other.to_string())),
        }
    }
}

/// The model the backend summarizes with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub model_type: ModelType,
    pub model_name: String,
}

impl ModelConfig {
    pub fn new(model_type: ModelType, model_name: impl AsRef<str>) -> Result<Self, ValidationError> {
        let model_name = model_name.as_ref().trim();
        if model_name.is_empty() {
            return Err(ValidationError::EmptyModelName);
        }
        Ok(Self {
            model_type,
            model_name: model_name.to_string(),
        })
    }

    /// Human-readable name, e.g. `"Ollama mistral"`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.model_type.label(), self.model_name)
    }
}

/// Response of `GET /models`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelInfo {
    pub current_model_type: ModelType,
    pub current_model: String,
    /// Model names keyed by wire model type. Older servers omit it.
    #[serde(default)]
    pub available_models: BTreeMap<String, Vec<String>>,
}

impl ModelInfo {
    pub fn current(&self) -> ModelConfig {
        ModelConfig {
            model_type: self.current_model_type,
            model_name: self.current_model.clone(),
        }
    }

    /// Names the server reports for `model_type`, if any.
    pub fn models_for(&self, model_type: ModelType) -> Option<&[String]> {
        self.available_models
            .get(model_type.as_str())
            .map(Vec::as_slice)
            .filter(|names| !names.is_empty())
    }
}

/// Outcome of `POST /model/test`. A failure here is reported by the server,
/// not raised as an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelTestOutcome {
    Success { response: String },
    Failure { error: String },
}

impl ModelTestOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Remote operations, used to compose user-facing failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Search,
    Summarize,
    ModelTest,
    ModelSwitch,
    ListModels,
    Health,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Self::Search => "Search",
            Self::Summarize => "Summary generation",
            Self::ModelTest => "Model test",
            Self::ModelSwitch => "Model switch",
            Self::ListModels => "Loading model info",
            Self::Health => "Health check",
        }
    }

    /// Message used when the server gives no `error` detail.
    pub fn generic_failure(self) -> String {
        match self {
            Self::Health => "backend service is not responding".to_string(),
            other => format!("{} failed", other.label()),
        }
    }

    /// Compose `"<operation> failed: <detail>"` for the error banner.
    pub fn failure_message(self, detail: impl fmt::Display) -> String {
        format!("{} failed: {}", self.label(), detail)
    }
}

/// Rejected user input, caught before any network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("please enter a search query")]
    EmptyQuery,
    #[error("max results must be at least 1")]
    ZeroMaxResults,
    #[error("no papers selected")]
    NoSelection,
    #[error("model name must not be empty")]
    EmptyModelName,
    #[error("unknown model type '{0}' (expected openai or ollama)")]
    UnknownModelType(String),
    #[error("unknown sort order '{0}' (expected relevance or latest)")]
    UnknownSortOrder(String),
}

/// Failure of a single request/response exchange.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-2xx status. `message` is the server's `error` field or a generic fallback.
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl RequestError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            Self::Malformed(_) => None,
        }
    }
}
