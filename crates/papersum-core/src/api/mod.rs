//! Client for the paper search / summarization HTTP API.

pub mod mock;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::{
    ModelConfig, ModelInfo, ModelTestOutcome, Operation, Paper, RequestError, SearchRequest,
};

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Boxed future returned by [`PaperApi`] operations.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RequestError>> + Send + 'a>>;

/// The remote operations the front ends depend on.
///
/// [`ApiClient`] talks HTTP; [`mock::MockApi`] replays scripted responses.
pub trait PaperApi: Send + Sync {
    /// `POST /search`.
    fn search<'a>(&'a self, request: &'a SearchRequest) -> ApiFuture<'a, Vec<Paper>>;

    /// `POST /summarize`. Returns the summary text.
    fn summarize<'a>(&'a self, paper: &'a Paper) -> ApiFuture<'a, String>;

    /// `POST /model/test`. Semantic failures come back as
    /// [`ModelTestOutcome::Failure`], never as an error.
    fn test_model(&self) -> ApiFuture<'_, ModelTestOutcome>;

    /// `GET /models`.
    fn list_models(&self) -> ApiFuture<'_, ModelInfo>;

    /// `POST /model/switch`. Returns the model the server actually switched to.
    fn switch_model<'a>(&'a self, config: &'a ModelConfig) -> ApiFuture<'a, ModelConfig>;

    /// `GET /health`.
    fn health(&self) -> ApiFuture<'_, ()>;
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    papers: Vec<Paper>,
}

#[derive(Serialize)]
struct SummarizeBody<'a> {
    paper_id: &'a str,
    pdf_url: Option<&'a str>,
    #[serde(rename = "abstract")]
    abstract_text: &'a str,
}

#[derive(Deserialize)]
struct SummarizeResponse {
    summary: String,
}

#[derive(Deserialize)]
struct ModelTestResponse {
    status: String,
    response: Option<String>,
    error: Option<String>,
}

impl From<ModelTestResponse> for ModelTestOutcome {
    fn from(body: ModelTestResponse) -> Self {
        if body.status.eq_ignore_ascii_case("success") {
            ModelTestOutcome::Success {
                response: body.response.unwrap_or_default(),
            }
        } else {
            ModelTestOutcome::Failure {
                error: body
                    .error
                    .unwrap_or_else(|| format!("model reported status '{}'", body.status)),
            }
        }
    }
}

/// HTTP implementation of [`PaperApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self::with_client(client, base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, op: Operation, path: &str, body: &B) -> Result<T, RequestError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        tracing::debug!(operation = op.label(), path, "POST");
        let resp = self.client.post(self.url(path)).json(body).send().await?;
        decode(op, resp).await
    }

    async fn get_json<T: DeserializeOwned>(&self, op: Operation, path: &str) -> Result<T, RequestError> {
        tracing::debug!(operation = op.label(), path, "GET");
        let resp = self.client.get(self.url(path)).send().await?;
        decode(op, resp).await
    }
}

/// Decode a JSON body, mapping non-2xx statuses to [`RequestError::Server`].
async fn decode<T: DeserializeOwned>(op: Operation, resp: reqwest::Response) -> Result<T, RequestError> {
    let status = resp.status();
    let bytes = resp.bytes().await?;
    if !status.is_success() {
        return Err(server_error(op, status, &bytes));
    }
    serde_json::from_slice(&bytes).map_err(|e| RequestError::Malformed(e.to_string()))
}

fn server_error(op: Operation, status: StatusCode, body: &[u8]) -> RequestError {
    let message = serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| op.generic_failure());
    tracing::warn!(operation = op.label(), status = status.as_u16(), %message, "server returned an error");
    RequestError::Server {
        status: status.as_u16(),
        message,
    }
}

impl PaperApi for ApiClient {
    fn search<'a>(&'a self, request: &'a SearchRequest) -> ApiFuture<'a, Vec<Paper>> {
        Box::pin(async move {
            let body: SearchResponse = self.post_json(Operation::Search, "/search", request).await?;
            tracing::debug!(query = request.query(), count = body.papers.len(), "search complete");
            Ok(body.papers)
        })
    }

    fn summarize<'a>(&'a self, paper: &'a Paper) -> ApiFuture<'a, String> {
        Box::pin(async move {
            let body = SummarizeBody {
                paper_id: &paper.id,
                pdf_url: paper.pdf_url.as_deref(),
                abstract_text: &paper.abstract_text,
            };
            let resp: SummarizeResponse = self
                .post_json(Operation::Summarize, "/summarize", &body)
                .await?;
            Ok(resp.summary)
        })
    }

    fn test_model(&self) -> ApiFuture<'_, ModelTestOutcome> {
        Box::pin(async move {
            let op = Operation::ModelTest;
            tracing::debug!(operation = op.label(), path = "/model/test", "POST");
            let resp = self
                .client
                .post(self.url("/model/test"))
                .json(&serde_json::json!({}))
                .send()
                .await?;
            let status = resp.status();
            let bytes = resp.bytes().await?;

            // The backend answers a failed test with 500 and `status: "error"`,
            // so the body wins over the HTTP status whenever it decodes.
            match serde_json::from_slice::<ModelTestResponse>(&bytes) {
                Ok(body) => Ok(body.into()),
                Err(_) if !status.is_success() => Err(server_error(op, status, &bytes)),
                Err(e) => Err(RequestError::Malformed(e.to_string())),
            }
        })
    }

    fn list_models(&self) -> ApiFuture<'_, ModelInfo> {
        Box::pin(async move { self.get_json(Operation::ListModels, "/models").await })
    }

    fn switch_model<'a>(&'a self, config: &'a ModelConfig) -> ApiFuture<'a, ModelConfig> {
        Box::pin(async move {
            let switched: ModelConfig = self
                .post_json(Operation::ModelSwitch, "/model/switch", config)
                .await?;
            tracing::info!(model = %switched.display_name(), "model switched");
            Ok(switched)
        })
    }

    fn health(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let op = Operation::Health;
            let resp = self.client.get(self.url("/health")).send().await?;
            let status = resp.status();
            if status.is_success() {
                Ok(())
            } else {
                Err(RequestError::Server {
                    status: status.as_u16(),
                    message: op.generic_failure(),
                })
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5000/api/");
        assert_eq!(client.base_url(), "http://localhost:5000/api");
        assert_eq!(client.url("/search"), "http://localhost:5000/api/search");
    }

    #[test]
    fn server_error_prefers_body_message() {
        let err = server_error(
            Operation::Summarize,
            StatusCode::TOO_MANY_REQUESTS,
            br#"{"error": "rate limited"}"#,
        );
        assert_eq!(err.to_string(), "rate limited");
        assert_eq!(err.status(), Some(429));
    }

    #[test]
    fn server_error_falls_back_to_generic_message() {
        let err = server_error(Operation::Search, StatusCode::BAD_GATEWAY, b"<html>oops</html>");
        assert_eq!(err.to_string(), "Search failed");

        let err = server_error(Operation::Search, StatusCode::BAD_REQUEST, br#"{"error": ""}"#);
        assert_eq!(err.to_string(), "Search failed");
    }

    #[test]
    fn model_test_body_maps_to_outcome() {
        let ok: ModelTestResponse =
            serde_json::from_str(r#"{"status": "success", "response": "pong"}"#).unwrap();
        assert_eq!(
            ModelTestOutcome::from(ok),
            ModelTestOutcome::Success {
                response: "pong".into()
            }
        );

        let failed: ModelTestResponse =
            serde_json::from_str(r#"{"status": "error", "error": "connection refused"}"#).unwrap();
        assert_eq!(
            ModelTestOutcome::from(failed),
            ModelTestOutcome::Failure {
                error: "connection refused".into()
            }
        );
    }

    #[test]
    fn summarize_body_uses_wire_names() {
        let body = SummarizeBody {
            paper_id: "2401.00001",
            pdf_url: Some("http://arxiv.org/pdf/2401.00001"),
            abstract_text: "We study...",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["abstract"], "We study...");
        assert_eq!(json["paper_id"], "2401.00001");
    }
}
