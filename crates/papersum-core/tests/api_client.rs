//! [`ApiClient`] against an in-process axum server on an ephemeral port.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use papersum_core::api::{ApiClient, PaperApi};
use papersum_core::{ModelConfig, ModelTestOutcome, ModelType, RequestError, SearchRequest, SortBy};

type Seen = Arc<Mutex<Vec<Value>>>;

/// Serve `app` under `/api` and return the base URL.
async fn spawn(app: Router) -> String {
    let app = Router::new().nest("/api", app);
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

fn paper_json(n: usize) -> Value {
    json!({
        "id": format!("http://arxiv.org/abs/2401.{n:05}v1"),
        "title": format!("Transformers part {n}"),
        "authors": ["A. Author", "B. Author"],
        "abstract": "We study attention.",
        "published": "2024-01-15T10:00:00+00:00",
        "pdf_url": format!("http://arxiv.org/pdf/2401.{n:05}v1"),
        "categories": ["cs.CL"]
    })
}

async fn search_handler(State(seen): State<Seen>, Json(body): Json<Value>) -> impl IntoResponse {
    seen.lock().unwrap().push(body.clone());
    let n = body["max_results"].as_u64().unwrap_or(0) as usize;
    Json(json!({ "papers": (0..n).map(paper_json).collect::<Vec<_>>() }))
}

#[tokio::test]
async fn search_posts_request_and_decodes_papers() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/search", post(search_handler))
        .with_state(seen.clone());
    let client = ApiClient::new(spawn(app).await);

    let req = SearchRequest::new("transformers", 5, SortBy::Latest).unwrap();
    let papers = client.search(&req).await.unwrap();

    assert_eq!(papers.len(), 5);
    assert_eq!(papers[2].title, "Transformers part 2");
    assert_eq!(papers[0].categories, vec!["cs.CL"]);

    let body = seen.lock().unwrap()[0].clone();
    assert_eq!(
        body,
        json!({"query": "transformers", "max_results": 5, "sort_by": "latest"})
    );
}

#[tokio::test]
async fn summarize_sends_paper_fields() {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route(
            "/summarize",
            post(|State(seen): State<Seen>, Json(body): Json<Value>| async move {
                seen.lock().unwrap().push(body.clone());
                Json(json!({
                    "paper_id": body["paper_id"],
                    "summary": "1. Background ...",
                    "source": "abstract"
                }))
            }),
        )
        .with_state(seen.clone());
    let client = ApiClient::new(spawn(app).await);

    let paper = serde_json::from_value(paper_json(7)).unwrap();
    let summary = client.summarize(&paper).await.unwrap();
    assert_eq!(summary, "1. Background ...");

    let body = seen.lock().unwrap()[0].clone();
    assert_eq!(body["paper_id"], "http://arxiv.org/abs/2401.00007v1");
    assert_eq!(body["pdf_url"], "http://arxiv.org/pdf/2401.00007v1");
    assert_eq!(body["abstract"], "We study attention.");
}

#[tokio::test]
async fn server_error_message_is_surfaced() {
    let app = Router::new().route(
        "/summarize",
        post(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                Json(json!({"error": "rate limited"})),
            )
        }),
    );
    let client = ApiClient::new(spawn(app).await);

    let paper = serde_json::from_value(paper_json(1)).unwrap();
    let err = client.summarize(&paper).await.unwrap_err();
    match err {
        RequestError::Server { status, message } => {
            assert_eq!(status, 429);
            assert_eq!(message, "rate limited");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_uses_generic_message() {
    let app = Router::new().route(
        "/search",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error") }),
    );
    let client = ApiClient::new(spawn(app).await);

    let req = SearchRequest::new("q", 1, SortBy::Relevance).unwrap();
    let err = client.search(&req).await.unwrap_err();
    assert_eq!(err.to_string(), "Search failed");
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn malformed_success_body_is_an_error() {
    let app = Router::new().route("/search", post(|| async { Json(json!({"results": []})) }));
    let client = ApiClient::new(spawn(app).await);

    let req = SearchRequest::new("q", 1, SortBy::Relevance).unwrap();
    let err = client.search(&req).await.unwrap_err();
    assert!(matches!(err, RequestError::Malformed(_)), "{err:?}");
}

#[tokio::test]
async fn model_test_failure_is_not_an_error() {
    let app = Router::new().route(
        "/model/test",
        post(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "error": "Connection refused",
                    "model_type": "ollama",
                    "model_name": "llama2"
                })),
            )
        }),
    );
    let client = ApiClient::new(spawn(app).await);

    let outcome = client.test_model().await.unwrap();
    assert_eq!(
        outcome,
        ModelTestOutcome::Failure {
            error: "Connection refused".into()
        }
    );
}

#[tokio::test]
async fn model_test_success() {
    let app = Router::new().route(
        "/model/test",
        post(|| async {
            Json(json!({
                "status": "success",
                "model_type": "openai",
                "model_name": "gpt-4",
                "response": "model test succeeded"
            }))
        }),
    );
    let client = ApiClient::new(spawn(app).await);
    assert!(client.test_model().await.unwrap().is_success());
}

#[tokio::test]
async fn switch_model_returns_server_model() {
    let app = Router::new().route(
        "/model/switch",
        post(|Json(body): Json<Value>| async move {
            if body["model_type"] != "openai" && body["model_type"] != "ollama" {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "model_type must be openai or ollama"})),
                );
            }
            (
                StatusCode::OK,
                Json(json!({
                    "message": "switched",
                    "model_type": body["model_type"],
                    "model_name": body["model_name"]
                })),
            )
        }),
    );
    let client = ApiClient::new(spawn(app).await);

    let wanted = ModelConfig::new(ModelType::Ollama, "mistral").unwrap();
    let switched = client.switch_model(&wanted).await.unwrap();
    assert_eq!(switched, wanted);
    assert_eq!(switched.display_name(), "Ollama mistral");
}

#[tokio::test]
async fn list_models_and_health() {
    let app = Router::new()
        .route(
            "/models",
            get(|| async {
                Json(json!({
                    "current_model_type": "openai",
                    "current_model": "gpt-3.5-turbo",
                    "available_models": {
                        "openai": ["gpt-3.5-turbo", "gpt-4"],
                        "ollama": ["llama2"]
                    }
                }))
            }),
        )
        .route(
            "/health",
            get(|| async { Json(json!({"status": "healthy"})) }),
        );
    let client = ApiClient::new(spawn(app).await);

    let info = client.list_models().await.unwrap();
    assert_eq!(info.current().display_name(), "OpenAI gpt-3.5-turbo");
    assert_eq!(
        info.models_for(ModelType::OpenAi).unwrap(),
        &["gpt-3.5-turbo".to_string(), "gpt-4".to_string()]
    );
    client.health().await.unwrap();
}

#[tokio::test]
async fn unhealthy_backend_reports_status() {
    let app = Router::new().route(
        "/health",
        get(|| async { StatusCode::SERVICE_UNAVAILABLE }),
    );
    let client = ApiClient::new(spawn(app).await);
    let err = client.health().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(format!("http://{}/api", addr));
    let err = client.health().await.unwrap_err();
    assert!(matches!(err, RequestError::Http(_)), "{err:?}");
}
