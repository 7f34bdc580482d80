//! HTTP API server for integration with other systems.
//!
//! Exposes knowledge-base questions and transcript summaries as JSON endpoints.

use crate::app::{App, Capabilities};
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::LektorError;
use crate::rag::Answer;
use crate::summary::SummaryMode;
use crate::video::extract_video_id;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(Operation::Serve, &settings) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }

    let capabilities = server_capabilities(&settings);
    if !capabilities.knowledge_base {
        Output::warning(&format!(
            "No knowledge base index at {}; /ask is disabled.",
            settings.index_path().display()
        ));
    }
    let app = Arc::new(App::init(settings, capabilities)?);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Lektor API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("Modes", "GET  /modes");
    Output::kv("Ask", "POST /ask");
    Output::kv("Summarize", "POST /summarize");
    Output::kv("Video ID", "POST /video-id");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, router(app)).await?;

    Ok(())
}

/// Summaries are always served; questions only when the index is on disk.
fn server_capabilities(settings: &Settings) -> Capabilities {
    if settings.index_path().exists() {
        Capabilities::ALL
    } else {
        Capabilities::TRANSCRIPTS
    }
}

/// Build the API router over a shared application context.
pub(crate) fn router(app: Arc<App>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/modes", get(modes))
        .route("/ask", post(ask))
        .route("/summarize", post(summarize))
        .route("/video-id", post(video_id))
        .layer(cors)
        .with_state(app)
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct AskRequest {
    query: String,
    #[serde(default)]
    k: Option<usize>,
}

#[derive(Serialize)]
struct AskResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    fragments: Vec<FragmentInfo>,
}

#[derive(Serialize)]
struct FragmentInfo {
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    score: f32,
}

#[derive(Deserialize)]
struct SummarizeRequest {
    url: String,
    mode: String,
    #[serde(default)]
    timestamps: bool,
}

#[derive(Serialize)]
struct SummarizeResponse {
    video_id: String,
    mode: &'static str,
    label: &'static str,
    language: String,
    summary: String,
}

#[derive(Deserialize)]
struct VideoIdRequest {
    url: String,
}

#[derive(Serialize)]
struct VideoIdResponse {
    video_id: String,
}

#[derive(Serialize)]
struct ModeInfo {
    key: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Input errors are the caller's fault. A flow the server was started
/// without is unavailable. Everything else is an upstream failure.
fn error_response(e: &LektorError) -> Response {
    let status = match e {
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        LektorError::Config(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => {
            warn!("Request failed: {}", e);
            StatusCode::BAD_GATEWAY
        }
    };
    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}

// === Handlers ===

async fn health(State(app): State<Arc<App>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "knowledge_base": app.has_knowledge_base(),
    }))
}

async fn modes() -> impl IntoResponse {
    Json(
        SummaryMode::ALL
            .iter()
            .map(|m| ModeInfo {
                key: m.key(),
                label: m.label(),
            })
            .collect::<Vec<_>>(),
    )
}

async fn ask(State(app): State<Arc<App>>, Json(req): Json<AskRequest>) -> Response {
    let mut engine = match app.rag_engine() {
        Ok(engine) => engine,
        Err(e) => return error_response(&e),
    };
    if let Some(k) = req.k {
        engine = engine.with_k(k.clamp(1, 50));
    }

    match engine.ask(&req.query).await {
        Ok(response) => {
            let fragments = response
                .fragments
                .into_iter()
                .map(|s| FragmentInfo {
                    content: s.fragment.content,
                    source: s.fragment.source,
                    score: s.score,
                })
                .collect();
            let (answer, error) = match response.answer {
                Answer::Text(text) => (Some(text), None),
                Answer::Failed(message) => (None, Some(message)),
            };
            let status = if error.is_some() {
                StatusCode::BAD_GATEWAY
            } else {
                StatusCode::OK
            };
            (status, Json(AskResponse { answer, error, fragments })).into_response()
        }
        Err(e) => error_response(&e),
    }
}

async fn summarize(State(app): State<Arc<App>>, Json(req): Json<SummarizeRequest>) -> Response {
    let mode: SummaryMode = match req.mode.parse() {
        Ok(mode) => mode,
        Err(e) => return error_response(&LektorError::InvalidInput(e)),
    };

    let transcript = match app.fetch_transcript(&req.url).await {
        Ok(transcript) => transcript,
        Err(e) => return error_response(&e),
    };

    let text = if req.timestamps {
        transcript.timestamped_text()
    } else {
        transcript.text()
    };

    match app.summarizer().summarize(&text, mode).await {
        Ok(summary) => Json(SummarizeResponse {
            video_id: transcript.video_id,
            mode: mode.key(),
            label: mode.label(),
            language: transcript.language,
            summary,
        })
        .into_response(),
        Err(e) => error_response(&e),
    }
}

async fn video_id(Json(req): Json<VideoIdRequest>) -> Response {
    match extract_video_id(&req.url) {
        Some(video_id) => Json(VideoIdResponse { video_id }).into_response(),
        None => error_response(&LektorError::InvalidInput(format!(
            "Could not extract a video ID from '{}'",
            req.url.trim()
        ))),
    }
}
