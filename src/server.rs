//! HTTP query service and static front end.
//!
//! Endpoints:
//! - `GET /` serves `index.html` from the static directory
//! - `GET /search?q=` and `POST /search` (form field `query`) list candidates
//! - `GET /api/stream/{id}` resolves a playable audio URL
//! - `GET /health`

use crate::config::Settings;
use crate::error::Result;
use crate::media::{is_valid_media_id, MediaExtractor, SearchResult};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::{error, info};

/// Shared application state.
pub struct AppState {
    pub settings: Arc<Settings>,
    pub extractor: Arc<dyn MediaExtractor>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, extractor: Arc<dyn MediaExtractor>) -> Self {
        Self {
            settings,
            extractor,
        }
    }
}

/// Build the router.
pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.settings.static_dir();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .route("/health", get(health))
        .route("/search", get(search_query).post(search_form))
        .route("/api/stream/{id}", get(stream))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .with_state(state)
}

/// Bind the configured address.
pub async fn bind(settings: &Settings) -> Result<TcpListener> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(%addr, "HTTP service listening");
    Ok(listener)
}

/// Serve until the process exits.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

// === Request/Response Types ===

#[derive(Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Deserialize)]
struct SearchForm {
    #[serde(default)]
    query: String,
}

#[derive(Serialize)]
struct SearchItem {
    id: String,
    title: String,
}

impl From<SearchResult> for SearchItem {
    fn from(result: SearchResult) -> Self {
        Self {
            id: result.id,
            title: result.title,
        }
    }
}

#[derive(Serialize)]
struct StreamResponse {
    audio_url: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

// === Handlers ===

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn search_query(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Response {
    search(&state, &params.q).await
}

async fn search_form(State(state): State<Arc<AppState>>, Form(form): Form<SearchForm>) -> Response {
    search(&state, &form.query).await
}

async fn search(state: &AppState, query: &str) -> Response {
    let query = query.trim();
    if query.is_empty() {
        return Json(Vec::<SearchItem>::new()).into_response();
    }

    match state
        .extractor
        .search(query, state.settings.extractor.search_limit)
        .await
    {
        Ok(results) => Json(
            results
                .into_iter()
                .map(SearchItem::from)
                .collect::<Vec<_>>(),
        )
        .into_response(),
        Err(e) => {
            error!(%query, error = %e, "Search error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Search failed")
        }
    }
}

async fn stream(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    if !is_valid_media_id(&id) {
        return error_response(StatusCode::BAD_REQUEST, "Invalid media id");
    }

    let url = state.extractor.watch_url(&id);
    match state.extractor.stream_url(&url).await {
        Ok(Some(audio_url)) => Json(StreamResponse { audio_url }).into_response(),
        Ok(None) => {
            error!(%id, "No playable audio stream");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "No playable audio stream")
        }
        Err(e) => {
            error!(%id, error = %e, "Stream error");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to resolve audio stream")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::testing::{result, ScriptedExtractor};
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    struct Harness {
        app: Router,
        extractor: Arc<ScriptedExtractor>,
        _static_dir: tempfile::TempDir,
    }

    fn harness(extractor: ScriptedExtractor) -> Harness {
        let static_dir = tempfile::tempdir().unwrap();
        std::fs::write(static_dir.path().join("index.html"), "<h1>VoFo</h1>").unwrap();
        std::fs::write(static_dir.path().join("app.js"), "console.log('vofo');").unwrap();

        let mut settings = Settings::default();
        settings.server.static_dir = static_dir.path().to_string_lossy().to_string();

        let extractor = Arc::new(extractor);
        let state = Arc::new(AppState::new(Arc::new(settings), extractor.clone()));

        Harness {
            app: create_router(state),
            extractor,
            _static_dir: static_dir,
        }
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let resp = app.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
        (status, bytes.to_vec())
    }

    async fn get(app: &Router, uri: &str) -> (StatusCode, Vec<u8>) {
        send(app, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    fn json(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[tokio::test]
    async fn test_index_page() {
        let h = harness(ScriptedExtractor::new());
        let (status, body) = get(&h.app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"<h1>VoFo</h1>");
    }

    #[tokio::test]
    async fn test_static_fallback() {
        let h = harness(ScriptedExtractor::new());
        let (status, body) = get(&h.app, "/app.js").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"console.log('vofo');");
    }

    #[tokio::test]
    async fn test_health() {
        let h = harness(ScriptedExtractor::new());
        let (status, body) = get(&h.app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)["status"], "ok");
    }

    #[tokio::test]
    async fn test_empty_query_skips_backend() {
        let h = harness(ScriptedExtractor::new().with_search_error());

        for uri in ["/search", "/search?q=", "/search?q=%20%20"] {
            let (status, body) = get(&h.app, uri).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, b"[]");
        }
        assert_eq!(h.extractor.searches(), 0);
    }

    #[tokio::test]
    async fn test_search_lists_id_and_title() {
        let h = harness(
            ScriptedExtractor::new()
                .with_results(vec![result("abc123", "Imagine"), result("def456", "Imagine (Live)")]),
        );

        let (status, body) = get(&h.app, "/search?q=imagine").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json(&body),
            serde_json::json!([
                {"id": "abc123", "title": "Imagine"},
                {"id": "def456", "title": "Imagine (Live)"}
            ])
        );
        assert_eq!(*h.extractor.last_limit.lock().unwrap(), Some(10));
    }

    #[tokio::test]
    async fn test_search_is_idempotent() {
        let h = harness(ScriptedExtractor::new().with_results(vec![result("t1", "Test")]));

        let (_, first) = get(&h.app, "/search?q=test").await;
        let (_, second) = get(&h.app, "/search?q=test").await;
        assert_eq!(first, second);
        assert_eq!(h.extractor.searches(), 2);
    }

    #[tokio::test]
    async fn test_search_form_post() {
        let h = harness(ScriptedExtractor::new().with_results(vec![result("abc123", "Imagine")]));

        let req = Request::post("/search")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("query=imagine"))
            .unwrap();
        let (status, body) = send(&h.app, req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body)[0]["id"], "abc123");
    }

    #[tokio::test]
    async fn test_search_failure_is_500_and_service_survives() {
        let h = harness(ScriptedExtractor::new().with_search_error());

        let (status, body) = get(&h.app, "/search?q=imagine").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let error = json(&body)["error"].as_str().unwrap().to_string();
        assert!(!error.is_empty());
        assert!(!error.contains("backend unreachable"));

        let (status, _) = get(&h.app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(&h.app, "/search?q=again").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_stream_resolves_audio_url() {
        let h = harness(ScriptedExtractor::new().with_stream_url(Some("https://cdn.example/xyz.webm")));

        let (status, body) = get(&h.app, "/api/stream/xyz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json(&body), serde_json::json!({"audio_url": "https://cdn.example/xyz.webm"}));
        assert_eq!(
            h.extractor.last_source_url.lock().unwrap().as_deref(),
            Some("https://www.youtube.com/watch?v=xyz")
        );
    }

    #[tokio::test]
    async fn test_stream_extraction_error_is_500() {
        let h = harness(ScriptedExtractor::new().with_stream_error());

        let (status, body) = get(&h.app, "/api/stream/xyz").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!json(&body)["error"].as_str().unwrap().is_empty());

        let (status, _) = get(&h.app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get(&h.app, "/api/stream/xyz").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(h.extractor.streams(), 2);
    }

    #[tokio::test]
    async fn test_stream_without_url_is_500() {
        let h = harness(ScriptedExtractor::new().with_stream_url(None));

        let (status, body) = get(&h.app, "/api/stream/xyz").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(json(&body).get("error").is_some());
    }

    #[tokio::test]
    async fn test_stream_rejects_unsafe_id() {
        let h = harness(ScriptedExtractor::new().with_stream_url(Some("https://cdn.example/a")));

        let (status, body) = get(&h.app, "/api/stream/abc%26list%3DPL1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json(&body).get("error").is_some());
        assert_eq!(h.extractor.streams(), 0);
    }
}
