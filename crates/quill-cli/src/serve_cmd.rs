use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, KeepAliveStream, Sse};
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;

use quill_core::builder::ProgressFn;
use quill_core::dispatch::{ai_chunk_progress, Dispatcher};
use quill_core::event::{channel, emit, json_line, GenerationEvent};
use quill_core::generator::{ContinuousGenerator, GenerationTask, GeneratorConfig};
use quill_core::registry::ServiceRegistry;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.into(),
        }
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = serde_json::json!({ "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct ServiceResponse {
    pub title: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub params: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub tasks: Vec<GenerationTask>,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
}

fn default_max_concurrent() -> usize {
    3
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ServiceRegistry>,
}

pub fn build_router(registry: Arc<ServiceRegistry>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/services", get(list_services))
        .route("/api/services/{category}", get(list_services_in_category))
        .route("/api/generate", post(generate_single))
        .route("/api/generate/batch", post(generate_batch))
        .layer(CorsLayer::permissive())
        .with_state(AppState { registry })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(registry: Arc<ServiceRegistry>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(registry);
    let addr: SocketAddr = format!("{bind}:{port}").parse()?;
    tracing::info!("quill serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("quill serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install Ctrl+C handler");
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index(State(state): State<AppState>) -> Html<String> {
    let rows = state
        .registry
        .categories()
        .iter()
        .map(|category| {
            let count = state.registry.by_category(category).len();
            format!(
                "<tr><td><a href=\"/api/services/{category}\">{category}</a></td><td>{count}</td></tr>"
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let html = format!(
        "<!DOCTYPE html>\
<html><head><title>quill</title></head><body>\
<h1>quill</h1>\
<p><a href=\"/api/services\">/api/services</a></p>\
<table><tr><th>Category</th><th>Services</th></tr>{rows}</table>\
</body></html>"
    );
    Html(html)
}

async fn list_services(State(state): State<AppState>) -> Json<Vec<ServiceResponse>> {
    let services = state
        .registry
        .all()
        .into_iter()
        .map(|d| ServiceResponse {
            title: d.title.clone(),
            category: d.category.clone(),
            description: d.description.clone(),
            params: d.params.clone(),
        })
        .collect();
    Json(services)
}

async fn list_services_in_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<ServiceResponse>>, AppError> {
    let services: Vec<ServiceResponse> = state
        .registry
        .by_category(&category)
        .into_iter()
        .map(|d| ServiceResponse {
            title: d.title.clone(),
            category: d.category.clone(),
            description: d.description.clone(),
            params: d.params.clone(),
        })
        .collect();

    if services.is_empty() {
        return Err(AppError::not_found(format!(
            "no services in category {category:?}"
        )));
    }
    Ok(Json(services))
}

type EventStream = Sse<
    KeepAliveStream<
        tokio_stream::adapters::Map<
            UnboundedReceiverStream<GenerationEvent>,
            fn(GenerationEvent) -> Result<Event, Infallible>,
        >,
    >,
>;

fn sse_response(rx: tokio::sync::mpsc::UnboundedReceiver<GenerationEvent>) -> EventStream {
    fn frame(event: GenerationEvent) -> Result<Event, Infallible> {
        Ok(Event::default().data(json_line(&event)))
    }
    let frame: fn(GenerationEvent) -> Result<Event, Infallible> = frame;
    let stream = UnboundedReceiverStream::new(rx).map(frame);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

/// Generate one piece of content, streaming deltas over SSE. The stream
/// ends with a `complete` event carrying the full text, or an `error`
/// event when the task produced nothing.
async fn generate_single(
    State(state): State<AppState>,
    Json(task): Json<GenerationTask>,
) -> Result<EventStream, AppError> {
    let dispatcher = Dispatcher::new(Arc::clone(&state.registry));
    let report = ContinuousGenerator::new(dispatcher.clone()).validate_task(&task);
    if !report.is_valid {
        return Err(AppError::bad_request(report.errors.join("; ")));
    }

    let (sink, rx) = channel();
    tokio::spawn(async move {
        let progress = ai_chunk_progress(sink.clone());
        let progress: &ProgressFn = &progress;
        let content = dispatcher
            .execute_service(
                &task.title,
                &task.blueprint_values,
                &task.field_values,
                &task.main_category,
                Some(progress),
                task.homepage_reference.as_deref(),
            )
            .await;
        match content {
            Some(content) => emit(
                &sink,
                GenerationEvent::Complete {
                    content: Some(content),
                },
            ),
            None => emit(
                &sink,
                GenerationEvent::Error {
                    message: format!("no content generated for {:?}", task.title),
                },
            ),
        }
    });

    Ok(sse_response(rx))
}

/// Run a batch of tasks, streaming the full event lifecycle over SSE.
/// The generator is per-request, so concurrent batch requests do not
/// contend on the single-flight guard.
async fn generate_batch(
    State(state): State<AppState>,
    Json(request): Json<BatchRequest>,
) -> Result<EventStream, AppError> {
    if request.tasks.is_empty() {
        return Err(AppError::bad_request("batch contains no tasks"));
    }

    let generator = ContinuousGenerator::new(Dispatcher::new(Arc::clone(&state.registry)));
    let mut errors = Vec::new();
    for task in &request.tasks {
        let report = generator.validate_task(task);
        if !report.is_valid {
            errors.push(format!("{}: {}", task.title, report.errors.join("; ")));
        }
    }
    if !errors.is_empty() {
        return Err(AppError::bad_request(errors.join("\n")));
    }

    let (sink, rx) = channel();
    tokio::spawn(async move {
        let use_deps = request.tasks.iter().any(|t| !t.dependencies.is_empty());
        let outcome = if use_deps {
            generator
                .generate_with_dependencies(&request.tasks, &sink)
                .await
        } else {
            let config = GeneratorConfig {
                parallel: request.parallel,
                max_concurrent: request.max_concurrent,
            };
            generator.generate(&request.tasks, &config, &sink).await
        };
        if let Err(err) = outcome {
            tracing::error!(error = %err, "batch generation aborted");
        }
    });

    Ok(sse_response(rx))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    use quill_test_utils::{descriptor, registry_with, ScriptedBuilder};

    fn test_registry() -> Arc<quill_core::registry::ServiceRegistry> {
        let chunky = Arc::new(ScriptedBuilder::new("chunky").with_chunks(["Buy ", "now."]));
        let bad = Arc::new(ScriptedBuilder::new("bad").failing());
        Arc::new(registry_with(vec![
            descriptor("Welcome Email", "Email", chunky).with_description("Onboarding email"),
            descriptor("Broken Service", "Email", bad),
        ]))
    }

    async fn send_get(registry: Arc<quill_core::registry::ServiceRegistry>, uri: &str) -> axum::response::Response {
        let app = super::build_router(registry);
        app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn send_post(
        registry: Arc<quill_core::registry::ServiceRegistry>,
        uri: &str,
        body: serde_json::Value,
    ) -> axum::response::Response {
        let app = super::build_router(registry);
        app.oneshot(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), 1_048_576)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn task_json(title: &str) -> serde_json::Value {
        serde_json::json!({
            "title": title,
            "main_category": "Email",
            "blueprint_values": [{"title": "Project", "values": [
                {"key": "product", "value": "Test Product"}
            ]}],
            "field_values": [{"key": "audience", "value": "testers"}],
        })
    }

    #[tokio::test]
    async fn index_returns_html_with_categories() {
        let resp = send_get(test_registry(), "/").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .expect("should have content-type header")
            .to_str()
            .unwrap()
            .to_string();
        assert!(
            content_type.contains("text/html"),
            "content-type should contain text/html, got: {content_type}"
        );
        let body = body_string(resp).await;
        assert!(body.contains("Email"));
    }

    #[tokio::test]
    async fn list_services_returns_all_entries() {
        let resp = send_get(test_registry(), "/api/services").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        let arr = json.as_array().expect("response should be an array");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["category"], "Email");
    }

    #[tokio::test]
    async fn category_listing_filters_and_404s() {
        let resp = send_get(test_registry(), "/api/services/Email").await;
        assert_eq!(resp.status(), StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body_string(resp).await).unwrap();
        assert_eq!(json.as_array().unwrap().len(), 2);

        let resp = send_get(test_registry(), "/api/services/Nonexistent").await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn single_generate_streams_chunks_then_complete() {
        let resp = send_post(test_registry(), "/api/generate", task_json("Welcome Email")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let content_type = resp
            .headers()
            .get("content-type")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.contains("text/event-stream"));

        let body = body_string(resp).await;
        assert!(body.contains(r#""type":"ai_chunk""#), "body: {body}");
        assert!(body.contains(r#""progress":85"#), "body: {body}");
        assert!(body.contains(r#""type":"complete""#), "body: {body}");
        assert!(body.contains("Buy now."), "body: {body}");
    }

    #[tokio::test]
    async fn single_generate_rejects_unknown_title() {
        let resp = send_post(test_registry(), "/api/generate", task_json("Ghost")).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = body_string(resp).await;
        assert!(body.contains("no service registered"), "body: {body}");
    }

    #[tokio::test]
    async fn single_generate_surfaces_builder_failure_as_error_event() {
        let resp = send_post(test_registry(), "/api/generate", task_json("Broken Service")).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains(r#""type":"error""#), "body: {body}");
    }

    #[tokio::test]
    async fn batch_generate_streams_the_full_lifecycle() {
        let body = serde_json::json!({
            "tasks": [task_json("Welcome Email"), task_json("Broken Service")],
        });
        let resp = send_post(test_registry(), "/api/generate/batch", body).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_string(resp).await;
        assert!(body.contains(r#""type":"generation_start""#), "body: {body}");
        assert!(body.contains(r#""type":"task_start""#), "body: {body}");
        assert!(body.contains(r#""type":"task_complete""#), "body: {body}");
        assert!(body.contains(r#""type":"task_error""#), "body: {body}");
        assert!(
            body.contains(r#""successful":1"#) && body.contains(r#""failed":1"#),
            "body: {body}"
        );
    }

    #[tokio::test]
    async fn batch_generate_rejects_an_empty_batch() {
        let body = serde_json::json!({ "tasks": [] });
        let resp = send_post(test_registry(), "/api/generate/batch", body).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
