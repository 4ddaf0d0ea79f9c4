use super::types::{
    BatchResponse, ErrorResponse, GenerateRequest, SingleResponse, WorkflowsResponse,
};
use crate::config::Config;
use crate::generation::Generator;
use crate::workflow;
use axum::{
    body::Body,
    extract::{Path as UrlPath, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::Value;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{error, info};

type HandlerError = (StatusCode, Json<ErrorResponse>);

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: Arc<Generator>,
}

pub async fn list_workflows(
    State(state): State<AppState>,
) -> Result<Json<WorkflowsResponse>, HandlerError> {
    match workflow::list(&state.config.server.workflow_dir).await {
        Ok(workflows) => Ok(Json(WorkflowsResponse { workflows })),
        Err(e) => {
            error!("Failed to list workflow templates: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::with_detail("cannot list workflows", e)),
            ))
        }
    }
}

pub async fn generate(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, HandlerError> {
    let subfolder = request.subfolder.as_deref();

    match &request.prompt {
        Value::String(prompt) => {
            info!(workflow = %request.workflow, "Received single generation request");
            match state
                .generator
                .single(&request.workflow, subfolder, prompt)
                .await
            {
                Ok(outcome) => Ok(Json(SingleResponse { image_url: outcome }).into_response()),
                Err(e) => {
                    error!("Generation failed: {}", e);
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse::with_detail("generation failed", e)),
                    ))
                }
            }
        }
        Value::Object(map) => {
            let Some(events) = map.get("events").and_then(Value::as_array) else {
                return Err(unsupported_prompt());
            };
            info!(
                workflow = %request.workflow,
                items = events.len(),
                "Received batch generation request"
            );
            match state
                .generator
                .batch(&request.workflow, subfolder, events)
                .await
            {
                Ok(outcomes) => Ok(Json(BatchResponse {
                    image_urls: outcomes,
                })
                .into_response()),
                Err(e) => {
                    error!("Batch generation failed: {}", e);
                    Err((
                        StatusCode::INTERNAL_SERVER_ERROR,
                        Json(ErrorResponse::with_detail("generation failed", e)),
                    ))
                }
            }
        }
        _ => Err(unsupported_prompt()),
    }
}

fn unsupported_prompt() -> HandlerError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            "unsupported prompt: expected a string or an object with 'events'",
        )),
    )
}

pub async fn serve_output(
    State(state): State<AppState>,
    UrlPath(filename): UrlPath<String>,
) -> Result<Response, HandlerError> {
    let output_dir = Path::new(&state.config.server.output_dir);

    let Some(relative) = sanitize(&filename) else {
        return Err(not_found("image not found"));
    };

    serve_file(&output_dir.join(relative)).await
}

pub async fn serve_latest(State(state): State<AppState>) -> Result<Response, HandlerError> {
    let output_dir = state.config.server.output_dir.clone();

    let latest = latest_file(Path::new(&output_dir))
        .await
        .map_err(|e| not_found_with_detail("no images available", e))?;

    match latest {
        Some(path) => serve_file(&path).await,
        None => Err(not_found("no images available")),
    }
}

/// Reject absolute paths and any component that walks upward; the output
/// directory is read-only to this service but still not for browsing the
/// rest of the disk.
fn sanitize(path: &str) -> Option<PathBuf> {
    let path = Path::new(path);
    let mut clean = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}

async fn serve_file(path: &Path) -> Result<Response, HandlerError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| not_found_with_detail("image not found", e))?;

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    Ok((
        [(header::CONTENT_TYPE, mime.to_string())],
        Body::from(bytes),
    )
        .into_response())
}

/// Most-recently-modified regular file directly inside `dir`.
async fn latest_file(dir: &Path) -> std::io::Result<Option<PathBuf>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut latest: Option<(SystemTime, PathBuf)> = None;

    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let modified = metadata.modified()?;
        if latest.as_ref().map_or(true, |(ts, _)| modified > *ts) {
            latest = Some((modified, entry.path()));
        }
    }

    Ok(latest.map(|(_, path)| path))
}

fn not_found(msg: &str) -> HandlerError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new(msg)))
}

fn not_found_with_detail(msg: &str, detail: impl ToString) -> HandlerError {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::with_detail(msg, detail)),
    )
}
