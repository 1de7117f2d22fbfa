// src/handlers/demo.rs
use crate::demo::DemoError;
use crate::models::demo::{DemoSnapshot, ImageInfo};
use crate::AppState;
use axum::{
    body::Body,
    extract::{multipart::Multipart, DefaultBodyLimit, Extension, Path},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

pub fn demo_routes(max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/demo/image", post(select_image))
        .route("/api/demo/run", post(start_run))
        .route("/api/demo/state", get(demo_state))
        .route("/api/demo/images/:image_id", get(image_bytes))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}

type ApiError = (StatusCode, Json<Value>);

fn demo_error(err: DemoError) -> ApiError {
    let status = match err {
        DemoError::UnsupportedImage(_) => StatusCode::BAD_REQUEST,
        DemoError::NoImageSelected | DemoError::AlreadyProcessing | DemoError::Superseded => {
            StatusCode::CONFLICT
        }
        DemoError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

fn bad_request(message: &str) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}

pub async fn select_image(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ImageInfo>, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!("Malformed multipart upload: {}", e);
        bad_request("Malformed multipart body")
    })? {
        let is_file = field.name() == Some("file") || field.file_name().is_some();
        if !is_file {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field.bytes().await.map_err(|e| {
            tracing::warn!("Failed to read upload '{}': {}", filename, e);
            bad_request("Failed to read uploaded file")
        })?;

        let info = state
            .demo
            .select_image(filename, data.to_vec())
            .await
            .map_err(demo_error)?;
        return Ok(Json(info));
    }

    Err(bad_request("No file provided"))
}

pub async fn start_run(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<(StatusCode, Json<DemoSnapshot>), ApiError> {
    state.demo.start_run().await.map_err(demo_error)?;
    Ok((StatusCode::ACCEPTED, Json(state.demo.snapshot().await)))
}

pub async fn demo_state(Extension(state): Extension<Arc<AppState>>) -> Json<DemoSnapshot> {
    Json(state.demo.snapshot().await)
}

pub async fn image_bytes(
    Extension(state): Extension<Arc<AppState>>,
    Path(image_id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let image = state.demo.image(image_id).await.ok_or_else(|| {
        (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Image {} is not the current image", image_id) })),
        )
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, image.mime_type),
            (header::CACHE_CONTROL, "no-store"),
        ],
        Body::from(image.bytes.to_vec()),
    )
        .into_response())
}
