use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::db::Database;
use crate::devotions::Devotions;
use crate::error::StoreError;
use crate::model::NewDevotion;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        AppState { db }
    }

    fn devotions(&self) -> Devotions<'_> {
        Devotions::new(self.db.connection())
    }
}

/// Every data access failure becomes the same opaque 500. The cause is only
/// logged.
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    MalformedBody(serde_json::Error),
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        ApiError::Store(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Store(e) => {
                tracing::error!(error = %crate::unpack_error(&e), "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server error" })),
                )
                    .into_response()
            }
            ApiError::MalformedBody(e) => {
                tracing::info!(error = %e, "rejected malformed json body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "message": "Malformed JSON body" })),
                )
                    .into_response()
            }
        }
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().to_ascii_lowercase().starts_with("application/json"))
}

type HandlerResult = Result<Response, ApiError>;

pub async fn healthcheck() -> &'static str {
    "API running 🚀"
}

pub async fn get_devotions(State(state): State<AppState>) -> HandlerResult {
    let result = state.devotions().list_all().await?;
    tracing::debug!(count = result.rows.len(), "listed devotions");
    Ok(Json(result.rows).into_response())
}

pub async fn get_devotion_by_id(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let result = state.devotions().find_by_id(&id).await?;
    Ok(Json(result.rows).into_response())
}

pub async fn create_devotion(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> HandlerResult {
    let payload = NewDevotion::from_body(is_json(&headers), &body).map_err(ApiError::MalformedBody)?;
    let result = state.devotions().create(payload).await?;
    let created = result.first();
    if let Some(devotion) = &created {
        tracing::info!(id = devotion.id, "created devotion");
    }
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

pub async fn delete_devotion(State(state): State<AppState>, Path(id): Path<String>) -> HandlerResult {
    let result = state.devotions().delete_by_id(&id).await?;
    tracing::info!(id = %id, rows_affected = result.rows_affected, "deleted devotion");
    Ok(Json(result.rows).into_response())
}

pub async fn get_today_devotion(State(state): State<AppState>) -> HandlerResult {
    let today = state.devotions().find_today().await?.and_then(|r| r.first());
    Ok(Json(today).into_response())
}

pub async fn get_random_devotion(State(state): State<AppState>) -> HandlerResult {
    let random = state.devotions().find_random().await?.first();
    Ok(Json(random).into_response())
}
