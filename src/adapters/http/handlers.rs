//! Route handlers for the roster API.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};

use crate::domain::character::Character;
use crate::domain::counters::CounterSnapshot;
use crate::usecases::roster::ServiceError;

use super::AppState;
use super::form::CreateCharacterForm;
use super::views;

pub async fn index() -> Html<&'static str> {
    Html(views::INDEX_PAGE)
}

pub async fn create_form() -> Html<&'static str> {
    Html(views::CREATE_PAGE)
}

/// Fields may arrive urlencoded, as multipart, or in the query string;
/// a missing or malformed level is rejected by the roster, not here.
pub async fn create(
    State(state): State<AppState>,
    form: CreateCharacterForm,
) -> Result<(StatusCode, Json<Character>), ServiceError> {
    let character = state
        .roster
        .create(&form.name, &form.class, &form.level)
        .await?;
    Ok((StatusCode::CREATED, Json(character)))
}

/// HTML by default, JSON when the client asks for it.
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ServiceError> {
    let characters = state.roster.list().await?;
    if wants_json(&headers) {
        Ok(Json(characters).into_response())
    } else {
        Ok(Html(views::render_list(&characters)).into_response())
    }
}

pub async fn metrics(State(state): State<AppState>) -> Json<CounterSnapshot> {
    Json(state.counters.snapshot())
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Readiness: 200 only while the store answers.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    if state.roster.store_ready().await {
        (StatusCode::OK, "READY")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "NOT READY")
    }
}

pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "404 page not found")
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidLevel(_) => (StatusCode::BAD_REQUEST, "Level must be a number"),
            Self::Encode(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode character"),
            Self::StoreWrite(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save character"),
            Self::StoreEnumeration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to list characters")
            }
        };
        (status, message).into_response()
    }
}
