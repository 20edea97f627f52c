//! HTTP routes of the matching server.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::warn;

use catalog::{ActivityCategory, UserId};

use crate::orchestrator::RecommendationOrchestrator;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: RecommendationOrchestrator,
}

#[derive(Debug, Deserialize)]
pub struct ActivitiesQuery {
    pub category: Option<String>,
}

/// Router for health, recommendation, browsing and preference endpoints
pub fn router(orchestrator: RecommendationOrchestrator) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/recommendations/{user_id}", get(recommendations_handler))
        .route("/api/activities", get(activities_handler))
        .route(
            "/api/users/{user_id}/matching-preferences",
            put(update_preferences_handler),
        )
        .with_state(AppState { orchestrator })
}

fn error_response(status: StatusCode, message: &str, error: impl ToString) -> Response {
    (
        status,
        Json(json!({ "message": message, "error": error.to_string() })),
    )
        .into_response()
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Always 200: failures come back as an empty list
async fn recommendations_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> Response {
    let recommendations = state.orchestrator.generate_recommendations(user_id).await;
    Json(recommendations).into_response()
}

async fn activities_handler(
    State(state): State<AppState>,
    Query(query): Query<ActivitiesQuery>,
) -> Response {
    let category = match query.category.as_deref() {
        None => ActivityCategory::OngVolunteering,
        Some(raw) => match raw.parse::<ActivityCategory>() {
            Ok(category) => category,
            Err(e) => {
                return error_response(StatusCode::BAD_REQUEST, "Unknown activity category", e);
            }
        },
    };

    match state.orchestrator.list_activities(category).await {
        Ok(activities) => Json(activities).into_response(),
        Err(e) => {
            warn!("Listing {} activities failed: {}", category, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to list activities", e)
        }
    }
}

async fn update_preferences_handler(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(update): Json<Value>,
) -> Response {
    match state.orchestrator.update_user_preferences(user_id, update).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to update matching preferences",
            e,
        ),
    }
}
