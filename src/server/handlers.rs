//! Route handlers and bearer authentication

use super::error::ApiError;
use super::models::{
    ExtensionRequest, ExtensionResponse, ModerationResponse, MODERATION_POINTS, POINT_PING,
};
use super::AppState;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::ExposeSecret;

/// Reject requests without `Authorization: Bearer <api_key>`
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, key)| key);

    match presented {
        Some(key) if state.api_key.expose_secret().verify(key) => next.run(request).await,
        _ => {
            tracing::warn!("Rejected moderation request with invalid credentials");
            ApiError::Unauthorized.into_response()
        }
    }
}

/// `POST /api/moderation`
pub async fn moderation(
    State(state): State<AppState>,
    Json(request): Json<ExtensionRequest>,
) -> Result<Json<ExtensionResponse>, ApiError> {
    let point = request.point.as_str();

    if point == POINT_PING {
        return Ok(Json(ExtensionResponse::Pong {
            result: "pong".to_string(),
        }));
    }

    if !MODERATION_POINTS.contains(&point) {
        tracing::debug!(point, "Unsupported extension point");
        return Ok(Json(ExtensionResponse::Moderation(ModerationResponse::new(
            true,
            format!("Extension point '{point}' not implemented."),
        ))));
    }

    let (text, lang) = request
        .params
        .text_and_lang(state.engine.primary_language());

    let verdict = state.engine.moderate(text, lang).await?;

    Ok(Json(ExtensionResponse::Moderation(ModerationResponse::new(
        verdict.flagged(),
        verdict.message(),
    ))))
}

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
