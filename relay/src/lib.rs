//! HTTP API for the push notification relay.

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::post,
    Router,
};
use pushrelay_delivery::{NotificationRequest, NotifyError, Orchestrator, PushTicket, RegistrationRequest};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SaveTokenResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SendNotificationResponse {
    pub success: bool,
    pub tickets: Vec<PushTicket>,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error rendered as `{"error": ...}`. Internal failures are logged and
/// replaced with `fallback` so no detail reaches the caller.
struct ApiError {
    source: NotifyError,
    fallback: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.source.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = if self.source.is_client_error() {
            self.source.to_string()
        } else {
            error!("{}: {}", self.fallback, self.source);
            self.fallback.to_string()
        };
        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

fn bad_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: format!("Invalid request body: {}", rejection.body_text()),
        }),
    )
        .into_response()
}

async fn save_push_token_handler(
    State(orchestrator): State<Arc<Orchestrator>>,
    payload: Result<Json<RegistrationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(rejection),
    };

    match orchestrator.register(request).await {
        Ok(_) => Json(SaveTokenResponse { success: true }).into_response(),
        Err(source) => ApiError {
            source,
            fallback: "Failed to save push token",
        }
        .into_response(),
    }
}

async fn send_notification_handler(
    State(orchestrator): State<Arc<Orchestrator>>,
    payload: Result<Json<NotificationRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_body(rejection),
    };

    match orchestrator.send_notification(request).await {
        Ok(report) => {
            let message = report.summary();
            Json(SendNotificationResponse {
                success: report.accepted,
                tickets: report.tickets,
                message,
            })
            .into_response()
        }
        Err(source) => ApiError {
            source,
            fallback: "Failed to send notifications",
        }
        .into_response(),
    }
}

/// Build the HTTP API router around a shared orchestrator.
pub fn build_router(orchestrator: Arc<Orchestrator>) -> Router {
    Router::new()
        .route("/api/save-push-token", post(save_push_token_handler))
        .route("/api/send-notification", post(send_notification_handler))
        .with_state(orchestrator)
}
