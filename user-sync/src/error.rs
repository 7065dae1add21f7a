//! Error type for the webhook endpoint.
//!
//! Every failure inside the handler converts into a [`WebhookError`], which
//! renders the HTTP response: a plain-text 400 for missing headers, otherwise
//! `{"error": "<message>"}` with the status the failure carries.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

use crate::store::StoreError;
use crate::web::signature::SignatureError;

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Missing required Svix headers")]
    MissingHeaders,

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("Invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Event data is missing the user id")]
    MissingUserId,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WebhookError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookError::MissingHeaders | WebhookError::MissingUserId => StatusCode::BAD_REQUEST,
            WebhookError::Signature(err) => err.status(),
            WebhookError::InvalidJson(_) | WebhookError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "webhook_processing_error");
        } else {
            warn!(status = status.as_u16(), error = %message, "webhook_rejected");
        }

        match self {
            WebhookError::MissingHeaders => (status, message).into_response(),
            _ => (status, Json(ErrorResponse { error: message })).into_response(),
        }
    }
}
