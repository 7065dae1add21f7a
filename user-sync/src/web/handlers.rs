//! Webhook endpoint handlers.
//!
//! The Clerk handler runs the whole pipeline inline for each request:
//! 1. Ensure the store is connected
//! 2. Extract and verify the Svix signature
//! 3. Map the user payload and apply one mutation per event kind

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{info, warn};

use crate::error::WebhookError;
use crate::model::{ClerkUserData, EventKind, InboundEvent, UserRecord};
use crate::store::UserStore;
use crate::web::headers::SvixHeaders;
use crate::web::signature::{SignatureError, Webhook};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn UserStore>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn UserStore>) -> Self {
        Self {
            config: Arc::new(config),
            store,
        }
    }

    /// Build a verifier from the configured secret.
    fn verifier(&self) -> Result<Webhook, SignatureError> {
        let secret = self
            .config
            .signing_secret
            .as_deref()
            .ok_or(SignatureError::MissingSecret)?;

        Ok(Webhook::new(secret)?.with_tolerance(self.config.signature_tolerance_secs))
    }
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Clerk Webhook
// =============================================================================

pub const PROCESSED_MESSAGE: &str = "Event processed successfully";
pub const UNHANDLED_MESSAGE: &str = "Unhandled event type";

/// Acknowledgement for a handled event.
#[derive(Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
}

/// Clerk user webhook endpoint.
///
/// `user.created`, `user.updated` and `user.deleted` are mirrored into the
/// store; any other kind is acknowledged with 200 so Clerk does not retry it.
pub async fn clerk_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, WebhookError> {
    state.store.ensure_connected().await?;

    let svix_headers =
        SvixHeaders::from_header_map(&headers).ok_or(WebhookError::MissingHeaders)?;

    // Signatures are checked against the compact re-serialization of the body
    let payload: serde_json::Value = serde_json::from_slice(&body)?;
    let canonical = serde_json::to_string(&payload)?;

    state.verifier()?.verify(&canonical, &svix_headers)?;

    let event: InboundEvent = serde_json::from_value(payload)?;

    info!(
        msg_id = %svix_headers.id,
        event_type = %event.kind,
        body_length = body.len(),
        "clerk_webhook_received"
    );

    match &event.kind {
        EventKind::Created => {
            let user = map_user(&event.user_data()?)?;
            state.store.create(&user).await?;
            info!(user_id = %user.id, "user_created");
        }
        EventKind::Updated => {
            let user = map_user(&event.user_data()?)?;
            let matched = state.store.update(&user).await?;
            info!(user_id = %user.id, matched = matched, "user_updated");
        }
        EventKind::Deleted => {
            let data = event.user_data()?;
            let id = user_id(&data)?;
            let removed = state.store.delete(id).await?;
            info!(user_id = %id, removed = removed, "user_deleted");
        }
        EventKind::Other(kind) => {
            // data is never decoded here, whatever its shape
            warn!(msg_id = %svix_headers.id, event_type = %kind, "clerk_unhandled_event_type");
            return Ok((StatusCode::OK, UNHANDLED_MESSAGE).into_response());
        }
    }

    Ok((
        StatusCode::OK,
        Json(WebhookResponse {
            message: PROCESSED_MESSAGE,
        }),
    )
        .into_response())
}

fn user_id(data: &ClerkUserData) -> Result<&str, WebhookError> {
    data.id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or(WebhookError::MissingUserId)
}

fn map_user(data: &ClerkUserData) -> Result<UserRecord, WebhookError> {
    Ok(UserRecord::from_clerk(user_id(data)?, data))
}
