//! Web server module for the Clerk user webhook.
//!
//! This module provides:
//! - Svix header extraction and signature verification
//! - The webhook and health handlers
//! - The router wiring both together

pub mod handlers;
pub mod headers;
pub mod signature;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

pub use handlers::{clerk_webhook, health, AppState, HealthResponse, WebhookResponse};
pub use headers::SvixHeaders;
pub use signature::{SignatureError, Webhook};

/// Path Clerk is configured to deliver to.
pub const CLERK_WEBHOOK_PATH: &str = "/api/clerk";

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(CLERK_WEBHOOK_PATH, post(clerk_webhook))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
