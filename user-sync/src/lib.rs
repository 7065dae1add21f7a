//! UserSync - Mirrors Clerk user lifecycle webhooks into MongoDB.
//!
//! ## Architecture
//!
//! ```text
//! Clerk (via Svix) → POST /api/clerk → verify → map → UserStore (MongoDB)
//! ```
//!
//! Each request is handled independently; all shared state lives in the
//! document store.

pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod web;

// Re-export commonly used types
pub use config::Config;
pub use error::WebhookError;
pub use model::{EventKind, InboundEvent, UserRecord};
pub use store::{MemoryUserStore, MongoUserStore, StoreError, UserStore};
pub use web::AppState;
