//! Data types for the user sync pipeline.
//!
//! This module provides:
//! - Inbound Clerk webhook payloads and the closed set of event kinds
//! - The locally persisted user record and its field mapping
//!
//! ## Flow
//!
//! ```text
//! InboundEvent { type, data } → event.user_data() → UserRecord::from_clerk → UserStore
//! ```

pub mod event;
pub mod user;

pub use event::{ClerkEmailAddress, ClerkUserData, EventKind, InboundEvent};
pub use user::{UserRecord, ANONYMOUS_NAME, NO_EMAIL_SENTINEL};
