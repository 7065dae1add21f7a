//! Extraction of the three Svix delivery headers.

use axum::http::HeaderMap;

pub const SVIX_ID: &str = "svix-id";
pub const SVIX_TIMESTAMP: &str = "svix-timestamp";
pub const SVIX_SIGNATURE: &str = "svix-signature";

/// Headers identifying and signing one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvixHeaders {
    pub id: String,
    pub timestamp: String,
    pub signature: String,
}

impl SvixHeaders {
    /// Returns `None` if any header is absent, empty, or not visible ASCII.
    pub fn from_header_map(headers: &HeaderMap) -> Option<Self> {
        Some(Self {
            id: header_value(headers, SVIX_ID)?,
            timestamp: header_value(headers, SVIX_TIMESTAMP)?,
            signature: header_value(headers, SVIX_SIGNATURE)?,
        })
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
