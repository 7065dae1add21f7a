//! Configuration module for environment variable parsing.
//!
//! All configuration is read once at startup from environment variables.

use std::env;
use tracing::warn;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the web server to listen on
    pub port: u16,

    /// Svix signing secret for the Clerk webhook endpoint (`whsec_...`)
    pub signing_secret: Option<String>,

    /// Maximum age in seconds for webhook timestamps, in either direction
    pub signature_tolerance_secs: u64,

    /// MongoDB connection string
    pub mongodb_uri: String,

    /// Database holding the users collection
    pub mongodb_database: String,

    /// Collection of mirrored user records
    pub users_collection: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Config {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),

            signing_secret: non_empty_var("SIGNING_SECRET"),

            signature_tolerance_secs: parse_secs("SIGNATURE_TOLERANCE_SECS", 300),

            mongodb_uri: env::var("MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),

            mongodb_database: env::var("MONGODB_DATABASE")
                .unwrap_or_else(|_| "user_sync".to_string()),

            users_collection: env::var("MONGODB_USERS_COLLECTION")
                .unwrap_or_else(|_| "users".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            signing_secret: None,
            signature_tolerance_secs: 300,
            mongodb_uri: "mongodb://localhost:27017".to_string(),
            mongodb_database: "user_sync".to_string(),
            users_collection: "users".to_string(),
        }
    }
}

/// Read a variable, treating blank values as unset.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a whole number of seconds, falling back on garbage.
fn parse_secs(name: &str, default: u64) -> u64 {
    let raw = match env::var(name) {
        Ok(v) => v,
        Err(_) => return default,
    };

    match raw.trim().parse::<u64>() {
        Ok(secs) => secs,
        Err(_) => {
            warn!(env_var = name, value = %raw, "Invalid seconds value, using default");
            default
        }
    }
}
