//! Locally persisted user record.

use serde::{Deserialize, Serialize};

use super::event::ClerkUserData;

/// Email stored when the provider supplied no usable address.
pub const NO_EMAIL_SENTINEL: &str = "no-email@example.com";

/// Name stored when neither first nor last name is present.
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// User document as stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Provider user id, used as the document primary key
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub image: String,
}

impl UserRecord {
    /// Map provider attributes onto a record for `id`.
    ///
    /// - email: first address entry, or [`NO_EMAIL_SENTINEL`]
    /// - name: non-empty first/last name joined by a space, or [`ANONYMOUS_NAME`]
    /// - image: image URL, or an empty string
    pub fn from_clerk(id: impl Into<String>, data: &ClerkUserData) -> Self {
        let email = data
            .email_addresses
            .first()
            .and_then(|entry| entry.email_address.as_deref())
            .filter(|address| !address.is_empty())
            .unwrap_or(NO_EMAIL_SENTINEL)
            .to_string();

        let name = [data.first_name.as_deref(), data.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let name = if name.is_empty() {
            ANONYMOUS_NAME.to_string()
        } else {
            name
        };

        let image = data.image_url.clone().unwrap_or_default();

        Self {
            id: id.into(),
            email,
            name,
            image,
        }
    }

    /// Schema validation applied before every write.
    ///
    /// Returns the name of the first field that fails.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.id.is_empty() {
            return Err("_id");
        }
        if self.email.is_empty() {
            return Err("email");
        }
        if self.name.is_empty() {
            return Err("name");
        }
        Ok(())
    }
}
