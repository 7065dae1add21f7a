//! Inbound webhook payload types.
//!
//! Clerk delivers events as JSON envelopes of the form
//! `{ "type": "user.created", "data": { ... } }`. The envelope is decoded
//! first and `data` is kept raw; it is only decoded into [`ClerkUserData`]
//! for the user lifecycle kinds, so any other kind is acknowledged whatever
//! its `data` looks like.

use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Event kind carried in the envelope's `type` field.
///
/// Kinds other than the three user lifecycle events are kept verbatim in
/// [`EventKind::Other`] so they can be acknowledged and logged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum EventKind {
    Created,
    Updated,
    Deleted,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::Created => "user.created",
            EventKind::Updated => "user.updated",
            EventKind::Deleted => "user.deleted",
            EventKind::Other(kind) => kind,
        }
    }
}

impl From<String> for EventKind {
    fn from(kind: String) -> Self {
        match kind.as_str() {
            "user.created" => EventKind::Created,
            "user.updated" => EventKind::Updated,
            "user.deleted" => EventKind::Deleted,
            _ => EventKind::Other(kind),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verified webhook envelope with `data` left undecoded.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default)]
    pub data: Value,
}

impl InboundEvent {
    /// Decode `data` as user attributes. An absent or null `data` is empty.
    pub fn user_data(&self) -> Result<ClerkUserData, serde_json::Error> {
        match &self.data {
            Value::Null => Ok(ClerkUserData::default()),
            data => ClerkUserData::deserialize(data),
        }
    }
}

/// User attributes from the `data` object.
///
/// Decoding is lenient: nulls and values of an unexpected type read as
/// absent, and numbers are taken in their decimal form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClerkUserData {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_email_addresses")]
    pub email_addresses: Vec<ClerkEmailAddress>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub image_url: Option<String>,
}

/// Entry of `data.email_addresses`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClerkEmailAddress {
    pub email_address: Option<String>,
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_string(&value))
}

fn lenient_email_addresses<'de, D>(deserializer: D) -> Result<Vec<ClerkEmailAddress>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = match Value::deserialize(deserializer)? {
        Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };

    Ok(entries
        .iter()
        .map(|entry| ClerkEmailAddress {
            email_address: entry.get("email_address").and_then(scalar_string),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_data(json: &str) -> ClerkUserData {
        let event: InboundEvent = serde_json::from_str(json).unwrap();
        event.user_data().unwrap()
    }

    #[test]
    fn test_event_kind_from_string() {
        assert_eq!(EventKind::from("user.created".to_string()), EventKind::Created);
        assert_eq!(EventKind::from("user.updated".to_string()), EventKind::Updated);
        assert_eq!(EventKind::from("user.deleted".to_string()), EventKind::Deleted);
        assert_eq!(
            EventKind::from("session.created".to_string()),
            EventKind::Other("session.created".to_string())
        );
    }

    #[test]
    fn test_inbound_event_full_user_payload() {
        let json = r#"{
            "type": "user.created",
            "object": "event",
            "data": {
                "id": "user_2abc",
                "object": "user",
                "email_addresses": [{"id": "idn_1", "email_address": "a@x.com"}],
                "first_name": "Ada",
                "last_name": "Lovelace",
                "image_url": "https://img.example.com/a.png",
                "public_metadata": {}
            }
        }"#;

        let event: InboundEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::Created);

        let data = event.user_data().unwrap();
        assert_eq!(data.id.as_deref(), Some("user_2abc"));
        assert_eq!(data.email_addresses.len(), 1);
        assert_eq!(data.email_addresses[0].email_address.as_deref(), Some("a@x.com"));
        assert_eq!(data.first_name.as_deref(), Some("Ada"));
        assert_eq!(data.image_url.as_deref(), Some("https://img.example.com/a.png"));
    }

    #[test]
    fn test_inbound_event_deleted_payload() {
        let data = user_data(
            r#"{"type":"user.deleted","data":{"id":"user_2abc","deleted":true,"object":"user"}}"#,
        );

        assert_eq!(data.id.as_deref(), Some("user_2abc"));
        assert!(data.email_addresses.is_empty());
        assert!(data.first_name.is_none());
    }

    #[test]
    fn test_envelope_accepts_any_data_shape() {
        for json in [
            r#"{"type":"sms.created","data":{"id":42}}"#,
            r#"{"type":"user.other","data":[1,2]}"#,
            r#"{"type":"organization.created","data":{"id":"org_1","image_url":{"x":1}}}"#,
            r#"{"type":"session.ended"}"#,
        ] {
            let event: InboundEvent = serde_json::from_str(json).unwrap();
            assert!(matches!(event.kind, EventKind::Other(_)), "{json}");
        }
    }

    #[test]
    fn test_user_data_null_fields() {
        let data = user_data(
            r#"{"type":"user.updated","data":{"id":"u1","email_addresses":null,"first_name":null,"last_name":null,"image_url":null}}"#,
        );

        assert!(data.email_addresses.is_empty());
        assert!(data.first_name.is_none());
        assert!(data.last_name.is_none());
        assert!(data.image_url.is_none());
    }

    #[test]
    fn test_user_data_mistyped_fields() {
        let data = user_data(
            r#"{"type":"user.created","data":{
                "id":42,
                "email_addresses":[{"email_address":null}, "junk"],
                "first_name":{"given":"A"},
                "last_name":7,
                "image_url":["https://img.example.com/a.png"]
            }}"#,
        );

        assert_eq!(data.id.as_deref(), Some("42"));
        assert_eq!(
            data.email_addresses,
            vec![ClerkEmailAddress::default(), ClerkEmailAddress::default()]
        );
        assert!(data.first_name.is_none());
        assert_eq!(data.last_name.as_deref(), Some("7"));
        assert!(data.image_url.is_none());
    }

    #[test]
    fn test_user_data_email_addresses_not_a_list() {
        let data = user_data(r#"{"type":"user.created","data":{"id":"u1","email_addresses":"a@x.com"}}"#);
        assert!(data.email_addresses.is_empty());
    }

    #[test]
    fn test_user_data_absent() {
        let data = user_data(r#"{"type":"user.created"}"#);
        assert!(data.id.is_none());
    }

    #[test]
    fn test_user_data_not_an_object() {
        let event: InboundEvent = serde_json::from_str(r#"{"type":"user.created","data":[1,2]}"#).unwrap();
        assert!(event.user_data().is_err());
    }
}
