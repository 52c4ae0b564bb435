use std::fmt;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub type RequestId = u64;

/// One job record as returned by the upstream API.
///
/// No schema is enforced: absent or `null` attributes become empty strings,
/// other scalars keep their JSON text, and objects fall back to their `name`
/// member when they have one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hiring_organization: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub location_name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date_posted: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(display_text(Value::deserialize(deserializer)?))
}

fn display_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        Value::Object(mut map) => match map.remove("name") {
            Some(Value::String(name)) => name,
            Some(other) => {
                map.insert("name".to_string(), other);
                Value::Object(map).to_string()
            }
            None => Value::Object(map).to_string(),
        },
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    SearchCompleted {
        request_id: RequestId,
        result: Result<Vec<JobPosting>, SearchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SearchError {
    pub kind: FailureKind,
    pub message: String,
}

impl SearchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Network,
    Timeout,
    HttpStatus(u16),
    TooLarge { max_bytes: u64, actual: Option<u64> },
    MalformedBody,
    MissingHits,
    MissingCredentials,
    /// The search task itself failed (a panic inside the client).
    Internal,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::MalformedBody => write!(f, "malformed response body"),
            FailureKind::MissingHits => write!(f, "missing hits"),
            FailureKind::MissingCredentials => write!(f, "missing credentials"),
            FailureKind::Internal => write!(f, "internal error"),
        }
    }
}
