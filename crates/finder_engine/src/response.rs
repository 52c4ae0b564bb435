use serde_json::Value;

use crate::{FailureKind, JobPosting, SearchError};

/// Extracts the ordered `hits` array from a search response body.
pub fn parse_hits(bytes: &[u8]) -> Result<Vec<JobPosting>, SearchError> {
    let body: Value = serde_json::from_slice(bytes)
        .map_err(|err| SearchError::new(FailureKind::MalformedBody, err.to_string()))?;

    let Value::Object(mut body) = body else {
        return Err(SearchError::new(
            FailureKind::MalformedBody,
            "expected a JSON object",
        ));
    };

    let hits = match body.remove("hits") {
        Some(Value::Array(hits)) => hits,
        Some(_) => {
            return Err(SearchError::new(
                FailureKind::MissingHits,
                "`hits` is not an array",
            ))
        }
        None => {
            return Err(SearchError::new(
                FailureKind::MissingHits,
                "response has no `hits` field",
            ))
        }
    };

    hits.into_iter()
        .enumerate()
        .map(|(index, hit)| {
            // Arrays would otherwise fill the struct by position.
            if !hit.is_object() {
                return Err(SearchError::new(
                    FailureKind::MalformedBody,
                    format!("hit {index}: expected a JSON object"),
                ));
            }
            serde_json::from_value(hit).map_err(|err| {
                SearchError::new(FailureKind::MalformedBody, format!("hit {index}: {err}"))
            })
        })
        .collect()
}
