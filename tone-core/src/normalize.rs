//! List-envelope normalization.
//!
//! List endpoints answer either with a bare JSON array or with `{"data": [...]}`.
//! Anything else is a malformed response; it is logged and read as an empty
//! list so a contract slip on the backend degrades to "no rows" rather than an
//! error screen.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{FetchError, MalformedResponse};
use crate::types::ResourceKind;

/// Pull the list out of a response body.
pub fn extract_list(value: Value) -> Result<Vec<Value>, MalformedResponse> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(MalformedResponse { found: "object" }),
        },
        other => Err(MalformedResponse {
            found: json_kind(&other),
        }),
    }
}

/// Extract and decode a list of records.
///
/// A malformed envelope yields `Ok(vec![])`; an element that does not match
/// `T` is a [`FetchError::Decode`].
pub fn decode_list<T: DeserializeOwned>(
    resource: ResourceKind,
    value: Value,
) -> Result<Vec<T>, FetchError> {
    let items = match extract_list(value) {
        Ok(items) => items,
        Err(err) => {
            tracing::warn!(
                resource = %resource,
                error = %err,
                "malformed list response, treating as empty",
            );
            return Ok(Vec::new());
        }
    };

    items
        .into_iter()
        .map(|item| {
            serde_json::from_value(item).map_err(|e| FetchError::Decode {
                resource,
                message: e.to_string(),
            })
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
