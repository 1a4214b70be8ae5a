//! Node-reported failures.

use std::fmt;

use serde_json::Value;

/// A failure response from the node, with the most useful message pulled
/// out of whichever field the node populated.
#[derive(Debug, Clone, PartialEq)]
pub struct RpcError {
    message: String,
    json: Value,
}

impl RpcError {
    /// Wraps a node error payload. Message precedence: every
    /// `error.details[*].message` joined by newlines, then
    /// `processed.except.message`, then the top-level `message`.
    pub fn new(json: Value) -> Self {
        let details: Vec<&str> = json
            .pointer("/error/details")
            .and_then(Value::as_array)
            .map(|details| {
                details
                    .iter()
                    .filter_map(|d| d.get("message").and_then(Value::as_str))
                    .collect()
            })
            .unwrap_or_default();

        let message = if !details.is_empty() {
            details.join("\n")
        } else if let Some(except) = json
            .pointer("/processed/except/message")
            .and_then(Value::as_str)
        {
            except.to_string()
        } else {
            json.get("message")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        Self { message, json }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The raw payload, traces included.
    pub fn json(&self) -> &Value {
        &self.json
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for RpcError {}
