//! Failures of the leave backend and the shape of its error payloads.

use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Error payload returned by the backend, resolved once at the boundary.
///
/// The backend answers with a bare string, a list of strings, or an object
/// mapping each field to a string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorBody {
    SingleMessage(String),
    MessageList(Vec<String>),
}

impl ErrorBody {
    pub const UNKNOWN: &'static str = "Erreur inconnue";

    /// Flattens any JSON payload. Object fields are visited in document order.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(message) => Self::SingleMessage(message.clone()),
            Value::Array(_) | Value::Object(_) => {
                let mut messages = Vec::new();
                collect_messages(value, &mut messages);
                if messages.is_empty() {
                    Self::SingleMessage(Self::UNKNOWN.to_string())
                } else {
                    Self::MessageList(messages)
                }
            }
            Value::Null => Self::SingleMessage(Self::UNKNOWN.to_string()),
            other => Self::SingleMessage(other.to_string()),
        }
    }

    /// Parses a raw response body; non-JSON text is kept as one message.
    pub fn from_text(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(value) => Self::from_value(&value),
            Err(_) if raw.trim().is_empty() => Self::SingleMessage(Self::UNKNOWN.to_string()),
            Err(_) => Self::SingleMessage(raw.trim().to_string()),
        }
    }

    pub fn messages(&self) -> Vec<&str> {
        match self {
            Self::SingleMessage(message) => vec![message.as_str()],
            Self::MessageList(messages) => messages.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

fn collect_messages(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(message) => out.push(message.clone()),
        Value::Array(items) => items.iter().for_each(|item| collect_messages(item, out)),
        Value::Object(fields) => fields.values().for_each(|field| collect_messages(field, out)),
        Value::Null => {}
        other => out.push(other.to_string()),
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unable to reach the server: {0}")]
    Transport(String),
    #[error("session expired or missing, please sign in again")]
    Unauthorized,
    #[error("{0}")]
    Rejected(ErrorBody),
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_errors_keep_document_order() {
        let body = ErrorBody::from_text(
            r#"{"date_fin": ["Date invalide."], "commentaire": "Obligatoire", "non_field_errors": ["Solde insuffisant", "Chevauchement"]}"#,
        );
        assert_eq!(
            body,
            ErrorBody::MessageList(vec![
                "Date invalide.".into(),
                "Obligatoire".into(),
                "Solde insuffisant".into(),
                "Chevauchement".into(),
            ])
        );
    }

    #[test]
    fn bare_strings_and_empty_payloads() {
        assert_eq!(
            ErrorBody::from_value(&json!("Refusé")),
            ErrorBody::SingleMessage("Refusé".into())
        );
        assert_eq!(
            ErrorBody::from_value(&json!({})),
            ErrorBody::SingleMessage(ErrorBody::UNKNOWN.into())
        );
        assert_eq!(
            ErrorBody::from_text("Bad Gateway"),
            ErrorBody::SingleMessage("Bad Gateway".into())
        );
    }

    #[test]
    fn display_joins_messages() {
        let body = ErrorBody::MessageList(vec!["a".into(), "b".into()]);
        assert_eq!(body.to_string(), "a; b");
        assert_eq!(ApiError::Rejected(body).to_string(), "a; b");
    }
}
