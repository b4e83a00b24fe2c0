//! Client-side error taxonomy for REST calls.

use serde_json::Value;
use thiserror::Error;

/// Why a request failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Your session has expired. Please sign in again.")]
    Unauthorized,
    #[error("You do not have permission to do that: {0}")]
    Forbidden(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Please fix the highlighted fields")]
    Validation(Vec<FieldError>),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("The request timed out")]
    Timeout,
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Could not read the server response: {0}")]
    Decode(String),
    #[error("{0}")]
    Client(String),
}

/// One message attached to one input field (or to the form as a whole).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Field name used for messages that do not belong to a single input.
pub const NON_FIELD: &str = "non_field_errors";

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Classify a non-2xx response.
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let message = parsed
            .as_ref()
            .and_then(summary_message)
            .unwrap_or_else(|| fallback_message(status, body));

        match status {
            401 => Self::Unauthorized,
            403 => Self::Forbidden(message),
            404 => Self::NotFound(message),
            400 | 422 => {
                let fields = parsed.as_ref().map(collect_field_errors).unwrap_or_default();
                if fields.is_empty() {
                    Self::Http { status, message }
                } else {
                    Self::Validation(fields)
                }
            }
            500..=599 => Self::Server { status, message },
            _ => Self::Http { status, message },
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized => Some(401),
            Self::Forbidden(_) => Some(403),
            Self::NotFound(_) => Some(404),
            Self::Validation(_) => Some(422),
            Self::Server { status, .. } | Self::Http { status, .. } => Some(*status),
            Self::Network(_) | Self::Timeout | Self::Decode(_) | Self::Client(_) => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    /// Messages to show one by one, e.g. as toasts.
    pub fn field_messages(&self) -> Vec<String> {
        match self {
            Self::Validation(fields) => fields
                .iter()
                .map(|f| {
                    if f.field == NON_FIELD || f.field == "detail" {
                        f.message.clone()
                    } else {
                        format!("{}: {}", humanize(&f.field), f.message)
                    }
                })
                .collect(),
            other => vec![other.to_string()],
        }
    }

    /// First message recorded for `field`, for binding onto a form input.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        match self {
            Self::Validation(fields) => fields
                .iter()
                .find(|f| f.field == field)
                .map(|f| f.message.as_str()),
            _ => None,
        }
    }
}

/// Flatten the error bodies the API produces into field/message pairs.
///
/// Understands `{"field": ["msg", ...]}`, `{"field": "msg"}`,
/// `{"detail": "msg"}` and the `{code, message, details: {...}}` envelope.
pub fn collect_field_errors(body: &Value) -> Vec<FieldError> {
    let Some(map) = body.as_object() else {
        return Vec::new();
    };
    if let Some(details) = map.get("details").filter(|d| d.is_object()) {
        return collect_field_errors(details);
    }

    let mut out = Vec::new();
    for (field, value) in map {
        if field == "code" || field == "timestamp" || field == "path" {
            continue;
        }
        let field = if field == "message" { "detail" } else { field.as_str() };
        match value {
            Value::String(message) => out.push(FieldError {
                field: field.to_string(),
                message: message.clone(),
            }),
            Value::Array(messages) => out.extend(messages.iter().filter_map(|m| {
                m.as_str().map(|message| FieldError {
                    field: field.to_string(),
                    message: message.to_string(),
                })
            })),
            _ => {}
        }
    }
    out
}

fn summary_message(body: &Value) -> Option<String> {
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn fallback_message(status: u16, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() || body.starts_with('<') {
        format!("HTTP {status}")
    } else {
        body.chars().take(200).collect()
    }
}

fn humanize(field: &str) -> String {
    let spaced = field.trim_end_matches("_id").replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(ApiError::from_response(401, ""), ApiError::Unauthorized);
        assert!(ApiError::from_response(401, "").is_unauthorized());
        assert!(!ApiError::from_response(403, "").is_unauthorized());
        assert!(matches!(ApiError::from_response(403, r#"{"detail":"nope"}"#), ApiError::Forbidden(m) if m == "nope"));
        assert!(matches!(ApiError::from_response(404, ""), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from_response(500, "<html>boom</html>"),
            ApiError::Server { status: 500, ref message } if message == "HTTP 500"
        ));
        assert!(matches!(ApiError::from_response(409, "conflict"), ApiError::Http { status: 409, .. }));
    }

    #[test]
    fn test_field_keyed_validation_body() {
        let err = ApiError::from_response(
            422,
            r#"{"title": ["This field is required."], "section_id": ["Invalid pk \"99\"."]}"#,
        );
        assert_eq!(err.field_error("title"), Some("This field is required."));
        let messages = err.field_messages();
        assert!(messages.contains(&"Title: This field is required.".to_string()));
        assert!(messages.contains(&"Section: Invalid pk \"99\".".to_string()));
    }

    #[test]
    fn test_envelope_details_are_unpacked() {
        let err = ApiError::from_response(
            422,
            r#"{"code":"VALIDATION_ERROR","message":"Validation failed","details":{"rating":["must be between 1 and 5"]},"timestamp":"x"}"#,
        );
        assert_eq!(
            err,
            ApiError::Validation(vec![FieldError {
                field: "rating".to_string(),
                message: "must be between 1 and 5".to_string(),
            }])
        );
    }

    #[test]
    fn test_bad_request_without_fields_stays_generic() {
        let err = ApiError::from_response(400, "");
        assert_eq!(err, ApiError::Http { status: 400, message: "HTTP 400".to_string() });
        assert_eq!(err.field_messages(), vec!["HTTP error 400: HTTP 400".to_string()]);
    }

    #[test]
    fn test_non_field_errors_are_shown_bare() {
        let err = ApiError::from_response(400, r#"{"non_field_errors": ["Feedback already exists."]}"#);
        assert_eq!(err.field_messages(), vec!["Feedback already exists.".to_string()]);
    }
}
