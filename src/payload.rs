//! The client-facing payload: the only structure safe to serialize out.
//!
//! A [`Payload`] carries the status code, the standard reason phrase for it,
//! and optionally a message. For 500 responses the message is always the
//! fixed [`INTERNAL_ERROR_MESSAGE`] string no matter what the underlying
//! error said — internal detail never crosses the wire.
//!
//! Serializes to exactly `{"statusCode": <int>, "error": "<reason>",
//! "message"?: "<string>"}`; an absent message is omitted from the JSON
//! entirely, never rendered as an empty string.

use http::StatusCode;
use serde::Serialize;

/// Fixed message reported for every 500 payload.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred";

/// Reason phrase reported for status codes the lookup table does not know.
pub const UNKNOWN_REASON: &str = "Unknown";

/// The subset of error information safe to serialize to an external client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Payload {
    status_code: u16,
    error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl Payload {
    /// Derive the public payload from a status code and the error's current
    /// message.
    ///
    /// - `error` is the canonical reason phrase, or `"Unknown"` for codes the
    ///   table has no entry for.
    /// - `message` is the fixed internal-error string for 500 (regardless of
    ///   `current_message`), the current message when one exists, and absent
    ///   otherwise.
    pub(crate) fn format(status: StatusCode, current_message: Option<&str>) -> Self {
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            // Hide the actual error from the user.
            Some(INTERNAL_ERROR_MESSAGE.to_owned())
        } else {
            current_message.map(str::to_owned)
        };

        Self {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or(UNKNOWN_REASON),
            message,
        }
    }

    /// The HTTP status code, always equal to the owning error's status.
    #[inline]
    pub const fn status_code(&self) -> u16 {
        self.status_code
    }

    /// The standard reason phrase for the status code.
    #[inline]
    pub const fn error(&self) -> &'static str {
        self.error
    }

    /// The client-visible message, if one is determinable.
    #[inline]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_phrase_from_lookup() {
        let payload = Payload::format(StatusCode::NOT_FOUND, None);
        assert_eq!(payload.status_code(), 404);
        assert_eq!(payload.error(), "Not Found");
        assert_eq!(payload.message(), None);
    }

    #[test]
    fn unknown_code_falls_back() {
        let status = StatusCode::from_u16(999).unwrap();
        let payload = Payload::format(status, None);
        assert_eq!(payload.error(), "Unknown");
    }

    #[test]
    fn internal_message_is_fixed_for_500() {
        let payload = Payload::format(
            StatusCode::INTERNAL_SERVER_ERROR,
            Some("db password rejected"),
        );
        assert_eq!(payload.message(), Some(INTERNAL_ERROR_MESSAGE));
    }

    #[test]
    fn current_message_carried_for_non_500() {
        let payload = Payload::format(StatusCode::BAD_REQUEST, Some("missing field"));
        assert_eq!(payload.message(), Some("missing field"));
    }

    #[test]
    fn absent_message_is_omitted_from_json() {
        let payload = Payload::format(StatusCode::NOT_FOUND, None);
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "statusCode": 404, "error": "Not Found" })
        );
        assert!(json.get("message").is_none());
    }

    #[test]
    fn json_field_names_are_camel_case() {
        let payload = Payload::format(StatusCode::BAD_REQUEST, Some("nope"));
        let json = serde_json::to_string(&payload).unwrap();
        assert_eq!(
            json,
            r#"{"statusCode":400,"error":"Bad Request","message":"nope"}"#
        );
    }
}
