//! # Rampart Errors
//!
//! Normalize arbitrary errors into a uniform, HTTP-transportable shape.
//!
//! ## Design Philosophy
//!
//! 1. **Every failure gets a status code** — wrap anything error-like and it
//!    comes out stamped with an HTTP status, a client-safe payload, and any
//!    response headers it needs
//! 2. **Internal detail never leaks** — the payload for a 500 always carries
//!    the fixed `"An internal server error occurred"` string, regardless of
//!    what the underlying error said
//! 3. **Normalization is idempotent** — wrapping an already-normalized error
//!    hands it back untouched, no re-stamping
//! 4. **Usage errors are loud** — an out-of-range status code or a bad header
//!    attribute is a programmer error and fails the construction, never the
//!    response
//!
//! The crate performs no HTTP transport: the consuming server serializes
//! [`RestError::payload`] and [`RestError::headers`] however it likes.
//!
//! ## Quick Start
//!
//! ```rust
//! use rampart_errors::Normalizer;
//!
//! let errors = Normalizer::new();
//!
//! let err = errors.not_found(Some("no such user"), None);
//! assert_eq!(err.status_code().as_u16(), 404);
//! assert_eq!(err.payload().error(), "Not Found");
//! assert_eq!(err.payload().message(), Some("no such user"));
//! ```
//!
//! ## Wrapping foreign errors
//!
//! ```rust
//! use rampart_errors::Normalizer;
//!
//! let errors = Normalizer::new();
//! let cause = "{".parse::<serde_json::Value>().unwrap_err();
//!
//! let err = errors.wrap(cause);
//! assert_eq!(err.status_code().as_u16(), 500);
//! // The real parse failure stays internal:
//! assert_eq!(err.payload().message(), Some("An internal server error occurred"));
//! ```
//!
//! ## Observing normalizations
//!
//! Every successful construction notifies subscribers exactly once, after the
//! error is fully formed:
//!
//! ```rust
//! use rampart_errors::Normalizer;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let errors = Normalizer::new();
//! let seen = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&seen);
//! errors.subscribe(move |_err| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! errors.bad_request(None, None);
//! assert_eq!(seen.load(Ordering::SeqCst), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use http::StatusCode;
use indexmap::IndexMap;
use serde_json::Value;
use std::error::Error;
use std::fmt;
use std::result;

pub mod catalog;
pub mod challenge;
pub mod escape;
pub mod normalizer;
pub mod payload;

pub use catalog::Detail;
pub use challenge::{AttributeValue, Challenge};
pub use normalizer::{Normalizer, SubscriberId};
pub use payload::{INTERNAL_ERROR_MESSAGE, Payload, UNKNOWN_REASON};

/// Boxed error type accepted by the wrap operations.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Type alias for Results that fail on usage violations.
pub type Result<T> = result::Result<T, Violation>;

/// Response header carrying the authentication challenge.
pub const WWW_AUTHENTICATE: &str = "WWW-Authenticate";

// ============================================================================
// Usage Violations
// ============================================================================

/// A precondition violation raised at construction time.
///
/// These are programmer errors, not normal results: an out-of-range status
/// code or a header attribute containing disallowed characters. The
/// ergonomic constructors panic on them; the `try_*` twins return them as
/// `Err` for callers that must not unwind. Either way they should never be
/// caught and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Status code is not a representable HTTP status of 400 or greater.
    StatusCodeOutOfRange {
        /// The offending code.
        value: u16,
    },
    /// A header attribute value contains characters outside the allowed set.
    BadAttributeValue {
        /// The offending value.
        value: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StatusCodeOutOfRange { value } => {
                write!(f, "First argument must be a number (400+): {value}")
            }
            Self::BadAttributeValue { value } => {
                write!(f, "Bad attribute value ({value})")
            }
        }
    }
}

impl Error for Violation {}

// ============================================================================
// RestError
// ============================================================================

/// An error normalized into HTTP-transportable form.
///
/// Created exactly once, by one of the [`Normalizer`] constructors or wrap
/// operations, and immutable afterwards except for [`data`](Self::data),
/// which callers may keep adjusting. A `RestError` is normalized by
/// construction: wrapping one again returns it unchanged.
///
/// The consuming HTTP layer serializes [`payload`](Self::payload) (never the
/// raw [`message`](Self::message)) and applies [`headers`](Self::headers) to
/// the response.
#[must_use = "errors should be handled or sent as a response"]
#[derive(Debug)]
pub struct RestError {
    status: StatusCode,
    message: String,
    data: Option<Value>,
    payload: Payload,
    headers: IndexMap<String, String>,
    missing_credentials: bool,
    developer_error: bool,
    source: Option<BoxError>,
}

impl RestError {
    pub(crate) fn assemble(
        status: StatusCode,
        message: String,
        data: Option<Value>,
        payload: Payload,
        source: Option<BoxError>,
    ) -> Self {
        Self {
            status,
            message,
            data,
            payload,
            headers: IndexMap::new(),
            missing_credentials: false,
            developer_error: false,
            source,
        }
    }

    /// The HTTP status to report. Always 400 or greater.
    #[inline]
    pub const fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Human-readable detail, possibly a `"<prefix>: <cause>"` composite.
    ///
    /// This is the *internal* message: for 5xx statuses it is not what the
    /// client sees. Serialize [`payload`](Self::payload) instead.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Caller-attached context. Never exposed in the payload.
    #[inline]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }

    /// Mutable access to the caller-attached context.
    #[inline]
    pub fn data_mut(&mut self) -> Option<&mut Value> {
        self.data.as_mut()
    }

    /// Replace the caller-attached context.
    #[inline]
    pub fn set_data(&mut self, data: Option<Value>) {
        self.data = data;
    }

    /// The structure safe to serialize to a client.
    #[inline]
    pub const fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Response headers, in insertion order. Empty unless an authentication
    /// challenge populated `WWW-Authenticate`.
    #[inline]
    pub const fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// True when the unauthorized constructor found no usable credentials
    /// message to render into the challenge.
    #[inline]
    pub const fn is_missing_credentials(&self) -> bool {
        self.missing_credentials
    }

    /// True for errors produced by [`Normalizer::bad_implementation`]:
    /// a contract breach inside the server, not a client failure.
    #[inline]
    pub const fn is_developer_error(&self) -> bool {
        self.developer_error
    }

    pub(crate) fn set_header(&mut self, name: &str, value: String) {
        self.headers.insert(name.to_owned(), value);
    }

    pub(crate) fn set_missing_credentials(&mut self, missing: bool) {
        self.missing_credentials = missing;
    }

    pub(crate) fn set_developer_error(&mut self) {
        self.developer_error = true;
    }
}

/// Field-wise equality, excluding `source`: boxed trait-object causes
/// cannot be compared.
impl PartialEq for RestError {
    fn eq(&self, other: &Self) -> bool {
        self.status == other.status
            && self.message == other.message
            && self.data == other.data
            && self.payload == other.payload
            && self.headers == other.headers
            && self.missing_credentials == other.missing_credentials
            && self.developer_error == other.developer_error
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl Error for RestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn display_shows_internal_message() {
        let errors = Normalizer::new();
        let err = errors.bad_request(Some("missing field"), None);
        assert_eq!(err.to_string(), "missing field");
    }

    #[test]
    fn source_chain_preserves_cause() {
        let errors = Normalizer::new();
        let cause = "{".parse::<Value>().unwrap_err();
        let cause_text = cause.to_string();

        let err = errors.wrap(cause);
        let source = err.source().expect("wrapped cause should be on the chain");
        assert_eq!(source.to_string(), cause_text);
    }

    #[test]
    fn data_stays_caller_mutable() {
        let errors = Normalizer::new();
        let mut err = errors.conflict(None, Some(serde_json::json!({ "retries": 1 })));

        err.data_mut().unwrap()["retries"] = serde_json::json!(2);
        assert_eq!(err.data().unwrap()["retries"], 2);

        err.set_data(None);
        assert!(err.data().is_none());
    }

    #[test]
    fn headers_default_empty() {
        let errors = Normalizer::new();
        let err = errors.not_found(None, None);
        assert!(err.headers().is_empty());
    }

    #[test]
    fn violation_diagnostics_name_the_offender() {
        let v = Violation::StatusCodeOutOfRange { value: 200 };
        assert_eq!(v.to_string(), "First argument must be a number (400+): 200");

        let v = Violation::BadAttributeValue {
            value: "x\ny".to_owned(),
        };
        assert!(v.to_string().starts_with("Bad attribute value ("));
    }
}
