//! Named constructors, one per standard HTTP 4xx/5xx status.
//!
//! Every constructor is a zero-decision delegation into the normalization
//! core. The 4xx family is a mechanical table, declared through a macro the
//! same way a status catalog would be written out by hand; 401 gets its own
//! treatment for the `WWW-Authenticate` challenge, and the 5xx family routes
//! through [`Detail`] so an underlying cause keeps its identity on the error
//! chain while plain context data rides along as `data`.

use crate::challenge::{self, Challenge};
use crate::{BoxError, Normalizer, RestError, Violation, WWW_AUTHENTICATE};
use serde_json::Value;

/// Context accepted by the 5xx constructors: either caller data to attach,
/// or the underlying cause of the failure.
///
/// The explicit split replaces a runtime "is this value an error?" check:
/// a [`Detail::Cause`] is wrapped (preserved on the source chain), while
/// [`Detail::Data`] is attached to a fresh error as context.
#[derive(Debug)]
pub enum Detail {
    /// Arbitrary context, stored as the error's `data`.
    Data(Value),
    /// The underlying failure; routed through the wrap path.
    Cause(BoxError),
}

impl Detail {
    /// Attach caller context.
    pub fn data(value: Value) -> Self {
        Self::Data(value)
    }

    /// Treat `err` as the underlying cause.
    pub fn cause<E>(err: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Cause(err.into())
    }
}

macro_rules! client_errors {
    ($( $(#[$meta:meta])* $name:ident => $code:literal ),+ $(,)?) => {
        impl Normalizer {
            $(
                $(#[$meta])*
                pub fn $name(&self, message: Option<&str>, data: Option<Value>) -> RestError {
                    self.create($code, message, data)
                }
            )+
        }
    };
}

client_errors! {
    /// 400 Bad Request.
    bad_request => 400,
    /// 403 Forbidden.
    forbidden => 403,
    /// 404 Not Found.
    not_found => 404,
    /// 405 Method Not Allowed.
    method_not_allowed => 405,
    /// 406 Not Acceptable.
    not_acceptable => 406,
    /// 407 Proxy Authentication Required.
    proxy_auth_required => 407,
    /// 408 Request Timeout.
    client_timeout => 408,
    /// 409 Conflict.
    conflict => 409,
    /// 410 Gone.
    resource_gone => 410,
    /// 411 Length Required.
    length_required => 411,
    /// 412 Precondition Failed.
    precondition_failed => 412,
    /// 413 Payload Too Large.
    entity_too_large => 413,
    /// 414 URI Too Long.
    uri_too_long => 414,
    /// 415 Unsupported Media Type.
    unsupported_media_type => 415,
    /// 416 Range Not Satisfiable.
    range_not_satisfiable => 416,
    /// 417 Expectation Failed.
    expectation_failed => 417,
    /// 422 Unprocessable Entity.
    bad_data => 422,
    /// 429 Too Many Requests.
    too_many_requests => 429,
}

// ============================================================================
// 401 Unauthorized
// ============================================================================

impl Normalizer {
    /// 401 Unauthorized with no challenge header.
    pub fn unauthorized(&self, message: Option<&str>) -> RestError {
        self.create(401, message, None)
    }

    /// 401 Unauthorized carrying a `WWW-Authenticate` challenge.
    ///
    /// For a named-scheme challenge with no (or an empty) message, the error
    /// is flagged as missing credentials and the header carries no `error`
    /// attribute. Observers are notified once, after the header and flag are
    /// attached.
    ///
    /// # Panics
    ///
    /// Panics if an attribute value or the message contains characters that
    /// cannot appear in a quoted header attribute. Use
    /// [`try_unauthorized_with`](Self::try_unauthorized_with) to handle the
    /// violation instead.
    pub fn unauthorized_with(&self, message: Option<&str>, challenge: Challenge) -> RestError {
        match self.try_unauthorized_with(message, challenge) {
            Ok(err) => err,
            Err(violation) => panic!("{violation}"),
        }
    }

    /// Checked twin of [`unauthorized_with`](Self::unauthorized_with).
    ///
    /// # Errors
    ///
    /// Returns [`Violation::BadAttributeValue`] when an attribute value or
    /// the message fails header-attribute escaping.
    pub fn try_unauthorized_with(
        &self,
        message: Option<&str>,
        challenge: Challenge,
    ) -> Result<RestError, Violation> {
        let built = challenge::build(&challenge, message)?;

        // 401 is always in range.
        let mut err = self.create_inner(401, message, None)?;
        err.set_header(WWW_AUTHENTICATE, built.header_value);
        if built.missing_credentials {
            err.set_missing_credentials(true);
        }

        self.notify(&err);
        Ok(err)
    }
}

// ============================================================================
// 5xx Server Errors
// ============================================================================

impl Normalizer {
    fn server_error(&self, status_code: u16, message: Option<&str>, detail: Option<Detail>) -> RestError {
        // Catalog statuses are all in range; violations cannot occur here.
        let result = match detail {
            Some(Detail::Cause(cause)) => self.wrap_inner(cause, status_code, message),
            Some(Detail::Data(value)) => self.create_inner(status_code, message, Some(value)),
            None => self.create_inner(status_code, message, None),
        };
        result.unwrap_or_else(|violation| panic!("{violation}"))
    }

    /// 500 Internal Server Error.
    ///
    /// A [`Detail::Cause`] is wrapped, keeping the cause on the error chain
    /// and composing `"<message>: <cause message>"`; the payload still only
    /// ever shows the fixed internal-error string.
    pub fn internal(&self, message: Option<&str>, detail: Option<Detail>) -> RestError {
        let err = self.server_error(500, message, detail);
        self.notify(&err);
        err
    }

    /// 500 flagged as a developer error: the server broke its own contract
    /// (bad argument from an internal caller, impossible state, etc.).
    pub fn bad_implementation(&self, message: Option<&str>, detail: Option<Detail>) -> RestError {
        let mut err = self.server_error(500, message, detail);
        err.set_developer_error();
        self.notify(&err);
        err
    }

    /// 501 Not Implemented.
    pub fn not_implemented(&self, message: Option<&str>, detail: Option<Detail>) -> RestError {
        let err = self.server_error(501, message, detail);
        self.notify(&err);
        err
    }

    /// 502 Bad Gateway.
    pub fn bad_gateway(&self, message: Option<&str>, detail: Option<Detail>) -> RestError {
        let err = self.server_error(502, message, detail);
        self.notify(&err);
        err
    }

    /// 503 Service Unavailable.
    pub fn server_timeout(&self, message: Option<&str>, detail: Option<Detail>) -> RestError {
        let err = self.server_error(503, message, detail);
        self.notify(&err);
        err
    }

    /// 504 Gateway Timeout.
    pub fn gateway_timeout(&self, message: Option<&str>, detail: Option<Detail>) -> RestError {
        let err = self.server_error(504, message, detail);
        self.notify(&err);
        err
    }
}
