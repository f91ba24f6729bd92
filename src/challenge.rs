//! `WWW-Authenticate` challenge construction.
//!
//! A challenge comes in two shapes, modeled as an explicit tagged enum
//! instead of dispatching on argument type:
//!
//! - [`Challenge::NamedScheme`]: a scheme token plus ordered attributes,
//!   rendered as `Scheme name="value", name="value", error="message"`.
//!   Attribute values and the message pass through the attribute escaper.
//! - [`Challenge::List`]: pre-formatted challenge strings joined with
//!   `", "` verbatim — no escaping, no missing-credentials handling.
//!
//! For the named-scheme form, an absent (or empty) message means the client
//! simply sent no credentials: the `error` attribute is omitted and the
//! resulting error is flagged as missing credentials.
//!
//! # Example
//!
//! ```rust
//! use rampart_errors::Normalizer;
//! use rampart_errors::challenge::Challenge;
//!
//! let errors = Normalizer::new();
//! let challenge = Challenge::named("Bearer").attribute("realm", "api");
//! let err = errors.unauthorized_with(Some("bad creds"), challenge);
//!
//! assert_eq!(
//!     err.headers().get("WWW-Authenticate").unwrap(),
//!     r#"Bearer realm="api", error="bad creds""#
//! );
//! ```

use crate::Violation;
use crate::escape::escape_header_attribute;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::fmt::Write;

/// A single challenge attribute value.
///
/// `Empty` stands in for the original's `null`/absent value and renders as
/// the empty string; a numeric zero is a real value and renders as `"0"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// A textual value, escaped before rendering.
    Text(Cow<'static, str>),
    /// A numeric value, rendered in decimal.
    Number(i64),
    /// No value; rendered as `""`.
    Empty,
}

impl From<&'static str> for AttributeValue {
    fn from(value: &'static str) -> Self {
        Self::Text(Cow::Borrowed(value))
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(Cow::Owned(value))
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

/// A `WWW-Authenticate` challenge, in one of its two calling shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Challenge {
    /// A scheme token with ordered `name="value"` attributes.
    NamedScheme {
        /// The authentication scheme (e.g. `Basic`, `Bearer`).
        scheme: Cow<'static, str>,
        /// Attributes rendered in insertion order.
        attributes: SmallVec<[(Cow<'static, str>, AttributeValue); 4]>,
    },
    /// Pre-formatted challenge strings, joined verbatim.
    List(Vec<Cow<'static, str>>),
}

impl Challenge {
    /// Start a named-scheme challenge with no attributes.
    pub fn named(scheme: impl Into<Cow<'static, str>>) -> Self {
        Self::NamedScheme {
            scheme: scheme.into(),
            attributes: SmallVec::new(),
        }
    }

    /// Build a challenge from a list of pre-formatted challenge strings.
    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Append an attribute to a named-scheme challenge.
    ///
    /// Attributes render in the order they were added.
    ///
    /// # Panics
    ///
    /// Panics when called on a [`Challenge::List`]: list items are
    /// pre-formatted and carry no attributes.
    #[must_use]
    pub fn attribute(
        mut self,
        name: impl Into<Cow<'static, str>>,
        value: impl Into<AttributeValue>,
    ) -> Self {
        match &mut self {
            Self::NamedScheme { attributes, .. } => {
                attributes.push((name.into(), value.into()));
            }
            Self::List(_) => panic!("attribute() is not valid on a challenge list"),
        }
        self
    }

    /// Append an attribute with no value (renders as `""`).
    #[must_use]
    pub fn empty_attribute(self, name: impl Into<Cow<'static, str>>) -> Self {
        self.attribute(name, AttributeValue::Empty)
    }
}

/// The rendered header value plus the missing-credentials signal.
#[derive(Debug)]
pub(crate) struct BuiltChallenge {
    pub(crate) header_value: String,
    pub(crate) missing_credentials: bool,
}

/// Render a challenge into a `WWW-Authenticate` header value.
///
/// An empty `message` is treated the same as an absent one: for the
/// named-scheme form it omits the `error` attribute and reports missing
/// credentials instead.
pub(crate) fn build(challenge: &Challenge, message: Option<&str>) -> Result<BuiltChallenge, Violation> {
    match challenge {
        Challenge::NamedScheme { scheme, attributes } => {
            let message = message.filter(|m| !m.is_empty());
            let mut header = String::with_capacity(scheme.len() + attributes.len() * 16);
            header.push_str(scheme);

            for (i, (name, value)) in attributes.iter().enumerate() {
                if i > 0 {
                    header.push(',');
                }
                let rendered = render_value(value)?;
                // Infallible: writing into a String.
                let _ = write!(header, " {name}=\"{rendered}\"");
            }

            let missing_credentials = match message {
                Some(message) => {
                    if !attributes.is_empty() {
                        header.push(',');
                    }
                    let escaped = escape_header_attribute(message)?;
                    let _ = write!(header, " error=\"{escaped}\"");
                    false
                }
                None => true,
            };

            Ok(BuiltChallenge {
                header_value: header,
                missing_credentials,
            })
        }
        Challenge::List(items) => Ok(BuiltChallenge {
            header_value: items.join(", "),
            missing_credentials: false,
        }),
    }
}

fn render_value(value: &AttributeValue) -> Result<Cow<'_, str>, Violation> {
    match value {
        AttributeValue::Text(text) => escape_header_attribute(text),
        AttributeValue::Number(n) => Ok(Cow::Owned(n.to_string())),
        AttributeValue::Empty => Ok(Cow::Borrowed("")),
    }
}
