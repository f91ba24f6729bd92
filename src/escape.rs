//! Escaping for quoted HTTP header attribute values.
//!
//! `WWW-Authenticate` parameters are rendered as `name="value"`. The value
//! must be drawn from the character set a quoted attribute can legally carry,
//! and any embedded backslash or double-quote has to be escaped so the quoted
//! string survives round-tripping through a header parser.
//!
//! Escaping order matters: backslashes are doubled before quotes are escaped,
//! so a literal `\"` in the input becomes `\\\"` rather than `\"`. The
//! single-pass implementation below is equivalent to the two sequential
//! replacements.

use crate::Violation;
use std::borrow::Cow;

/// Check whether a character may appear inside a quoted attribute value.
///
/// Allowed: space, ASCII alphanumerics, underscore,
/// `!#$%&'()*+,-./:;<=>?@[]^`{|}~`, backslash, and double-quote.
/// Control characters and anything outside printable ASCII are rejected.
#[inline]
const fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            ' ' | '_'
                | '!'
                | '#'
                | '$'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | '+'
                | ','
                | '-'
                | '.'
                | '/'
                | ':'
                | ';'
                | '<'
                | '='
                | '>'
                | '?'
                | '@'
                | '['
                | ']'
                | '^'
                | '`'
                | '{'
                | '|'
                | '}'
                | '~'
                | '"'
                | '\\'
        )
}

/// Escape a string for inclusion inside a quoted HTTP header attribute.
///
/// Returns `Cow::Borrowed` when nothing needed escaping, so the common case
/// of plain attribute values stays allocation-free.
///
/// # Errors
///
/// Returns [`Violation::BadAttributeValue`] if `value` contains any character
/// outside the allowed attribute set (e.g. a newline or a non-ASCII
/// character). This is a usage error and should not be swallowed.
///
/// # Example
///
/// ```rust
/// use rampart_errors::escape::escape_header_attribute;
///
/// let escaped = escape_header_attribute(r#"say \"hi\""#).unwrap();
/// assert_eq!(escaped, r#"say \\\"hi\\\""#);
/// ```
pub fn escape_header_attribute(value: &str) -> Result<Cow<'_, str>, Violation> {
    if value.chars().any(|c| !is_allowed(c)) {
        return Err(Violation::BadAttributeValue {
            value: value.to_owned(),
        });
    }

    if !value.contains(['\\', '"']) {
        return Ok(Cow::Borrowed(value));
    }

    let mut escaped = String::with_capacity(value.len() + 2);
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            c => escaped.push(c),
        }
    }

    Ok(Cow::Owned(escaped))
}
