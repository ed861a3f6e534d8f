//! Built-in content transforms.
//!
//! Transforms never escape XML; the serializer does that exactly once.
//! A value a transform cannot interpret is returned unchanged, which only
//! happens when validation is disabled.

use regex::Regex;
use std::sync::LazyLock;

use super::date::{format_w3c, parse_datetime};
use crate::error::Result;
use crate::types::Value;

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static TAG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// ASCII punctuation that may appear literally in a URL. Existing `%`
/// escapes are kept as they are.
const URL_PUNCTUATION: &str = "-._~:/?#[]@!$&'()*+,;=%";

/// Percent-encode the characters a URL may not contain literally.
///
/// Everything else is kept byte for byte: the URL is not normalized, so
/// case, ports and path segments stay as the caller wrote them.
pub fn url(value: &Value, _args: &[Value]) -> Result<Value> {
    let Value::Text(text) = value else {
        return Ok(value.clone());
    };

    let mut encoded = String::with_capacity(text.len());
    let mut buffer = [0u8; 4];
    for c in text.chars() {
        if c.is_ascii_alphanumeric() || URL_PUNCTUATION.contains(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buffer)));
        }
    }
    Ok(Value::Text(encoded))
}

/// Render a date as a W3C datetime.
pub fn date(value: &Value, _args: &[Value]) -> Result<Value> {
    Ok(parse_datetime(value)
        .map(|dt| Value::Text(format_w3c(&dt)))
        .unwrap_or_else(|| value.clone()))
}

/// Render booleans as `yes` / `no`.
pub fn boolean(value: &Value, _args: &[Value]) -> Result<Value> {
    Ok(match value {
        Value::Bool(true) => Value::from("yes"),
        Value::Bool(false) => Value::from("no"),
        other => other.clone(),
    })
}

/// Remove markup tags and surrounding whitespace.
pub fn strip_tags(value: &Value, _args: &[Value]) -> Result<Value> {
    Ok(match value {
        Value::Text(text) => Value::Text(TAG_PATTERN.replace_all(text, "").trim().to_string()),
        other => other.clone(),
    })
}
