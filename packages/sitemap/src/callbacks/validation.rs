//! Built-in validators.

use regex::Regex;
use std::sync::LazyLock;

use super::{arg_bool, arg_f64};
use crate::config::is_valid_url;
use crate::error::Result;
use crate::types::Value;

/// Allowed `changefreq` values.
pub const CHANGE_FREQUENCIES: &[&str] =
    &["always", "hourly", "daily", "weekly", "monthly", "yearly", "never"];

/// Allowed video `platform` values.
pub const VIDEO_PLATFORMS: &[&str] = &["web", "mobile", "tv"];

/// Allowed news `access` values.
pub const ACCESS_CONDITIONS: &[&str] = &["Subscription", "Registration"];

/// Allowed news `genres` values.
pub const NEWS_GENRES: &[&str] = &[
    "PressRelease",
    "Satire",
    "Blog",
    "OpEd",
    "Opinion",
    "UserGenerated",
];

/// ISO 3166 country code: alpha-2, alpha-3 or numeric.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ISO3166_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)([a-z]{2}|[a-z]{3}|\d{3})$").expect("valid regex"));

/// ISO 639 language code as accepted by Google News.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ISO639_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?i)([a-z]{2}|[a-z]{3}|zh-(cn|tw))$").expect("valid regex"));

/// Absolute URL with a host.
pub fn url(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value.as_str().is_some_and(is_valid_url))
}

/// W3C datetime, RFC 2822 date or unix timestamp.
pub fn date(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(super::date::parse_datetime(value).is_some())
}

/// One of [`CHANGE_FREQUENCIES`].
pub fn change_frequency(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value
        .as_str()
        .is_some_and(|v| CHANGE_FREQUENCIES.contains(&v)))
}

/// Number between 0.0 and 1.0 inclusive.
pub fn priority(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value.as_f64().is_some_and(|p| (0.0..=1.0).contains(&p)))
}

/// At most `args[0]` characters.
pub fn max_length(value: &Value, args: &[Value]) -> Result<bool> {
    let max = arg_f64("validation_max_length", args, 0)?;
    Ok(value
        .to_text()
        .is_some_and(|text| text.chars().count() as f64 <= max))
}

/// Number between `args[0]` and `args[1]`; bounds included when `args[2]` is true.
pub fn between(value: &Value, args: &[Value]) -> Result<bool> {
    let min = arg_f64("validation_between", args, 0)?;
    let max = arg_f64("validation_between", args, 1)?;
    let inclusive = arg_bool("validation_between", args, 2, false)?;
    Ok(value.as_f64().is_some_and(|n| {
        if inclusive {
            min <= n && n <= max
        } else {
            min < n && n < max
        }
    }))
}

/// Boolean; `"yes"` and `"no"` are accepted too unless `args[0]` is false.
pub fn boolean(value: &Value, args: &[Value]) -> Result<bool> {
    let allow_yes_no = arg_bool("validation_boolean", args, 0, true)?;
    Ok(match value {
        Value::Bool(_) => true,
        Value::Text(text) => allow_yes_no && (text == "yes" || text == "no"),
        _ => false,
    })
}

/// Space-separated list of ISO 3166 country codes.
pub fn iso3166(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value.as_str().is_some_and(|text| {
        let mut codes = text.split_whitespace().peekable();
        codes.peek().is_some() && codes.all(|code| ISO3166_PATTERN.is_match(code))
    }))
}

/// Space-separated list of [`VIDEO_PLATFORMS`].
pub fn platform(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value.as_str().is_some_and(|text| {
        let mut platforms = text.split_whitespace().peekable();
        platforms.peek().is_some() && platforms.all(|p| VIDEO_PLATFORMS.contains(&p))
    }))
}

/// Thumbnail location. Only the URL is checked; the image itself is not fetched.
pub fn video_thumbnail(value: &Value, args: &[Value]) -> Result<bool> {
    url(value, args)
}

/// Publication name as listed on Google News, without a trailing parenthetical.
pub fn publication_name(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value.as_str().is_some_and(|name| {
        let name = name.trim();
        !name.is_empty() && !name.ends_with(')')
    }))
}

/// ISO 639 language code, or `zh-cn` / `zh-tw`.
pub fn iso639(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value.as_str().is_some_and(|code| ISO639_PATTERN.is_match(code)))
}

/// One of [`ACCESS_CONDITIONS`].
pub fn access_condition(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value
        .as_str()
        .is_some_and(|v| ACCESS_CONDITIONS.contains(&v)))
}

/// Comma-separated list of [`NEWS_GENRES`].
pub fn genres(value: &Value, _args: &[Value]) -> Result<bool> {
    Ok(value.as_str().is_some_and(|text| {
        text.split(',')
            .map(str::trim)
            .all(|genre| NEWS_GENRES.contains(&genre))
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(f: fn(&Value, &[Value]) -> Result<bool>, value: impl Into<Value>) -> bool {
        f(&value.into(), &[]).unwrap()
    }

    #[test]
    fn test_url() {
        assert!(check(url, "http://example.com/a"));
        assert!(!check(url, "not a url"));
        assert!(!check(url, 42));
    }

    #[test]
    fn test_date() {
        assert!(check(date, "2020-01-01"));
        assert!(check(date, 1_577_836_800));
        assert!(!check(date, "the first of january"));
    }

    #[test]
    fn test_change_frequency() {
        for frequency in CHANGE_FREQUENCIES {
            assert!(check(change_frequency, *frequency));
        }
        assert!(!check(change_frequency, "Daily"));
        assert!(!check(change_frequency, "sometimes"));
    }

    #[test]
    fn test_priority() {
        assert!(check(priority, 0.0));
        assert!(check(priority, 0.8));
        assert!(check(priority, 1));
        assert!(check(priority, "0.3"));
        assert!(!check(priority, 1.5));
        assert!(!check(priority, -0.1));
        assert!(!check(priority, "high"));
    }

    #[test]
    fn test_max_length_counts_characters() {
        let args = [Value::from(5)];
        assert!(max_length(&Value::from("héllo"), &args).unwrap());
        assert!(!max_length(&Value::from("hello!"), &args).unwrap());
        assert!(max_length(&Value::from("x"), &[]).is_err());
    }

    #[test]
    fn test_between() {
        let inclusive = [Value::from(0), Value::from(28_800), Value::from(true)];
        assert!(between(&Value::from(0), &inclusive).unwrap());
        assert!(between(&Value::from(28_800), &inclusive).unwrap());
        assert!(!between(&Value::from(28_801), &inclusive).unwrap());

        let exclusive = [Value::from(0), Value::from(5)];
        assert!(!between(&Value::from(0), &exclusive).unwrap());
        assert!(between(&Value::from(4.2), &exclusive).unwrap());
    }

    #[test]
    fn test_boolean() {
        assert!(check(boolean, true));
        assert!(check(boolean, "yes"));
        assert!(check(boolean, "no"));
        assert!(!check(boolean, "maybe"));
        assert!(!boolean(&Value::from("yes"), &[Value::from(false)]).unwrap());
    }

    #[test]
    fn test_iso3166() {
        assert!(check(iso3166, "NL"));
        assert!(check(iso3166, "nl be NLD 528"));
        assert!(!check(iso3166, ""));
        assert!(!check(iso3166, "NL,BE"));
        assert!(!check(iso3166, "Netherlands"));
    }

    #[test]
    fn test_platform() {
        assert!(check(platform, "web"));
        assert!(check(platform, "web mobile tv"));
        assert!(!check(platform, "desktop"));
        assert!(!check(platform, " "));
    }

    #[test]
    fn test_publication_name() {
        assert!(check(publication_name, "The Example Times"));
        assert!(!check(publication_name, "The Example Times (Blog)"));
        assert!(!check(publication_name, ""));
    }

    #[test]
    fn test_iso639() {
        assert!(check(iso639, "en"));
        assert!(check(iso639, "nld"));
        assert!(check(iso639, "zh-cn"));
        assert!(check(iso639, "ZH-TW"));
        assert!(!check(iso639, "zh-hk"));
        assert!(!check(iso639, "english"));
    }

    #[test]
    fn test_access_condition() {
        assert!(check(access_condition, "Subscription"));
        assert!(check(access_condition, "Registration"));
        assert!(!check(access_condition, "Free"));
    }

    #[test]
    fn test_genres() {
        assert!(check(genres, "Blog"));
        assert!(check(genres, "PressRelease, Blog,OpEd"));
        assert!(!check(genres, "Blog, Gossip"));
        assert!(!check(genres, ""));
    }
}
