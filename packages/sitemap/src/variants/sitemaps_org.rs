//! Sitemaps.org protocol rules.

use super::checked;
use crate::schema::{CallbackRef, Fallback, NodeRule};
use crate::types::Value;

/// Default `priority` when the supplied one is out of range.
pub const DEFAULT_PRIORITY: f64 = 0.5;

/// Rules of a `<url>` entry.
#[must_use]
pub fn url_rules() -> Vec<(&'static str, NodeRule)> {
    vec![
        ("loc", loc_rule()),
        ("lastmod", lastmod_rule()),
        (
            "changefreq",
            checked("validation_change_frequency", Fallback::Raise),
        ),
        (
            "priority",
            checked(
                "validation_priority",
                Fallback::Literal(Value::Float(DEFAULT_PRIORITY)),
            ),
        ),
    ]
}

/// Rules of a `<sitemap>` entry in a sitemap index.
#[must_use]
pub fn index_rules() -> Vec<(&'static str, NodeRule)> {
    vec![("loc", loc_rule()), ("lastmod", lastmod_rule())]
}

fn loc_rule() -> NodeRule {
    checked("validation_url", Fallback::Raise)
        .with_transform(CallbackRef::built_in("content_url"))
        .with_required(true)
}

fn lastmod_rule() -> NodeRule {
    checked("validation_date", Fallback::Raise).with_transform(CallbackRef::built_in("content_date"))
}
