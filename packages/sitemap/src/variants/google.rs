//! Google image and video sitemap extensions.
//!
//! See <https://developers.google.com/search/docs/crawling-indexing/sitemaps/image-sitemaps>
//! and the video counterpart for the tag semantics.

use super::checked;
use crate::schema::{CallbackRef, Fallback, NodeRule};
use crate::types::Value;

/// Maximum video title length in characters.
pub const VIDEO_TITLE_MAX_LENGTH: i64 = 50;

/// Maximum video description length in characters.
pub const VIDEO_DESCRIPTION_MAX_LENGTH: i64 = 2048;

/// Maximum video category length in characters.
pub const VIDEO_CATEGORY_MAX_LENGTH: i64 = 256;

/// Maximum video duration in seconds.
pub const VIDEO_MAX_DURATION: i64 = 28_800;

/// Highest video rating.
pub const VIDEO_MAX_RATING: f64 = 5.0;

/// The `image` node with its children.
#[must_use]
pub fn image_rule() -> NodeRule {
    NodeRule::new().with_prefix("image").with_children([
        (
            "loc",
            url_rule().with_prefix("image").with_required(true),
        ),
        ("caption", NodeRule::new().with_ancestor_prefix()),
        ("geo_location", NodeRule::new().with_ancestor_prefix()),
        ("title", NodeRule::new().with_ancestor_prefix()),
        ("license", NodeRule::new().with_ancestor_prefix()),
    ])
}

/// The `video` node with its children.
///
/// Both `content_loc` and `player_loc` start out required; the
/// `ContentLocOnly` and `PlayerLocOnly` extensions relax one of them.
#[must_use]
pub fn video_rule() -> NodeRule {
    let children = [
        (
            "thumbnail_loc",
            checked("validation_video_thumbnail", Fallback::Raise)
                .with_transform(CallbackRef::built_in("content_url"))
                .with_required(true),
        ),
        (
            "title",
            text_rule(VIDEO_TITLE_MAX_LENGTH).with_required(true),
        ),
        (
            "description",
            text_rule(VIDEO_DESCRIPTION_MAX_LENGTH).with_required(true),
        ),
        ("content_loc", url_rule().with_required(true)),
        ("player_loc", url_rule().with_required(true)),
        (
            "duration",
            between_rule(0.0, VIDEO_MAX_DURATION as f64),
        ),
        ("expiration_date", date_rule()),
        ("rating", between_rule(0.0, VIDEO_MAX_RATING)),
        ("view_count", NodeRule::new()),
        ("publication_date", date_rule()),
        ("family_friendly", boolean_rule()),
        ("tag", NodeRule::new()),
        (
            "category",
            NodeRule::new().with_validation(
                CallbackRef::built_in("validation_max_length").with_arg(VIDEO_CATEGORY_MAX_LENGTH),
                Fallback::Raise,
            ),
        ),
        (
            "restriction",
            checked("validation_iso3166", Fallback::Raise),
        ),
        ("gallery_loc", url_rule()),
        ("requires_subscription", boolean_rule()),
        ("uploader", NodeRule::new()),
        ("platform", checked("validation_platform", Fallback::Raise)),
        ("live", boolean_rule()),
    ];

    NodeRule::new().with_prefix("video").with_children(
        children
            .into_iter()
            .map(|(name, rule)| (name, rule.with_ancestor_prefix())),
    )
}

fn url_rule() -> NodeRule {
    checked("validation_url", Fallback::Raise).with_transform(CallbackRef::built_in("content_url"))
}

fn date_rule() -> NodeRule {
    checked("validation_date", Fallback::Raise).with_transform(CallbackRef::built_in("content_date"))
}

fn boolean_rule() -> NodeRule {
    checked("validation_boolean", Fallback::Raise)
        .with_transform(CallbackRef::built_in("content_boolean"))
}

fn text_rule(max_length: i64) -> NodeRule {
    NodeRule::new()
        .with_validation(
            CallbackRef::built_in("validation_max_length").with_arg(max_length),
            Fallback::Raise,
        )
        .with_transform(CallbackRef::built_in("content_strip_tags"))
}

fn between_rule(min: f64, max: f64) -> NodeRule {
    NodeRule::new().with_validation(
        CallbackRef::built_in("validation_between").with_args([
            Value::Float(min),
            Value::Float(max),
            Value::Bool(true),
        ]),
        Fallback::Raise,
    )
}
