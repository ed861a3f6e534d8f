//! Google news sitemap extension.

use super::checked;
use crate::schema::{CallbackRef, Fallback, NodeRule};

/// The `news` node with its children.
#[must_use]
pub fn news_rule() -> NodeRule {
    let publication = NodeRule::new().with_ancestor_prefix().with_children([
        (
            "name",
            checked("validation_publication_name", Fallback::Raise)
                .with_prefix("news")
                .with_required(true),
        ),
        (
            "language",
            checked("validation_iso639", Fallback::Raise)
                .with_prefix("news")
                .with_required(true),
        ),
    ]);

    NodeRule::new().with_prefix("news").with_children([
        ("publication", publication),
        (
            "access",
            checked("validation_access_condition", Fallback::Raise).with_ancestor_prefix(),
        ),
        (
            "genres",
            checked("validation_genres", Fallback::Raise).with_ancestor_prefix(),
        ),
        (
            "publication_date",
            checked("validation_date", Fallback::Raise)
                .with_transform(CallbackRef::built_in("content_date"))
                .with_ancestor_prefix()
                .with_required(true),
        ),
        ("title", NodeRule::new().with_ancestor_prefix()),
        ("geo_location", NodeRule::new().with_ancestor_prefix()),
        ("keywords", NodeRule::new().with_ancestor_prefix()),
        ("stock_tickers", NodeRule::new().with_ancestor_prefix()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NamePrefix;

    #[test]
    fn test_news_rule_shape() {
        let rule = news_rule();
        let children = rule.children.as_ref().unwrap();
        let publication = children.get("publication").unwrap();
        let publication_children = publication.children.as_ref().unwrap();

        assert_eq!(rule.name_prefix, NamePrefix::Literal("news".into()));
        assert_eq!(publication.name_prefix, NamePrefix::Ancestors);
        assert!(publication_children.get("name").is_some_and(|r| r.required));
        assert!(publication_children.get("language").is_some_and(|r| r.required));
        assert!(children.get("publication_date").is_some_and(|r| r.required));
        assert!(children.get("access").is_some_and(|r| !r.required));
    }
}
