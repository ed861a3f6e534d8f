//! Declarative node rules.

use super::callback::CallbackRef;
use super::registry::RuleSet;
use crate::types::Value;

/// What happens when a value fails validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Fallback {
    /// Substitute this value and continue.
    Literal(Value),
    /// Reject the entry with a validation error.
    Raise,
}

/// How the rendered tag name of a node is derived from its name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NamePrefix {
    /// Bare node name.
    #[default]
    None,
    /// Colon-joined names of all ancestors, ending with the node itself.
    Ancestors,
    /// `"<prefix>:<name>"`.
    Literal(String),
}

impl NamePrefix {
    /// Compute the tag name for `name`.
    ///
    /// `ancestors` is the live path of raw node names from the entry root
    /// down to and including `name`.
    ///
    /// # Examples
    /// ```
    /// use regelrecht_sitemap::schema::NamePrefix;
    ///
    /// let path = vec!["video".to_string(), "title".to_string()];
    /// assert_eq!(NamePrefix::Ancestors.tag_name("title", &path), "video:title");
    /// assert_eq!(NamePrefix::Literal("image".into()).tag_name("loc", &path), "image:loc");
    /// assert_eq!(NamePrefix::None.tag_name("loc", &path), "loc");
    /// ```
    #[must_use]
    pub fn tag_name(&self, name: &str, ancestors: &[String]) -> String {
        match self {
            Self::None => name.to_string(),
            Self::Ancestors => ancestors.join(":"),
            Self::Literal(prefix) => format!("{prefix}:{name}"),
        }
    }
}

/// Schema declaration for one node name.
///
/// Built with the `with_*` methods and handed to
/// [`SchemaRegistry::register`](super::SchemaRegistry::register), which
/// checks the whole subtree before accepting it.
#[derive(Debug, Clone, Default)]
pub struct NodeRule {
    /// Rules for nested fields. `None` makes this a leaf.
    pub children: Option<RuleSet>,

    /// Validation callback; requires `fallback`.
    pub validate: Option<CallbackRef>,

    /// Content callback applied after validation.
    pub transform: Option<CallbackRef>,

    /// Behavior when `validate` rejects a value.
    pub fallback: Option<Fallback>,

    /// Whether an entry must supply a non-empty value at this level.
    pub required: bool,

    /// Tag name derivation.
    pub name_prefix: NamePrefix,
}

impl NodeRule {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the validation callback and its fallback together.
    #[must_use]
    pub fn with_validation(mut self, callback: CallbackRef, fallback: Fallback) -> Self {
        self.validate = Some(callback);
        self.fallback = Some(fallback);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, callback: CallbackRef) -> Self {
        self.transform = Some(callback);
        self
    }

    #[must_use]
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    #[must_use]
    pub fn with_name_prefix(mut self, prefix: NamePrefix) -> Self {
        self.name_prefix = prefix;
        self
    }

    /// Shorthand for `NamePrefix::Literal`.
    #[must_use]
    pub fn with_prefix(self, prefix: impl Into<String>) -> Self {
        self.with_name_prefix(NamePrefix::Literal(prefix.into()))
    }

    /// Shorthand for `NamePrefix::Ancestors`.
    #[must_use]
    pub fn with_ancestor_prefix(self) -> Self {
        self.with_name_prefix(NamePrefix::Ancestors)
    }

    /// Add or replace a child rule.
    #[must_use]
    pub fn with_child(mut self, name: impl Into<String>, rule: NodeRule) -> Self {
        self.children
            .get_or_insert_with(RuleSet::new)
            .insert(name, rule);
        self
    }

    /// Add several child rules in order.
    #[must_use]
    pub fn with_children(
        mut self,
        children: impl IntoIterator<Item = (impl Into<String>, NodeRule)>,
    ) -> Self {
        let set = self.children.get_or_insert_with(RuleSet::new);
        for (name, rule) in children {
            set.insert(name, rule);
        }
        self
    }

    /// Whether nested values are processed for this node.
    #[must_use]
    pub fn has_children(&self) -> bool {
        self.children.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_three_levels() {
        let path: Vec<String> = ["a", "b", "c"].iter().map(ToString::to_string).collect();
        assert_eq!(NamePrefix::Ancestors.tag_name("c", &path), "a:b:c");
    }

    #[test]
    fn test_with_validation_sets_fallback() {
        let rule = NodeRule::new().with_validation(
            CallbackRef::built_in("validation_priority"),
            Fallback::Literal(Value::Float(0.5)),
        );
        assert!(rule.validate.is_some());
        assert_eq!(rule.fallback, Some(Fallback::Literal(Value::Float(0.5))));
    }

    #[test]
    fn test_with_children_keeps_order() {
        let rule = NodeRule::new()
            .with_child("loc", NodeRule::new().with_required(true))
            .with_children([("caption", NodeRule::new()), ("title", NodeRule::new())]);

        let names: Vec<_> = rule
            .children
            .as_ref()
            .map(|c| c.names().map(ToString::to_string).collect())
            .unwrap_or_default();
        assert_eq!(names, vec!["loc", "caption", "title"]);
    }
}
