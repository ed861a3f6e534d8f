//! Validation and transformation of raw entries into render trees.

use crate::error::{Result, SitemapError};
use crate::schema::{CallbackResolver, Fallback, NodeRule, RuleSet};
use crate::types::{Key, Record, RenderNode, RenderTree, Value};

/// Global switches for entry processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Run validation callbacks.
    pub use_validation: bool,
    /// Run content callbacks.
    pub use_transform: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            use_validation: true,
            use_transform: true,
        }
    }
}

/// Walks a raw entry against a rule subtree.
///
/// The active rule subtree and the ancestor path are passed down explicitly,
/// so processing never mutates the schema.
pub struct EntryProcessor<'a> {
    callbacks: &'a CallbackResolver,
    options: ProcessOptions,
}

impl<'a> EntryProcessor<'a> {
    #[must_use]
    pub fn new(callbacks: &'a CallbackResolver, options: ProcessOptions) -> Self {
        Self { callbacks, options }
    }

    /// Process one entry.
    ///
    /// # Arguments
    /// * `raw` - The caller-supplied entry
    /// * `rules` - Top-level rules of the document schema
    ///
    /// # Errors
    /// * `MissingRequiredNode` if a required node is absent or empty
    /// * `Validation` if a value fails a rule whose fallback raises
    /// * `InvalidParameter` if a repeated-group member is not a record, or
    ///   a leaf node is given a nested value
    /// * callback errors from resolving or invoking callbacks
    pub fn process(&self, raw: &Record, rules: &RuleSet) -> Result<RenderTree> {
        let mut ancestors = Vec::new();
        self.process_level(raw, rules, &mut ancestors)
    }

    fn process_level(
        &self,
        raw: &Record,
        rules: &RuleSet,
        ancestors: &mut Vec<String>,
    ) -> Result<RenderTree> {
        for (name, rule) in rules.iter() {
            if rule.required && raw.get(name).map_or(true, Value::is_empty) {
                return Err(SitemapError::MissingRequiredNode {
                    node: node_path(ancestors, name),
                });
            }
        }

        let mut tree = RenderTree::new();
        // Integer keys are repeated-group members, handled by the caller.
        for (name, value) in raw.iter().filter_map(|(k, v)| k.as_name().map(|n| (n, v))) {
            let Some(rule) = rules.get(name) else {
                tracing::debug!(node = %node_path(ancestors, name), "Dropping unknown node");
                continue;
            };

            ancestors.push(name.to_string());
            let tag = rule.name_prefix.tag_name(name, ancestors);
            let node = self.process_field(value, rule, ancestors);
            ancestors.pop();

            tree.insert(tag, node?);
        }
        Ok(tree)
    }

    /// Process a single field. `ancestors` ends with the field's own name.
    fn process_field(
        &self,
        value: &Value,
        rule: &NodeRule,
        ancestors: &mut Vec<String>,
    ) -> Result<RenderNode> {
        let Value::Record(record) = value else {
            return self.process_scalar(value, rule, ancestors);
        };

        let Some(children) = &rule.children else {
            return Err(SitemapError::InvalidParameter(format!(
                "node \"{}\" does not accept nested values",
                ancestors.join(".")
            )));
        };

        let mut repeated = Vec::new();
        let mut has_named = false;
        for (key, item) in record.iter() {
            match (key, item) {
                (Key::Index(_), Value::Record(member)) => {
                    repeated.push(self.process_level(member, children, ancestors)?);
                }
                (Key::Index(index), _) => {
                    return Err(SitemapError::InvalidParameter(format!(
                        "member {index} of node \"{}\" must be a record",
                        ancestors.join(".")
                    )));
                }
                (Key::Name(_), _) => has_named = true,
            }
        }

        let children = if has_named {
            self.process_level(record, children, ancestors)?
        } else {
            RenderTree::new()
        };

        Ok(RenderNode::Nested { children, repeated })
    }

    fn process_scalar(&self, value: &Value, rule: &NodeRule, ancestors: &[String]) -> Result<RenderNode> {
        let mut value = value.clone();

        if self.options.use_validation {
            if let Some(validate) = &rule.validate {
                if !self.callbacks.validate(validate, &value)? {
                    match &rule.fallback {
                        Some(Fallback::Literal(fallback)) => {
                            tracing::debug!(
                                node = %ancestors.join("."),
                                "Invalid value replaced by fallback"
                            );
                            value = fallback.clone();
                        }
                        Some(Fallback::Raise) | None => {
                            return Err(SitemapError::Validation {
                                node: ancestors.join("."),
                            });
                        }
                    }
                }
            }
        }

        if self.options.use_transform {
            if let Some(transform) = &rule.transform {
                value = self.callbacks.transform(transform, &value)?;
            }
        }

        value.to_text().map(RenderNode::Text).ok_or_else(|| {
            SitemapError::InvalidParameter(format!(
                "node \"{}\" must hold a scalar value",
                ancestors.join(".")
            ))
        })
    }
}

fn node_path(ancestors: &[String], name: &str) -> String {
    if ancestors.is_empty() {
        name.to_string()
    } else {
        format!("{}.{name}", ancestors.join("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CallbackRef, PrefixPolicy, SchemaRegistry};
    use pretty_assertions::assert_eq;

    fn resolver() -> CallbackResolver {
        CallbackResolver::with_builtins(PrefixPolicy::Internal).unwrap()
    }

    fn schema() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        registry
            .merge([
                (
                    "loc",
                    NodeRule::new()
                        .with_required(true)
                        .with_validation(CallbackRef::built_in("validation_url"), Fallback::Raise)
                        .with_transform(CallbackRef::built_in("content_url")),
                ),
                (
                    "priority",
                    NodeRule::new().with_validation(
                        CallbackRef::built_in("validation_priority"),
                        Fallback::Literal(Value::Float(0.5)),
                    ),
                ),
                (
                    "image",
                    NodeRule::new().with_prefix("image").with_children([
                        (
                            "loc",
                            NodeRule::new().with_prefix("image").with_required(true),
                        ),
                        ("caption", NodeRule::new().with_ancestor_prefix()),
                    ]),
                ),
            ])
            .unwrap();
        registry
    }

    fn text(tree: &RenderTree, tag: &str) -> Option<String> {
        tree.get(tag).and_then(RenderNode::as_text).map(ToString::to_string)
    }

    #[test]
    fn test_process_scalars() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let entry = Record::new()
            .with("loc", "http://example.com/a")
            .with("priority", 0.8)
            .with("unknown", "dropped");

        let tree = processor.process(&entry, schema().rules()).unwrap();

        assert_eq!(tree.len(), 2);
        assert_eq!(text(&tree, "loc").as_deref(), Some("http://example.com/a"));
        assert_eq!(text(&tree, "priority").as_deref(), Some("0.8"));
    }

    #[test]
    fn test_literal_fallback() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let entry = Record::new()
            .with("loc", "http://example.com/a")
            .with("priority", 1.5);

        let tree = processor.process(&entry, schema().rules()).unwrap();
        assert_eq!(text(&tree, "priority").as_deref(), Some("0.5"));
    }

    #[test]
    fn test_raise_fallback() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let entry = Record::new().with("loc", "not a url");

        let err = processor.process(&entry, schema().rules()).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for node \"loc\"");
    }

    #[test]
    fn test_validation_disabled_keeps_value() {
        let callbacks = resolver();
        let options = ProcessOptions {
            use_validation: false,
            use_transform: true,
        };
        let processor = EntryProcessor::new(&callbacks, options);
        let entry = Record::new().with("loc", "not a url").with("priority", 1.5);

        let tree = processor.process(&entry, schema().rules()).unwrap();
        assert_eq!(text(&tree, "loc").as_deref(), Some("not a url"));
        assert_eq!(text(&tree, "priority").as_deref(), Some("1.5"));
    }

    #[test]
    fn test_missing_required() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());

        let err = processor
            .process(&Record::new().with("priority", 0.1), schema().rules())
            .unwrap_err();
        assert!(matches!(err, SitemapError::MissingRequiredNode { ref node } if node == "loc"));

        let err = processor
            .process(&Record::new().with("loc", ""), schema().rules())
            .unwrap_err();
        assert!(matches!(err, SitemapError::MissingRequiredNode { .. }));
    }

    #[test]
    fn test_repeated_group_and_prefixes() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let images = Record::new()
            .with_item(Record::new().with("loc", "http://example.com/1.jpg"))
            .with_item(
                Record::new()
                    .with("loc", "http://example.com/2.jpg")
                    .with("caption", "Two"),
            );
        let entry = Record::new()
            .with("loc", "http://example.com/a")
            .with("image", images);

        let tree = processor.process(&entry, schema().rules()).unwrap();

        let Some(RenderNode::Nested { children, repeated }) = tree.get("image:image") else {
            panic!("expected nested image node");
        };
        assert!(children.is_empty());
        assert_eq!(repeated.len(), 2);
        assert_eq!(
            text(&repeated[0], "image:loc").as_deref(),
            Some("http://example.com/1.jpg")
        );
        assert_eq!(text(&repeated[1], "image:caption").as_deref(), Some("Two"));
    }

    #[test]
    fn test_required_checked_inside_members() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let entry = Record::new()
            .with("loc", "http://example.com/a")
            .with(
                "image",
                Record::new().with_item(Record::new().with("caption", "no loc")),
            );

        let err = processor.process(&entry, schema().rules()).unwrap_err();
        assert!(matches!(err, SitemapError::MissingRequiredNode { ref node } if node == "image.loc"));
    }

    #[test]
    fn test_scalar_member_is_rejected() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let entry = Record::new()
            .with("loc", "http://example.com/a")
            .with("image", Record::new().with_item("http://example.com/1.jpg"));

        let err = processor.process(&entry, schema().rules()).unwrap_err();
        assert!(matches!(err, SitemapError::InvalidParameter(_)));
    }

    #[test]
    fn test_nested_value_for_leaf_is_rejected() {
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let entry = Record::new().with("loc", Record::new().with("x", "y"));

        let err = processor.process(&entry, schema().rules()).unwrap_err();
        assert!(matches!(err, SitemapError::InvalidParameter(ref m) if m.contains("\"loc\"")));
    }

    #[test]
    fn test_ancestor_prefix_three_levels() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(["a", "b", "c"], NodeRule::new().with_ancestor_prefix())
            .unwrap();
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());
        let entry = Record::new().with(
            "a",
            Record::new().with("b", Record::new().with("c", "deep")),
        );

        let tree = processor.process(&entry, registry.rules()).unwrap();

        let Some(RenderNode::Nested { children: b, .. }) = tree.get("a") else {
            panic!("expected a");
        };
        let Some(RenderNode::Nested { children: c, .. }) = b.get("b") else {
            panic!("expected b");
        };
        assert_eq!(text(c, "a:b:c").as_deref(), Some("deep"));
    }

    #[test]
    fn test_unresolved_callback_is_reported() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                ["loc"],
                NodeRule::new().with_transform(CallbackRef::external("content_missing")),
            )
            .unwrap();
        let callbacks = resolver();
        let processor = EntryProcessor::new(&callbacks, ProcessOptions::default());

        let err = processor
            .process(&Record::new().with("loc", "x"), registry.rules())
            .unwrap_err();
        assert!(matches!(err, SitemapError::UnresolvedCallback { .. }));
    }
}
