//! Registry of node rules keyed by name path.

use super::rule::{NamePrefix, NodeRule};
use crate::config::{validate_namespace_prefix, validate_node_name};
use crate::error::{Result, SitemapError};

/// Ordered mapping from node name to rule, one nesting level.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<(String, NodeRule)>,
}

impl RuleSet {
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Insert or replace a rule, keeping the position of an existing one.
    pub(crate) fn insert(&mut self, name: impl Into<String>, rule: NodeRule) {
        let name = name.into();
        match self.rules.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = rule,
            None => self.rules.push((name, rule)),
        }
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<NodeRule> {
        let position = self.rules.iter().position(|(n, _)| n == name)?;
        Some(self.rules.remove(position).1)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut NodeRule> {
        self.rules
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, r)| r)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&NodeRule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeRule)> {
        self.rules.iter().map(|(n, r)| (n.as_str(), r))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Registry of the node rules a document accepts.
///
/// Rules form a tree: path `["image", "loc"]` names the `loc` child of the
/// top-level `image` rule. Every rule is checked when it is registered.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::schema::{CallbackRef, NodeRule, SchemaRegistry};
///
/// let mut registry = SchemaRegistry::new();
/// registry
///     .register(["loc"], NodeRule::new().with_required(true))
///     .unwrap();
///
/// // A validation callback without a fallback is rejected up front.
/// let mut rule = NodeRule::new();
/// rule.validate = Some(CallbackRef::built_in("validation_url"));
/// assert!(registry.register(["image"], rule).is_err());
///
/// assert!(registry.has_rule(["loc"]));
/// assert!(!registry.has_rule(["image"]));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    root: RuleSet,
}

impl SchemaRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RuleSet::new(),
        }
    }

    /// Top-level rules.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.root
    }

    /// Insert or replace the rule at `path`.
    ///
    /// Sibling rules at the same level are kept. Missing intermediate
    /// levels are created as rules with an empty children map.
    ///
    /// # Errors
    /// Returns `Configuration` for an empty path, an invalid name, a literal
    /// prefix that is not a valid prefix, or a validation callback without a
    /// fallback anywhere in the rule's subtree.
    pub fn register(
        &mut self,
        path: impl IntoIterator<Item = impl Into<String>>,
        rule: NodeRule,
    ) -> Result<()> {
        let path: Vec<String> = path.into_iter().map(Into::into).collect();
        let Some((name, parents)) = path.split_last() else {
            return Err(SitemapError::Configuration(
                "cannot register a rule at an empty path".to_string(),
            ));
        };
        for segment in &path {
            validate_node_name(segment)?;
        }
        check_rule(&path.join("."), &rule)?;

        let mut level = &mut self.root;
        for parent in parents {
            if !level.contains(parent) {
                level.insert(parent.clone(), NodeRule::new());
            }
            let Some(parent_rule) = level.get_mut(parent) else {
                return Err(SitemapError::Configuration(format!(
                    "cannot resolve parent '{parent}'"
                )));
            };
            level = parent_rule.children.get_or_insert_with(RuleSet::new);
        }
        level.insert(name.clone(), rule);
        Ok(())
    }

    /// Register several top-level rules, replacing rules with the same name.
    pub fn merge(
        &mut self,
        rules: impl IntoIterator<Item = (impl Into<String>, NodeRule)>,
    ) -> Result<()> {
        for (name, rule) in rules {
            let name: String = name.into();
            self.register([name], rule)?;
        }
        Ok(())
    }

    /// Look up the rule at `path`. Fails as soon as a segment is missing.
    #[must_use]
    pub fn lookup<S: AsRef<str>>(&self, path: impl IntoIterator<Item = S>) -> Option<&NodeRule> {
        let mut level = &self.root;
        let mut found = None;
        for segment in path {
            let rule = level.get(segment.as_ref())?;
            found = Some(rule);
            level = match &rule.children {
                Some(children) => children,
                None => &EMPTY_RULES,
            };
        }
        found
    }

    #[must_use]
    pub fn has_rule<S: AsRef<str>>(&self, path: impl IntoIterator<Item = S>) -> bool {
        self.lookup(path).is_some()
    }

    /// Remove the rule at `path`, returning it.
    pub fn remove<S: AsRef<str>>(&mut self, path: impl IntoIterator<Item = S>) -> Option<NodeRule> {
        let path: Vec<S> = path.into_iter().collect();
        let (name, parents) = path.split_last()?;
        let mut level = &mut self.root;
        for parent in parents {
            level = level.get_mut(parent.as_ref())?.children.as_mut()?;
        }
        level.remove(name.as_ref())
    }

    /// Change whether the rule at `path` is required.
    ///
    /// # Errors
    /// Returns `InvalidParameter` if no rule exists at `path`.
    pub fn set_required<S: AsRef<str>>(
        &mut self,
        path: impl IntoIterator<Item = S>,
        required: bool,
    ) -> Result<()> {
        let path: Vec<S> = path.into_iter().collect();
        let display = path.iter().map(|s| s.as_ref()).collect::<Vec<&str>>().join(".");
        let missing = || SitemapError::InvalidParameter(format!("no rule registered at '{display}'"));

        let (name, parents) = path.split_last().ok_or_else(missing)?;
        let mut level = &mut self.root;
        for parent in parents {
            level = level
                .get_mut(parent.as_ref())
                .and_then(|rule| rule.children.as_mut())
                .ok_or_else(missing)?;
        }
        let rule = level.get_mut(name.as_ref()).ok_or_else(missing)?;
        rule.required = required;
        Ok(())
    }
}

static EMPTY_RULES: RuleSet = RuleSet { rules: Vec::new() };

fn check_rule(path: &str, rule: &NodeRule) -> Result<()> {
    if rule.validate.is_some() && rule.fallback.is_none() {
        return Err(SitemapError::Configuration(format!(
            "rule '{path}' has a validation callback but no fallback"
        )));
    }
    if let NamePrefix::Literal(prefix) = &rule.name_prefix {
        if prefix.is_empty() || validate_namespace_prefix(prefix).is_err() {
            return Err(SitemapError::Configuration(format!(
                "rule '{path}' has invalid name prefix '{prefix}'"
            )));
        }
    }
    if let Some(children) = &rule.children {
        for (name, child) in children.iter() {
            validate_node_name(name)?;
            check_rule(&format!("{path}.{name}"), child)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CallbackRef, Fallback};
    use crate::types::Value;

    fn priority_rule() -> NodeRule {
        NodeRule::new().with_validation(
            CallbackRef::built_in("validation_priority"),
            Fallback::Literal(Value::Float(0.5)),
        )
    }

    #[test]
    fn test_register_and_lookup_nested() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                ["image"],
                NodeRule::new()
                    .with_prefix("image")
                    .with_child("loc", NodeRule::new().with_required(true)),
            )
            .unwrap();

        assert!(registry.has_rule(["image"]));
        assert!(registry.lookup(["image", "loc"]).is_some_and(|r| r.required));
        assert!(registry.lookup(["loc"]).is_none());
        assert!(registry.lookup(["image", "loc", "deeper"]).is_none());
    }

    #[test]
    fn test_register_nested_keeps_siblings() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                ["image"],
                NodeRule::new()
                    .with_child("loc", NodeRule::new())
                    .with_child("caption", NodeRule::new()),
            )
            .unwrap();
        registry
            .register(["image", "loc"], NodeRule::new().with_required(true))
            .unwrap();

        assert!(registry.has_rule(["image", "caption"]));
        assert!(registry.lookup(["image", "loc"]).is_some_and(|r| r.required));
    }

    #[test]
    fn test_register_creates_missing_parents() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(["a", "b", "c"], NodeRule::new().with_ancestor_prefix())
            .unwrap();

        assert!(registry.has_rule(["a"]));
        assert!(registry.has_rule(["a", "b"]));
        assert!(registry.has_rule(["a", "b", "c"]));
    }

    #[test]
    fn test_validate_without_fallback_fails_fast() {
        let mut rule = NodeRule::new();
        rule.validate = Some(CallbackRef::built_in("validation_url"));

        let nested = NodeRule::new().with_child("loc", rule.clone());

        let mut registry = SchemaRegistry::new();
        assert!(matches!(
            registry.register(["loc"], rule),
            Err(SitemapError::Configuration(_))
        ));
        assert!(matches!(
            registry.register(["image"], nested),
            Err(SitemapError::Configuration(_))
        ));
        assert!(registry.rules().is_empty());
    }

    #[test]
    fn test_register_rejects_bad_paths() {
        let mut registry = SchemaRegistry::new();
        assert!(registry.register(Vec::<String>::new(), NodeRule::new()).is_err());
        assert!(registry.register(["image:loc"], NodeRule::new()).is_err());
        assert!(registry
            .register(["video"], NodeRule::new().with_prefix("bad prefix"))
            .is_err());
    }

    #[test]
    fn test_merge_replaces_by_name() {
        let mut registry = SchemaRegistry::new();
        registry
            .merge([("loc", NodeRule::new()), ("priority", priority_rule())])
            .unwrap();
        registry
            .merge([("loc", NodeRule::new().with_required(true))])
            .unwrap();

        let names: Vec<_> = registry.rules().names().collect();
        assert_eq!(names, vec!["loc", "priority"]);
        assert!(registry.lookup(["loc"]).is_some_and(|r| r.required));
    }

    #[test]
    fn test_remove_and_set_required() {
        let mut registry = SchemaRegistry::new();
        registry
            .register(
                ["video"],
                NodeRule::new().with_child("player_loc", NodeRule::new().with_required(true)),
            )
            .unwrap();
        registry.register(["priority"], priority_rule()).unwrap();

        registry.set_required(["video", "player_loc"], false).unwrap();
        assert!(registry
            .lookup(["video", "player_loc"])
            .is_some_and(|r| !r.required));
        assert!(registry.set_required(["video", "missing"], true).is_err());

        assert!(registry.remove(["priority"]).is_some());
        assert!(!registry.has_rule(["priority"]));
        assert!(registry.remove(["priority"]).is_none());
    }
}
