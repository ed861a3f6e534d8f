//! Callback references and the dispatch table that resolves them.
//!
//! Rules refer to callbacks by [`CallbackRef`]: a built-in or external
//! target plus bound extra arguments. A [`CallbackResolver`] owns the
//! functions behind those names. Name-prefix rules are checked when a
//! function is registered, so resolution is a plain table lookup.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::{CONTENT_PREFIX, VALIDATION_PREFIX};
use crate::error::{Result, SitemapError};
use crate::types::Value;

/// Validation function: value under test, then bound arguments.
pub type ValidatorFn = Arc<dyn Fn(&Value, &[Value]) -> Result<bool> + Send + Sync>;

/// Content transform: value to transform, then bound arguments.
pub type TransformFn = Arc<dyn Fn(&Value, &[Value]) -> Result<Value> + Send + Sync>;

/// Signature of the built-in validators.
pub type BuiltInValidator = fn(&Value, &[Value]) -> Result<bool>;

/// Signature of the built-in transforms.
pub type BuiltInTransform = fn(&Value, &[Value]) -> Result<Value>;

/// The two roles a callback can play in a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackKind {
    Validation,
    Content,
}

impl CallbackKind {
    /// Name prefix callbacks of this kind carry.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Validation => VALIDATION_PREFIX,
            Self::Content => CONTENT_PREFIX,
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation => write!(f, "validation"),
            Self::Content => write!(f, "content"),
        }
    }
}

/// Which callback origins must carry the kind prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrefixPolicy {
    #[default]
    Internal,
    External,
    Both,
}

impl PrefixPolicy {
    fn covers_internal(self) -> bool {
        matches!(self, Self::Internal | Self::Both)
    }

    fn covers_external(self) -> bool {
        matches!(self, Self::External | Self::Both)
    }
}

/// Where a callback reference points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackTarget {
    BuiltIn(String),
    External(String),
}

impl CallbackTarget {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::BuiltIn(name) | Self::External(name) => name,
        }
    }
}

/// A callback target plus bound extra arguments.
///
/// # Examples
/// ```
/// use regelrecht_sitemap::schema::{CallbackRef, CallbackTarget};
///
/// let callback = CallbackRef::built_in("validation_max_length").with_arg(50);
/// assert_eq!(callback.target(), &CallbackTarget::BuiltIn("validation_max_length".into()));
/// assert_eq!(callback.args().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CallbackRef {
    target: CallbackTarget,
    args: Vec<Value>,
}

impl CallbackRef {
    /// Reference a built-in callback by name.
    #[must_use]
    pub fn built_in(name: impl Into<String>) -> Self {
        Self {
            target: CallbackTarget::BuiltIn(name.into()),
            args: Vec::new(),
        }
    }

    /// Reference a caller-registered callback by name.
    #[must_use]
    pub fn external(name: impl Into<String>) -> Self {
        Self {
            target: CallbackTarget::External(name.into()),
            args: Vec::new(),
        }
    }

    /// Bind one more argument.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Bind several arguments in order.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn target(&self) -> &CallbackTarget {
        &self.target
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

/// Dispatch table for validation and content callbacks.
pub struct CallbackResolver {
    policy: PrefixPolicy,
    builtin_validators: HashMap<String, ValidatorFn>,
    builtin_transforms: HashMap<String, TransformFn>,
    external_validators: HashMap<String, ValidatorFn>,
    external_transforms: HashMap<String, TransformFn>,
}

impl CallbackResolver {
    /// Create an empty resolver.
    #[must_use]
    pub fn new(policy: PrefixPolicy) -> Self {
        Self {
            policy,
            builtin_validators: HashMap::new(),
            builtin_transforms: HashMap::new(),
            external_validators: HashMap::new(),
            external_transforms: HashMap::new(),
        }
    }

    /// Create a resolver holding every built-in callback.
    pub fn with_builtins(policy: PrefixPolicy) -> Result<Self> {
        let mut resolver = Self::new(policy);
        crate::callbacks::register_builtins(&mut resolver)?;
        Ok(resolver)
    }

    #[must_use]
    pub fn policy(&self) -> PrefixPolicy {
        self.policy
    }

    /// Switch the prefix policy.
    ///
    /// Every registered name is checked against the new policy first; on
    /// failure the current policy is kept.
    pub fn set_policy(&mut self, policy: PrefixPolicy) -> Result<()> {
        if policy.covers_internal() {
            check_names(self.builtin_validators.keys(), CallbackKind::Validation)?;
            check_names(self.builtin_transforms.keys(), CallbackKind::Content)?;
        }
        if policy.covers_external() {
            check_names(self.external_validators.keys(), CallbackKind::Validation)?;
            check_names(self.external_transforms.keys(), CallbackKind::Content)?;
        }
        self.policy = policy;
        Ok(())
    }

    pub(crate) fn register_builtin_validator(
        &mut self,
        name: &str,
        function: BuiltInValidator,
    ) -> Result<()> {
        if self.policy.covers_internal() {
            check_prefix(name, CallbackKind::Validation)?;
        }
        self.builtin_validators
            .insert(name.to_string(), Arc::new(function));
        Ok(())
    }

    pub(crate) fn register_builtin_transform(
        &mut self,
        name: &str,
        function: BuiltInTransform,
    ) -> Result<()> {
        if self.policy.covers_internal() {
            check_prefix(name, CallbackKind::Content)?;
        }
        self.builtin_transforms
            .insert(name.to_string(), Arc::new(function));
        Ok(())
    }

    /// Register an external validation callback, replacing any previous one
    /// with the same name.
    ///
    /// # Errors
    /// * `CallbackShadowsBuiltIn` if a built-in validator has this name
    /// * `CallbackPrefix` if the policy requires the `validation_` prefix
    pub fn register_validator<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: Fn(&Value, &[Value]) -> bool + Send + Sync + 'static,
    {
        let name = name.into();
        self.check_external(&name, CallbackKind::Validation)?;
        self.external_validators
            .insert(name, Arc::new(move |value: &Value, args: &[Value]| Ok(function(value, args))));
        Ok(())
    }

    /// Register an external content callback, replacing any previous one
    /// with the same name.
    ///
    /// # Errors
    /// * `CallbackShadowsBuiltIn` if a built-in transform has this name
    /// * `CallbackPrefix` if the policy requires the `content_` prefix
    pub fn register_transform<F>(&mut self, name: impl Into<String>, function: F) -> Result<()>
    where
        F: Fn(&Value, &[Value]) -> Value + Send + Sync + 'static,
    {
        let name = name.into();
        self.check_external(&name, CallbackKind::Content)?;
        self.external_transforms
            .insert(name, Arc::new(move |value: &Value, args: &[Value]| Ok(function(value, args))));
        Ok(())
    }

    fn check_external(&self, name: &str, kind: CallbackKind) -> Result<()> {
        let shadows = match kind {
            CallbackKind::Validation => self.builtin_validators.contains_key(name),
            CallbackKind::Content => self.builtin_transforms.contains_key(name),
        };
        if shadows {
            return Err(SitemapError::CallbackShadowsBuiltIn {
                name: name.to_string(),
            });
        }
        if self.policy.covers_external() {
            check_prefix(name, kind)?;
        }
        Ok(())
    }

    /// Whether a reference resolves for the given kind.
    #[must_use]
    pub fn is_registered(&self, kind: CallbackKind, target: &CallbackTarget) -> bool {
        match (kind, target) {
            (CallbackKind::Validation, CallbackTarget::BuiltIn(n)) => {
                self.builtin_validators.contains_key(n)
            }
            (CallbackKind::Validation, CallbackTarget::External(n)) => {
                self.external_validators.contains_key(n)
            }
            (CallbackKind::Content, CallbackTarget::BuiltIn(n)) => {
                self.builtin_transforms.contains_key(n)
            }
            (CallbackKind::Content, CallbackTarget::External(n)) => {
                self.external_transforms.contains_key(n)
            }
        }
    }

    /// Look up the validator behind a reference.
    pub fn resolve_validator(&self, callback: &CallbackRef) -> Result<&ValidatorFn> {
        let found = match &callback.target {
            CallbackTarget::BuiltIn(name) => self.builtin_validators.get(name),
            CallbackTarget::External(name) => self.external_validators.get(name),
        };
        found.ok_or_else(|| unresolved(callback, CallbackKind::Validation))
    }

    /// Look up the transform behind a reference.
    pub fn resolve_transform(&self, callback: &CallbackRef) -> Result<&TransformFn> {
        let found = match &callback.target {
            CallbackTarget::BuiltIn(name) => self.builtin_transforms.get(name),
            CallbackTarget::External(name) => self.external_transforms.get(name),
        };
        found.ok_or_else(|| unresolved(callback, CallbackKind::Content))
    }

    /// Resolve and invoke a validator: the value first, then the bound arguments.
    pub fn validate(&self, callback: &CallbackRef, value: &Value) -> Result<bool> {
        let function = self.resolve_validator(callback)?;
        function(value, callback.args())
    }

    /// Resolve and invoke a transform: the value first, then the bound arguments.
    pub fn transform(&self, callback: &CallbackRef, value: &Value) -> Result<Value> {
        let function = self.resolve_transform(callback)?;
        function(value, callback.args())
    }

    /// Names of all registered callbacks of one kind, sorted.
    #[must_use]
    pub fn names(&self, kind: CallbackKind) -> Vec<&str> {
        let mut names: Vec<&str> = match kind {
            CallbackKind::Validation => self
                .builtin_validators
                .keys()
                .chain(self.external_validators.keys())
                .map(String::as_str)
                .collect(),
            CallbackKind::Content => self
                .builtin_transforms
                .keys()
                .chain(self.external_transforms.keys())
                .map(String::as_str)
                .collect(),
        };
        names.sort_unstable();
        names
    }
}

impl fmt::Debug for CallbackResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackResolver")
            .field("policy", &self.policy)
            .field("validators", &self.names(CallbackKind::Validation))
            .field("transforms", &self.names(CallbackKind::Content))
            .finish()
    }
}

fn check_prefix(name: &str, kind: CallbackKind) -> Result<()> {
    if name.starts_with(kind.prefix()) {
        Ok(())
    } else {
        Err(SitemapError::CallbackPrefix {
            name: name.to_string(),
            prefix: kind.prefix().to_string(),
        })
    }
}

fn check_names<'a>(names: impl Iterator<Item = &'a String>, kind: CallbackKind) -> Result<()> {
    for name in names {
        check_prefix(name, kind)?;
    }
    Ok(())
}

fn unresolved(callback: &CallbackRef, kind: CallbackKind) -> SitemapError {
    SitemapError::UnresolvedCallback {
        name: callback.target.name().to_string(),
        kind: kind.to_string(),
    }
}
