//! Schema model: node rules, their registry and the callback dispatch table.
//!
//! - [`rule`]: `NodeRule`, `Fallback` and `NamePrefix`
//! - [`registry`]: path-keyed `SchemaRegistry`
//! - [`callback`]: `CallbackRef` and the `CallbackResolver` dispatch table

pub mod callback;
pub mod registry;
pub mod rule;

pub use callback::{
    CallbackKind, CallbackRef, CallbackResolver, CallbackTarget, PrefixPolicy, TransformFn,
    ValidatorFn,
};
pub use registry::{RuleSet, SchemaRegistry};
pub use rule::{Fallback, NamePrefix, NodeRule};
