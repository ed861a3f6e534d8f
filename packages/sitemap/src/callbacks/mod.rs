//! Built-in validation and content callbacks.
//!
//! Every function here takes the value first and the bound arguments of its
//! `CallbackRef` second. [`register_builtins`] loads them into a
//! [`CallbackResolver`] under their `validation_*` / `content_*` names.

pub mod content;
pub mod date;
pub mod validation;

use crate::error::{Result, SitemapError};
use crate::schema::CallbackResolver;
use crate::types::Value;

/// Register every built-in callback.
pub fn register_builtins(resolver: &mut CallbackResolver) -> Result<()> {
    // Validators
    resolver.register_builtin_validator("validation_url", validation::url)?;
    resolver.register_builtin_validator("validation_date", validation::date)?;
    resolver.register_builtin_validator(
        "validation_change_frequency",
        validation::change_frequency,
    )?;
    resolver.register_builtin_validator("validation_priority", validation::priority)?;
    resolver.register_builtin_validator("validation_max_length", validation::max_length)?;
    resolver.register_builtin_validator("validation_between", validation::between)?;
    resolver.register_builtin_validator("validation_boolean", validation::boolean)?;
    resolver.register_builtin_validator("validation_iso3166", validation::iso3166)?;
    resolver.register_builtin_validator("validation_platform", validation::platform)?;
    resolver.register_builtin_validator(
        "validation_video_thumbnail",
        validation::video_thumbnail,
    )?;
    resolver.register_builtin_validator(
        "validation_publication_name",
        validation::publication_name,
    )?;
    resolver.register_builtin_validator("validation_iso639", validation::iso639)?;
    resolver.register_builtin_validator(
        "validation_access_condition",
        validation::access_condition,
    )?;
    resolver.register_builtin_validator("validation_genres", validation::genres)?;

    // Content transforms
    resolver.register_builtin_transform("content_url", content::url)?;
    resolver.register_builtin_transform("content_date", content::date)?;
    resolver.register_builtin_transform("content_boolean", content::boolean)?;
    resolver.register_builtin_transform("content_strip_tags", content::strip_tags)?;

    Ok(())
}

/// Numeric bound argument at `index`.
pub(crate) fn arg_f64(callback: &str, args: &[Value], index: usize) -> Result<f64> {
    args.get(index)
        .and_then(Value::as_f64)
        .ok_or_else(|| SitemapError::InvalidCallbackArguments {
            name: callback.to_string(),
            reason: format!("argument {index} must be a number"),
        })
}

/// Boolean bound argument at `index`, or `default` when not bound.
pub(crate) fn arg_bool(callback: &str, args: &[Value], index: usize, default: bool) -> Result<bool> {
    match args.get(index) {
        None => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(SitemapError::InvalidCallbackArguments {
            name: callback.to_string(),
            reason: format!("argument {index} must be a boolean"),
        }),
    }
}
