//! Environment variable loading helpers.

use crate::{Result, ToolingError};
use std::env;
use std::str::FromStr;

/// Load a raw string environment variable.
pub fn get_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ToolingError::Config(format!(
            "environment variable {key} contains invalid UTF-8"
        ))),
    }
}

/// Load and parse an environment variable into `T`.
pub fn get_env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env(key)? {
        Some(val) => val
            .parse::<T>()
            .map(Some)
            .map_err(|e| ToolingError::Config(format!("failed to parse {key}: {e}"))),
        None => Ok(None),
    }
}

/// Load an environment variable with a string fallback.
pub fn get_env_or(key: &str, default: &str) -> Result<String> {
    Ok(get_env(key)?.unwrap_or_else(|| default.to_string()))
}

/// Load and parse an environment variable with a typed fallback.
pub fn get_env_parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(get_env_parse(key)?.unwrap_or(default))
}

/// Load a boolean environment variable (`"true"`/`"1"` are truthy,
/// `"false"`/`"0"` are falsy; anything else is an error).
pub fn get_env_bool(key: &str) -> Result<Option<bool>> {
    match get_env(key)? {
        Some(val) => match val.to_lowercase().as_str() {
            "true" | "1" => Ok(Some(true)),
            "false" | "0" => Ok(Some(false)),
            other => Err(ToolingError::Config(format!(
                "invalid boolean for {key}: {other:?}"
            ))),
        },
        None => Ok(None),
    }
}
