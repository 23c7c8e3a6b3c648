//! `ErrorContext` — attach a human-readable message to any error on its
//! way out of a function, without losing the original cause.

use std::error::Error as StdError;
use std::fmt;

#[derive(Debug)]
pub struct ContextError {
    message: String,
    source: Box<dyn StdError + Send + Sync>,
}

impl fmt::Display for ContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.source)
    }
}

impl StdError for ContextError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}

pub trait ErrorContext<T> {
    fn context(self, msg: impl Into<String>) -> Result<T, Box<dyn StdError + Send + Sync>>;

    fn with_context<F>(self, f: F) -> Result<T, Box<dyn StdError + Send + Sync>>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> Result<T, Box<dyn StdError + Send + Sync>> {
        self.map_err(|e| {
            Box::new(ContextError {
                message: msg.into(),
                source: Box::new(e),
            }) as Box<dyn StdError + Send + Sync>
        })
    }

    fn with_context<F>(self, f: F) -> Result<T, Box<dyn StdError + Send + Sync>>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            Box::new(ContextError {
                message: f(),
                source: Box::new(e),
            }) as Box<dyn StdError + Send + Sync>
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("boom")]
    struct Boom;

    #[test]
    fn context_preserves_the_source_chain() {
        let r: Result<(), Boom> = Err(Boom);
        let wrapped = r.context("loading thread").unwrap_err();
        assert_eq!(wrapped.to_string(), "loading thread: boom");
        assert!(wrapped.source().is_some());
    }
}
