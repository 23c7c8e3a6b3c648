//! Ambient utilities shared by every crate in the research runtime.
//!
//! This crate carries the stack that has nothing to do with graph
//! execution, contracts, or events but that every boundary needs anyway:
//! typed configuration loading with an environment-variable overlay,
//! error-context chaining, canonical JSON hashing (used by the artifact
//! store to compute content-addressed ids), and the structured logging
//! helpers the boundary logger builds on.

pub mod config;
pub mod error;
pub mod hash;
pub mod incident;
pub mod logging;

pub use incident::{BoundaryEventPayload, Incident, ReplayContext};

use thiserror::Error;

/// Errors raised by the ambient tooling itself (config parsing, env
/// loading). Domain crates define their own error enums and only reach
/// into this one when wrapping a config failure.
#[derive(Debug, Error)]
pub enum ToolingError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ToolingError>;
