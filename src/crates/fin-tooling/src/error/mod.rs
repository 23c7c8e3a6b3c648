//! Error-context chaining.
//!
//! Every crate in the workspace defines its own `thiserror` enum; this
//! module only supplies the `.context(...)` combinator used when an error
//! crosses from one of those enums into a boundary log record.

mod context;

pub use context::{ContextError, ErrorContext};
