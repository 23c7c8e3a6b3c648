//! Typed Contract Registry -- the single source of truth mapping
//! `(kind, version)` to a schema, a parser and a serializer. Every
//! artifact read/write and every cross-agent payload consumption in the
//! workspace routes through a [`ContractRegistry`] instance.

pub mod error;
pub mod registry;
pub mod schema;
pub mod value;

pub use error::{ContractError, Result};
pub use registry::ContractRegistry;
pub use schema::{validate, RecordField, Schema};
pub use value::TypedValue;
