//! `TypedValue` -- a type-erased, schema-validated record.
//!
//! Internal per-agent pipelines hold their own concrete Rust structs
//! freely; the moment a value is handed to the registry (on its way into
//! workflow state, an artifact, or an interrupt payload) it is wrapped
//! here exactly once. Consumers that know the concrete kind downcast
//! with [`TypedValue::downcast_ref`]; everyone else treats it as opaque
//! and routes it straight back through [`crate::registry::ContractRegistry::serialize`].

use std::any::Any;
use std::sync::Arc;

#[derive(Clone)]
pub struct TypedValue {
    kind: String,
    version: String,
    inner: Arc<dyn Any + Send + Sync>,
}

impl TypedValue {
    pub fn new<T: Send + Sync + 'static>(kind: impl Into<String>, version: impl Into<String>, value: T) -> Self {
        Self {
            kind: kind.into(),
            version: version.into(),
            inner: Arc::new(value),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.inner.downcast_ref::<T>()
    }
}

impl std::fmt::Debug for TypedValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedValue")
            .field("kind", &self.kind)
            .field("version", &self.version)
            .finish()
    }
}
