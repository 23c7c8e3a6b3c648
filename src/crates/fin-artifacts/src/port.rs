//! Per-agent typed read/write facades over [`ArtifactStore`]. Each
//! agent gets one bound to its own `(kind, version, produced_by)`
//! rather than reaching into the store directly -- a bare pass-through
//! wrapper isn't a port, so this type fixes the kind/version/producer
//! and only exposes the operations that agent actually performs.

use crate::envelope::ArtifactReference;
use crate::error::Result;
use crate::store::ArtifactStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::marker::PhantomData;
use std::sync::Arc;

pub struct TypedArtifactPort<T> {
    store: Arc<ArtifactStore>,
    kind: &'static str,
    version: &'static str,
    produced_by: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> TypedArtifactPort<T> {
    pub fn new(
        store: Arc<ArtifactStore>,
        kind: &'static str,
        version: &'static str,
        produced_by: impl Into<String>,
    ) -> Self {
        Self { store, kind, version, produced_by: produced_by.into(), _marker: PhantomData }
    }

    pub async fn publish(&self, thread_id: &str, value: &T) -> Result<ArtifactReference> {
        let data = serde_json::to_value(value).map_err(|e| crate::error::ArtifactError::Storage(e.to_string()))?;
        let artifact_id = self.store.save(self.kind, self.version, &self.produced_by, thread_id, data).await?;
        Ok(ArtifactReference { artifact_id, kind: self.kind.to_string(), version: self.version.to_string() })
    }

    pub async fn fetch(&self, artifact_id: &str) -> Result<T> {
        self.store.load(artifact_id, self.kind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::InMemoryBlobStore;
    use serde::Deserialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Verdict {
        call: String,
    }

    #[tokio::test]
    async fn publish_then_fetch_round_trips_the_typed_value() {
        let store = Arc::new(ArtifactStore::new(Arc::new(InMemoryBlobStore::new())));
        let port: TypedArtifactPort<Verdict> =
            TypedArtifactPort::new(store, "debate.verdict", "v1", "debate-agent");

        let reference = port.publish("t1", &Verdict { call: "buy".into() }).await.unwrap();
        let fetched = port.fetch(&reference.artifact_id).await.unwrap();
        assert_eq!(fetched, Verdict { call: "buy".into() });
    }
}
