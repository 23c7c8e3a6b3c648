//! `ArtifactStore` -- content-addressed persistence for validated
//! `ArtifactEnvelope`s, built over a [`BlobStore`] port.

use crate::blob::BlobStore;
use crate::envelope::ArtifactEnvelope;
use crate::error::{ArtifactError, Result};
use chrono::Utc;
use fin_tooling::hash::{canonical_json_bytes, content_hash};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;

pub struct ArtifactStore {
    blobs: Arc<dyn BlobStore>,
}

impl ArtifactStore {
    pub fn new(blobs: Arc<dyn BlobStore>) -> Self {
        Self { blobs }
    }

    /// Persist a validated payload. The id is a hash over
    /// `{kind, version, canonical_data_bytes, thread_id}` -- re-saving
    /// byte-identical content returns the same id; re-saving different
    /// content at a colliding id is rejected as a producer bug.
    #[instrument(skip(self, data), fields(kind, version, thread_id))]
    pub async fn save(
        &self,
        kind: &str,
        version: &str,
        produced_by: &str,
        thread_id: &str,
        data: Value,
    ) -> Result<String> {
        let canonical = canonical_json_bytes(&data);
        let artifact_id = content_hash(&[
            kind.as_bytes(),
            version.as_bytes(),
            &canonical,
            thread_id.as_bytes(),
        ]);

        if let Some(existing) = self.blobs.get(&artifact_id).await {
            let existing: ArtifactEnvelope = serde_json::from_slice(&existing)
                .map_err(|e| ArtifactError::Storage(e.to_string()))?;
            if canonical_json_bytes(&existing.data) != canonical {
                return Err(ArtifactError::Conflict { artifact_id });
            }
            return Ok(artifact_id);
        }

        let envelope = ArtifactEnvelope {
            artifact_id: artifact_id.clone(),
            kind: kind.to_string(),
            version: version.to_string(),
            produced_by: produced_by.to_string(),
            created_at: Utc::now(),
            data,
        };
        let bytes = serde_json::to_vec(&envelope).map_err(|e| ArtifactError::Storage(e.to_string()))?;
        self.blobs.put(&artifact_id, bytes).await;
        Ok(artifact_id)
    }

    pub async fn load_envelope(&self, artifact_id: &str, expected_kind: &str) -> Result<ArtifactEnvelope> {
        let bytes = self
            .blobs
            .get(artifact_id)
            .await
            .ok_or_else(|| ArtifactError::NotFound(artifact_id.to_string()))?;
        let envelope: ArtifactEnvelope =
            serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Storage(e.to_string()))?;
        if envelope.kind != expected_kind {
            return Err(ArtifactError::KindMismatch {
                artifact_id: artifact_id.to_string(),
                actual: envelope.kind.clone(),
                actual_version: envelope.version.clone(),
                expected: expected_kind.to_string(),
                expected_version: String::new(),
            });
        }
        Ok(envelope)
    }

    /// Fetch an envelope without asserting its kind -- used at the outer
    /// HTTP boundary, where a caller has only an id and wants whatever
    /// kind-discriminated envelope is stored there.
    pub async fn load_any(&self, artifact_id: &str) -> Result<ArtifactEnvelope> {
        let bytes = self
            .blobs
            .get(artifact_id)
            .await
            .ok_or_else(|| ArtifactError::NotFound(artifact_id.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Storage(e.to_string()))
    }

    /// Canonical JSON form of an artifact's payload, used at consumer
    /// boundaries so cross-agent data never flows as a typed record.
    pub async fn load_json(&self, artifact_id: &str, expected_kind: &str) -> Result<Value> {
        Ok(self.load_envelope(artifact_id, expected_kind).await?.data)
    }

    pub async fn load<T: DeserializeOwned>(&self, artifact_id: &str, expected_kind: &str) -> Result<T> {
        let envelope = self.load_envelope(artifact_id, expected_kind).await?;
        serde_json::from_value(envelope.data)
            .map_err(|_| ArtifactError::TypeMismatch(artifact_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::InMemoryBlobStore;
    use serde_json::json;

    fn store() -> ArtifactStore {
        ArtifactStore::new(Arc::new(InMemoryBlobStore::new()))
    }

    #[tokio::test]
    async fn identical_content_is_idempotent() {
        let store = store();
        let id1 = store.save("news.items_list", "v1", "news-agent", "t1", json!({"items": []})).await.unwrap();
        let id2 = store.save("news.items_list", "v1", "news-agent", "t1", json!({"items": []})).await.unwrap();
        assert_eq!(id1, id2);
    }

    #[tokio::test]
    async fn different_content_same_thread_yields_different_ids() {
        let store = store();
        let id1 = store.save("news.items_list", "v1", "a", "t1", json!({"items": []})).await.unwrap();
        let id2 = store.save("news.items_list", "v1", "a", "t1", json!({"items": [1]})).await.unwrap();
        assert_ne!(id1, id2);
    }

    #[tokio::test]
    async fn load_with_wrong_expected_kind_fails() {
        let store = store();
        let id = store.save("news.items_list", "v1", "a", "t1", json!({"items": []})).await.unwrap();
        let err = store.load_json(&id, "technical.full_report").await.unwrap_err();
        assert!(matches!(err, ArtifactError::KindMismatch { .. }));
    }

    #[tokio::test]
    async fn conflicting_content_at_a_reused_id_is_rejected() {
        let store = store();
        let data = json!({"items": []});
        let canonical = canonical_json_bytes(&data);
        let id = content_hash(&["news.items_list".as_bytes(), "v1".as_bytes(), &canonical, "t1".as_bytes()]);

        // Simulate a hash collision: a different payload lands at the id
        // this content would compute to.
        let forged = ArtifactEnvelope {
            artifact_id: id.clone(),
            kind: "news.items_list".into(),
            version: "v1".into(),
            produced_by: "a".into(),
            created_at: Utc::now(),
            data: json!({"items": ["unexpected"]}),
        };
        store.blobs.put(&id, serde_json::to_vec(&forged).unwrap()).await;

        let err = store.save("news.items_list", "v1", "a", "t1", data).await.unwrap_err();
        assert!(matches!(err, ArtifactError::Conflict { .. }));
    }
}
