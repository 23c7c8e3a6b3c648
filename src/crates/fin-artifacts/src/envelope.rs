//! The cross-agent exchange unit and its lightweight pointer type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A validated artifact, ready to be persisted or already persisted.
/// `data` must have already passed the registered schema for
/// `(kind, version)` -- the store never validates, it only hashes and
/// stores what `fin-contracts` has already accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactEnvelope {
    pub artifact_id: String,
    pub kind: String,
    pub version: String,
    pub produced_by: String,
    pub created_at: DateTime<Utc>,
    pub data: Value,
}

/// An out-of-band pointer to a stored artifact, used in preview/summary
/// envelopes so streamed events stay small.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReference {
    pub artifact_id: String,
    pub kind: String,
    pub version: String,
}

impl From<&ArtifactEnvelope> for ArtifactReference {
    fn from(envelope: &ArtifactEnvelope) -> Self {
        Self {
            artifact_id: envelope.artifact_id.clone(),
            kind: envelope.kind.clone(),
            version: envelope.version.clone(),
        }
    }
}
