//! `CheckpointSaver` -- the storage-backend abstraction the scheduler is
//! written against. The workspace ships only [`crate::memory::InMemoryCheckpointSaver`];
//! the trait exists so a durable backend can be slotted in without
//! touching the graph runtime.
//!
//! Implementations must be `Send + Sync` and serialize writes per
//! `thread_id` themselves -- concurrent `put` calls racing on the same
//! thread must not interleave, but the trait does not enforce this.

use crate::checkpoint::{Checkpoint, CheckpointConfig, CheckpointMetadata, CheckpointTuple};
use crate::error::Result;
use async_trait::async_trait;
use futures::stream::Stream;
use std::pin::Pin;

pub type CheckpointStream = Pin<Box<dyn Stream<Item = Result<CheckpointTuple>> + Send>>;

#[async_trait]
pub trait CheckpointSaver: Send + Sync {
    /// Fetch a checkpoint tuple. `config.checkpoint_id = None` means
    /// "the latest checkpoint for this thread".
    async fn get_tuple(&self, config: &CheckpointConfig) -> Result<Option<CheckpointTuple>>;

    /// Convenience wrapper that drops metadata/parent linkage.
    async fn get(&self, config: &CheckpointConfig) -> Result<Option<Checkpoint>> {
        Ok(self.get_tuple(config).await?.map(|t| t.checkpoint))
    }

    /// Stream a thread's checkpoint history, newest first, optionally
    /// bounded by `limit` and/or `before` for pagination.
    async fn list(
        &self,
        thread_id: &str,
        before: Option<&CheckpointConfig>,
        limit: Option<usize>,
    ) -> Result<CheckpointStream>;

    /// Persist a new checkpoint, returning the config that now locates
    /// it (with `checkpoint_id` populated if the caller left it unset).
    async fn put(
        &self,
        config: &CheckpointConfig,
        checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
    ) -> Result<CheckpointConfig>;

    /// Delete every checkpoint for a thread. Used only by test harnesses
    /// and thread-retention tooling -- never called by the scheduler.
    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        let _ = thread_id;
        Ok(())
    }
}
