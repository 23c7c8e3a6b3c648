//! Reference `CheckpointSaver`: an in-process, per-thread `Vec` guarded
//! by a `parking_lot::Mutex`. Used by tests and by `fin-server` when
//! `checkpoint_backend = memory` (the default).

use crate::checkpoint::{Checkpoint, CheckpointConfig, CheckpointMetadata, CheckpointTuple};
use crate::error::{CheckpointError, Result};
use crate::traits::{CheckpointSaver, CheckpointStream};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct InMemoryCheckpointSaver {
    // newest-last per thread; `put` appends, `get_tuple`/`list` read from the back.
    threads: Arc<Mutex<HashMap<String, Vec<CheckpointTuple>>>>,
}

impl InMemoryCheckpointSaver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CheckpointSaver for InMemoryCheckpointSaver {
    async fn get_tuple(&self, config: &CheckpointConfig) -> Result<Option<CheckpointTuple>> {
        let threads = self.threads.lock();
        let Some(history) = threads.get(&config.thread_id) else {
            return Ok(None);
        };

        let found = match &config.checkpoint_id {
            Some(id) => history.iter().find(|t| &t.checkpoint.id == id),
            None => history.last(),
        };
        Ok(found.cloned())
    }

    async fn list(
        &self,
        thread_id: &str,
        before: Option<&CheckpointConfig>,
        limit: Option<usize>,
    ) -> Result<CheckpointStream> {
        let threads = self.threads.lock();
        let history = threads.get(thread_id).cloned().unwrap_or_default();
        drop(threads);

        let before_seq = match before {
            Some(cfg) => {
                let marker = history.iter().find(|t| Some(&t.checkpoint.id) == cfg.checkpoint_id.as_ref());
                marker.map(|t| t.checkpoint.checkpoint_seq)
            }
            None => None,
        };

        let mut newest_first: Vec<CheckpointTuple> = history.into_iter().rev().collect();
        if let Some(seq) = before_seq {
            newest_first.retain(|t| t.checkpoint.checkpoint_seq < seq);
        }
        if let Some(limit) = limit {
            newest_first.truncate(limit);
        }

        let items: Vec<Result<CheckpointTuple>> = newest_first.into_iter().map(Ok).collect();
        Ok(Box::pin(futures::stream::iter(items)))
    }

    async fn put(
        &self,
        config: &CheckpointConfig,
        mut checkpoint: Checkpoint,
        metadata: CheckpointMetadata,
    ) -> Result<CheckpointConfig> {
        if checkpoint.id.is_empty() {
            checkpoint.id = uuid::Uuid::new_v4().to_string();
        }

        let mut threads = self.threads.lock();
        let history = threads.entry(config.thread_id.clone()).or_default();

        if let Some(last) = history.last() {
            if checkpoint.checkpoint_seq <= last.checkpoint.checkpoint_seq {
                return Err(CheckpointError::Invalid(format!(
                    "checkpoint_seq {} is not greater than the last persisted seq {}",
                    checkpoint.checkpoint_seq, last.checkpoint.checkpoint_seq
                )));
            }
        }

        let parent_config = history.last().map(|t| t.config.clone());
        let resolved = CheckpointConfig::specific(config.thread_id.clone(), checkpoint.id.clone());
        history.push(CheckpointTuple {
            config: resolved.clone(),
            checkpoint,
            metadata,
            parent_config,
        });

        Ok(resolved)
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        self.threads.lock().remove(thread_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkpoint::CheckpointSource;
    use futures::StreamExt;

    fn checkpoint(seq: u64) -> Checkpoint {
        Checkpoint {
            id: String::new(),
            ts: chrono::Utc::now(),
            checkpoint_seq: seq,
            state: serde_json::json!({}),
            last_seq_id: seq,
            pending_interrupt: None,
            terminal: false,
        }
    }

    fn metadata(step: u64) -> CheckpointMetadata {
        CheckpointMetadata { step, source: CheckpointSource::Loop, nodes_run: vec![] }
    }

    #[tokio::test]
    async fn get_tuple_without_checkpoint_id_returns_the_latest() {
        let saver = InMemoryCheckpointSaver::new();
        let cfg = CheckpointConfig::latest("t1");
        saver.put(&cfg, checkpoint(1), metadata(1)).await.unwrap();
        saver.put(&cfg, checkpoint(2), metadata(2)).await.unwrap();

        let latest = saver.get_tuple(&cfg).await.unwrap().unwrap();
        assert_eq!(latest.checkpoint.checkpoint_seq, 2);
    }

    #[tokio::test]
    async fn put_rejects_non_increasing_checkpoint_seq() {
        let saver = InMemoryCheckpointSaver::new();
        let cfg = CheckpointConfig::latest("t1");
        saver.put(&cfg, checkpoint(5), metadata(1)).await.unwrap();
        let err = saver.put(&cfg, checkpoint(5), metadata(2)).await.unwrap_err();
        assert!(matches!(err, CheckpointError::Invalid(_)));
    }

    #[tokio::test]
    async fn list_returns_newest_first_and_respects_limit() {
        let saver = InMemoryCheckpointSaver::new();
        let cfg = CheckpointConfig::latest("t1");
        for seq in 1..=5 {
            saver.put(&cfg, checkpoint(seq), metadata(seq)).await.unwrap();
        }

        let stream = saver.list("t1", None, Some(2)).await.unwrap();
        let items: Vec<_> = stream.collect().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap().checkpoint.checkpoint_seq, 5);
        assert_eq!(items[1].as_ref().unwrap().checkpoint.checkpoint_seq, 4);
    }

    #[tokio::test]
    async fn resume_from_checkpoint_is_idempotent_read() {
        let saver = InMemoryCheckpointSaver::new();
        let cfg = CheckpointConfig::latest("t1");
        let resolved = saver.put(&cfg, checkpoint(1), metadata(1)).await.unwrap();

        let a = saver.get_tuple(&resolved).await.unwrap().unwrap();
        let b = saver.get_tuple(&resolved).await.unwrap().unwrap();
        assert_eq!(a.checkpoint.id, b.checkpoint.id);
    }
}
