//! `BlobStore` -- the persistence port the artifact store is written
//! against. Only an in-memory implementation ships here; a durable
//! backend is an external collaborator wired in by `fin-server`.

use async_trait::async_trait;

#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn put(&self, key: &str, bytes: Vec<u8>);
    async fn get(&self, key: &str) -> Option<Vec<u8>>;
}

#[derive(Default)]
pub struct InMemoryBlobStore {
    entries: parking_lot::Mutex<std::collections::HashMap<String, Vec<u8>>>,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) {
        self.entries.lock().insert(key.to_string(), bytes);
    }

    async fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.lock().get(key).cloned()
    }
}
