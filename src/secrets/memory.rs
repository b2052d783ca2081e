//! In-process secret backend.
//!
//! Holds records in memory, for embedding hosts, benchmarks and tests that
//! need a backend without a Vault server.

use super::backend::{SecretBackendClient, SecretBackendType};
use super::error::{BackendError, BackendResult};
use super::record::SecretRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

/// Secret backend serving records from a map keyed by path.
#[derive(Debug, Default)]
pub struct InMemoryBackendClient {
    records: RwLock<HashMap<String, SecretRecord>>,
    reads: AtomicUsize,
}

impl InMemoryBackendClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `record` at `path`, replacing any previous record.
    pub fn with_record(self, path: impl Into<String>, record: SecretRecord) -> Self {
        self.insert(path, record);
        self
    }

    pub fn insert(&self, path: impl Into<String>, record: SecretRecord) {
        let mut records = self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        records.insert(path.into(), record);
    }

    pub fn remove(&self, path: &str) -> Option<SecretRecord> {
        let mut records = self.records.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        records.remove(path)
    }

    /// Number of `read` calls served so far, including misses.
    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecretBackendClient for InMemoryBackendClient {
    async fn read(&self, path: &str) -> BackendResult<SecretRecord> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let records = self.records.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        records.get(path).cloned().ok_or_else(|| BackendError::not_found(path))
    }

    fn backend_type(&self) -> SecretBackendType {
        SecretBackendType::InMemory
    }

    async fn health_check(&self) -> BackendResult<()> {
        Ok(())
    }
}
