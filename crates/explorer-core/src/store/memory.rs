//! In-memory store implementations.
//!
//! Useful for tests and for running the explorer against fixture data. Both
//! stores count calls and can be told to fail, so callers can exercise the
//! error paths without a network.

use super::{BlobStore, RecordStore};
use crate::error::{ExplorerError, Result};
use crate::models::Entity;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use std::time::Duration;

/// Record store backed by a vector of entities.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    entities: RwLock<Vec<Entity>>,
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: Option<Duration>,
}

impl InMemoryRecordStore {
    pub fn new(entities: Vec<Entity>) -> Self {
        Self {
            entities: RwLock::new(entities),
            ..Default::default()
        }
    }

    /// Sleep this long inside every listing before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Replace the stored entities; takes effect on the next listing.
    pub fn set_entities(&self, entities: Vec<Entity>) {
        match self.entities.write() {
            Ok(mut guard) => *guard = entities,
            Err(poisoned) => *poisoned.into_inner() = entities,
        }
    }

    /// Make every following listing fail with `Network`.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of `list_entities` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    fn name(&self) -> &str {
        "memory-table"
    }

    async fn list_entities(&self) -> Result<Vec<Entity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(ExplorerError::Network {
                message: "in-memory table configured to fail".to_string(),
            });
        }
        let entities = match self.entities.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        Ok(entities)
    }
}

/// Blob store backed by a path → bytes map.
#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    blobs: HashMap<String, Bytes>,
    failing: HashSet<String>,
    denied: HashSet<String>,
    calls: AtomicUsize,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_blob(mut self, path: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.blobs.insert(path.into(), data.into());
        self
    }

    /// Fail fetches of `path` with a network error.
    pub fn with_failure(mut self, path: impl Into<String>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Fail fetches of `path` with `AccessDenied`.
    pub fn with_denied(mut self, path: impl Into<String>) -> Self {
        self.denied.insert(path.into());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    fn name(&self) -> &str {
        "memory-blob"
    }

    async fn fetch_blob(&self, path: &str) -> Result<Bytes> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(path) {
            return Err(ExplorerError::Network {
                message: format!("in-memory blob store configured to fail for {}", path),
            });
        }
        if self.denied.contains(path) {
            return Err(ExplorerError::AccessDenied {
                resource: path.to_string(),
            });
        }
        self.blobs
            .get(path)
            .cloned()
            .ok_or_else(|| ExplorerError::BlobNotFound {
                path: path.to_string(),
            })
    }
}
