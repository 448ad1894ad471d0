//! Read-only clients for the external record and blob stores.
//!
//! The core only ever talks to the stores through [`RecordStore`] and
//! [`BlobStore`]. Azure REST implementations live in [`azure`]; in-memory
//! implementations for tests and offline use live in [`memory`].

pub mod azure;
pub mod memory;

use crate::error::Result;
use crate::models::Entity;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Enumerates every entity in a remote table.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short name used in log messages (e.g. "azure-table").
    fn name(&self) -> &str;

    /// List every entity in store-defined order.
    ///
    /// Implementations follow pagination internally and make no retry.
    async fn list_entities(&self) -> Result<Vec<Entity>>;
}

/// Fetches whole blobs by path.
#[async_trait]
pub trait BlobStore: Send + Sync {
    fn name(&self) -> &str;

    /// Read the entire blob at `path`.
    ///
    /// Returns `ExplorerError::BlobNotFound` when nothing exists at `path`.
    async fn fetch_blob(&self, path: &str) -> Result<Bytes>;
}

pub type DynRecordStore = Arc<dyn RecordStore>;
pub type DynBlobStore = Arc<dyn BlobStore>;
