//! Catalog loading with a single owned cache.
//!
//! The first [`CatalogLoader::load`] fetches every entity from the record
//! store; later calls hand back the same `Arc<Catalog>` until
//! [`CatalogLoader::invalidate`] or [`CatalogLoader::reload`] is called.
//! The cache mutex is held across the remote fetch, so concurrent first
//! callers share one store call.

use crate::error::Result;
use crate::models::{Catalog, Record};
use crate::store::DynRecordStore;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Whether the loader currently holds a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Unloaded,
    Loaded,
}

/// Owns the in-process catalog cache.
pub struct CatalogLoader {
    store: DynRecordStore,
    cache: Mutex<Option<Arc<Catalog>>>,
}

impl CatalogLoader {
    pub fn new(store: DynRecordStore) -> Self {
        Self {
            store,
            cache: Mutex::new(None),
        }
    }

    /// Return the cached catalog, fetching it on first use.
    ///
    /// A store failure is returned as `SourceUnavailable` and nothing is cached.
    pub async fn load(&self) -> Result<Arc<Catalog>> {
        let mut cache = self.cache.lock().await;
        if let Some(catalog) = cache.as_ref() {
            debug!("Catalog cache hit ({} records)", catalog.len());
            return Ok(Arc::clone(catalog));
        }

        let catalog = self.fetch().await?;
        *cache = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Drop any cached catalog and fetch a fresh one.
    ///
    /// On failure the loader is left unloaded.
    pub async fn reload(&self) -> Result<Arc<Catalog>> {
        let mut cache = self.cache.lock().await;
        *cache = None;

        let catalog = self.fetch().await?;
        *cache = Some(Arc::clone(&catalog));
        Ok(catalog)
    }

    /// Forget the cached catalog; the next `load` refetches.
    pub async fn invalidate(&self) {
        let mut cache = self.cache.lock().await;
        if cache.take().is_some() {
            debug!("Catalog cache invalidated");
        }
    }

    pub async fn state(&self) -> LoadState {
        match self.cache.lock().await.as_ref() {
            Some(_) => LoadState::Loaded,
            None => LoadState::Unloaded,
        }
    }

    /// The cached catalog, without fetching.
    pub async fn cached(&self) -> Option<Arc<Catalog>> {
        self.cache.lock().await.clone()
    }

    async fn fetch(&self) -> Result<Arc<Catalog>> {
        let entities = self
            .store
            .list_entities()
            .await
            .map_err(|e| e.into_source_unavailable())?;

        let catalog = Catalog::from_records(entities.into_iter().map(Record::from_entity));
        info!(
            "Loaded catalog from {}: {} records ({} duplicates dropped)",
            self.store.name(),
            catalog.len(),
            catalog.duplicates_dropped()
        );

        let unusable = catalog.unusable_count();
        if unusable > 0 {
            warn!(
                "{} records are missing ImageURL, ImageCategory or FileName",
                unusable
            );
        }

        Ok(Arc::new(catalog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;
    use crate::models::Entity;
    use crate::store::memory::InMemoryRecordStore;
    use serde_json::json;

    fn entity(row: &str, category: &str) -> Entity {
        json!({
            "PartitionKey": "p",
            "RowKey": row,
            "ImageCategory": category,
            "FileName": format!("{row}.jpg"),
            "ImageURL": format!("https://acct.blob.core.windows.net/image-metadata/{row}.jpg"),
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    #[tokio::test]
    async fn test_load_is_cached() {
        let store = Arc::new(InMemoryRecordStore::new(vec![entity("1", "cats")]));
        let loader = CatalogLoader::new(store.clone());
        assert_eq!(loader.state().await, LoadState::Unloaded);

        let first = loader.load().await.unwrap();
        let second = loader.load().await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.calls(), 1);
        assert_eq!(loader.state().await, LoadState::Loaded);
    }

    #[tokio::test]
    async fn test_reload_refetches() {
        let store = Arc::new(InMemoryRecordStore::new(vec![entity("1", "cats")]));
        let loader = CatalogLoader::new(store.clone());
        assert_eq!(loader.load().await.unwrap().len(), 1);

        store.set_entities(vec![entity("1", "cats"), entity("2", "dogs")]);
        assert_eq!(loader.load().await.unwrap().len(), 1);
        assert_eq!(loader.reload().await.unwrap().len(), 2);
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_invalidate() {
        let store = Arc::new(InMemoryRecordStore::new(vec![entity("1", "cats")]));
        let loader = CatalogLoader::new(store.clone());
        loader.load().await.unwrap();

        loader.invalidate().await;
        assert_eq!(loader.state().await, LoadState::Unloaded);
        assert!(loader.cached().await.is_none());

        loader.load().await.unwrap();
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_source_unavailable_and_not_cached() {
        let store = Arc::new(InMemoryRecordStore::new(vec![entity("1", "cats")]));
        store.set_failing(true);
        let loader = CatalogLoader::new(store.clone());

        let err = loader.load().await.unwrap_err();
        assert!(matches!(err, ExplorerError::SourceUnavailable { .. }));
        assert_eq!(loader.state().await, LoadState::Unloaded);

        store.set_failing(false);
        assert_eq!(loader.load().await.unwrap().len(), 1);
        assert_eq!(store.calls(), 2);
    }

    #[tokio::test]
    async fn test_failed_reload_leaves_unloaded() {
        let store = Arc::new(InMemoryRecordStore::new(vec![entity("1", "cats")]));
        let loader = CatalogLoader::new(store.clone());
        loader.load().await.unwrap();

        store.set_failing(true);
        assert!(loader.reload().await.is_err());
        assert_eq!(loader.state().await, LoadState::Unloaded);
    }

    #[tokio::test]
    async fn test_records_missing_fields_are_kept() {
        let mut broken = entity("2", "dogs");
        broken.remove("ImageURL");
        let store = Arc::new(InMemoryRecordStore::new(vec![entity("1", "cats"), broken]));
        let loader = CatalogLoader::new(store);

        let catalog = loader.load().await.unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.unusable_count(), 1);
    }
}
