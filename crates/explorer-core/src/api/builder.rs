//! Builder for configuring ExplorerApi initialization.

use std::sync::Arc;

use crate::catalog::CatalogLoader;
use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::image::ImageResolver;
use crate::network::HttpClient;
use crate::store::azure::{AzureBlobClient, AzureTableClient, CredentialProvider, StaticCredential};
use crate::store::{DynBlobStore, DynRecordStore};
use crate::ExplorerApi;

/// Builder for configuring ExplorerApi initialization.
///
/// By default both stores are Azure REST clients built from the config and
/// credential. Either store can be swapped for another implementation.
///
/// # Example
///
/// ```rust,ignore
/// use explorer_core::{ExplorerApi, ExplorerConfig, StaticCredential};
/// use std::sync::Arc;
///
/// let api = ExplorerApi::builder()
///     .config(ExplorerConfig::from_env()?)
///     .credential(Arc::new(StaticCredential::from_env()))
///     .build()?;
/// ```
pub struct ExplorerApiBuilder {
    config: ExplorerConfig,
    credential: Option<Arc<dyn CredentialProvider>>,
    record_store: Option<DynRecordStore>,
    blob_store: Option<DynBlobStore>,
}

impl Default for ExplorerApiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorerApiBuilder {
    pub fn new() -> Self {
        Self {
            config: ExplorerConfig::default(),
            credential: None,
            record_store: None,
            blob_store: None,
        }
    }

    pub fn config(mut self, config: ExplorerConfig) -> Self {
        self.config = config;
        self
    }

    /// Identity used by the Azure clients.
    ///
    /// Default: anonymous access.
    pub fn credential(mut self, credential: Arc<dyn CredentialProvider>) -> Self {
        self.credential = Some(credential);
        self
    }

    /// Use `store` instead of an Azure table client.
    pub fn record_store(mut self, store: DynRecordStore) -> Self {
        self.record_store = Some(store);
        self
    }

    /// Use `store` instead of an Azure blob client.
    pub fn blob_store(mut self, store: DynBlobStore) -> Self {
        self.blob_store = Some(store);
        self
    }

    /// Build the ExplorerApi instance.
    pub fn build(self) -> Result<ExplorerApi> {
        self.config.validate()?;

        let credential: Arc<dyn CredentialProvider> = match self.credential {
            Some(credential) => credential,
            None => Arc::new(StaticCredential::anonymous()),
        };

        // One connection pool for both stores
        let http = HttpClient::with_timeout(self.config.request_timeout)?;

        let record_store: DynRecordStore = match self.record_store {
            Some(store) => store,
            None => Arc::new(AzureTableClient::new(
                http.clone(),
                self.config.table_endpoint(),
                self.config.table_name.clone(),
                Arc::clone(&credential),
            )?),
        };

        let blob_store: DynBlobStore = match self.blob_store {
            Some(store) => store,
            None => Arc::new(AzureBlobClient::new(
                http,
                self.config.blob_endpoint(),
                self.config.container_name.clone(),
                Arc::clone(&credential),
            )?),
        };

        tracing::debug!(
            "Explorer configured: records from {}, images from {}",
            record_store.name(),
            blob_store.name()
        );

        Ok(ExplorerApi {
            loader: CatalogLoader::new(record_store),
            resolver: ImageResolver::new(blob_store, self.config.container_name.clone()),
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExplorerError;
    use crate::store::memory::{InMemoryBlobStore, InMemoryRecordStore};

    #[test]
    fn test_build_with_azure_defaults() {
        let api = ExplorerApiBuilder::new().build().unwrap();
        assert_eq!(api.config().container_name, "image-metadata");
        assert_eq!(api.resolver().container_marker(), "image-metadata");
    }

    #[test]
    fn test_build_with_custom_stores() {
        let api = ExplorerApiBuilder::new()
            .record_store(Arc::new(InMemoryRecordStore::default()))
            .blob_store(Arc::new(InMemoryBlobStore::new()))
            .build()
            .unwrap();
        assert_eq!(api.config().table_name, "ImageMetadataTableNew");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExplorerConfig {
            container_name: String::new(),
            ..ExplorerConfig::default()
        };
        let result = ExplorerApiBuilder::new().config(config).build();
        assert!(matches!(result, Err(ExplorerError::Validation { .. })));
    }
}
