//! Explorer Core - Headless library for browsing image metadata stored in Azure.
//!
//! Metadata records live in a table store and the images they describe live
//! in a blob container. This crate loads the records into a cached catalog,
//! filters them by category, pages the result and fetches the images.
//! It has no UI of its own.
//!
//! # Example
//!
//! ```rust,ignore
//! use explorer_core::{CategorySelection, ExplorerApi, ExplorerConfig, GalleryPage};
//!
//! #[tokio::main]
//! async fn main() -> explorer_core::Result<()> {
//!     let api = ExplorerApi::builder()
//!         .config(ExplorerConfig::from_env()?)
//!         .build()?;
//!
//!     let catalog = api.load_catalog().await?;
//!     let selection = CategorySelection::new(["cats"]);
//!     let records = explorer_core::filter_by_category(&catalog, &selection);
//!
//!     let page = GalleryPage::of(&records, 0, 20)?;
//!     for item in api.fetch_gallery_page(&page, 4).await {
//!         println!("{}: {}", item.caption(), item.outcome.is_ok());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod image;
pub mod models;
pub mod network;
pub mod store;

mod api;

// Re-export commonly used types
pub use catalog::{CatalogLoader, LoadState};
pub use config::ExplorerConfig;
pub use error::{ExplorerError, FetchFailureKind, Result};
pub use filter::{distinct_categories, filter_by_category, CategorySelection};
pub use gallery::{GalleryItem, GalleryPage};
pub use image::{resolve_image_path, ImageResolver, ResolvedPath};
pub use models::{Catalog, ImageBytes, ImageFormat, Record, RecordId, RequiredField};
pub use store::azure::{AzureBlobClient, AzureTableClient, CredentialProvider, StaticCredential};
pub use store::{BlobStore, RecordStore};

// Re-export builder from api module
pub use api::ExplorerApiBuilder;

/// Main API struct for explorer operations.
///
/// Owns the catalog loader and the image resolver. Cloning is not supported;
/// share it behind an `Arc` when several tasks need it.
pub struct ExplorerApi {
    pub(crate) config: ExplorerConfig,
    pub(crate) loader: CatalogLoader,
    pub(crate) resolver: ImageResolver,
}

impl ExplorerApi {
    /// Create a builder for ExplorerApi.
    pub fn builder() -> ExplorerApiBuilder {
        ExplorerApiBuilder::new()
    }

    /// Create an ExplorerApi talking to Azure with `config` and anonymous access.
    pub fn new(config: ExplorerConfig) -> Result<Self> {
        ExplorerApiBuilder::new().config(config).build()
    }

    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    pub fn loader(&self) -> &CatalogLoader {
        &self.loader
    }

    pub fn resolver(&self) -> &ImageResolver {
        &self.resolver
    }
}

impl std::fmt::Debug for ExplorerApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExplorerApi")
            .field("table", &self.config.table_name)
            .field("container", &self.config.container_name)
            .finish_non_exhaustive()
    }
}
