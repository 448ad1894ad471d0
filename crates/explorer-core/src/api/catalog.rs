//! Catalog and filter methods for ExplorerApi.

use crate::catalog::LoadState;
use crate::error::Result;
use crate::filter::{distinct_categories, filter_by_category, CategorySelection};
use crate::models::{Catalog, Record};
use crate::ExplorerApi;
use std::collections::BTreeSet;
use std::sync::Arc;

impl ExplorerApi {
    /// Load the catalog, fetching it from the record store on first use.
    pub async fn load_catalog(&self) -> Result<Arc<Catalog>> {
        self.loader.load().await
    }

    /// Discard the cached catalog and fetch it again.
    pub async fn reload_catalog(&self) -> Result<Arc<Catalog>> {
        self.loader.reload().await
    }

    pub async fn invalidate_catalog(&self) {
        self.loader.invalidate().await
    }

    pub async fn catalog_state(&self) -> LoadState {
        self.loader.state().await
    }

    /// Categories present in the current catalog.
    pub async fn categories(&self) -> Result<BTreeSet<String>> {
        let catalog = self.load_catalog().await?;
        Ok(distinct_categories(&catalog))
    }

    /// Owned copies of the records matching `selection`, in catalog order.
    pub async fn filter_records(&self, selection: &CategorySelection) -> Result<Vec<Record>> {
        let catalog = self.load_catalog().await?;
        Ok(filter_by_category(&catalog, selection)
            .into_iter()
            .cloned()
            .collect())
    }
}
