//! Image fetching with per-record failure isolation.

use super::path::{resolve_image_path, ResolvedPath};
use crate::error::{ExplorerError, FetchFailureKind, Result};
use crate::gallery::GalleryItem;
use crate::models::{ImageBytes, Record};
use crate::store::DynBlobStore;
use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

/// Resolves image URLs to blob paths and fetches the blobs.
///
/// Every fetch error is reported as `ExplorerError::ImageFetchFailed`; no
/// other variant leaves this type.
pub struct ImageResolver {
    blobs: DynBlobStore,
    container_marker: String,
}

impl ImageResolver {
    pub fn new(blobs: DynBlobStore, container_marker: impl Into<String>) -> Self {
        Self {
            blobs,
            container_marker: container_marker.into(),
        }
    }

    pub fn container_marker(&self) -> &str {
        &self.container_marker
    }

    pub fn resolve<'a>(&self, image_url: &'a str) -> ResolvedPath<'a> {
        resolve_image_path(image_url, &self.container_marker)
    }

    /// Read the whole blob at `path`. Single attempt.
    pub async fn fetch_image(&self, path: &str) -> Result<ImageBytes> {
        match self.blobs.fetch_blob(path).await {
            Ok(data) => {
                debug!("Fetched image {} ({} bytes)", path, data.len());
                Ok(ImageBytes::new(path, data))
            }
            Err(err) => {
                let err = err.into_image_fetch_failed(path);
                warn!("{}", err);
                Err(err)
            }
        }
    }

    /// Resolve the record's image URL and fetch it.
    pub async fn fetch_for_record(&self, record: &Record) -> Result<ImageBytes> {
        let Some(url) = record.image_url.as_deref() else {
            return Err(ExplorerError::ImageFetchFailed {
                path: record.id.to_string(),
                kind: FetchFailureKind::MissingUrl,
                reason: format!("record {} has no ImageURL", record.id),
            });
        };

        let resolved = self.resolve(url);
        if resolved.is_fallback() {
            debug!(
                "Image URL for {} lacks container marker {:?}; using it as the path",
                record.id, self.container_marker
            );
        }
        self.fetch_image(resolved.as_str()).await
    }

    /// Fetch images for `records` with at most `concurrency` requests in
    /// flight. Items come back in input order.
    pub async fn fetch_gallery<'a>(
        &self,
        records: &[&'a Record],
        concurrency: usize,
    ) -> Vec<GalleryItem<'a>> {
        stream::iter(records.iter().copied())
            .map(|record| async move {
                GalleryItem {
                    record,
                    outcome: self.fetch_for_record(record).await,
                }
            })
            .buffered(concurrency.max(1))
            .collect()
            .await
    }
}
