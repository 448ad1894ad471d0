//! Image methods for ExplorerApi.

use crate::error::Result;
use crate::gallery::{GalleryItem, GalleryPage};
use crate::models::{ImageBytes, Record};
use crate::ExplorerApi;

impl ExplorerApi {
    /// Fetch the image for one record.
    ///
    /// Errors are always `ExplorerError::ImageFetchFailed`.
    pub async fn fetch_image(&self, record: &Record) -> Result<ImageBytes> {
        self.resolver.fetch_for_record(record).await
    }

    /// Fetch every image on `page`, `concurrency` at a time.
    pub async fn fetch_gallery_page<'a>(
        &self,
        page: &GalleryPage<'a>,
        concurrency: usize,
    ) -> Vec<GalleryItem<'a>> {
        self.resolver.fetch_gallery(&page.records, concurrency).await
    }
}
