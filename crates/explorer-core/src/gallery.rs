//! Paging of filtered records for gallery display.

use crate::error::{ExplorerError, Result};
use crate::models::{ImageBytes, Record};

/// One page of a filtered view. Pages are zero-indexed.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryPage<'a> {
    pub page: usize,
    pub page_size: usize,
    pub total_records: usize,
    pub total_pages: usize,
    pub records: Vec<&'a Record>,
}

impl<'a> GalleryPage<'a> {
    /// Slice `records` into page `page` of `page_size` entries.
    ///
    /// A page past the end is empty rather than an error.
    pub fn of(records: &[&'a Record], page: usize, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(ExplorerError::Validation {
                field: "page_size".to_string(),
                message: "must be at least 1".to_string(),
            });
        }

        let total_records = records.len();
        let total_pages = total_records.div_ceil(page_size);
        let start = page.saturating_mul(page_size).min(total_records);
        let end = start.saturating_add(page_size).min(total_records);

        Ok(Self {
            page,
            page_size,
            total_records,
            total_pages,
            records: records[start..end].to_vec(),
        })
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0 && self.total_pages > 0
    }
}

/// A record paired with the result of fetching its image.
///
/// The error, when present, is always `ExplorerError::ImageFetchFailed`.
#[derive(Debug)]
pub struct GalleryItem<'a> {
    pub record: &'a Record,
    pub outcome: Result<ImageBytes>,
}

impl GalleryItem<'_> {
    /// Caption shown under the thumbnail.
    pub fn caption(&self) -> &str {
        self.record
            .file_name
            .as_deref()
            .unwrap_or(self.record.id.row_key.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;
    use std::collections::BTreeMap;

    fn records(n: usize) -> Vec<Record> {
        (0..n)
            .map(|i| Record {
                id: RecordId::new("p", i.to_string()),
                category: Some("cats".into()),
                file_name: Some(format!("{i}.jpg")),
                image_url: None,
                timestamp: None,
                extra: BTreeMap::new(),
            })
            .collect()
    }

    #[test]
    fn test_paging() {
        let owned = records(5);
        let refs: Vec<&Record> = owned.iter().collect();

        let first = GalleryPage::of(&refs, 0, 2).unwrap();
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.records.len(), 2);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = GalleryPage::of(&refs, 2, 2).unwrap();
        assert_eq!(last.records.len(), 1);
        assert_eq!(last.records[0].id.row_key, "4");
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn test_page_past_end_is_empty() {
        let owned = records(3);
        let refs: Vec<&Record> = owned.iter().collect();
        let page = GalleryPage::of(&refs, 10, 2).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.total_records, 3);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(matches!(
            GalleryPage::of(&[], 0, 0),
            Err(ExplorerError::Validation { .. })
        ));
    }

    #[test]
    fn test_caption_falls_back_to_row_key() {
        let mut owned = records(1);
        owned[0].file_name = None;
        let item = GalleryItem {
            record: &owned[0],
            outcome: Err(ExplorerError::Timeout.into_image_fetch_failed("x")),
        };
        assert_eq!(item.caption(), "0");
    }
}
