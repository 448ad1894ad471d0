//! In-memory snapshot of every record in the table store.

use super::record::{Record, RecordId};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// The de-duplicated, ordered set of records from one store listing.
///
/// A catalog is immutable once built; consumers share it behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Record>,
    loaded_at: DateTime<Utc>,
    duplicates_dropped: usize,
}

impl Catalog {
    /// Build a catalog, keeping the first record seen for each identifier.
    pub fn from_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut seen: HashSet<RecordId> = HashSet::new();
        let mut kept = Vec::new();
        let mut duplicates_dropped = 0;

        for record in records {
            if seen.insert(record.id.clone()) {
                kept.push(record);
            } else {
                duplicates_dropped += 1;
            }
        }

        Self {
            records: kept,
            loaded_at: Utc::now(),
            duplicates_dropped,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Records skipped because an earlier record had the same identifier.
    pub fn duplicates_dropped(&self) -> usize {
        self.duplicates_dropped
    }

    /// Records missing at least one required field.
    pub fn unusable_count(&self) -> usize {
        self.records.iter().filter(|r| !r.is_usable()).count()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn record(pk: &str, rk: &str, category: Option<&str>) -> Record {
        Record {
            id: RecordId::new(pk, rk),
            category: category.map(str::to_string),
            file_name: Some(format!("{rk}.jpg")),
            image_url: Some(format!("https://x/image-metadata/{rk}.jpg")),
            timestamp: None,
            extra: BTreeMap::new(),
        }
    }

    #[test]
    fn test_dedup_keeps_first_occurrence_in_order() {
        let catalog = Catalog::from_records(vec![
            record("p", "1", Some("cats")),
            record("p", "2", Some("dogs")),
            record("p", "1", Some("birds")),
            record("q", "1", Some("fish")),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.duplicates_dropped(), 1);
        let categories: Vec<_> = catalog
            .iter()
            .map(|r| r.category.as_deref().unwrap())
            .collect();
        assert_eq!(categories, vec!["cats", "dogs", "fish"]);
    }

    #[test]
    fn test_unusable_count() {
        let catalog = Catalog::from_records(vec![
            record("p", "1", Some("cats")),
            record("p", "2", None),
        ]);
        assert_eq!(catalog.unusable_count(), 1);
        assert!(catalog.get(&RecordId::new("p", "2")).is_some());
    }

    #[test]
    fn test_empty() {
        let catalog = Catalog::from_records(Vec::new());
        assert!(catalog.is_empty());
        assert_eq!(catalog.records().len(), 0);
    }
}
