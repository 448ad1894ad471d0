//! Category filtering over a catalog.
//!
//! Both functions are pure: they read the catalog passed in and never
//! mutate it, so results always reflect that catalog.

use crate::models::{Catalog, Record};
use std::collections::BTreeSet;

/// Categories chosen by the caller for one filter call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategorySelection {
    categories: BTreeSet<String>,
}

impl CategorySelection {
    pub fn new<I, S>(categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            categories: categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Every category present in `catalog`.
    pub fn all(catalog: &Catalog) -> Self {
        Self {
            categories: distinct_categories(catalog),
        }
    }

    pub fn contains(&self, category: &str) -> bool {
        self.categories.contains(category)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for CategorySelection {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Records whose category is in `selection`, in catalog order.
///
/// Records without a category never match.
pub fn filter_by_category<'a>(
    catalog: &'a Catalog,
    selection: &CategorySelection,
) -> Vec<&'a Record> {
    if selection.is_empty() {
        return Vec::new();
    }
    catalog
        .iter()
        .filter(|record| {
            record
                .category
                .as_deref()
                .is_some_and(|category| selection.contains(category))
        })
        .collect()
}

/// Every category value present in `catalog`, sorted.
pub fn distinct_categories(catalog: &Catalog) -> BTreeSet<String> {
    catalog
        .iter()
        .filter_map(|record| record.category.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordId;
    use std::collections::BTreeMap;

    fn record(row: &str, category: Option<&str>) -> Record {
        Record {
            id: RecordId::new("p", row),
            category: category.map(str::to_string),
            file_name: Some(format!("{row}.jpg")),
            image_url: Some(format!("https://x/image-metadata/{row}.jpg")),
            timestamp: None,
            extra: BTreeMap::new(),
        }
    }

    fn catalog(categories: &[Option<&str>]) -> Catalog {
        Catalog::from_records(
            categories
                .iter()
                .enumerate()
                .map(|(i, c)| record(&i.to_string(), *c)),
        )
    }

    fn rows(records: &[&Record]) -> Vec<String> {
        records.iter().map(|r| r.id.row_key.clone()).collect()
    }

    #[test]
    fn test_cats_scenario() {
        let catalog = catalog(&[Some("cats"), Some("dogs"), Some("cats")]);
        let result = filter_by_category(&catalog, &CategorySelection::new(["cats"]));
        assert_eq!(rows(&result), vec!["0", "2"]);
    }

    #[test]
    fn test_empty_selection_yields_nothing() {
        let catalog = catalog(&[Some("cats"), Some("dogs")]);
        assert!(filter_by_category(&catalog, &CategorySelection::empty()).is_empty());
    }

    #[test]
    fn test_unknown_category_matches_nothing() {
        let catalog = catalog(&[Some("cats")]);
        let selection = CategorySelection::new(["birds", "cats"]);
        assert_eq!(rows(&filter_by_category(&catalog, &selection)), vec!["0"]);
        assert!(filter_by_category(&catalog, &CategorySelection::new(["birds"])).is_empty());
    }

    #[test]
    fn test_full_selection_returns_catalog_in_order() {
        let catalog = catalog(&[Some("b"), Some("a"), Some("c"), Some("a")]);
        let all = CategorySelection::all(&catalog);
        let result = filter_by_category(&catalog, &all);
        assert_eq!(rows(&result), vec!["0", "1", "2", "3"]);
    }

    #[test]
    fn test_records_without_category_never_match() {
        let catalog = catalog(&[Some("cats"), None, Some("cats")]);
        let result = filter_by_category(&catalog, &CategorySelection::all(&catalog));
        assert_eq!(rows(&result), vec!["0", "2"]);
    }

    #[test]
    fn test_deterministic() {
        let catalog = catalog(&[Some("x"), Some("y"), Some("x"), Some("z")]);
        let selection: CategorySelection = ["x", "z"].into_iter().collect();
        let first = filter_by_category(&catalog, &selection);
        let second = filter_by_category(&catalog, &selection);
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_categories() {
        let catalog = catalog(&[Some("dogs"), Some("cats"), None, Some("dogs")]);
        let categories: Vec<_> = distinct_categories(&catalog).into_iter().collect();
        assert_eq!(categories, vec!["cats", "dogs"]);
    }
}
