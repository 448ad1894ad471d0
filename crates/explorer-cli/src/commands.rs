//! Subcommand implementations.
//!
//! Each command loads the catalog through the shared [`ExplorerApi`] and
//! writes its report to the given writer, so tests can capture the output.

use anyhow::{Context, Result};
use explorer_core::{
    distinct_categories, filter_by_category, Catalog, CategorySelection, ExplorerApi,
    GalleryItem, GalleryPage, Record,
};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options for the `gallery` command.
#[derive(Debug, Clone)]
pub struct GalleryOptions {
    pub out_dir: PathBuf,
    pub categories: Vec<String>,
    /// One-based page number.
    pub page: usize,
    pub page_size: usize,
    pub concurrency: usize,
}

/// Summary of one gallery run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GallerySummary {
    pub written: usize,
    pub failed: usize,
}

/// Selection for `requested`, or every category in the catalog when empty.
fn selection_for(requested: &[String], catalog: &Catalog) -> CategorySelection {
    if requested.is_empty() {
        CategorySelection::all(catalog)
    } else {
        requested.iter().cloned().collect()
    }
}

pub async fn categories(api: &ExplorerApi, out: &mut impl Write) -> Result<()> {
    let catalog = api.load_catalog().await?;
    for category in distinct_categories(&catalog) {
        writeln!(out, "{}", category)?;
    }
    Ok(())
}

pub async fn list(api: &ExplorerApi, categories: &[String], out: &mut impl Write) -> Result<()> {
    let catalog = api.load_catalog().await?;
    let selection = selection_for(categories, &catalog);
    let records = filter_by_category(&catalog, &selection);

    for record in &records {
        writeln!(out, "{}", list_line(record))?;
    }
    writeln!(
        out,
        "{} of {} records shown, {} missing required fields",
        records.len(),
        catalog.len(),
        catalog.unusable_count()
    )?;
    Ok(())
}

fn list_line(record: &Record) -> String {
    format!(
        "{}\t{}\t{}\t{}",
        record.id,
        record.category.as_deref().unwrap_or("-"),
        record.file_name.as_deref().unwrap_or("-"),
        record.image_url.as_deref().unwrap_or("-"),
    )
}

pub async fn gallery(
    api: &ExplorerApi,
    options: &GalleryOptions,
    out: &mut impl Write,
) -> Result<GallerySummary> {
    let catalog = api.load_catalog().await?;
    let selection = selection_for(&options.categories, &catalog);
    let records = filter_by_category(&catalog, &selection);
    let page = GalleryPage::of(&records, options.page.saturating_sub(1), options.page_size)?;

    writeln!(
        out,
        "Page {} of {} ({} matching records)",
        options.page,
        page.total_pages.max(1),
        page.total_records
    )?;

    tokio::fs::create_dir_all(&options.out_dir)
        .await
        .with_context(|| format!("Failed to create {}", options.out_dir.display()))?;

    let items = api.fetch_gallery_page(&page, options.concurrency).await;
    let mut summary = GallerySummary::default();
    let mut used_names = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let image = match &item.outcome {
            Ok(image) => image,
            Err(err) => {
                summary.failed += 1;
                writeln!(out, "{}\t[image unavailable: {}]", item.caption(), err)?;
                continue;
            }
        };

        let name = unique_file_name(output_file_name(item, index), &mut used_names);
        let path = options.out_dir.join(name);
        match tokio::fs::write(&path, image.as_ref()).await {
            Ok(()) => {
                summary.written += 1;
                debug!("Wrote {} ({} bytes)", path.display(), image.len());
                writeln!(out, "{}\t{}", item.caption(), path.display())?;
            }
            Err(err) => {
                summary.failed += 1;
                warn!("Failed to write {}: {}", path.display(), err);
                writeln!(out, "{}\t[write failed: {}]", item.caption(), err)?;
            }
        }
    }

    info!(
        "Gallery page {}: {} written, {} unavailable",
        options.page, summary.written, summary.failed
    );
    Ok(summary)
}

/// File name for a gallery image: the last component of the caption, so a
/// record can never write outside the output directory.
///
/// Falls back to the row key, then to a name built from `index`.
fn output_file_name(item: &GalleryItem<'_>, index: usize) -> String {
    let usable = |name: &str| !name.is_empty() && name != "." && name != "..";

    let caption = item.caption();
    let name = caption.rsplit(['/', '\\']).next().unwrap_or(caption).trim();
    if usable(name) {
        return name.to_string();
    }
    let row_key = item.record.id.row_key.replace(['/', '\\'], "_");
    if usable(row_key.trim()) {
        return row_key.trim().to_string();
    }
    format!("image-{}", index + 1)
}

/// `name`, or `stem-N.ext` with the first free `N` when `name` is taken.
fn unique_file_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }

    let path = Path::new(&name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(&name)
        .to_string();
    let extension = path.extension().and_then(|e| e.to_str()).map(str::to_string);

    (1..)
        .map(|n| match &extension {
            Some(ext) => format!("{}-{}.{}", stem, n, ext),
            None => format!("{}-{}", stem, n),
        })
        .find(|candidate| used.insert(candidate.clone()))
        .unwrap_or(name)
}
