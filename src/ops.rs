use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::catalog::{self, CatalogEntry, MergedBooks};
use crate::config::Config;
use crate::extract;

/// Genre pages in `dir`, in lexicographic filename order so repeated runs
/// visit sources identically.
pub fn discover_genre_pages(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read source directory {}", dir.display()))?;

    let mut pages = Vec::new();
    for entry in entries {
        let entry = entry
            .with_context(|| format!("Failed to read source directory {}", dir.display()))?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if name.starts_with("genre_") && name.ends_with(".html") {
            pages.push(entry.path());
        }
    }
    pages.sort();
    Ok(pages)
}

/// One full catalog run: read every genre page, merge the extracted records,
/// and write the catalog. Returns the number of books written.
pub fn run_generate(config: &Config) -> Result<usize> {
    let pages = discover_genre_pages(&config.source_dir)?;
    tracing::info!(
        "Found {} genre pages in {}",
        pages.len(),
        config.source_dir.display()
    );

    let mut books = MergedBooks::new();
    for page in &pages {
        let text = fs::read_to_string(page)
            .with_context(|| format!("Failed to read {}", page.display()))?;
        let records = extract::extract_books(&text);
        tracing::debug!("Extracted {} records from {}", records.len(), page.display());
        catalog::merge_records(&mut books, records);
    }

    let entries = catalog::build_catalog(books);
    write_catalog(&config.output_path, &entries)?;
    tracing::info!("Catalog written to {}", config.output_path.display());

    Ok(entries.len())
}

// Serialize to a temp file in the destination directory, then rename over
// the final path. A failed run leaves any previous catalog untouched.
fn write_catalog(path: &Path, entries: &[CatalogEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialize catalog")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .context("Failed to write catalog")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(())
}
