use super::memory::InMemoryCatalog;
use super::types::SearchableEntity;
use crate::error::CatalogError;

use serde::Serialize;
use std::path::Path;

/// Outcome of loading a seed file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Loads a JSON array of entities into `catalog`.
///
/// Rows the catalog refuses are counted and logged, not fatal; an unreadable
/// or non-JSON file is.
pub fn load_seed_file(path: &Path, catalog: &InMemoryCatalog) -> Result<LoadReport, CatalogError> {
    let content = std::fs::read_to_string(path)?;
    let entities: Vec<SearchableEntity> = serde_json::from_str(&content)?;
    let report = load_entities(entities, catalog);

    tracing::info!(
        "Loaded {} entities from {} ({} skipped)",
        report.loaded,
        path.display(),
        report.skipped
    );
    Ok(report)
}

pub fn load_entities(
    entities: impl IntoIterator<Item = SearchableEntity>,
    catalog: &InMemoryCatalog,
) -> LoadReport {
    let mut report = LoadReport::default();
    for entity in entities {
        match catalog.upsert(entity) {
            Ok(()) => report.loaded += 1,
            Err(_) => report.skipped += 1,
        }
    }
    report
}
