use super::grid::{CellKey, GeoGrid};
use super::store::CatalogStore;
use super::types::{CandidateFilter, SearchableEntity};
use crate::error::CatalogError;
use crate::search::geo::BoundingBox;

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Grid-indexed, in-process catalog.
///
/// Entities live in per-cell buckets (`cell -> id -> entity`); a second map
/// remembers each id's current cell so moves and removals touch one bucket.
pub struct InMemoryCatalog {
    cells: Arc<DashMap<CellKey, DashMap<String, SearchableEntity>>>,
    locations: Arc<DashMap<String, CellKey>>,
    grid: GeoGrid,
    region: BoundingBox,
}

impl InMemoryCatalog {
    pub fn new(grid: GeoGrid, region: BoundingBox) -> Self {
        Self {
            cells: Arc::new(DashMap::new()),
            locations: Arc::new(DashMap::new()),
            grid,
            region,
        }
    }

    /// Inserts or replaces an entity. Entities that could never be served
    /// (bad coordinates, outside the operating region, oversized vocab sets)
    /// are refused.
    pub fn upsert(&self, entity: SearchableEntity) -> Result<(), CatalogError> {
        let entity = entity.normalized();
        if let Err(reason) = entity.check_storable(&self.region) {
            tracing::warn!("Refusing entity {}: {}", entity.id, reason);
            return Err(CatalogError::Rejected(format!("{}: {}", entity.id, reason)));
        }

        let cell = self.grid.cell_of(&entity.location());
        let id = entity.id.clone();

        if let Some(previous) = self.locations.insert(id.clone(), cell) {
            if previous != cell {
                if let Some(bucket) = self.cells.get(&previous) {
                    bucket.remove(&id);
                }
            }
        }
        self.cells.entry(cell).or_default().insert(id, entity);
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Option<SearchableEntity> {
        let (_, cell) = self.locations.remove(id)?;
        let bucket = self.cells.get(&cell)?;
        bucket.remove(id).map(|(_, entity)| entity)
    }

    pub fn get(&self, id: &str) -> Option<SearchableEntity> {
        let cell = *self.locations.get(id)?;
        let bucket = self.cells.get(&cell)?;
        bucket.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    fn collect_bucket(
        bucket: &DashMap<String, SearchableEntity>,
        bbox: &BoundingBox,
        filter: &CandidateFilter,
        out: &mut Vec<SearchableEntity>,
    ) {
        for entry in bucket.iter() {
            let entity = entry.value();
            if bbox.contains(&entity.location()) && filter.matches(entity) {
                out.push(entity.clone());
            }
        }
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn find_in_box(
        &self,
        bbox: &BoundingBox,
        filter: &CandidateFilter,
    ) -> Result<Vec<SearchableEntity>, CatalogError> {
        let mut out = Vec::new();
        if !bbox.intersects(&self.region) {
            return Ok(out);
        }

        // A huge box covers more cells than exist; walk the populated ones instead.
        if self.grid.cell_count(bbox) > self.cells.len() as u64 {
            for bucket in self.cells.iter() {
                Self::collect_bucket(bucket.value(), bbox, filter, &mut out);
            }
        } else {
            for cell in self.grid.cells_covering(bbox) {
                if let Some(bucket) = self.cells.get(&cell) {
                    Self::collect_bucket(bucket.value(), bbox, filter, &mut out);
                }
            }
        }

        tracing::trace!("In-memory catalog matched {} entities", out.len());
        Ok(out)
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
