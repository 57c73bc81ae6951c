use super::types::{Candidate, SearchQuery, SpatialMode};
use crate::catalog::store::CatalogStore;
use crate::catalog::types::SearchableEntity;
use crate::error::SearchError;
use crate::search::geo::haversine_km;

/// Distances this close to the radius still count as inside it.
const RADIUS_TOLERANCE_KM: f64 = 1e-9;

/// Fetches the exact candidate set for `query`.
///
/// Phase one asks the catalog for the rectangle (the radius envelope in
/// radius mode) with the categorical filter pushed down; phase two keeps
/// only entities whose great-circle distance is within the radius and
/// records that distance.
pub async fn locate(
    catalog: &dyn CatalogStore,
    query: &SearchQuery,
) -> Result<Vec<Candidate>, SearchError> {
    let envelope = query.mode.envelope();
    let entities = catalog.find_in_box(&envelope, &query.filter).await?;
    let coarse = entities.len();

    let mut candidates = Vec::with_capacity(coarse);
    for entity in entities {
        ensure_located(&entity)?;
        match query.mode {
            SpatialMode::Radius { center, radius_km } => {
                let distance = haversine_km(&center, &entity.location());
                if distance <= radius_km + RADIUS_TOLERANCE_KM {
                    candidates.push(Candidate {
                        entity,
                        distance_km: Some(distance),
                    });
                }
            }
            SpatialMode::Bounds(bbox) => {
                if bbox.contains(&entity.location()) {
                    candidates.push(Candidate {
                        entity,
                        distance_km: None,
                    });
                }
            }
        }
    }

    tracing::debug!(
        "Located {} of {} coarse candidates ({} mode)",
        candidates.len(),
        coarse,
        query.mode.name()
    );
    Ok(candidates)
}

/// A candidate without a usable location means upstream data corruption.
pub fn ensure_located(entity: &SearchableEntity) -> Result<(), SearchError> {
    if entity.location().is_valid() {
        Ok(())
    } else {
        Err(SearchError::Invariant(format!(
            "entity {} has undefined location ({}, {})",
            entity.id, entity.latitude, entity.longitude
        )))
    }
}
