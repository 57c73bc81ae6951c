//! Shared fixtures for unit tests.

use crate::catalog::grid::GeoGrid;
use crate::catalog::memory::InMemoryCatalog;
use crate::catalog::types::{Category, Cuisine, ListingStatus, PriceTier, SearchableEntity};
use crate::search::geo::{BoundingBox, EARTH_RADIUS_KM, GeoPoint};
use std::collections::BTreeSet;

pub const CITY_CENTER: GeoPoint = GeoPoint::new(53.90, 27.56);

/// Published, unrated, unpromoted restaurant at the given point.
pub fn place(id: &str, latitude: f64, longitude: f64) -> SearchableEntity {
    SearchableEntity {
        id: id.to_string(),
        name: format!("Place {id}"),
        address: None,
        latitude,
        longitude,
        status: ListingStatus::Published,
        categories: BTreeSet::from([Category::Restaurant]),
        cuisines: BTreeSet::from([Cuisine::European]),
        price_tier: PriceTier::Moderate,
        rating: None,
        review_count: 0,
        promotion: 0,
    }
}

/// `place` located `km` due north of `origin`; the great-circle distance
/// along a meridian is exactly `km`.
pub fn place_north_of(id: &str, origin: GeoPoint, km: f64) -> SearchableEntity {
    let dlat = (km / EARTH_RADIUS_KM).to_degrees();
    place(id, origin.latitude + dlat, origin.longitude)
}

pub fn rated(mut entity: SearchableEntity, rating: f64, reviews: u32) -> SearchableEntity {
    entity.rating = Some(rating);
    entity.review_count = reviews;
    entity
}

pub fn test_region() -> BoundingBox {
    BoundingBox::new(51.25, 56.20, 23.15, 32.80)
}

pub fn catalog_with(entities: Vec<SearchableEntity>) -> InMemoryCatalog {
    let catalog = InMemoryCatalog::new(GeoGrid::new(0.05), test_region());
    for entity in entities {
        catalog.upsert(entity).unwrap();
    }
    catalog
}
