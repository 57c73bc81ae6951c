//! Catalog Access Module
//!
//! The read side of the listing catalog. The search engine never mutates
//! listings; it only asks a `CatalogStore` for the entities inside a
//! rectangle that pass a categorical filter.
//!
//! ## Core Concepts
//! - **Projection**: `SearchableEntity` is a denormalized view of a listing
//!   (location, vocabularies, rating, promotion).
//! - **Coarse index**: `GeoGrid` buckets entities into fixed lat/lon cells so
//!   box lookups touch only nearby buckets.
//! - **Backends**: `InMemoryCatalog` (seeded from a JSON file) and
//!   `HttpCatalog` (the external CRUD service) implement the same trait.

pub mod grid;
pub mod loader;
pub mod memory;
pub mod remote;
pub mod store;
pub mod types;
