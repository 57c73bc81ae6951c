//! Search Service Module
//!
//! Finds published places near a point or inside a map viewport and orders
//! them by relevance.
//!
//! ## Pipeline
//! raw request -> **normalizer** -> **locator** (envelope lookup + exact
//! geodesic refinement) -> **ranking** -> **pagination** -> **assembler**.
//! `engine` wires the stages together over an injected `CatalogStore`;
//! `handlers` exposes them over HTTP.
//!
//! ## Submodules
//! - **`geo`**: haversine distance and radius envelopes.
//! - **`normalizer`**: parameter parsing and per-field validation.
//! - **`locator`**: two-phase spatial filtering.
//! - **`ranking`**: composite score and the deterministic tie-break chain.
//! - **`pagination`**: offset/limit slicing with continuation metadata.
//! - **`assembler`**: projection into response DTOs.
//! - **`types`**: queries, candidates and DTOs.

pub mod assembler;
pub mod engine;
pub mod geo;
pub mod handlers;
pub mod locator;
pub mod normalizer;
pub mod pagination;
pub mod ranking;
pub mod types;
