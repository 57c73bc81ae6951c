//! Geospatial Discovery Library
//!
//! This library crate defines the modules behind the discovery service
//! binary (`main.rs`): finding published places near a point or inside a map
//! viewport, and ordering them by relevance.
//!
//! ## Architecture Modules
//! - **`catalog`**: The read side of the place catalog. A `CatalogStore` trait
//!   with an in-memory grid-indexed backend and an HTTP backend that pulls the
//!   searchable projection from the catalog service.
//! - **`config`**: TOML configuration with environment overrides.
//! - **`error`**: Error taxonomy shared by every layer.
//! - **`search`**: The query pipeline (normalize, locate, rank, paginate,
//!   assemble) and its HTTP surface.

pub mod catalog;
pub mod config;
pub mod error;
pub mod search;

#[cfg(test)]
mod test_support;
