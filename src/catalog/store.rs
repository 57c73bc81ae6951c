use super::types::{CandidateFilter, SearchableEntity};
use crate::error::CatalogError;
use crate::search::geo::BoundingBox;

use async_trait::async_trait;

/// Read contract the search engine needs from whatever owns the listings.
///
/// Implementations must return exactly the entities inside `bbox` (edges
/// inclusive) that satisfy `filter`; they may be slow and are awaited under
/// a deadline by the caller.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_in_box(
        &self,
        bbox: &BoundingBox,
        filter: &CandidateFilter,
    ) -> Result<Vec<SearchableEntity>, CatalogError>;

    /// Cheap reachability check for the health endpoint.
    async fn ping(&self) -> Result<(), CatalogError>;

    /// Short human-readable backend name for logs.
    fn backend(&self) -> &'static str;
}
