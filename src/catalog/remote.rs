use super::store::CatalogStore;
use super::types::{CandidateFilter, SearchableEntity};
use crate::error::CatalogError;
use crate::search::geo::BoundingBox;

use async_trait::async_trait;
use std::time::Duration;

/// Search-index projection endpoint exposed by the catalog service.
pub const ENDPOINT_SEARCH_INDEX: &str = "/internal/search-index";
/// Liveness endpoint of the catalog service.
pub const ENDPOINT_HEALTH: &str = "/health";
/// Largest search-index response accepted from the catalog service.
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Catalog owned by the external CRUD service, read over HTTP.
///
/// Only the rectangle is pushed down; visibility and categorical filters are
/// re-applied locally so a misbehaving upstream cannot leak hidden listings.
/// Failures are reported immediately, never retried here.
pub struct HttpCatalog {
    http_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    max_body_bytes: usize,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl CatalogStore for HttpCatalog {
    async fn find_in_box(
        &self,
        bbox: &BoundingBox,
        filter: &CandidateFilter,
    ) -> Result<Vec<SearchableEntity>, CatalogError> {
        let url = format!("{}{}", self.base_url, ENDPOINT_SEARCH_INDEX);
        let mut response = self
            .http_client
            .get(url)
            .query(&[
                ("minLat", bbox.min_lat),
                ("maxLat", bbox.max_lat),
                ("minLon", bbox.min_lon),
                ("maxLon", bbox.max_lon),
            ])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CatalogError::Unavailable(format!(
                "catalog responded with status {}",
                response.status()
            )));
        }

        let too_large = || {
            CatalogError::Malformed(format!(
                "response body exceeds {} bytes",
                self.max_body_bytes
            ))
        };
        if response
            .content_length()
            .is_some_and(|len| len > self.max_body_bytes as u64)
        {
            return Err(too_large());
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }

        let entities: Vec<SearchableEntity> = serde_json::from_slice(&body)
            .map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let total = entities.len();
        let matched: Vec<SearchableEntity> = entities
            .into_iter()
            .map(SearchableEntity::normalized)
            .filter(|e| bbox.contains(&e.location()) && filter.matches(e))
            .collect();

        tracing::debug!(
            "Remote catalog returned {} entities, {} after local filtering",
            total,
            matched.len()
        );
        Ok(matched)
    }

    async fn ping(&self) -> Result<(), CatalogError> {
        let url = format!("{}{}", self.base_url, ENDPOINT_HEALTH);
        let response = self
            .http_client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(CatalogError::Unavailable(format!(
                "catalog health returned status {}",
                response.status()
            )))
        }
    }

    fn backend(&self) -> &'static str {
        "http"
    }
}
