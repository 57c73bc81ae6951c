use super::assembler::assemble;
use super::locator::locate;
use super::normalizer::{normalize_bounds, normalize_radius};
use super::pagination::{Page, paginate};
use super::ranking::rank;
use super::types::{HealthReport, RawSearchParams, ScoredCandidate, SearchQuery, SearchResponse};
use crate::catalog::store::CatalogStore;
use crate::config::{AppConfig, RankingWeights, SearchLimits};
use crate::error::SearchError;
use crate::search::geo::BoundingBox;

use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Per-deployment knobs of the search pipeline.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub limits: SearchLimits,
    pub weights: RankingWeights,
    pub region: BoundingBox,
}

impl From<&AppConfig> for SearchSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            limits: config.search.clone(),
            weights: config.ranking.clone(),
            region: config.region,
        }
    }
}

/// Stateless read pipeline over an injected catalog.
///
/// normalize -> locate -> rank -> paginate -> assemble. Nothing survives a
/// call except what the catalog itself holds, so one engine serves any
/// number of concurrent requests.
pub struct SearchEngine {
    catalog: Arc<dyn CatalogStore>,
    settings: SearchSettings,
}

impl SearchEngine {
    pub fn new(catalog: Arc<dyn CatalogStore>, settings: SearchSettings) -> Self {
        Self { catalog, settings }
    }

    pub async fn search_radius(&self, raw: &RawSearchParams) -> Result<SearchResponse, SearchError> {
        let query = normalize_radius(raw, &self.settings.limits, &self.settings.region)?;
        Ok(assemble(self.execute(&query).await?))
    }

    pub async fn search_bounds(&self, raw: &RawSearchParams) -> Result<SearchResponse, SearchError> {
        let query = normalize_bounds(raw, &self.settings.limits)?;
        Ok(assemble(self.execute(&query).await?))
    }

    /// Runs a validated query and returns the requested page of ranked
    /// candidates.
    ///
    /// The catalog lookup runs under `catalog_timeout_ms`. Dropping the
    /// returned future (e.g. the client went away) cancels the lookup.
    pub async fn execute(&self, query: &SearchQuery) -> Result<Page<ScoredCandidate>, SearchError> {
        let span = tracing::info_span!(
            "search",
            request_id = %uuid::Uuid::new_v4(),
            mode = query.mode.name()
        );

        async {
            let timeout_ms = self.settings.limits.catalog_timeout_ms;
            let located = tokio::time::timeout(
                Duration::from_millis(timeout_ms),
                locate(self.catalog.as_ref(), query),
            )
            .await;

            let candidates = match located {
                Ok(Ok(candidates)) => candidates,
                Ok(Err(err)) => {
                    tracing::error!("Candidate lookup failed: {}", err);
                    return Err(err);
                }
                Err(_) => {
                    tracing::error!("Catalog lookup timed out after {} ms", timeout_ms);
                    return Err(SearchError::CatalogTimeout(timeout_ms));
                }
            };

            let ranked = rank(candidates, &self.settings.weights).inspect_err(|err| {
                tracing::error!("Ranking aborted: {}", err);
            })?;

            let page = paginate(
                ranked,
                query.page.limit,
                query.page.offset,
                self.settings.limits.max_limit,
            );
            tracing::info!(
                "Search matched {} entities, returning {} (offset {})",
                page.total,
                page.items.len(),
                page.offset
            );
            Ok(page)
        }
        .instrument(span)
        .await
    }

    /// Liveness plus catalog reachability.
    pub async fn health(&self) -> HealthReport {
        let timeout = Duration::from_millis(self.settings.limits.catalog_timeout_ms);
        let reachable = match tokio::time::timeout(timeout, self.catalog.ping()).await {
            Ok(Ok(())) => true,
            Ok(Err(err)) => {
                tracing::warn!("Catalog ping failed: {}", err);
                false
            }
            Err(_) => {
                tracing::warn!("Catalog ping timed out");
                false
            }
        };

        HealthReport {
            reachable,
            backend: self.catalog.backend(),
        }
    }
}
