//! Service Configuration
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `GEO_DISCOVERY_*` environment variables. Command-line flags are applied last
//! by `main.rs`.
//!
//! ## Sections
//! - **`server`**: HTTP bind address.
//! - **`search`**: radius and page-size limits, catalog deadline.
//! - **`ranking`**: composite score weights (business-tunable).
//! - **`region`**: operating envelope; radius-search centers must fall inside it.
//! - **`catalog`**: where entities come from (seed file or remote CRUD service).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::search::geo::BoundingBox;

pub const ENV_BIND: &str = "GEO_DISCOVERY_BIND";
pub const ENV_CATALOG_URL: &str = "GEO_DISCOVERY_CATALOG_URL";
pub const ENV_SEED: &str = "GEO_DISCOVERY_SEED";

/// Smallest grid cell accepted; finer cells overflow the `i32` cell keys.
pub const MIN_GRID_CELL_DEG: f64 = 1e-4;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub search: SearchLimits,
    pub ranking: RankingWeights,
    pub region: BoundingBox,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 8080)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchLimits {
    pub default_radius_km: f64,
    pub max_radius_km: f64,
    pub default_limit: usize,
    pub max_limit: usize,
    /// Deadline for a single catalog lookup.
    pub catalog_timeout_ms: u64,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            default_radius_km: 10.0,
            max_radius_km: 50.0,
            default_limit: 20,
            max_limit: 100,
            catalog_timeout_ms: 2_000,
        }
    }
}

/// Weights and shaping constants of the composite relevance score.
///
/// Each signal is normalized to [0, 1] before weighting, so a weight is also
/// the largest share of the score that signal can ever contribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub proximity: f64,
    pub quality: f64,
    pub popularity: f64,
    pub promotion: f64,
    /// Quality signal assigned to entities with no reviews yet.
    pub unrated_quality: f64,
    /// Review count at which the popularity signal reaches 1.0.
    pub popularity_saturation: u32,
    /// Promotion weight at which the promotion signal reaches 1.0.
    pub promotion_cap: u32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            proximity: 0.40,
            quality: 0.35,
            popularity: 0.15,
            promotion: 0.10,
            unrated_quality: 0.40,
            popularity_saturation: 500,
            promotion_cap: 100,
        }
    }
}

impl Default for BoundingBox {
    /// Belarus national envelope.
    fn default() -> Self {
        Self::new(51.25, 56.20, 23.15, 32.80)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON file with entities loaded into the in-memory catalog at startup.
    pub seed_path: Option<PathBuf>,
    /// Base URL of the external catalog service; takes precedence over `seed_path`.
    pub remote_url: Option<String>,
    /// Grid cell edge, in degrees, of the in-memory spatial index.
    pub grid_cell_deg: f64,
    /// Cap on the size of one remote catalog response.
    pub max_response_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_path: None,
            remote_url: None,
            grid_cell_deg: 0.05,
            max_response_bytes: crate::catalog::remote::DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl AppConfig {
    /// Loads `path` if given (a missing file is an error), otherwise defaults,
    /// then applies environment overrides and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(bind) = std::env::var(ENV_BIND) {
            self.server.bind = bind
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("{ENV_BIND}={bind}: {e}")))?;
        }
        if let Ok(url) = std::env::var(ENV_CATALOG_URL) {
            self.catalog.remote_url = Some(url);
        }
        if let Ok(seed) = std::env::var(ENV_SEED) {
            self.catalog.seed_path = Some(PathBuf::from(seed));
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let s = &self.search;
        if !(s.max_radius_km.is_finite() && s.max_radius_km > 0.0) {
            return Err(ConfigError::Invalid(
                "search.max_radius_km must be positive".to_string(),
            ));
        }
        if !(s.default_radius_km > 0.0 && s.default_radius_km <= s.max_radius_km) {
            return Err(ConfigError::Invalid(
                "search.default_radius_km must lie in (0, max_radius_km]".to_string(),
            ));
        }
        if s.max_limit == 0 || s.default_limit == 0 || s.default_limit > s.max_limit {
            return Err(ConfigError::Invalid(
                "search.default_limit must lie in [1, max_limit]".to_string(),
            ));
        }
        if s.catalog_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "search.catalog_timeout_ms must be positive".to_string(),
            ));
        }

        let r = &self.ranking;
        let weights = [r.proximity, r.quality, r.popularity, r.promotion];
        if weights.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::Invalid(
                "ranking weights must be finite and non-negative".to_string(),
            ));
        }
        // Zero would score an unrated listing exactly like a one-star one.
        if !(r.unrated_quality > 0.0 && r.unrated_quality <= 1.0) {
            return Err(ConfigError::Invalid(
                "ranking.unrated_quality must lie in (0, 1]".to_string(),
            ));
        }
        if r.popularity_saturation == 0 || r.promotion_cap == 0 {
            return Err(ConfigError::Invalid(
                "ranking.popularity_saturation and ranking.promotion_cap must be positive"
                    .to_string(),
            ));
        }

        if !self.region.is_well_formed() {
            return Err(ConfigError::Invalid(
                "region must be a non-empty rectangle of valid coordinates".to_string(),
            ));
        }
        let cell = self.catalog.grid_cell_deg;
        if !(cell.is_finite() && (MIN_GRID_CELL_DEG..=180.0).contains(&cell)) {
            return Err(ConfigError::Invalid(format!(
                "catalog.grid_cell_deg must lie in [{MIN_GRID_CELL_DEG}, 180]"
            )));
        }
        if self.catalog.max_response_bytes == 0 {
            return Err(ConfigError::Invalid(
                "catalog.max_response_bytes must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
