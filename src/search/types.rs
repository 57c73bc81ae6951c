use crate::catalog::types::{CandidateFilter, SearchableEntity};
use crate::error::FieldError;
use crate::search::geo::{self, BoundingBox, GeoPoint};
use serde::{Deserialize, Serialize};

/// Raw query-string parameters, kept as strings so that every malformed
/// value can be reported per field by the normalizer.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSearchParams {
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub radius: Option<String>,
    pub min_lat: Option<String>,
    pub max_lat: Option<String>,
    pub min_lon: Option<String>,
    pub max_lon: Option<String>,
    pub categories: Option<String>,
    pub cuisines: Option<String>,
    pub price_range: Option<String>,
    pub min_rating: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// The two mutually exclusive spatial predicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpatialMode {
    Radius { center: GeoPoint, radius_km: f64 },
    Bounds(BoundingBox),
}

impl SpatialMode {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Radius { .. } => "radius",
            Self::Bounds(_) => "bounds",
        }
    }

    /// Rectangle handed to the catalog: the circle's envelope in radius
    /// mode, the viewport itself in bounds mode.
    pub fn envelope(&self) -> BoundingBox {
        match self {
            Self::Radius { center, radius_km } => geo::envelope(center, *radius_km),
            Self::Bounds(bbox) => *bbox,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub offset: usize,
}

/// Validated search request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub mode: SpatialMode,
    pub filter: CandidateFilter,
    pub page: PageRequest,
}

/// A catalog entity that passed spatial and categorical filtering.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub entity: SearchableEntity,
    /// Great-circle distance from the query center; radius mode only.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredCandidate {
    pub entity: SearchableEntity,
    pub distance_km: Option<f64>,
    pub score: f64,
}

// --- Response DTOs ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceSummary {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub categories: Vec<String>,
    pub cuisines: Vec<String>,
    pub price_range: String,
    pub rating: Option<f64>,
    pub rating_label: String,
    pub review_count: u32,
    pub promoted: bool,
    pub score: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchData {
    pub results: Vec<PlaceSummary>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    pub data: SearchData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub fields: Option<Vec<FieldError>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub catalog: String,
    pub backend: String,
}

/// Catalog reachability as observed by one health check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthReport {
    pub reachable: bool,
    pub backend: &'static str,
}

impl HealthReport {
    pub fn to_response(&self) -> HealthResponse {
        let (status, catalog) = if self.reachable {
            ("ok", "reachable")
        } else {
            ("degraded", "unreachable")
        };
        HealthResponse {
            status: status.to_string(),
            catalog: catalog.to_string(),
            backend: self.backend.to_string(),
        }
    }
}
