//! Error types shared by the catalog and search layers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single rejected query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Parameter name as it appears on the wire (e.g. `minRating`).
    pub field: String,
    /// Machine-readable reason (`missing`, `invalid_number`, `out_of_range`, ...).
    pub reason: String,
    /// The rejected raw value, if one was supplied.
    pub value: Option<String>,
}

/// Every offending field of a search request, never just the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("invalid search parameters: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{} ({})", f.field, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ValidationError {
    pub fn push(&mut self, field: &str, reason: &str, value: Option<&str>) {
        self.fields.push(FieldError {
            field: field.to_string(),
            reason: reason.to_string(),
            value: value.map(str::to_string),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog returned malformed data: {0}")]
    Malformed(String),

    #[error("entity rejected by catalog: {0}")]
    Rejected(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        Self::Unavailable(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("catalog lookup exceeded {0} ms")]
    CatalogTimeout(u64),

    #[error("internal invariant violated: {0}")]
    Invariant(String),
}

impl SearchError {
    /// Stable identifier used in the error envelope.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::Catalog(_) => "catalog_unavailable",
            Self::CatalogTimeout(_) => "catalog_timeout",
            Self::Invariant(_) => "internal",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("cannot parse config {path}: {message}")]
    Parse { path: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
