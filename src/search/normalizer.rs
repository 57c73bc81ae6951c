//! Query normalization: raw strings in, a validated `SearchQuery` out.
//!
//! Every field is checked even after an earlier one failed, so callers get
//! the full list of problems in one response.

use super::types::{PageRequest, RawSearchParams, SearchQuery, SpatialMode};
use crate::catalog::types::{
    CandidateFilter, Category, Cuisine, MAX_RATING, MIN_RATING, PriceTier,
};
use crate::config::SearchLimits;
use crate::error::ValidationError;
use crate::search::geo::{BoundingBox, GeoPoint};
use std::collections::BTreeSet;

pub const REASON_MISSING: &str = "missing";
pub const REASON_INVALID_NUMBER: &str = "invalid_number";
pub const REASON_OUT_OF_RANGE: &str = "out_of_range";
pub const REASON_OUTSIDE_REGION: &str = "outside_operating_region";
pub const REASON_UNKNOWN_TOKEN: &str = "unknown_token";
pub const REASON_INVALID_BOUNDS: &str = "invalid_bounds";
pub const REASON_DUPLICATE: &str = "duplicate";
pub const REASON_MALFORMED_QUERY: &str = "malformed_query";

/// Builds `RawSearchParams` from decoded query pairs.
///
/// Repeated `categories` / `cuisines` merge into one comma list; any other
/// repeated parameter is a `duplicate` error. Unknown keys are ignored.
pub fn collect_params(pairs: Vec<(String, String)>) -> Result<RawSearchParams, ValidationError> {
    let mut raw = RawSearchParams::default();
    let mut errors = ValidationError::default();

    for (key, value) in pairs {
        let slot = match key.as_str() {
            "latitude" => &mut raw.latitude,
            "longitude" => &mut raw.longitude,
            "radius" => &mut raw.radius,
            "minLat" => &mut raw.min_lat,
            "maxLat" => &mut raw.max_lat,
            "minLon" => &mut raw.min_lon,
            "maxLon" => &mut raw.max_lon,
            "categories" => &mut raw.categories,
            "cuisines" => &mut raw.cuisines,
            "priceRange" => &mut raw.price_range,
            "minRating" => &mut raw.min_rating,
            "limit" => &mut raw.limit,
            "offset" => &mut raw.offset,
            _ => continue,
        };

        let is_list = matches!(key.as_str(), "categories" | "cuisines");
        if let Some(existing) = slot.as_mut() {
            if is_list {
                existing.push(',');
                existing.push_str(&value);
            } else if !errors.has_field(&key) {
                errors.push(&key, REASON_DUPLICATE, Some(&value));
            }
        } else {
            *slot = Some(value);
        }
    }

    if errors.is_empty() { Ok(raw) } else { Err(errors) }
}

pub fn normalize_radius(
    raw: &RawSearchParams,
    limits: &SearchLimits,
    region: &BoundingBox,
) -> Result<SearchQuery, ValidationError> {
    let mut errors = ValidationError::default();

    let latitude = required_f64(&mut errors, "latitude", raw.latitude.as_deref());
    let longitude = required_f64(&mut errors, "longitude", raw.longitude.as_deref());

    let latitude = latitude.filter(|lat| {
        in_range(&mut errors, "latitude", *lat, -90.0, 90.0)
            && within(&mut errors, "latitude", *lat, region.min_lat, region.max_lat)
    });
    let longitude = longitude.filter(|lon| {
        in_range(&mut errors, "longitude", *lon, -180.0, 180.0)
            && within(&mut errors, "longitude", *lon, region.min_lon, region.max_lon)
    });

    let radius_km = match optional_f64(&mut errors, "radius", raw.radius.as_deref()) {
        None => Some(limits.default_radius_km),
        Some(r) if r > 0.0 => Some(r.min(limits.max_radius_km)),
        Some(_) => {
            errors.push("radius", REASON_OUT_OF_RANGE, present(raw.radius.as_deref()));
            None
        }
    };

    let filter = parse_filter(&mut errors, raw);
    let page = parse_page(&mut errors, raw, limits, true);

    match (latitude, longitude, radius_km, page) {
        (Some(latitude), Some(longitude), Some(radius_km), Some(page)) if errors.is_empty() => {
            Ok(SearchQuery {
                mode: SpatialMode::Radius {
                    center: GeoPoint::new(latitude, longitude),
                    radius_km,
                },
                filter,
                page,
            })
        }
        _ => Err(errors),
    }
}

/// Bounds (map viewport) mode. Paging is limit-only; `offset` is ignored.
pub fn normalize_bounds(
    raw: &RawSearchParams,
    limits: &SearchLimits,
) -> Result<SearchQuery, ValidationError> {
    let mut errors = ValidationError::default();

    let min_lat = required_f64(&mut errors, "minLat", raw.min_lat.as_deref())
        .filter(|v| in_range(&mut errors, "minLat", *v, -90.0, 90.0));
    let max_lat = required_f64(&mut errors, "maxLat", raw.max_lat.as_deref())
        .filter(|v| in_range(&mut errors, "maxLat", *v, -90.0, 90.0));
    let min_lon = required_f64(&mut errors, "minLon", raw.min_lon.as_deref())
        .filter(|v| in_range(&mut errors, "minLon", *v, -180.0, 180.0));
    let max_lon = required_f64(&mut errors, "maxLon", raw.max_lon.as_deref())
        .filter(|v| in_range(&mut errors, "maxLon", *v, -180.0, 180.0));

    if let (Some(lo), Some(hi)) = (min_lat, max_lat) {
        if lo >= hi {
            errors.push("maxLat", REASON_INVALID_BOUNDS, raw.max_lat.as_deref());
        }
    }
    if let (Some(lo), Some(hi)) = (min_lon, max_lon) {
        if lo >= hi {
            errors.push("maxLon", REASON_INVALID_BOUNDS, raw.max_lon.as_deref());
        }
    }

    let filter = parse_filter(&mut errors, raw);
    let page = parse_page(&mut errors, raw, limits, false);

    match (min_lat, max_lat, min_lon, max_lon, page) {
        (Some(min_lat), Some(max_lat), Some(min_lon), Some(max_lon), Some(page))
            if errors.is_empty() =>
        {
            Ok(SearchQuery {
                mode: SpatialMode::Bounds(BoundingBox::new(min_lat, max_lat, min_lon, max_lon)),
                filter,
                page,
            })
        }
        _ => Err(errors),
    }
}

fn parse_filter(errors: &mut ValidationError, raw: &RawSearchParams) -> CandidateFilter {
    let categories = token_set(errors, "categories", raw.categories.as_deref(), Category::from_token);
    let cuisines = token_set(errors, "cuisines", raw.cuisines.as_deref(), Cuisine::from_token);

    let price_tier = present(raw.price_range.as_deref()).and_then(|token| {
        let tier = PriceTier::from_token(token);
        if tier.is_none() {
            errors.push("priceRange", REASON_UNKNOWN_TOKEN, Some(token));
        }
        tier
    });

    let min_rating = optional_f64(errors, "minRating", raw.min_rating.as_deref())
        .filter(|r| in_range(errors, "minRating", *r, MIN_RATING, MAX_RATING));

    CandidateFilter {
        categories,
        cuisines,
        price_tier,
        min_rating,
    }
}

fn parse_page(
    errors: &mut ValidationError,
    raw: &RawSearchParams,
    limits: &SearchLimits,
    allow_offset: bool,
) -> Option<PageRequest> {
    let limit = match optional_i64(errors, "limit", raw.limit.as_deref()) {
        None if present(raw.limit.as_deref()).is_some() => None,
        None => Some(limits.default_limit),
        Some(l) if l >= 1 => Some((l as u64).min(limits.max_limit as u64) as usize),
        Some(l) => {
            errors.push("limit", REASON_OUT_OF_RANGE, Some(l.to_string().as_str()));
            None
        }
    };

    let offset = if allow_offset {
        match optional_i64(errors, "offset", raw.offset.as_deref()) {
            None if present(raw.offset.as_deref()).is_some() => None,
            None => Some(0),
            Some(o) if o >= 0 => Some(o as usize),
            Some(o) => {
                errors.push("offset", REASON_OUT_OF_RANGE, Some(o.to_string().as_str()));
                None
            }
        }
    } else {
        Some(0)
    };

    Some(PageRequest {
        limit: limit?,
        offset: offset?,
    })
}

/// Empty and whitespace-only values count as absent.
fn present(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn optional_f64(errors: &mut ValidationError, field: &str, raw: Option<&str>) -> Option<f64> {
    let value = present(raw)?;
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => {
            errors.push(field, REASON_INVALID_NUMBER, Some(value));
            None
        }
    }
}

fn required_f64(errors: &mut ValidationError, field: &str, raw: Option<&str>) -> Option<f64> {
    if present(raw).is_none() {
        errors.push(field, REASON_MISSING, None);
        return None;
    }
    optional_f64(errors, field, raw)
}

fn optional_i64(errors: &mut ValidationError, field: &str, raw: Option<&str>) -> Option<i64> {
    let value = present(raw)?;
    match value.parse::<i64>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.push(field, REASON_INVALID_NUMBER, Some(value));
            None
        }
    }
}

fn in_range(errors: &mut ValidationError, field: &str, value: f64, lo: f64, hi: f64) -> bool {
    if (lo..=hi).contains(&value) {
        true
    } else {
        errors.push(field, REASON_OUT_OF_RANGE, Some(value.to_string().as_str()));
        false
    }
}

fn within(errors: &mut ValidationError, field: &str, value: f64, lo: f64, hi: f64) -> bool {
    if (lo..=hi).contains(&value) {
        true
    } else {
        errors.push(field, REASON_OUTSIDE_REGION, Some(value.to_string().as_str()));
        false
    }
}

fn token_set<T: Ord>(
    errors: &mut ValidationError,
    field: &str,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> BTreeSet<T> {
    let Some(raw) = present(raw) else {
        return BTreeSet::new();
    };

    let mut out = BTreeSet::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse(token) {
            Some(value) => {
                out.insert(value);
            }
            None => errors.push(field, REASON_UNKNOWN_TOKEN, Some(token)),
        }
    }
    out
}
