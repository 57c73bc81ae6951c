use super::pagination::Page;
use super::types::{PlaceSummary, ScoredCandidate, SearchData, SearchResponse};

pub const NO_RATING_LABEL: &str = "no rating yet";

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

pub fn summarize(candidate: ScoredCandidate) -> PlaceSummary {
    let ScoredCandidate {
        entity,
        distance_km,
        score,
    } = candidate;
    let rating = entity.rating_signal();

    PlaceSummary {
        rating_label: rating.map_or_else(|| NO_RATING_LABEL.to_string(), |r| format!("{:.1}", r)),
        rating: rating.map(|r| round_to(r, 2)),
        categories: entity.categories.iter().map(|c| c.label().to_string()).collect(),
        cuisines: entity.cuisines.iter().map(|c| c.label().to_string()).collect(),
        price_range: entity.price_tier.symbol().to_string(),
        review_count: entity.review_count,
        promoted: entity.promotion > 0,
        score: round_to(score, 4),
        distance_km: distance_km.map(|d| round_to(d, 2)),
        latitude: entity.latitude,
        longitude: entity.longitude,
        address: entity.address,
        name: entity.name,
        id: entity.id,
    }
}

/// Projects a ranked page into the response envelope, keeping its order.
pub fn assemble(page: Page<ScoredCandidate>) -> SearchResponse {
    let pagination = page.meta();
    SearchResponse {
        success: true,
        data: SearchData {
            results: page.items.into_iter().map(summarize).collect(),
            pagination,
        },
    }
}
