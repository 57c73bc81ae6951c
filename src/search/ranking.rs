//! Composite relevance scoring and the deterministic result order.
//!
//! Every signal is mapped into [0, 1] and multiplied by its configured
//! weight. Proximity only exists in radius mode. Unrated entities get a
//! neutral quality prior instead of a zero, so a listing without reviews is
//! never scored like a one-star listing. They still form their own bucket
//! ordered after every rated listing.

use super::locator::ensure_located;
use super::types::{Candidate, ScoredCandidate};
use crate::catalog::types::{MAX_RATING, MIN_RATING, SearchableEntity};
use crate::config::RankingWeights;
use crate::error::SearchError;
use std::cmp::Ordering;

/// Normalized ranking inputs of one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Signals {
    pub proximity: Option<f64>,
    pub quality: f64,
    pub popularity: f64,
    pub promotion: f64,
}

pub fn proximity(distance_km: f64) -> f64 {
    1.0 / (1.0 + distance_km.max(0.0))
}

pub fn quality(entity: &SearchableEntity, weights: &RankingWeights) -> f64 {
    match entity.rating_signal() {
        Some(rating) => (rating.clamp(MIN_RATING, MAX_RATING) - MIN_RATING) / (MAX_RATING - MIN_RATING),
        None => weights.unrated_quality,
    }
}

/// Logarithmic so that ten times the reviews is worth far less than ten
/// times the score.
pub fn popularity(review_count: u32, weights: &RankingWeights) -> f64 {
    let saturation = f64::from(weights.popularity_saturation.max(1));
    (f64::from(review_count).ln_1p() / saturation.ln_1p()).min(1.0)
}

pub fn promotion(weight: u32, weights: &RankingWeights) -> f64 {
    let cap = weights.promotion_cap.max(1);
    f64::from(weight.min(cap)) / f64::from(cap)
}

pub fn signals(candidate: &Candidate, weights: &RankingWeights) -> Signals {
    let entity = &candidate.entity;
    Signals {
        proximity: candidate.distance_km.map(proximity),
        quality: quality(entity, weights),
        popularity: popularity(entity.review_count, weights),
        promotion: promotion(entity.promotion, weights),
    }
}

pub fn composite_score(signals: &Signals, weights: &RankingWeights) -> f64 {
    signals.proximity.unwrap_or(0.0) * weights.proximity
        + signals.quality * weights.quality
        + signals.popularity * weights.popularity
        + signals.promotion * weights.promotion
}

/// Scores every candidate and sorts them into the final total order.
pub fn rank(
    candidates: Vec<Candidate>,
    weights: &RankingWeights,
) -> Result<Vec<ScoredCandidate>, SearchError> {
    let mut scored = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        ensure_located(&candidate.entity)?;
        let score = composite_score(&signals(&candidate, weights), weights);
        if !score.is_finite() {
            return Err(SearchError::Invariant(format!(
                "non-finite score for entity {}",
                candidate.entity.id
            )));
        }
        scored.push(ScoredCandidate {
            entity: candidate.entity,
            distance_km: candidate.distance_km,
            score,
        });
    }

    scored.sort_by(compare);
    Ok(scored)
}

/// Rated before unrated, then score descending, higher rating, more
/// reviews, nearer, and finally id ascending.
pub fn compare(a: &ScoredCandidate, b: &ScoredCandidate) -> Ordering {
    let rating_a = a.entity.rating_signal();
    let rating_b = b.entity.rating_signal();

    rating_b
        .is_some()
        .cmp(&rating_a.is_some())
        .then_with(|| b.score.total_cmp(&a.score))
        .then_with(|| match (rating_a, rating_b) {
            (Some(ra), Some(rb)) => rb.total_cmp(&ra),
            _ => Ordering::Equal,
        })
        .then_with(|| b.entity.review_count.cmp(&a.entity.review_count))
        .then_with(|| match (a.distance_km, b.distance_km) {
            (Some(da), Some(db)) => da.total_cmp(&db),
            _ => Ordering::Equal,
        })
        .then_with(|| a.entity.id.cmp(&b.entity.id))
}
