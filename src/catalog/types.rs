use crate::search::geo::{BoundingBox, GeoPoint};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Upper bound on categories attached to one entity.
pub const MAX_CATEGORIES: usize = 2;
/// Upper bound on cuisines attached to one entity.
pub const MAX_CUISINES: usize = 3;

pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

/// Lifecycle state of a listing, owned by the CRUD side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    Draft,
    Pending,
    Published,
    Rejected,
    Archived,
}

impl ListingStatus {
    /// Only published listings are ever searchable.
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Published)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Restaurant,
    Cafe,
    Bar,
    FastFood,
    Bakery,
    CoffeeShop,
    Pizzeria,
    Canteen,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Restaurant,
        Self::Cafe,
        Self::Bar,
        Self::FastFood,
        Self::Bakery,
        Self::CoffeeShop,
        Self::Pizzeria,
        Self::Canteen,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Restaurant => "restaurant",
            Self::Cafe => "cafe",
            Self::Bar => "bar",
            Self::FastFood => "fast_food",
            Self::Bakery => "bakery",
            Self::CoffeeShop => "coffee_shop",
            Self::Pizzeria => "pizzeria",
            Self::Canteen => "canteen",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Restaurant => "Restaurant",
            Self::Cafe => "Cafe",
            Self::Bar => "Bar",
            Self::FastFood => "Fast food",
            Self::Bakery => "Bakery",
            Self::CoffeeShop => "Coffee shop",
            Self::Pizzeria => "Pizzeria",
            Self::Canteen => "Canteen",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|c| c.token() == token)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cuisine {
    Belarusian,
    European,
    Italian,
    Georgian,
    Asian,
    Japanese,
    American,
    Mediterranean,
    Vegetarian,
    Mixed,
}

impl Cuisine {
    pub const ALL: [Cuisine; 10] = [
        Self::Belarusian,
        Self::European,
        Self::Italian,
        Self::Georgian,
        Self::Asian,
        Self::Japanese,
        Self::American,
        Self::Mediterranean,
        Self::Vegetarian,
        Self::Mixed,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Belarusian => "belarusian",
            Self::European => "european",
            Self::Italian => "italian",
            Self::Georgian => "georgian",
            Self::Asian => "asian",
            Self::Japanese => "japanese",
            Self::American => "american",
            Self::Mediterranean => "mediterranean",
            Self::Vegetarian => "vegetarian",
            Self::Mixed => "mixed",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Belarusian => "Belarusian",
            Self::European => "European",
            Self::Italian => "Italian",
            Self::Georgian => "Georgian",
            Self::Asian => "Asian",
            Self::Japanese => "Japanese",
            Self::American => "American",
            Self::Mediterranean => "Mediterranean",
            Self::Vegetarian => "Vegetarian",
            Self::Mixed => "Mixed",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|c| c.token() == token)
    }
}

/// Ordinal price bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Budget,
    Moderate,
    Expensive,
    Premium,
}

impl PriceTier {
    pub const ALL: [PriceTier; 4] = [
        Self::Budget,
        Self::Moderate,
        Self::Expensive,
        Self::Premium,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            Self::Budget => "budget",
            Self::Moderate => "moderate",
            Self::Expensive => "expensive",
            Self::Premium => "premium",
        }
    }

    /// Display value (`$` .. `$$$$`).
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Budget => "$",
            Self::Moderate => "$$",
            Self::Expensive => "$$$",
            Self::Premium => "$$$$",
        }
    }

    /// Accepts the token case-insensitively or its dollar-sign symbol.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.token() == token || p.symbol() == token)
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Read-optimized projection of a catalog listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchableEntity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ListingStatus,
    pub categories: BTreeSet<Category>,
    #[serde(default)]
    pub cuisines: BTreeSet<Cuisine>,
    pub price_tier: PriceTier,
    /// Mean review score; `None` exactly when `review_count == 0`.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    /// Partner-controlled paid boost.
    #[serde(default)]
    pub promotion: u32,
}

impl SearchableEntity {
    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    /// Rating signal honoring the "no reviews means no rating" rule.
    pub fn rating_signal(&self) -> Option<f64> {
        if self.review_count == 0 {
            None
        } else {
            self.rating
        }
    }

    /// Drops a rating that has no reviews behind it and clamps the rest to
    /// the 1-5 scale.
    pub fn normalized(mut self) -> Self {
        self.rating = match (self.review_count, self.rating) {
            (0, _) => None,
            (_, Some(r)) if r.is_finite() => Some(r.clamp(MIN_RATING, MAX_RATING)),
            _ => None,
        };
        self
    }

    /// Reasons this entity may not be stored as searchable in `region`.
    pub fn check_storable(&self, region: &BoundingBox) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("empty id".to_string());
        }
        let location = self.location();
        if !location.is_valid() {
            return Err(format!(
                "invalid coordinates ({}, {})",
                self.latitude, self.longitude
            ));
        }
        if !region.contains(&location) {
            return Err(format!(
                "coordinates ({}, {}) outside operating region",
                self.latitude, self.longitude
            ));
        }
        if self.categories.is_empty() || self.categories.len() > MAX_CATEGORIES {
            return Err(format!(
                "expected 1..={} categories, got {}",
                MAX_CATEGORIES,
                self.categories.len()
            ));
        }
        if self.cuisines.len() > MAX_CUISINES {
            return Err(format!(
                "expected at most {} cuisines, got {}",
                MAX_CUISINES,
                self.cuisines.len()
            ));
        }
        Ok(())
    }
}

/// Categorical predicate pushed down to the catalog together with the
/// spatial one. Empty sets and `None` mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateFilter {
    pub categories: BTreeSet<Category>,
    pub cuisines: BTreeSet<Cuisine>,
    pub price_tier: Option<PriceTier>,
    pub min_rating: Option<f64>,
}

impl CandidateFilter {
    /// Visibility is always enforced, whatever the query asks for.
    /// Set dimensions match on any shared member; dimensions combine with AND.
    pub fn matches(&self, entity: &SearchableEntity) -> bool {
        if !entity.status.is_public() {
            return false;
        }
        if !self.categories.is_empty()
            && !entity.categories.iter().any(|c| self.categories.contains(c))
        {
            return false;
        }
        if !self.cuisines.is_empty() && !entity.cuisines.iter().any(|c| self.cuisines.contains(c))
        {
            return false;
        }
        if let Some(tier) = self.price_tier {
            if entity.price_tier != tier {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            // An entity without reviews has no rating to compare.
            if !entity.rating_signal().is_some_and(|r| r >= min) {
                return false;
            }
        }
        true
    }
}
