//! Restaurant domain model

use std::fmt;

use serde::{Deserialize, Serialize};

/// Ordinal price category, written as euro signs in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceTier {
    #[serde(rename = "€")]
    Budget,
    #[serde(rename = "€€")]
    Moderate,
    #[serde(rename = "€€€")]
    Upscale,
    #[serde(rename = "€€€€")]
    Fine,
}

impl PriceTier {
    pub fn symbol(&self) -> &'static str {
        match self {
            PriceTier::Budget => "€",
            PriceTier::Moderate => "€€",
            PriceTier::Upscale => "€€€",
            PriceTier::Fine => "€€€€",
        }
    }
}

impl fmt::Display for PriceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A place colleagues can vote for
///
/// Catalog entries are immutable for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    pub id: String,
    pub name: String,
    pub cuisine: String,
    /// Distance from the office in kilometers
    pub distance: f64,
    /// Average rating, 0 to 5
    pub rating: f64,
    pub review_count: u32,
    pub image: String,
    pub address: String,
    pub opening_hours: String,
    #[serde(rename = "priceRange")]
    pub price_tier: PriceTier,
    pub description: String,
}

impl Restaurant {
    /// Create a restaurant with the fields the engine reasons about
    ///
    /// Presentation fields (image, address, hours, description) start empty.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cuisine: impl Into<String>,
        distance: f64,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cuisine: cuisine.into(),
            distance,
            rating: 0.0,
            review_count: 0,
            image: String::new(),
            address: String::new(),
            opening_hours: String::new(),
            price_tier: PriceTier::Moderate,
            description: String::new(),
        }
    }
}
