//! Selection modes and filter criteria

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::result::Error;

/// Default upper bound for the distance filter, in kilometers
pub const DEFAULT_MAX_DISTANCE: f64 = 5.0;

/// The three ways of browsing the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    Popularity,
    Filters,
    Serendipity,
}

impl SelectionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionMode::Popularity => "popularity",
            SelectionMode::Filters => "filters",
            SelectionMode::Serendipity => "serendipity",
        }
    }
}

impl fmt::Display for SelectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "popularity" | "popular" => Ok(SelectionMode::Popularity),
            "filters" | "filter" => Ok(SelectionMode::Filters),
            "serendipity" | "surprise" => Ok(SelectionMode::Serendipity),
            other => Err(Error::validation(format!("unknown selection mode: {}", other))),
        }
    }
}

/// Attribute filter applied in the filters selection mode
///
/// All constraints must hold. An empty cuisine or search text means
/// "no constraint"; the distance bound is inclusive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    #[serde(default)]
    pub cuisine: Option<String>,
    pub max_distance: f64,
    #[serde(default)]
    pub search_text: Option<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            cuisine: None,
            max_distance: DEFAULT_MAX_DISTANCE,
            search_text: None,
        }
    }
}

impl FilterCriteria {
    pub fn new(max_distance: f64) -> Self {
        Self {
            max_distance,
            ..Self::default()
        }
    }

    pub fn with_cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }
}
