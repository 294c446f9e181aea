//! JSON seed file provider
//!
//! Reads an office's catalog from a single JSON document:
//! ```json
//! {
//!   "restaurants": [ { "id": "1", "name": "...", "priceRange": "€€", ... } ],
//!   "colleagues": [ { "id": "1", "name": "...", "email": "...", "avatar": "..." } ],
//!   "votes": [ { "userId": "1", "restaurantId": "1", "minutesAgo": 10 } ],
//!   "recentHistory": ["1", "2"]
//! }
//! ```
//! Only `restaurants` is required. Without `recentHistory` the first three
//! restaurants are used. `minutesAgo` must lie between 0 and
//! [`MAX_MINUTES_AGO`].

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::domain::{Restaurant, User, Vote};
use crate::ports::{SeedProvider, RECENT_HISTORY_LEN};

/// Oldest seed vote accepted, one year back
pub const MAX_MINUTES_AGO: i64 = 60 * 24 * 365;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedFile {
    restaurants: Vec<Restaurant>,
    #[serde(default)]
    colleagues: Vec<User>,
    #[serde(default)]
    votes: Vec<SeedVote>,
    #[serde(default)]
    recent_history: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedVote {
    user_id: String,
    restaurant_id: String,
    #[serde(default)]
    minutes_ago: i64,
}

/// Seed provider reading a JSON seed file once at construction
#[derive(Debug, Clone)]
pub struct JsonSeedProvider {
    path: PathBuf,
    seed: SeedFile,
}

impl JsonSeedProvider {
    /// Load and validate a seed file
    ///
    /// Restaurant and colleague ids must be unique, distances non-negative and
    /// ratings within 0 to 5. Votes are not checked against the catalog: the
    /// engine ignores dangling references.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(path, &content)
    }

    fn from_json(path: &Path, content: &str) -> Result<Self> {
        let seed: SeedFile = serde_json::from_str(content)?;

        if let Some(id) = first_duplicate(seed.restaurants.iter().map(|r| r.id.as_str())) {
            return Err(Error::validation(format!("duplicate restaurant id in seed file: {}", id)));
        }
        if let Some(id) = first_duplicate(seed.colleagues.iter().map(|c| c.id.as_str())) {
            return Err(Error::validation(format!("duplicate colleague id in seed file: {}", id)));
        }
        for r in &seed.restaurants {
            if !r.distance.is_finite() || r.distance < 0.0 {
                return Err(Error::validation(format!(
                    "restaurant {} has a negative distance: {}",
                    r.id, r.distance
                )));
            }
            if !(0.0..=5.0).contains(&r.rating) {
                return Err(Error::validation(format!(
                    "restaurant {} has a rating outside 0 to 5: {}",
                    r.id, r.rating
                )));
            }
        }
        if let Some(v) = seed.votes.iter().find(|v| !(0..=MAX_MINUTES_AGO).contains(&v.minutes_ago)) {
            return Err(Error::validation(format!(
                "vote for restaurant {} has minutesAgo {} (expected 0 to {})",
                v.restaurant_id, v.minutes_ago, MAX_MINUTES_AGO
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            seed,
        })
    }

    /// Path the seed was read from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn first_duplicate<'a>(ids: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut seen = std::collections::HashSet::new();
    ids.into_iter().find(|id| !seen.insert(*id))
}

impl SeedProvider for JsonSeedProvider {
    fn name(&self) -> &str {
        "json"
    }

    fn restaurants(&self) -> Vec<Restaurant> {
        self.seed.restaurants.clone()
    }

    fn colleagues(&self) -> Vec<User> {
        self.seed.colleagues.clone()
    }

    fn seed_votes(&self, now: DateTime<Utc>) -> Vec<Vote> {
        // minutesAgo is range-checked at load; anything chrono cannot
        // represent is dropped rather than stamped wrongly
        self.seed
            .votes
            .iter()
            .filter_map(|v| {
                let timestamp = Duration::try_minutes(v.minutes_ago)
                    .and_then(|ago| now.checked_sub_signed(ago))?;
                Some(Vote::new(v.user_id.clone(), v.restaurant_id.clone(), timestamp))
            })
            .collect()
    }

    fn recent_history(&self) -> Vec<Restaurant> {
        match &self.seed.recent_history {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.seed.restaurants.iter().find(|r| &r.id == id))
                .cloned()
                .collect(),
            None => self
                .seed
                .restaurants
                .iter()
                .take(RECENT_HISTORY_LEN)
                .cloned()
                .collect(),
        }
    }
}
