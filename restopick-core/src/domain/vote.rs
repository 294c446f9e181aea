//! Vote domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One choice event: a user picked a restaurant at a point in time
///
/// Votes are append-only. Nothing prevents a user from voting more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    pub user_id: String,
    pub restaurant_id: String,
    pub timestamp: DateTime<Utc>,
}

impl Vote {
    pub fn new(
        user_id: impl Into<String>,
        restaurant_id: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            restaurant_id: restaurant_id.into(),
            timestamp,
        }
    }
}
