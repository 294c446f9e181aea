//! Seed provider port
//!
//! Defines where the fixed session data comes from: the restaurant catalog,
//! the colleague set, the colleague votes present at login and the user's
//! recent-history view (built-in demo data, a JSON seed file, ...)

use chrono::{DateTime, Utc};

use crate::domain::{Restaurant, User, Vote};

/// Number of catalog entries shown as recent history when a provider has no
/// history of its own
pub const RECENT_HISTORY_LEN: usize = 3;

/// Seed provider trait
///
/// Implementations must return the same catalog and colleague set on every
/// call: both are treated as immutable for the lifetime of a session.
pub trait SeedProvider: Send + Sync {
    /// Provider name (e.g., "demo", "json")
    fn name(&self) -> &str;

    /// The restaurant catalog, in display order
    fn restaurants(&self) -> Vec<Restaurant>;

    /// Colleagues who may already have voted
    fn colleagues(&self) -> Vec<User>;

    /// Votes present when a user logs in
    ///
    /// # Arguments
    /// * `now` - Login time; seeded votes are stamped relative to it
    fn seed_votes(&self, now: DateTime<Utc>) -> Vec<Vote>;

    /// Restaurants shown as the user's recent history on the home screen
    fn recent_history(&self) -> Vec<Restaurant> {
        self.restaurants().into_iter().take(RECENT_HISTORY_LEN).collect()
    }
}
