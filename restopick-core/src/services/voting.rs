//! Voting engine - vote counts, rankings, filters and groups
//!
//! Every function here is pure: views are derived from the catalog and the
//! vote list on demand with linear scans, nothing is cached.
//!
//! Votes that reference a restaurant or user missing from the inputs are
//! ignored rather than reported. Seeded and loaded votes are not validated
//! against the catalog, so dangling references are expected.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::domain::{FilterCriteria, Restaurant, User, Vote};

/// Number of restaurants offered by the serendipity mode
pub const DEFAULT_SERENDIPITY_COUNT: usize = 4;

/// Number of restaurants listed as trending on the home screen
pub const DEFAULT_TRENDING_COUNT: usize = 3;

/// A restaurant paired with its vote count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRestaurant {
    pub restaurant: Restaurant,
    pub count: usize,
}

/// A restaurant that already has votes, with the colleagues behind them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantGroup {
    pub restaurant: Restaurant,
    pub count: usize,
    pub colleagues: Vec<User>,
}

/// Number of votes cast for `restaurant_id`
pub fn count(votes: &[Vote], restaurant_id: &str) -> usize {
    votes.iter().filter(|v| v.restaurant_id == restaurant_id).count()
}

/// Pair every restaurant with its vote count, most voted first
///
/// The sort is stable: restaurants with equal counts keep catalog order.
/// Restaurants without votes are included at the end.
pub fn rank_by_popularity(restaurants: &[Restaurant], votes: &[Vote]) -> Vec<RankedRestaurant> {
    let mut ranked: Vec<RankedRestaurant> = restaurants
        .iter()
        .map(|r| RankedRestaurant {
            restaurant: r.clone(),
            count: count(votes, &r.id),
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked
}

/// Restaurants matching every constraint in `criteria`, in catalog order
pub fn filter_by_attributes(restaurants: &[Restaurant], criteria: &FilterCriteria) -> Vec<Restaurant> {
    let cuisine = criteria.cuisine.as_deref().filter(|c| !c.is_empty());
    let search = criteria
        .search_text
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    restaurants
        .iter()
        .filter(|r| cuisine.map_or(true, |c| r.cuisine == c))
        .filter(|r| r.distance <= criteria.max_distance)
        .filter(|r| {
            search.as_deref().map_or(true, |s| {
                r.name.to_lowercase().contains(s) || r.cuisine.to_lowercase().contains(s)
            })
        })
        .cloned()
        .collect()
}

/// Up to `n` distinct restaurants in random order
///
/// Returns exactly `min(n, restaurants.len())` entries. The random source is
/// passed in so callers can seed it.
pub fn sample_serendipity<R: Rng + ?Sized>(
    restaurants: &[Restaurant],
    n: usize,
    rng: &mut R,
) -> Vec<Restaurant> {
    let mut shuffled = restaurants.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(n);
    shuffled
}

/// Restaurants with at least one vote, most voted first
///
/// Each group lists the colleagues with at least one vote there, in
/// colleague order. Ties keep catalog order.
pub fn group_by_restaurant(
    restaurants: &[Restaurant],
    votes: &[Vote],
    colleagues: &[User],
) -> Vec<RestaurantGroup> {
    let mut groups: Vec<RestaurantGroup> = restaurants
        .iter()
        .filter_map(|r| {
            let count = count(votes, &r.id);
            if count == 0 {
                return None;
            }
            Some(RestaurantGroup {
                restaurant: r.clone(),
                count,
                colleagues: voters_for(colleagues, votes, &r.id),
            })
        })
        .collect();

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// The first `n` entries of an already ranked sequence
pub fn top_n<T: Clone>(ranked: &[T], n: usize) -> Vec<T> {
    ranked.iter().take(n).cloned().collect()
}

/// The `n` most voted restaurants, leaving out restaurants without votes
pub fn trending(restaurants: &[Restaurant], votes: &[Vote], n: usize) -> Vec<RankedRestaurant> {
    let voted: Vec<RankedRestaurant> = rank_by_popularity(restaurants, votes)
        .into_iter()
        .filter(|r| r.count > 0)
        .collect();
    top_n(&voted, n)
}

/// Distinct cuisines in the order they first appear in the catalog
pub fn cuisines(restaurants: &[Restaurant]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for restaurant in restaurants {
        if !seen.contains(&restaurant.cuisine) {
            seen.push(restaurant.cuisine.clone());
        }
    }
    seen
}

/// Colleagues with at least one vote for `restaurant_id`
pub fn voters_for(colleagues: &[User], votes: &[Vote], restaurant_id: &str) -> Vec<User> {
    colleagues
        .iter()
        .filter(|c| {
            votes
                .iter()
                .any(|v| v.user_id == c.id && v.restaurant_id == restaurant_id)
        })
        .cloned()
        .collect()
}
