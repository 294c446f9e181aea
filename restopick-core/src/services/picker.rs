//! Picker service - the in-process API driven by a presentation layer
//!
//! Owns the catalog, the colleague set and the current [`SessionState`], and
//! applies user intents through the session state machine. Views are derived
//! with the voting engine on every call.

use std::sync::Arc;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::result::{Error, Result};
use crate::domain::{FilterCriteria, Restaurant, SelectionMode, User, Vote};
use crate::ports::SeedProvider;
use crate::services::logging::{LogEvent, LoggingService};
use crate::services::session::{self, Screen, SessionEvent, SessionSeed, SessionState, Transition};
use crate::services::voting::{self, RankedRestaurant, RestaurantGroup};

/// Tunables taken from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PickerOptions {
    pub serendipity_count: usize,
    pub default_max_distance: f64,
    /// Fixed sampler seed; entropy when unset
    pub rng_seed: Option<u64>,
}

impl Default for PickerOptions {
    fn default() -> Self {
        Self {
            serendipity_count: voting::DEFAULT_SERENDIPITY_COUNT,
            default_max_distance: crate::domain::DEFAULT_MAX_DISTANCE,
            rng_seed: None,
        }
    }
}

/// Picker service for one user session at a time
pub struct PickerService {
    provider: Arc<dyn SeedProvider>,
    restaurants: Vec<Restaurant>,
    colleagues: Vec<User>,
    state: SessionState,
    options: PickerOptions,
    filter: FilterCriteria,
    /// Serendipity picks, drawn when the mode is chosen
    picks: Vec<Restaurant>,
    rng: StdRng,
    logger: Option<Arc<LoggingService>>,
}

impl PickerService {
    pub fn new(provider: Arc<dyn SeedProvider>, options: PickerOptions) -> Self {
        let rng = match options.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            restaurants: provider.restaurants(),
            colleagues: provider.colleagues(),
            provider,
            state: SessionState::LoggedOut,
            filter: FilterCriteria::new(options.default_max_distance),
            options,
            picks: Vec::new(),
            rng,
            logger: None,
        }
    }

    /// Record session events in `logger`
    pub fn with_logger(mut self, logger: Arc<LoggingService>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Restart the sampler from a fixed seed
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Name of the seed provider backing the catalog
    pub fn source(&self) -> &str {
        self.provider.name()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current_user(&self) -> Option<&User> {
        self.state.active().map(|s| &s.user)
    }

    /// The user's latest choice, until they return home
    pub fn user_vote(&self) -> Option<&Restaurant> {
        self.state.active().and_then(|s| s.user_vote.as_ref())
    }

    pub fn recent_history(&self) -> &[Restaurant] {
        match self.state.active() {
            Some(session) => session.recent_history.as_slice(),
            None => &[],
        }
    }

    pub fn restaurants(&self) -> &[Restaurant] {
        &self.restaurants
    }

    /// Colleagues of the session user (the user is never listed)
    pub fn colleagues(&self) -> Vec<User> {
        let me = self.current_user().map(|u| u.id.as_str());
        self.colleagues
            .iter()
            .filter(|c| Some(c.id.as_str()) != me)
            .cloned()
            .collect()
    }

    /// Look up a catalog restaurant
    pub fn restaurant(&self, id: &str) -> Result<Restaurant> {
        self.restaurants
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(format!("restaurant {}", id)))
    }

    // === Session transitions ===

    /// Log in with a free-form identity (usually an email address)
    pub fn login(&mut self, identity: &str) -> Result<User> {
        let user = User::from_identity(identity)?;
        self.start_session(user)
    }

    /// Log in as the fixed demo user
    pub fn login_demo(&mut self) -> Result<User> {
        self.start_session(User::demo())
    }

    fn start_session(&mut self, user: User) -> Result<User> {
        let seed = SessionSeed {
            votes: self.provider.seed_votes(Utc::now()),
            recent_history: self.provider.recent_history(),
        };
        self.apply(SessionEvent::Login {
            user: user.clone(),
            seed,
        })?;
        Ok(user)
    }

    /// End the session; its votes are discarded
    pub fn logout(&mut self) -> Result<()> {
        self.apply(SessionEvent::Logout)?;
        self.picks.clear();
        Ok(())
    }

    /// Open a selection screen
    ///
    /// Filters start from the defaults each time; serendipity draws a fresh
    /// sample.
    pub fn select_mode(&mut self, mode: SelectionMode) -> Result<()> {
        self.apply(SessionEvent::ChooseMode(mode))?;
        self.filter = FilterCriteria::new(self.options.default_max_distance);
        if mode == SelectionMode::Serendipity {
            self.picks = voting::sample_serendipity(&self.restaurants, self.options.serendipity_count, &mut self.rng);
        }
        Ok(())
    }

    /// Open the group formation screen
    pub fn view_groups(&mut self) -> Result<()> {
        self.apply(SessionEvent::ViewGroups).map(|_| ())
    }

    pub fn back(&mut self) -> Result<()> {
        self.apply(SessionEvent::Back).map(|_| ())
    }

    /// Leave the confirmation screen
    pub fn go_home(&mut self) -> Result<()> {
        self.apply(SessionEvent::GoHome).map(|_| ())
    }

    /// Open the details screen for a restaurant
    pub fn select_restaurant(&mut self, restaurant_id: &str) -> Result<Restaurant> {
        let restaurant = self.restaurant(restaurant_id)?;
        self.apply(SessionEvent::SelectRestaurant(restaurant.clone()))?;
        Ok(restaurant)
    }

    /// Vote for the restaurant shown in the details screen
    pub fn cast_vote(&mut self, restaurant_id: &str) -> Result<Vote> {
        let restaurant = self.restaurant(restaurant_id)?;
        self.apply_vote(SessionEvent::Vote(restaurant))
    }

    /// Join colleagues who already picked a restaurant
    pub fn join_group(&mut self, restaurant_id: &str) -> Result<Vote> {
        let restaurant = self.restaurant(restaurant_id)?;
        self.apply_vote(SessionEvent::Join(restaurant))
    }

    fn apply_vote(&mut self, event: SessionEvent) -> Result<Vote> {
        self.apply(event)?
            .ok_or_else(|| Error::invalid_transition("vote was not recorded"))
    }

    fn apply(&mut self, event: SessionEvent) -> Result<Option<Vote>> {
        let name = event.name();
        let restaurant_id = event.restaurant().map(|r| r.id.clone());

        match session::transition(&self.state, event, Utc::now()) {
            Ok(Transition { state, vote }) => {
                self.state = state;
                let mut log_event = LogEvent::new(name).with_screen(self.state.screen_name());
                if let Some(id) = restaurant_id {
                    log_event = log_event.with_restaurant(id);
                }
                self.log(log_event);
                Ok(vote)
            }
            Err(e) => {
                self.log(
                    LogEvent::new("transition_rejected")
                        .with_command(name)
                        .with_screen(self.state.screen_name())
                        .with_error(e.to_string()),
                );
                Err(e)
            }
        }
    }

    fn log(&self, event: LogEvent) {
        if let Some(logger) = &self.logger {
            let _ = logger.log(event);
        }
    }

    // === Views ===

    /// Votes visible to the engine (none while logged out)
    pub fn votes(&self) -> &[Vote] {
        self.state.votes()
    }

    pub fn vote_count(&self, restaurant_id: &str) -> usize {
        voting::count(self.votes(), restaurant_id)
    }

    /// The `n` most voted restaurants
    pub fn list_trending(&self, n: usize) -> Vec<RankedRestaurant> {
        voting::trending(&self.restaurants, self.votes(), n)
    }

    /// Every restaurant with its vote count, most voted first
    pub fn list_ranked(&self) -> Vec<RankedRestaurant> {
        voting::rank_by_popularity(&self.restaurants, self.votes())
    }

    /// Restaurants that already have votes, with the colleagues behind them
    pub fn list_groups(&self) -> Vec<RestaurantGroup> {
        voting::group_by_restaurant(&self.restaurants, self.votes(), &self.colleagues())
    }

    pub fn filter_restaurants(&self, criteria: &FilterCriteria) -> Vec<Restaurant> {
        voting::filter_by_attributes(&self.restaurants, criteria)
    }

    pub fn sample_serendipity(&mut self, n: usize) -> Vec<Restaurant> {
        voting::sample_serendipity(&self.restaurants, n, &mut self.rng)
    }

    /// Colleagues who voted for a restaurant
    pub fn colleagues_for(&self, restaurant_id: &str) -> Vec<User> {
        voting::voters_for(&self.colleagues(), self.votes(), restaurant_id)
    }

    /// Cuisines offered by the filter screen
    pub fn cuisines(&self) -> Vec<String> {
        voting::cuisines(&self.restaurants)
    }

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    /// Update the criteria of the filters screen
    pub fn set_filter(&mut self, criteria: FilterCriteria) -> Result<()> {
        match self.state.active().map(|s| &s.screen) {
            Some(Screen::Selection {
                mode: SelectionMode::Filters,
            }) => {
                self.filter = criteria;
                Ok(())
            }
            _ => Err(Error::invalid_transition(format!(
                "filters can only be changed on the filters screen, not {}",
                self.state.screen_name()
            ))),
        }
    }

    /// The list shown on the current selection screen
    pub fn selection_view(&self) -> Result<Vec<RankedRestaurant>> {
        let mode = match self.state.active().map(|s| &s.screen) {
            Some(Screen::Selection { mode }) => *mode,
            _ => {
                return Err(Error::invalid_transition(format!(
                    "no selection screen is open ({})",
                    self.state.screen_name()
                )))
            }
        };

        let view = match mode {
            SelectionMode::Popularity => self.list_ranked(),
            SelectionMode::Filters => self.with_counts(self.filter_restaurants(&self.filter)),
            SelectionMode::Serendipity => self.with_counts(self.picks.clone()),
        };
        Ok(view)
    }

    fn with_counts(&self, restaurants: Vec<Restaurant>) -> Vec<RankedRestaurant> {
        restaurants
            .into_iter()
            .map(|restaurant| RankedRestaurant {
                count: self.vote_count(&restaurant.id),
                restaurant,
            })
            .collect()
    }
}
