//! Session state machine
//!
//! The session is an explicit value. [`transition`] borrows the current state
//! and an event and returns the next state, so a rejected event leaves the
//! caller's state untouched.
//!
//! ```text
//! LoggedOut -> Home -> Selection{mode} -> Details -> Confirmation -> Home
//!                  \-> GroupFormation --(join)-----^
//! ```
//! Logout is accepted from every active screen.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::result::{Error, Result};
use crate::domain::{Restaurant, SelectionMode, User, Vote};
use crate::services::voting;

/// Screen a details view was opened from, where `back` returns to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "from", content = "mode", rename_all = "snake_case")]
pub enum DetailsOrigin {
    Selection(SelectionMode),
    GroupFormation,
}

impl DetailsOrigin {
    fn screen(self) -> Screen {
        match self {
            DetailsOrigin::Selection(mode) => Screen::Selection { mode },
            DetailsOrigin::GroupFormation => Screen::GroupFormation,
        }
    }
}

/// The screen of a logged-in session and the data it needs
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Home,
    Selection { mode: SelectionMode },
    GroupFormation,
    Details { restaurant: Restaurant, origin: DetailsOrigin },
    Confirmation { restaurant: Restaurant },
}

impl Screen {
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Home => "home",
            Screen::Selection { .. } => "selection",
            Screen::GroupFormation => "group_formation",
            Screen::Details { .. } => "details",
            Screen::Confirmation { .. } => "confirmation",
        }
    }
}

/// Data loaded into a session at login
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSeed {
    pub votes: Vec<Vote>,
    pub recent_history: Vec<Restaurant>,
}

/// A logged-in session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveSession {
    pub user: User,
    /// Every vote visible to this session, seeded ones first
    pub votes: Vec<Vote>,
    pub recent_history: Vec<Restaurant>,
    /// The user's latest choice, shown until they go back home
    pub user_vote: Option<Restaurant>,
    pub screen: Screen,
}

impl ActiveSession {
    fn new(user: User, seed: SessionSeed) -> Self {
        Self {
            user,
            votes: seed.votes,
            recent_history: seed.recent_history,
            user_vote: None,
            screen: Screen::Home,
        }
    }

    fn record_vote(&mut self, restaurant: Restaurant, now: DateTime<Utc>) -> Vote {
        let vote = Vote::new(self.user.id.clone(), restaurant.id.clone(), now);
        self.votes.push(vote.clone());
        self.user_vote = Some(restaurant.clone());
        self.screen = Screen::Confirmation { restaurant };
        vote
    }

    /// Restaurant currently shown in the details screen, if any
    pub fn selected_restaurant(&self) -> Option<&Restaurant> {
        match &self.screen {
            Screen::Details { restaurant, .. } => Some(restaurant),
            _ => None,
        }
    }
}

/// Complete session state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SessionState {
    #[default]
    LoggedOut,
    Active(ActiveSession),
}

impl SessionState {
    pub fn active(&self) -> Option<&ActiveSession> {
        match self {
            SessionState::Active(session) => Some(session),
            SessionState::LoggedOut => None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.active().is_some()
    }

    /// Name of the current screen, "logged_out" when there is no session
    pub fn screen_name(&self) -> &'static str {
        match self {
            SessionState::Active(session) => session.screen.name(),
            SessionState::LoggedOut => "logged_out",
        }
    }

    /// Votes visible to the engine; empty while logged out
    pub fn votes(&self) -> &[Vote] {
        match self {
            SessionState::Active(session) => session.votes.as_slice(),
            SessionState::LoggedOut => &[],
        }
    }
}

/// User intents applied to a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Login { user: User, seed: SessionSeed },
    ChooseMode(SelectionMode),
    ViewGroups,
    SelectRestaurant(Restaurant),
    Vote(Restaurant),
    Join(Restaurant),
    GoHome,
    Back,
    Logout,
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::Login { .. } => "login",
            SessionEvent::ChooseMode(_) => "choose_mode",
            SessionEvent::ViewGroups => "view_groups",
            SessionEvent::SelectRestaurant(_) => "select_restaurant",
            SessionEvent::Vote(_) => "vote",
            SessionEvent::Join(_) => "join",
            SessionEvent::GoHome => "go_home",
            SessionEvent::Back => "back",
            SessionEvent::Logout => "logout",
        }
    }

    /// Restaurant the event targets, if any
    pub fn restaurant(&self) -> Option<&Restaurant> {
        match self {
            SessionEvent::SelectRestaurant(r) | SessionEvent::Vote(r) | SessionEvent::Join(r) => Some(r),
            _ => None,
        }
    }
}

/// Result of an accepted event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    /// Vote appended by this event, if it was a vote or a join
    pub vote: Option<Vote>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self { state, vote: None }
    }
}

/// Apply `event` to `state`
///
/// Returns `InvalidTransition` when the event is not accepted on the current
/// screen or lacks the data the target screen needs.
pub fn transition(state: &SessionState, event: SessionEvent, now: DateTime<Utc>) -> Result<Transition> {
    match (state, event) {
        (SessionState::LoggedOut, SessionEvent::Login { user, seed }) => Ok(Transition::to(
            SessionState::Active(ActiveSession::new(user, seed)),
        )),
        (SessionState::LoggedOut, event) => Err(Error::invalid_transition(format!(
            "cannot {} while logged out",
            event.name()
        ))),
        (SessionState::Active(_), SessionEvent::Logout) => Ok(Transition::to(SessionState::LoggedOut)),
        (SessionState::Active(session), event) => transition_active(session, event, now),
    }
}

fn transition_active(session: &ActiveSession, event: SessionEvent, now: DateTime<Utc>) -> Result<Transition> {
    let mut next = session.clone();
    let mut vote = None;

    match (&session.screen, event) {
        (Screen::Home, SessionEvent::ChooseMode(mode)) => {
            next.screen = Screen::Selection { mode };
        }
        (Screen::Home, SessionEvent::ViewGroups) => {
            next.screen = Screen::GroupFormation;
        }
        (Screen::Selection { mode }, SessionEvent::SelectRestaurant(restaurant)) => {
            next.screen = Screen::Details {
                restaurant,
                origin: DetailsOrigin::Selection(*mode),
            };
        }
        (Screen::GroupFormation, SessionEvent::SelectRestaurant(restaurant)) => {
            next.screen = Screen::Details {
                restaurant,
                origin: DetailsOrigin::GroupFormation,
            };
        }
        (Screen::Details { restaurant: shown, .. }, SessionEvent::Vote(restaurant)) => {
            if shown.id != restaurant.id {
                return Err(Error::invalid_transition(format!(
                    "cannot vote for {} while viewing {}",
                    restaurant.id, shown.id
                )));
            }
            vote = Some(next.record_vote(restaurant, now));
        }
        (Screen::GroupFormation, SessionEvent::Join(restaurant)) => {
            if voting::count(&session.votes, &restaurant.id) == 0 {
                return Err(Error::invalid_transition(format!(
                    "no group has formed at {}",
                    restaurant.id
                )));
            }
            vote = Some(next.record_vote(restaurant, now));
        }
        (Screen::Confirmation { .. }, SessionEvent::GoHome) => {
            next.user_vote = None;
            next.screen = Screen::Home;
        }
        (Screen::Selection { .. } | Screen::GroupFormation, SessionEvent::Back) => {
            next.screen = Screen::Home;
        }
        (Screen::Details { origin, .. }, SessionEvent::Back) => {
            next.screen = origin.screen();
        }
        (screen, event) => {
            return Err(Error::invalid_transition(format!(
                "cannot {} from the {} screen",
                event.name(),
                screen.name()
            )));
        }
    }

    Ok(Transition {
        state: SessionState::Active(next),
        vote,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::demo::{generate_demo_restaurants, generate_demo_votes};

    fn restaurant(id: &str) -> Restaurant {
        generate_demo_restaurants()
            .into_iter()
            .find(|r| r.id == id)
            .unwrap()
    }

    fn apply(state: &SessionState, event: SessionEvent) -> SessionState {
        transition(state, event, Utc::now()).unwrap().state
    }

    fn logged_in() -> SessionState {
        let seed = SessionSeed {
            votes: generate_demo_votes(Utc::now()),
            recent_history: generate_demo_restaurants().into_iter().take(3).collect(),
        };
        apply(
            &SessionState::LoggedOut,
            SessionEvent::Login {
                user: User::demo(),
                seed,
            },
        )
    }

    fn in_details(id: &str) -> SessionState {
        let state = apply(&logged_in(), SessionEvent::ChooseMode(SelectionMode::Popularity));
        apply(&state, SessionEvent::SelectRestaurant(restaurant(id)))
    }

    #[test]
    fn test_login_lands_on_home_with_seed() {
        let state = logged_in();
        let session = state.active().unwrap();
        assert_eq!(session.screen, Screen::Home);
        assert_eq!(session.user.id, "0");
        assert_eq!(session.votes.len(), 5);
        assert_eq!(session.recent_history.len(), 3);
        assert!(session.user_vote.is_none());
    }

    #[test]
    fn test_events_rejected_while_logged_out() {
        let state = SessionState::LoggedOut;
        for event in [
            SessionEvent::ChooseMode(SelectionMode::Filters),
            SessionEvent::Vote(restaurant("1")),
            SessionEvent::Logout,
            SessionEvent::Back,
        ] {
            let err = transition(&state, event, Utc::now()).unwrap_err();
            assert!(matches!(err, Error::InvalidTransition(_)));
        }
        assert!(state.votes().is_empty());
    }

    #[test]
    fn test_select_restaurant_opens_details() {
        let state = in_details("3");
        let session = state.active().unwrap();
        assert_eq!(session.selected_restaurant().map(|r| r.id.as_str()), Some("3"));
        assert_eq!(
            session.screen,
            Screen::Details {
                restaurant: restaurant("3"),
                origin: DetailsOrigin::Selection(SelectionMode::Popularity),
            }
        );
    }

    #[test]
    fn test_vote_in_details() {
        let state = in_details("3");
        let before = state.votes().len();

        let result = transition(&state, SessionEvent::Vote(restaurant("3")), Utc::now()).unwrap();
        let vote = result.vote.unwrap();
        assert_eq!(vote.restaurant_id, "3");
        assert_eq!(vote.user_id, "0");

        let session = result.state.active().unwrap();
        assert_eq!(session.votes.len(), before + 1);
        assert_eq!(session.votes.last(), Some(&vote));
        assert_eq!(session.user_vote.as_ref().map(|r| r.id.as_str()), Some("3"));
        assert!(session.selected_restaurant().is_none());
        assert_eq!(session.screen, Screen::Confirmation { restaurant: restaurant("3") });
    }

    #[test]
    fn test_vote_for_other_restaurant_rejected() {
        let state = in_details("3");
        let err = transition(&state, SessionEvent::Vote(restaurant("1")), Utc::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
    }

    #[test]
    fn test_vote_outside_details_rejected() {
        let state = logged_in();
        let err = transition(&state, SessionEvent::Vote(restaurant("1")), Utc::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
        assert_eq!(state.votes().len(), 5);
    }

    #[test]
    fn test_join_group() {
        let state = apply(&logged_in(), SessionEvent::ViewGroups);
        let result = transition(&state, SessionEvent::Join(restaurant("1")), Utc::now()).unwrap();
        assert_eq!(result.vote.unwrap().restaurant_id, "1");
        assert_eq!(result.state.screen_name(), "confirmation");
        assert_eq!(result.state.votes().len(), 6);
    }

    #[test]
    fn test_join_without_group_rejected() {
        let state = apply(&logged_in(), SessionEvent::ViewGroups);
        let err = transition(&state, SessionEvent::Join(restaurant("6")), Utc::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
    }

    #[test]
    fn test_go_home_clears_user_vote() {
        let state = apply(&in_details("2"), SessionEvent::Vote(restaurant("2")));
        let state = apply(&state, SessionEvent::GoHome);
        let session = state.active().unwrap();
        assert_eq!(session.screen, Screen::Home);
        assert!(session.user_vote.is_none());
        assert!(session.selected_restaurant().is_none());
        assert_eq!(session.votes.len(), 6);
    }

    #[test]
    fn test_back_from_details_returns_to_origin() {
        let state = apply(&in_details("1"), SessionEvent::Back);
        assert_eq!(
            state.active().unwrap().screen,
            Screen::Selection { mode: SelectionMode::Popularity }
        );

        let groups = apply(&logged_in(), SessionEvent::ViewGroups);
        let details = apply(&groups, SessionEvent::SelectRestaurant(restaurant("1")));
        let state = apply(&details, SessionEvent::Back);
        assert_eq!(state.active().unwrap().screen, Screen::GroupFormation);
    }

    #[test]
    fn test_back_from_selection_returns_home() {
        let state = apply(&logged_in(), SessionEvent::ChooseMode(SelectionMode::Serendipity));
        let state = apply(&state, SessionEvent::Back);
        assert_eq!(state.screen_name(), "home");
    }

    #[test]
    fn test_back_from_home_rejected() {
        let err = transition(&logged_in(), SessionEvent::Back, Utc::now()).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
    }

    #[test]
    fn test_logout_from_every_screen() {
        let confirmation = apply(&in_details("2"), SessionEvent::Vote(restaurant("2")));
        let screens = vec![
            logged_in(),
            apply(&logged_in(), SessionEvent::ViewGroups),
            in_details("4"),
            confirmation,
        ];
        for state in screens {
            let next = apply(&state, SessionEvent::Logout);
            assert_eq!(next, SessionState::LoggedOut);
            assert!(next.votes().is_empty());
        }
    }

    #[test]
    fn test_login_twice_rejected() {
        let err = transition(
            &logged_in(),
            SessionEvent::Login {
                user: User::demo(),
                seed: SessionSeed::default(),
            },
            Utc::now(),
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidTransition(_)));
    }

    #[test]
    fn test_rejected_event_leaves_state_unchanged() {
        let state = in_details("3");
        let snapshot = state.clone();
        assert!(transition(&state, SessionEvent::GoHome, Utc::now()).is_err());
        assert_eq!(state, snapshot);
    }

    #[test]
    fn test_repeat_votes_are_kept() {
        let state = apply(&in_details("5"), SessionEvent::Vote(restaurant("5")));
        let state = apply(&state, SessionEvent::GoHome);
        let state = apply(&state, SessionEvent::ChooseMode(SelectionMode::Filters));
        let state = apply(&state, SessionEvent::SelectRestaurant(restaurant("5")));
        let state = apply(&state, SessionEvent::Vote(restaurant("5")));

        let mine = state
            .votes()
            .iter()
            .filter(|v| v.user_id == "0" && v.restaurant_id == "5")
            .count();
        assert_eq!(mine, 2);
    }
}
