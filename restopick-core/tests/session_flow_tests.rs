//! Integration tests for restopick-core sessions
//!
//! These drive a full context the way the CLI shell does: real seed
//! providers, real settings files and a real DuckDB event log in a temp dir.
//!
//! Run with: cargo test --test session_flow_tests -- --nocapture

use std::sync::Arc;
use tempfile::TempDir;

use restopick_core::adapters::DemoSeedProvider;
use restopick_core::config::{Config, SeedSource};
use restopick_core::services::{EntryPoint, LoggingService};
use restopick_core::{Error, FilterCriteria, RestoPickContext, SelectionMode};

// ============================================================================
// Test Helpers
// ============================================================================

/// Context over the demo office with a fixed sampler seed and no event log
fn demo_context(temp_dir: &TempDir) -> RestoPickContext {
    let mut config = Config::default();
    config.rng_seed = Some(7);
    config.logging = false;
    RestoPickContext::with_provider(temp_dir.path(), config, Arc::new(DemoSeedProvider::new()), None)
}

/// Context over the demo office recording into logs.duckdb in the temp dir
fn logged_context(temp_dir: &TempDir) -> (RestoPickContext, Arc<LoggingService>) {
    let logger = Arc::new(
        LoggingService::new(temp_dir.path(), EntryPoint::Shell, "test").expect("Failed to open event log"),
    );
    let ctx = RestoPickContext::with_provider(
        temp_dir.path(),
        Config::default(),
        Arc::new(DemoSeedProvider::new()),
        Some(Arc::clone(&logger)),
    );
    (ctx, logger)
}

const OFFICE_SEED: &str = r#"{
  "restaurants": [
    { "id": "a", "name": "Canteen", "cuisine": "French", "distance": 0.2, "rating": 3.9,
      "reviewCount": 40, "image": "", "address": "Ground floor", "openingHours": "11:30 - 14:00",
      "priceRange": "€", "description": "Staff canteen" },
    { "id": "b", "name": "Taqueria", "cuisine": "Mexican", "distance": 0.9, "rating": 4.4,
      "reviewCount": 120, "image": "", "address": "3 Market St", "openingHours": "12:00 - 15:00",
      "priceRange": "€€", "description": "Tacos" },
    { "id": "c", "name": "Noodle Bar", "cuisine": "Chinese", "distance": 1.4, "rating": 4.1,
      "reviewCount": 75, "image": "", "address": "8 Station Rd", "openingHours": "11:00 - 22:00",
      "priceRange": "€€", "description": "Hand-pulled noodles" }
  ],
  "colleagues": [
    { "id": "u1", "name": "Ines", "email": "ines@office.test", "avatar": "" },
    { "id": "u2", "name": "Tom", "email": "tom@office.test", "avatar": "" }
  ],
  "votes": [
    { "userId": "u1", "restaurantId": "b", "minutesAgo": 12 },
    { "userId": "u2", "restaurantId": "b", "minutesAgo": 5 },
    { "userId": "u2", "restaurantId": "zz", "minutesAgo": 3 }
  ],
  "recentHistory": ["c"]
}"#;

// ============================================================================
// Voting Flow Tests
// ============================================================================

#[test]
fn test_cast_vote_from_popularity_screen() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = demo_context(&temp_dir);

    ctx.picker.login("jane.doe@company.com").unwrap();
    ctx.picker.select_mode(SelectionMode::Popularity).unwrap();
    ctx.picker.select_restaurant("3").unwrap();
    let vote = ctx.picker.cast_vote("3").unwrap();

    assert_eq!(vote.restaurant_id, "3");
    assert_eq!(ctx.picker.state().screen_name(), "confirmation");
    assert_eq!(ctx.picker.vote_count("3"), 2);

    let trending: Vec<_> = ctx
        .picker
        .list_trending(3)
        .into_iter()
        .map(|r| (r.restaurant.id, r.count))
        .collect();
    assert_eq!(
        trending,
        vec![("1".to_string(), 3), ("3".to_string(), 2), ("2".to_string(), 1)]
    );
}

#[test]
fn test_vote_for_other_restaurant_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = demo_context(&temp_dir);

    ctx.picker.login_demo().unwrap();
    ctx.picker.select_mode(SelectionMode::Popularity).unwrap();
    ctx.picker.select_restaurant("2").unwrap();

    let err = ctx.picker.cast_vote("4").unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
    assert_eq!(ctx.picker.state().screen_name(), "details");
    assert_eq!(ctx.picker.votes().len(), 5);
}

#[test]
fn test_join_requires_existing_group() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = demo_context(&temp_dir);

    ctx.picker.login_demo().unwrap();
    ctx.picker.view_groups().unwrap();

    let err = ctx.picker.join_group("6").unwrap_err();
    assert!(matches!(err, Error::InvalidTransition(_)));
    assert_eq!(ctx.picker.state().screen_name(), "group_formation");

    ctx.picker.join_group("1").unwrap();
    assert_eq!(ctx.picker.vote_count("1"), 4);
    assert_eq!(ctx.picker.colleagues_for("1").len(), 3);
}

#[test]
fn test_back_from_details_returns_to_origin() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = demo_context(&temp_dir);

    ctx.picker.login_demo().unwrap();
    ctx.picker.select_mode(SelectionMode::Serendipity).unwrap();
    let picks = ctx.picker.selection_view().unwrap();
    ctx.picker.select_restaurant(&picks[0].restaurant.id).unwrap();
    ctx.picker.back().unwrap();

    assert_eq!(ctx.picker.state().screen_name(), "selection");
    // The sample is kept while the screen stays open.
    assert_eq!(ctx.picker.selection_view().unwrap(), picks);

    ctx.picker.back().unwrap();
    assert_eq!(ctx.picker.state().screen_name(), "home");
    assert!(ctx.picker.back().is_err());
}

#[test]
fn test_logout_then_login_discards_votes() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = demo_context(&temp_dir);

    ctx.picker.login("first@company.com").unwrap();
    ctx.picker.view_groups().unwrap();
    ctx.picker.join_group("2").unwrap();
    ctx.picker.go_home().unwrap();
    ctx.picker.logout().unwrap();

    assert!(!ctx.picker.state().is_logged_in());
    assert!(ctx.picker.votes().is_empty());

    let user = ctx.picker.login("second@company.com").unwrap();
    assert_eq!(user.name, "second");
    assert_eq!(ctx.picker.vote_count("2"), 1);
    assert!(ctx.picker.user_vote().is_none());
}

#[test]
fn test_rejected_transitions_leave_state_unchanged() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = demo_context(&temp_dir);

    assert!(ctx.picker.select_mode(SelectionMode::Filters).is_err());
    assert!(ctx.picker.logout().is_err());
    assert!(!ctx.picker.state().is_logged_in());

    ctx.picker.login_demo().unwrap();
    let before = ctx.picker.state().clone();
    assert!(ctx.picker.go_home().is_err());
    assert!(ctx.picker.login_demo().is_err());
    assert!(ctx.picker.cast_vote("1").is_err());
    assert_eq!(ctx.picker.state(), &before);
}

#[test]
fn test_filter_screen_with_search() {
    let temp_dir = TempDir::new().unwrap();
    let mut ctx = demo_context(&temp_dir);

    ctx.picker.login_demo().unwrap();
    ctx.picker.select_mode(SelectionMode::Filters).unwrap();
    assert_eq!(ctx.picker.selection_view().unwrap().len(), 6);

    ctx.picker
        .set_filter(FilterCriteria::default().with_search("RAMEN"))
        .unwrap();
    let view = ctx.picker.selection_view().unwrap();
    assert_eq!(view.len(), 1);
    assert_eq!(view[0].restaurant.name, "Sakura Ramen");
    assert_eq!(view[0].count, 1);
}

// ============================================================================
// Seed File Tests
// ============================================================================

#[test]
fn test_json_seed_file_from_settings() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("office.json"), OFFICE_SEED).unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{"app": {"seedSource": "office.json", "logging": false, "rngSeed": 3}}"#,
    )
    .unwrap();

    let mut ctx = RestoPickContext::new(temp_dir.path(), EntryPoint::Cli).unwrap();
    assert_eq!(
        ctx.config.seed_source,
        SeedSource::File(temp_dir.path().join("office.json"))
    );
    assert_eq!(ctx.picker.source(), "json");
    assert!(ctx.logger.is_none());

    ctx.picker.login_demo().unwrap();
    let history: Vec<_> = ctx.picker.recent_history().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(history, vec!["c"]);

    // The vote for an unknown restaurant is carried but never ranked.
    assert_eq!(ctx.picker.votes().len(), 3);
    let groups = ctx.picker.list_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].restaurant.id, "b");
    assert_eq!(groups[0].count, 2);
    assert_eq!(groups[0].colleagues.len(), 2);
}

#[test]
fn test_missing_seed_file_fails_context() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("settings.json"),
        r#"{"app": {"seedSource": "nowhere.json", "logging": false}}"#,
    )
    .unwrap();

    let result = RestoPickContext::new(temp_dir.path(), EntryPoint::Cli);
    assert!(result.is_err());
}

// ============================================================================
// Event Log Tests
// ============================================================================

#[test]
fn test_session_events_are_logged() {
    let temp_dir = TempDir::new().unwrap();
    let (mut ctx, logger) = logged_context(&temp_dir);

    ctx.picker.login("private.person@company.com").unwrap();
    ctx.picker.select_mode(SelectionMode::Popularity).unwrap();
    ctx.picker.select_restaurant("5").unwrap();
    ctx.picker.cast_vote("5").unwrap();

    let entries = logger.get_recent(10).unwrap();
    let events: Vec<_> = entries.iter().map(|e| e.event.as_str()).collect();
    assert_eq!(events, vec!["vote", "select_restaurant", "choose_mode", "login"]);
    assert_eq!(entries[0].screen.as_deref(), Some("confirmation"));
    assert_eq!(entries[0].restaurant_id.as_deref(), Some("5"));
    assert_eq!(entries[0].entry_point, "shell");

    // Identities never reach the log.
    for entry in &entries {
        let row = serde_json::to_string(entry).unwrap();
        assert!(!row.contains("private.person"));
    }
}

#[test]
fn test_rejected_transition_is_logged_as_error() {
    let temp_dir = TempDir::new().unwrap();
    let (mut ctx, logger) = logged_context(&temp_dir);

    ctx.picker.login_demo().unwrap();
    assert!(ctx.picker.go_home().is_err());

    let errors = logger.get_errors(10).unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].event, "transition_rejected");
    assert_eq!(errors[0].command.as_deref(), Some("go_home"));
    assert_eq!(errors[0].screen.as_deref(), Some("home"));
    assert_eq!(logger.count().unwrap(), 2);
}
