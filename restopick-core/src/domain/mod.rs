//! Core domain entities
//!
//! All lunch-voting entities are defined here. These are pure data structures
//! with light construction helpers - no I/O or external dependencies.

mod restaurant;
mod selection;
mod user;
mod vote;
pub mod result;

pub use restaurant::{PriceTier, Restaurant};
pub use selection::{FilterCriteria, SelectionMode, DEFAULT_MAX_DISTANCE};
pub use user::User;
pub use vote::Vote;
