//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The engine and the
//! session state machine depend only on these traits, not on concrete data
//! sources.

mod seed;

pub use seed::{SeedProvider, RECENT_HISTORY_LEN};
