//! Service layer - business logic orchestration
//!
//! `voting` and `session` are pure; `picker` drives them against a seed
//! provider and `logging` records what happened.

pub mod logging;
mod picker;
pub mod session;
pub mod voting;

pub use logging::{EntryPoint, LogEntry, LogEvent, LoggingService};
pub use picker::{PickerOptions, PickerService};
pub use session::{
    transition, ActiveSession, DetailsOrigin, Screen, SessionEvent, SessionSeed, SessionState,
    Transition,
};
pub use voting::{RankedRestaurant, RestaurantGroup};
