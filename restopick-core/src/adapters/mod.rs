//! Adapter implementations
//!
//! Adapters implement the port traits with concrete data sources:
//! - Built-in demo office for SeedProvider
//! - JSON seed files for SeedProvider

pub mod demo;
pub mod json_file;

pub use demo::DemoSeedProvider;
pub use json_file::JsonSeedProvider;
