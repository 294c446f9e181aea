//! RestoPick Core - lunch voting for a small office
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core entities (Restaurant, User, Vote, selection criteria)
//! - **ports**: Trait definitions for external dependencies (SeedProvider)
//! - **services**: Voting engine, session state machine and event log
//! - **adapters**: Concrete seed providers (built-in demo office, JSON file)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod log_migrations;
pub mod ports;
pub mod services;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use adapters::{DemoSeedProvider, JsonSeedProvider};
use config::{Config, SeedSource};
use ports::SeedProvider;
use services::{PickerOptions, PickerService};

// Re-export commonly used types at crate root
pub use domain::result::{Error, Outcome};
pub use domain::{FilterCriteria, PriceTier, Restaurant, SelectionMode, User, Vote};
pub use services::{EntryPoint, LogEntry, LogEvent, LoggingService, RankedRestaurant, RestaurantGroup};

/// Main context for RestoPick operations
///
/// Holds the configuration, the optional event log and the picker service
/// that carries the session.
pub struct RestoPickContext {
    pub config: Config,
    pub app_dir: PathBuf,
    pub picker: PickerService,
    pub logger: Option<Arc<LoggingService>>,
}

impl RestoPickContext {
    /// Create a context from the settings in `app_dir`
    ///
    /// The event log is opened when logging is enabled; failing to open it
    /// leaves the context without one.
    pub fn new(app_dir: &Path, entry_point: EntryPoint) -> Result<Self> {
        let config = Config::load(app_dir)?;
        let provider = open_seed_provider(&config.seed_source)?;

        let logger = if config.logging {
            LoggingService::new(app_dir, entry_point, env!("CARGO_PKG_VERSION"))
                .ok()
                .map(Arc::new)
        } else {
            None
        };

        Ok(Self::with_provider(app_dir, config, provider, logger))
    }

    /// Assemble a context around an already built seed provider
    pub fn with_provider(
        app_dir: &Path,
        config: Config,
        provider: Arc<dyn SeedProvider>,
        logger: Option<Arc<LoggingService>>,
    ) -> Self {
        let options = PickerOptions {
            serendipity_count: config.serendipity_count,
            default_max_distance: config.default_max_distance,
            rng_seed: config.rng_seed,
        };

        let mut picker = PickerService::new(provider, options);
        if let Some(logger) = &logger {
            picker = picker.with_logger(Arc::clone(logger));
        }

        Self {
            config,
            app_dir: app_dir.to_path_buf(),
            picker,
            logger,
        }
    }
}

/// Build the seed provider a configuration points at
pub fn open_seed_provider(source: &SeedSource) -> Result<Arc<dyn SeedProvider>> {
    match source {
        SeedSource::Demo => Ok(Arc::new(DemoSeedProvider::new())),
        SeedSource::File(path) => {
            let provider = JsonSeedProvider::load(path)
                .with_context(|| format!("Failed to load seed file {}", path.display()))?;
            Ok(Arc::new(provider))
        }
    }
}
