pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

/// 端點模板中代表運動項目的佔位符
pub const SPORT_PLACEHOLDER: &str = "{sport}";

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpFetcher;
pub use app::OutputFormat;
pub use config::HarvestConfig;
pub use crate::core::{harvester::Harvester, pool::WorkerPool};
pub use domain::model::{Event, Market, Outcome, SportHarvest, SportOutcome};
pub use utils::error::{HarvestError, Result};
