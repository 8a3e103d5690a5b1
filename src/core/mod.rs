pub mod harvester;
pub mod mapper;
pub mod pool;
pub mod selector;

pub use crate::domain::model::{Event, Market, Outcome, SportHarvest, SportOutcome};
pub use crate::domain::ports::{ConfigProvider, Fetcher};
pub use crate::utils::error::Result;
