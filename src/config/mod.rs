pub mod toml_config;

pub use toml_config::HarvestConfig;

#[cfg(feature = "cli")]
use crate::app::OutputFormat;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "odds-harvester")]
#[command(about = "Harvest top-league odds snapshots for several sports")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Comma-separated sports to harvest (overrides the config file)
    #[arg(long, value_delimiter = ',')]
    pub sports: Vec<String>,

    #[arg(long, help = "Number of concurrent workers")]
    pub workers: Option<usize>,

    #[arg(long, help = "Maximum number of top leagues per sport")]
    pub top_leagues: Option<usize>,

    #[arg(long, help = "Per-request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[arg(long, help = "Log CPU and memory usage of the run")]
    pub monitor: bool,

    /// Show the resolved plan without contacting the upstream API
    #[arg(long)]
    pub dry_run: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入設定檔（若有）並套用命令列覆蓋
    pub fn resolve(&self) -> Result<HarvestConfig> {
        let mut config = match &self.config {
            Some(path) => HarvestConfig::from_file(path)?,
            None => HarvestConfig::default(),
        };

        if !self.sports.is_empty() {
            config.harvest.sports = self.sports.iter().map(|s| s.trim().to_string()).collect();
        }
        if let Some(workers) = self.workers {
            config.harvest.workers = workers;
        }
        if let Some(top_leagues) = self.top_leagues {
            config.harvest.top_leagues = top_leagues;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.source.timeout_seconds = timeout;
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }

        Ok(config)
    }
}
