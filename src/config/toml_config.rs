use crate::app::OutputFormat;
use crate::core::pool::DEFAULT_WORKERS;
use crate::core::selector::DEFAULT_TOP_LEAGUES;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{HarvestError, Result};
use crate::utils::validation::{self, Validate};
use crate::SPORT_PLACEHOLDER;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://leonbets.com/api-2/betline/changes/all?ctag=en-US&vtag=9c2cd386-31e1-4ce9-a140-28e9b63a9300&sport={sport}&hideClosed=true&flags=reg,urlv2,mm2,rrc,nodup";
pub const DEFAULT_ORIGIN: &str = "https://leonbets.com";
pub const DEFAULT_SPORTS: [&str; 4] = ["football", "tennis", "hockey", "basketball"];
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_SHUTDOWN_GRACE_SECONDS: u64 = 60;

/// 收割設定；所有區段皆可省略，省略時使用預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    pub source: SourceConfig,
    pub harvest: HarvestSettings,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// 含 `{sport}` 佔位符的端點
    pub endpoint: String,
    /// Referer / Origin 標頭使用的站點來源
    pub origin: String,
    pub timeout_seconds: u64,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvestSettings {
    pub sports: Vec<String>,
    pub top_leagues: usize,
    pub workers: usize,
    pub shutdown_grace_seconds: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            headers: None,
        }
    }
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            sports: DEFAULT_SPORTS.iter().map(|s| s.to_string()).collect(),
            top_leagues: DEFAULT_TOP_LEAGUES,
            workers: DEFAULT_WORKERS,
            shutdown_grace_seconds: DEFAULT_SHUTDOWN_GRACE_SECONDS,
        }
    }
}

impl HarvestConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HarvestError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${LEON_ORIGIN})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HarvestError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_endpoint_template("source.endpoint", &self.source.endpoint, SPORT_PLACEHOLDER)?;
        validation::validate_url("source.origin", &self.source.origin)?;
        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 300)?;

        if let Some(headers) = &self.source.headers {
            for name in headers.keys() {
                validation::validate_non_empty_string("source.headers", name)?;
            }
        }

        validation::validate_distinct_names("harvest.sports", &self.harvest.sports)?;
        validation::validate_positive_number("harvest.top_leagues", self.harvest.top_leagues, 1)?;
        validation::validate_positive_number("harvest.workers", self.harvest.workers, 1)?;

        Ok(())
    }
}

impl ConfigProvider for HarvestConfig {
    fn endpoint_template(&self) -> &str {
        &self.source.endpoint
    }

    fn origin(&self) -> &str {
        &self.source.origin
    }

    fn extra_headers(&self) -> Vec<(String, String)> {
        self.source
            .headers
            .as_ref()
            .map(|headers| headers.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn sports(&self) -> &[String] {
        &self.harvest.sports
    }

    fn top_league_limit(&self) -> usize {
        self.harvest.top_leagues
    }

    fn workers(&self) -> usize {
        self.harvest.workers
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds)
    }

    fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.harvest.shutdown_grace_seconds)
    }
}

impl Validate for HarvestConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
