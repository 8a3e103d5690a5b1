use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Request failed with status {status} for URL: {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Failed to decode {encoding} response body: {message}")]
    DecompressionError { encoding: String, message: String },

    #[error("Malformed response for {sport}: {reason}")]
    MalformedResponseError { sport: String, reason: String },

    #[error("Failed to parse {item}: {reason}")]
    ItemParseError { item: String, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Worker pool is not accepting tasks")]
    PoolUnavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HarvestError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            HarvestError::HttpError(_)
            | HarvestError::HttpStatusError { .. }
            | HarvestError::DecompressionError { .. } => ErrorCategory::Transport,
            HarvestError::MalformedResponseError { .. }
            | HarvestError::ItemParseError { .. }
            | HarvestError::SerializationError(_)
            | HarvestError::CsvError(_) => ErrorCategory::Data,
            HarvestError::ConfigValidationError { .. }
            | HarvestError::InvalidConfigValueError { .. }
            | HarvestError::MissingConfigError { .. } => ErrorCategory::Configuration,
            HarvestError::IoError(_) | HarvestError::PoolUnavailable => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            HarvestError::ItemParseError { .. } => ErrorSeverity::Low,
            HarvestError::HttpError(_)
            | HarvestError::HttpStatusError { .. }
            | HarvestError::DecompressionError { .. }
            | HarvestError::MalformedResponseError { .. } => ErrorSeverity::Medium,
            HarvestError::SerializationError(_)
            | HarvestError::CsvError(_)
            | HarvestError::ConfigValidationError { .. }
            | HarvestError::InvalidConfigValueError { .. }
            | HarvestError::MissingConfigError { .. } => ErrorSeverity::High,
            HarvestError::IoError(_) | HarvestError::PoolUnavailable => ErrorSeverity::Critical,
        }
    }

    /// 傳輸層錯誤（網路、HTTP 狀態、解壓縮）
    pub fn is_transport(&self) -> bool {
        self.category() == ErrorCategory::Transport
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            HarvestError::HttpError(e) if e.is_timeout() => {
                "The upstream API did not answer in time".to_string()
            }
            HarvestError::HttpError(_) => "Could not reach the upstream API".to_string(),
            HarvestError::HttpStatusError { status, .. } => {
                format!("The upstream API rejected the request (HTTP {})", status)
            }
            HarvestError::DecompressionError { encoding, .. } => {
                format!("The upstream API sent an unreadable {} body", encoding)
            }
            HarvestError::MalformedResponseError { sport, .. } => {
                format!("The upstream API returned unexpected data for {}", sport)
            }
            HarvestError::ItemParseError { item, .. } => format!("Skipped an incomplete {}", item),
            HarvestError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            HarvestError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value for '{}' is invalid: {}", field, reason)
            }
            HarvestError::MissingConfigError { field } => {
                format!("Configuration value '{}' is required", field)
            }
            HarvestError::PoolUnavailable => "The harvester has been shut down".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => "Check network connectivity and the source endpoint, then retry",
            ErrorCategory::Data => "The upstream payload format may have changed; run with --verbose to inspect it",
            ErrorCategory::Configuration => "Fix the configuration file or command line flags and run again",
            ErrorCategory::System => "Restart the harvester; if it persists, check system resources",
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
