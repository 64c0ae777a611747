use thiserror::Error;

/// 搜尋流程對呼叫端可見的失敗種類
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("Invalid input: country is required")]
    InvalidInput,

    #[error("Network failure: {0}")]
    NetworkFailure(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),
}

impl SearchError {
    /// 給使用者看的提示文字
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::InvalidInput => "Please enter a country name",
            SearchError::NetworkFailure(_) | SearchError::UpstreamFailure(_) => {
                "Failed to fetch universities. Please try again."
            }
        }
    }

    /// 降級回應中使用的 reason 字串
    pub fn reason(&self) -> &'static str {
        match self {
            SearchError::InvalidInput => "invalid_input",
            SearchError::NetworkFailure(_) => "network",
            SearchError::UpstreamFailure(_) => "upstream",
        }
    }
}

/// 代理函式呼叫上游目錄服務時的錯誤
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("upstream request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("malformed upstream body: {0}")]
    Malformed(String),
}

impl UpstreamError {
    pub fn is_network(&self) -> bool {
        matches!(self, UpstreamError::Timeout | UpstreamError::Network(_))
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            UpstreamError::Timeout
        } else if let Some(status) = e.status() {
            UpstreamError::Status(status.as_u16())
        } else if e.is_decode() {
            UpstreamError::Malformed(e.to_string())
        } else {
            UpstreamError::Network(e.to_string())
        }
    }
}

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Search failed: {0}")]
    Search(#[from] SearchError),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Network,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ExplorerError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExplorerError::Http(_) => ErrorCategory::Network,
            ExplorerError::Search(SearchError::InvalidInput) => ErrorCategory::Input,
            ExplorerError::Search(_) => ErrorCategory::Network,
            ExplorerError::CsvError(_)
            | ExplorerError::IoError(_)
            | ExplorerError::SerializationError(_) => ErrorCategory::Output,
            ExplorerError::ConfigError { .. }
            | ExplorerError::ConfigValidationError { .. }
            | ExplorerError::InvalidConfigValueError { .. }
            | ExplorerError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Output => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ExplorerError::Search(e) => e.user_message().to_string(),
            ExplorerError::Http(_) => "Could not reach the university directory".to_string(),
            ExplorerError::IoError(e) => format!("Could not read or write a file: {}", e),
            ExplorerError::CsvError(_) | ExplorerError::SerializationError(_) => {
                "Could not format the search results".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Pass a non-empty --country value",
            ErrorCategory::Network => "Check your connection or the proxy URL and try again",
            ErrorCategory::Configuration => "Check the command line flags and the config file",
            ErrorCategory::Output => "Check that the output path is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
