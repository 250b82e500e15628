use thiserror::Error;

/// 查詢流程與配置層的所有錯誤。
///
/// 前四個變體對應一次查詢的四種失敗路徑，`Display` 即為要顯示給使用者的文字
/// (包含類別前綴)。
#[derive(Error, Debug)]
pub enum CrowdingError {
    #[error("Request failed: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Request failed: {message}")]
    QueryAborted { message: String },

    #[error("Parse error: {message}")]
    DecodeError { message: String },

    #[error("Query failed: {message}")]
    ApplicationError { message: String },

    #[error("No matching data found")]
    EmptyResult,

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl From<serde_json::Error> for CrowdingError {
    fn from(err: serde_json::Error) -> Self {
        CrowdingError::DecodeError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Decode,
    Application,
    EmptyResult,
    Configuration,
    Io,
}

impl CrowdingError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CrowdingError::TransportError(_) | CrowdingError::QueryAborted { .. } => {
                ErrorCategory::Transport
            }
            CrowdingError::DecodeError { .. } => ErrorCategory::Decode,
            CrowdingError::ApplicationError { .. } => ErrorCategory::Application,
            CrowdingError::EmptyResult => ErrorCategory::EmptyResult,
            CrowdingError::UrlError(_)
            | CrowdingError::ConfigValidationError { .. }
            | CrowdingError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CrowdingError::IoError(_) => ErrorCategory::Io,
        }
    }

    /// 只有逾時會交給重試策略處理，連線失敗直接回報
    pub fn is_retryable(&self) -> bool {
        match self {
            CrowdingError::TransportError(e) => e.is_timeout(),
            _ => false,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CrowdingError::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            CrowdingError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is not valid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => {
                "Check that the backend is running and reachable at the configured host and port"
            }
            ErrorCategory::Decode => "The backend returned an unexpected body; check its version",
            ErrorCategory::Application => "Check the line, run and carriage values",
            ErrorCategory::EmptyResult => "No reading has been recorded for that carriage yet",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::Io => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, CrowdingError>;
