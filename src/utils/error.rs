use thiserror::Error;

/// Fixed message shown to the user whenever a venue search fails.
pub const SEARCH_FAILED_MESSAGE: &str =
    "An error occurred when retrieving venues. Please reload the page or try another search.";

#[derive(Error, Debug)]
pub enum MapError {
    #[error("API request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Provider returned status {code}: {message}")]
    Provider { code: i64, message: String },

    #[error("Unexpected provider response: {message}")]
    InvalidResponse { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl MapError {
    /// 屬於「查詢失敗」類別的錯誤，會轉成使用者可見的 alert
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            MapError::Http(_)
                | MapError::Serialization(_)
                | MapError::Provider { .. }
                | MapError::InvalidResponse { .. }
        )
    }

    pub fn user_friendly_message(&self) -> String {
        if self.is_provider_failure() {
            return SEARCH_FAILED_MESSAGE.to_string();
        }
        match self {
            MapError::Io(e) => format!("Could not read a required file: {}", e),
            MapError::MissingConfigError { field } => {
                format!("The setting '{}' is required", field)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MapError::Http(_) => "Check your network connection and try again",
            MapError::Provider { .. } => "Check the provider credentials or try another search",
            MapError::Serialization(_) | MapError::InvalidResponse { .. } => {
                "The provider answered with an unexpected payload; try another search"
            }
            MapError::Io(_) => "Make sure the file exists and is readable",
            MapError::ConfigError { .. }
            | MapError::InvalidConfigValueError { .. }
            | MapError::MissingConfigError { .. } => "Fix the configuration file and rerun",
            MapError::ValidationError { .. } => "Check the input values",
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
