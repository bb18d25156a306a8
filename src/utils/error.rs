use thiserror::Error;

/// Failures of the rate-acquisition step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("Latest rates unavailable: {reason}")]
    LatestUnavailable { reason: String },

    #[error("Rate history unavailable: {reason}")]
    HistoryUnavailable { reason: String },

    #[error("Rate history contained no usable daily samples")]
    InsufficientHistory,
}

/// Failures of the raise calculation.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationError {
    #[error("Current and proposed salary must both be positive numbers")]
    InvalidSalary,

    #[error("Exchange rates required for the calculation are missing")]
    MissingRates,
}

#[derive(Error, Debug)]
pub enum RaiseError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Calculation(#[from] CalculationError),

    #[error("Rates have not been resolved yet")]
    RatesNotReady,

    #[error("HTTP client error: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Input,
    Configuration,
    Storage,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RaiseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RaiseError::Fetch(_) | RaiseError::ApiError(_) => ErrorCategory::Network,
            RaiseError::Calculation(_) | RaiseError::RatesNotReady => ErrorCategory::Input,
            RaiseError::IoError(_) | RaiseError::SerializationError(_) => ErrorCategory::Storage,
            RaiseError::ConfigError { .. }
            | RaiseError::MissingConfigError { .. }
            | RaiseError::InvalidConfigValueError { .. }
            | RaiseError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // the network step can simply be retried
            RaiseError::Fetch(_) => ErrorSeverity::Medium,
            RaiseError::Calculation(_) | RaiseError::RatesNotReady => ErrorSeverity::High,
            RaiseError::ApiError(_) => ErrorSeverity::High,
            RaiseError::IoError(_) | RaiseError::SerializationError(_) => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RaiseError::Fetch(_) => {
                "Exchange rates could not be loaded, so the raise cannot be evaluated.".to_string()
            }
            RaiseError::Calculation(CalculationError::InvalidSalary) => {
                "Please enter a valid current salary and proposed salary.".to_string()
            }
            RaiseError::Calculation(CalculationError::MissingRates)
            | RaiseError::RatesNotReady => {
                "Exchange rates are required for the calculation. Please try again.".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RaiseError::Fetch(FetchError::InsufficientHistory) => {
                "The provider returned no usable history; try again later"
            }
            RaiseError::Fetch(_) => "Check your network connection and run the command again",
            RaiseError::Calculation(CalculationError::InvalidSalary) => {
                "Pass both --current and --proposed as positive amounts, e.g. 100.000"
            }
            RaiseError::Calculation(CalculationError::MissingRates)
            | RaiseError::RatesNotReady => "Run again with --refresh to fetch fresh rates",
            RaiseError::IoError(_) | RaiseError::SerializationError(_) => {
                "Check that the session file is writable, or delete it"
            }
            _ => "Fix the configuration file or command-line flags",
        }
    }
}

pub type Result<T> = std::result::Result<T, RaiseError>;
