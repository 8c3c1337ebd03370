use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoreError {
    #[error("Invalid seed: {reason}")]
    InvalidSeed { reason: String },

    #[error("Invalid code length {length}: {reason}")]
    InvalidLength { length: usize, reason: String },

    #[error("Invalid base unit {value}: must be a finite number greater than zero")]
    InvalidBaseUnit { value: f64 },

    #[error("Invalid snap query {value}: must be a finite number")]
    InvalidQuery { value: f64 },

    #[error("Digest too short: {required} hex characters required, {available} available")]
    DigestTooShort { required: usize, available: usize },

    #[error("Fibonacci sequence of {terms} terms overflows u64")]
    FibonacciOverflow { terms: usize },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

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

    #[error("Missing required configuration: {field} references an unset environment variable")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Arithmetic,
    Configuration,
    Network,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl LoreError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            LoreError::InvalidSeed { .. }
            | LoreError::InvalidLength { .. }
            | LoreError::InvalidBaseUnit { .. }
            | LoreError::InvalidQuery { .. } => ErrorCategory::Validation,
            LoreError::DigestTooShort { .. } | LoreError::FibonacciOverflow { .. } => {
                ErrorCategory::Arithmetic
            }
            LoreError::ConfigError { .. }
            | LoreError::ConfigValidationError { .. }
            | LoreError::InvalidConfigValueError { .. }
            | LoreError::MissingConfigError { .. } => ErrorCategory::Configuration,
            LoreError::ApiError(_) => ErrorCategory::Network,
            LoreError::IoError(_) | LoreError::SerializationError(_) => ErrorCategory::Io,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Validation | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Arithmetic | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            LoreError::InvalidSeed { .. } => "Provide a non-empty seed string".to_string(),
            LoreError::InvalidLength { .. } => "Request a code length of at least 1".to_string(),
            LoreError::InvalidBaseUnit { .. } => {
                "Use a base unit such as 1.0 (finite and positive)".to_string()
            }
            LoreError::InvalidQuery { .. } => "Snap queries must not be NaN or infinite".to_string(),
            LoreError::DigestTooShort { .. } => {
                "Reduce the code length to 32 or enable digest extension".to_string()
            }
            LoreError::FibonacciOverflow { .. } => {
                "Request at most 93 Fibonacci terms".to_string()
            }
            LoreError::ApiError(_) => "Check network connectivity and the repository URL".to_string(),
            LoreError::IoError(_) => "Check that the file exists and is readable".to_string(),
            LoreError::SerializationError(_) => "Report this as a bug".to_string(),
            LoreError::MissingConfigError { .. } => {
                "Export the referenced environment variable or replace the placeholder".to_string()
            }
            LoreError::ConfigError { .. }
            | LoreError::ConfigValidationError { .. }
            | LoreError::InvalidConfigValueError { .. } => {
                "Fix the configuration file and try again".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => format!("Input rejected: {}", self),
            ErrorCategory::Arithmetic => format!("Cannot compute result: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Io => format!("File problem: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoreError>;
