use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

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

    #[error("Unknown attribute '{key}' (expected one of: {allowed})")]
    UnknownAttribute { key: String, allowed: String },

    #[error("Unsupported format '{format}' (expected one of: {allowed})")]
    UnsupportedFormat { format: String, allowed: String },

    #[error("Duplicate listing id {id}")]
    DuplicateId { id: u64 },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("No listing with id {id}")]
    ListingNotFound { id: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Data,
    Configuration,
    Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EngineError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EngineError::IoError(_) => ErrorCategory::Io,
            EngineError::SerializationError(_)
            | EngineError::CsvError(_)
            | EngineError::DuplicateId { .. }
            | EngineError::ValidationError { .. } => ErrorCategory::Data,
            EngineError::ConfigError { .. }
            | EngineError::ConfigValidationError { .. }
            | EngineError::InvalidConfigValueError { .. }
            | EngineError::UnsupportedFormat { .. } => ErrorCategory::Configuration,
            EngineError::UnknownAttribute { .. } | EngineError::ListingNotFound { .. } => {
                ErrorCategory::Contract
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EngineError::ListingNotFound { .. } => ErrorSeverity::Medium,
            EngineError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Io => "Check that the data file exists and is readable",
            ErrorCategory::Data => {
                "Fix the data file: every listing needs a unique id, names and an email"
            }
            ErrorCategory::Configuration => "Review the command line flags and the config file",
            ErrorCategory::Contract => "Use one of the attribute names or ids listed in the error",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EngineError::IoError(e) => format!("Could not read the data file ({})", e),
            EngineError::SerializationError(e) => {
                format!("The data file is not a valid listing collection ({})", e)
            }
            EngineError::CsvError(e) => format!("The CSV data could not be processed ({})", e),
            EngineError::DuplicateId { id } => {
                format!("Listing id {} appears more than once in the data file", id)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
