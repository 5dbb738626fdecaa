use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Source endpoint {endpoint} returned status {status}")]
    SourceStatus { endpoint: String, status: u16 },

    #[error("Content store rejected {operation} (status {status}): {message}")]
    StoreApi {
        operation: String,
        status: u16,
        message: String,
    },

    #[error("Unexpected response from {operation}: {message}")]
    UnexpectedResponse { operation: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("CSV report error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Import aborted after {created} documents: {reason}")]
    Aborted { created: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Source,
    Store,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ImportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ImportError::HttpError(_) => ErrorCategory::Network,
            ImportError::SourceStatus { .. } => ErrorCategory::Source,
            ImportError::StoreApi { .. } | ImportError::UnexpectedResponse { .. } => {
                ErrorCategory::Store
            }
            ImportError::IoError(_) | ImportError::CsvError(_) => ErrorCategory::System,
            ImportError::SerializationError(_) | ImportError::ProcessingError { .. } => {
                ErrorCategory::Data
            }
            ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ImportError::Aborted { .. } => ErrorCategory::Store,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network | ErrorCategory::Source | ErrorCategory::Data => {
                ErrorSeverity::Medium
            }
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Store | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Transport failures, 5xx and 429 responses are worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            ImportError::HttpError(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.status().is_some_and(|s| s.is_server_error())
            }
            ImportError::SourceStatus { status, .. } | ImportError::StoreApi { status, .. } => {
                *status == 429 || (500..600).contains(status)
            }
            _ => false,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ImportError::HttpError(_) => {
                "Check network connectivity or raise --retry-attempts / --timeout-seconds"
            }
            ImportError::SourceStatus { .. } => {
                "Verify the foods/chefs endpoint URLs and that the source API is up"
            }
            ImportError::StoreApi { status: 401, .. } | ImportError::StoreApi { status: 403, .. } => {
                "Make sure SANITY_API_TOKEN is a token with write access to the dataset"
            }
            ImportError::StoreApi { .. } | ImportError::UnexpectedResponse { .. } => {
                "Check the project id, dataset and api version of the content store"
            }
            ImportError::Aborted { .. } => {
                "Documents created before the failure remain; fix the record or use --on-create-error continue"
            }
            ImportError::ConfigValidationError { .. }
            | ImportError::InvalidConfigValueError { .. }
            | ImportError::MissingConfigError { .. } => "Review the command line flags, environment or config file",
            ImportError::IoError(_) | ImportError::CsvError(_) => {
                "Check that the report path is writable"
            }
            ImportError::SerializationError(_) | ImportError::ProcessingError { .. } => {
                "Inspect the source payload; records must match the food/chef shapes"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Source => format!("Could not read seed data: {}", self),
            ErrorCategory::Store => format!("Content store error: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Bad seed data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
