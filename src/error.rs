use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Directory query that was running when a failure occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryStep {
    RootDse,
    ClassSchema,
    AttributeSchema,
    GroupPolicy,
}

impl fmt::Display for QueryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStep::RootDse => write!(f, "root DSE lookup"),
            QueryStep::ClassSchema => write!(f, "classSchema query"),
            QueryStep::AttributeSchema => write!(f, "attributeSchema query"),
            QueryStep::GroupPolicy => write!(f, "groupPolicyContainer query"),
        }
    }
}

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Unexpected connection error: {0}")]
    Unknown(String),

    #[error("Schema discovery failed: {0}")]
    SchemaDiscovery(String),

    #[error("Query failed during {step}: {message}")]
    Query { step: QueryStep, message: String },

    #[error("LDAP error: {0}")]
    LdapError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Serializable error for `--json` output
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: String,
    pub message: String,
}

impl From<&AppError> for ErrorReport {
    fn from(err: &AppError) -> Self {
        ErrorReport {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

impl AppError {
    /// Wrap a failure from `step` as a terminal query error
    pub fn query(step: QueryStep, cause: impl fmt::Display) -> Self {
        let message = match cause.to_string() {
            m if m.starts_with("LDAP error: ") => m["LDAP error: ".len()..].to_string(),
            m => m,
        };
        AppError::Query { step, message }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Transport(_) => "TRANSPORT_ERROR",
            AppError::Authentication(_) => "AUTH_FAILED",
            AppError::Unknown(_) => "UNKNOWN_ERROR",
            AppError::SchemaDiscovery(_) => "SCHEMA_DISCOVERY_ERROR",
            AppError::Query { .. } => "QUERY_ERROR",
            AppError::LdapError(_) => "LDAP_ERROR",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Io(_) => "IO_ERROR",
            AppError::Serialization(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Failures of the encrypted bind that allow the plaintext fallback
    pub fn is_recoverable_bind_failure(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Authentication(_))
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Transport(_) | AppError::Authentication(_) | AppError::Unknown(_) => 3,
            AppError::SchemaDiscovery(_) => 4,
            AppError::Query { .. } | AppError::LdapError(_) => 5,
            AppError::Config(_) | AppError::Io(_) | AppError::Serialization(_) => 1,
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
