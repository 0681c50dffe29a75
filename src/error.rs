//! Registry Error Module
//!
//! Closed error taxonomy returned by every registry operation.
//! Each variant maps onto a JSON-RPC error code so API clients can branch on it.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Input failed shape or range validation (including investments over a hive's cap)
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Referenced record, caller-scoped record, or any list result is missing
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller does not hold the required ownership relation
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Duplicate profile for an identity, or duplicate email within a collection
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Unexpected failure during execution
    #[error("System error: {0}")]
    SystemError(String),
}

impl RegistryError {
    /// JSON-RPC error code for this variant
    pub fn code(&self) -> i32 {
        match self {
            RegistryError::InvalidPayload(_) => -32602,
            RegistryError::NotFound(_) => -32004,
            RegistryError::Unauthorized(_) => -32003,
            RegistryError::AlreadyExists(_) => -32009,
            RegistryError::SystemError(_) => -32603,
        }
    }

    /// Variant tag, as exposed to clients
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryError::InvalidPayload(_) => "InvalidPayload",
            RegistryError::NotFound(_) => "NotFound",
            RegistryError::Unauthorized(_) => "Unauthorized",
            RegistryError::AlreadyExists(_) => "AlreadyExists",
            RegistryError::SystemError(_) => "SystemError",
        }
    }
}

impl From<sqlx::Error> for RegistryError {
    fn from(err: sqlx::Error) -> Self {
        RegistryError::SystemError(format!("storage failure: {}", err))
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::SystemError(format!("record encoding failure: {}", err))
    }
}

impl From<regex::Error> for RegistryError {
    fn from(err: regex::Error) -> Self {
        RegistryError::SystemError(format!("validator setup failure: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
