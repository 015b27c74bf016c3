//! Error types for sayso.

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Errors from the hosted backend data service (tables, auth, storage).
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Request to backend failed: {0}")]
    Request(String),

    #[error("Backend returned {status} for {operation}: {body}")]
    UnexpectedStatus {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Failed to decode backend response for {operation}: {reason}")]
    Decode { operation: String, reason: String },

    #[error("Storage upload failed: {0}")]
    Upload(String),
}

/// Errors from the SMS gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Failed to send SMS to {to}: {reason}")]
    SendFailed { to: String, reason: String },

    #[error("Gateway rejected credentials: {0}")]
    AuthFailed(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
