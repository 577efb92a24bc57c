//! Typed error handling for the social-links crate
//!
//! Every failure a caller can observe is represented here, so clients can
//! handle errors specifically rather than matching on strings.
//!
//! # Error Categories
//!
//! - [`SanitizeError`]: URL rejected before persistence; recoverable by
//!   supplying corrected input
//! - [`RegistryError`]: structural or policy violations on writes
//! - [`StoreError`]: persistence backend failures (including the uniqueness
//!   constraint that resolves concurrent creates)
//! - [`ConfigError`]: domain-policy configuration failures
//!
//! None of these are retried automatically: each reflects bad input or a
//! policy boundary rather than a transient fault. The one condition worth a
//! caller-side retry is losing the uniqueness race on create, where the
//! caller should re-read and decide whether to update the existing record.

use crate::core::model::PlatformType;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// The main error type for social-links operations
#[derive(Debug)]
pub enum LinksError {
    /// URL sanitization failures
    Sanitize(SanitizeError),

    /// Registry policy and invariant failures
    Registry(RegistryError),

    /// Storage backend errors
    Storage(StoreError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP request errors (identity header handling)
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for LinksError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinksError::Sanitize(e) => write!(f, "{}", e),
            LinksError::Registry(e) => write!(f, "{}", e),
            LinksError::Storage(e) => write!(f, "{}", e),
            LinksError::Config(e) => write!(f, "{}", e),
            LinksError::Request(e) => write!(f, "{}", e),
            LinksError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for LinksError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LinksError::Sanitize(e) => Some(e),
            LinksError::Registry(e) => Some(e),
            LinksError::Storage(e) => Some(e),
            LinksError::Config(e) => Some(e),
            LinksError::Request(e) => Some(e),
            LinksError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details attributing the failure to a field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LinksError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LinksError::Sanitize(_) => StatusCode::UNPROCESSABLE_ENTITY,
            LinksError::Registry(e) => e.status_code(),
            LinksError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LinksError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LinksError::Request(e) => e.status_code(),
            LinksError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            LinksError::Sanitize(e) => e.error_code(),
            LinksError::Registry(e) => e.error_code(),
            LinksError::Storage(_) => "STORAGE_ERROR",
            LinksError::Config(_) => "CONFIG_ERROR",
            LinksError::Request(e) => e.error_code(),
            LinksError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Field attribution for the error, when one applies
    fn details(&self) -> Option<serde_json::Value> {
        match self {
            LinksError::Sanitize(_) => Some(serde_json::json!({ "field": "url" })),
            LinksError::Registry(RegistryError::DuplicatePlatform { platform }) => {
                Some(serde_json::json!({
                    "field": "platform_type",
                    "platform": platform.as_str(),
                }))
            }
            LinksError::Registry(RegistryError::LimitExceeded { limit }) => {
                Some(serde_json::json!({ "limit": limit }))
            }
            LinksError::Registry(RegistryError::LabelTooLong { max }) => {
                Some(serde_json::json!({ "field": "label", "max": max }))
            }
            LinksError::Registry(RegistryError::NotFound { link_id }) => {
                Some(serde_json::json!({ "link_id": link_id.to_string() }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for LinksError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Sanitize Errors
// =============================================================================

/// URL rejected by the sanitization pipeline, before persistence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SanitizeError {
    /// Not a parseable URL, over the length bound, or missing a host
    InvalidFormat { message: String },

    /// Parseable URL with a scheme other than http/https
    /// (javascript:, data:, file:, ...)
    DisallowedScheme { scheme: String },

    /// Host is not permitted for the target platform
    DomainNotAllowed {
        host: String,
        platform: PlatformType,
    },
}

impl fmt::Display for SanitizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SanitizeError::InvalidFormat { message } => {
                write!(f, "Invalid URL format: {}", message)
            }
            SanitizeError::DisallowedScheme { scheme } => {
                write!(f, "URL scheme '{}' is not allowed", scheme)
            }
            SanitizeError::DomainNotAllowed { host, platform } => {
                write!(
                    f,
                    "Host '{}' is not an allowed domain for platform '{}'",
                    host,
                    platform.as_str()
                )
            }
        }
    }
}

impl std::error::Error for SanitizeError {}

impl SanitizeError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SanitizeError::InvalidFormat { .. } => "INVALID_FORMAT",
            SanitizeError::DisallowedScheme { .. } => "DISALLOWED_SCHEME",
            SanitizeError::DomainNotAllowed { .. } => "DOMAIN_NOT_ALLOWED",
        }
    }
}

impl From<SanitizeError> for LinksError {
    fn from(err: SanitizeError) -> Self {
        LinksError::Sanitize(err)
    }
}

// =============================================================================
// Registry Errors
// =============================================================================

/// Policy and invariant failures on link writes
#[derive(Debug)]
pub enum RegistryError {
    /// A link for this `(owner, platform)` pair already exists
    DuplicatePlatform { platform: PlatformType },

    /// The owner already has the maximum number of links
    LimitExceeded { limit: usize },

    /// Display label exceeds the length bound
    LabelTooLong { max: usize },

    /// The caller is not the owner of the record it tried to mutate
    Unauthorized { caller_id: Uuid },

    /// Unknown link id
    NotFound { link_id: Uuid },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::DuplicatePlatform { platform } => {
                write!(
                    f,
                    "A link for platform '{}' already exists for this owner",
                    platform.as_str()
                )
            }
            RegistryError::LimitExceeded { limit } => {
                write!(f, "Link limit of {} per owner reached", limit)
            }
            RegistryError::LabelTooLong { max } => {
                write!(f, "Label exceeds {} characters", max)
            }
            RegistryError::Unauthorized { caller_id } => {
                write!(f, "Caller '{}' does not own this record", caller_id)
            }
            RegistryError::NotFound { link_id } => {
                write!(f, "Link with id '{}' not found", link_id)
            }
        }
    }
}

impl std::error::Error for RegistryError {}

impl RegistryError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RegistryError::DuplicatePlatform { .. } => StatusCode::CONFLICT,
            RegistryError::LimitExceeded { .. } => StatusCode::CONFLICT,
            RegistryError::LabelTooLong { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RegistryError::Unauthorized { .. } => StatusCode::FORBIDDEN,
            RegistryError::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RegistryError::DuplicatePlatform { .. } => "DUPLICATE_PLATFORM",
            RegistryError::LimitExceeded { .. } => "LIMIT_EXCEEDED",
            RegistryError::LabelTooLong { .. } => "LABEL_TOO_LONG",
            RegistryError::Unauthorized { .. } => "UNAUTHORIZED",
            RegistryError::NotFound { .. } => "NOT_FOUND",
        }
    }
}

impl From<RegistryError> for LinksError {
    fn from(err: RegistryError) -> Self {
        LinksError::Registry(err)
    }
}

// =============================================================================
// Store Errors
// =============================================================================

/// Errors surfaced by a [`LinkStore`](crate::core::store::LinkStore) backend
#[derive(Debug)]
pub enum StoreError {
    /// The `(owner_id, platform_type)` uniqueness constraint was violated.
    ///
    /// This is how the storage layer resolves racing creates: exactly one
    /// insert wins, the loser observes this variant.
    UniqueViolation {
        owner_id: Uuid,
        platform: PlatformType,
    },

    /// No record with this id
    NotFound { id: Uuid },

    /// Backend failure (lock poisoning, connection loss, query error)
    Backend { message: String },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::UniqueViolation { owner_id, platform } => {
                write!(
                    f,
                    "Unique constraint violated for owner '{}' and platform '{}'",
                    owner_id,
                    platform.as_str()
                )
            }
            StoreError::NotFound { id } => {
                write!(f, "Record with id '{}' not found", id)
            }
            StoreError::Backend { message } => {
                write!(f, "Storage backend error: {}", message)
            }
        }
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for LinksError {
    fn from(err: StoreError) -> Self {
        LinksError::Storage(err)
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to domain-policy configuration
#[derive(Debug)]
pub enum ConfigError {
    /// Failed to parse configuration
    ParseError {
        file: Option<String>,
        message: String,
    },

    /// IO error while reading configuration
    IoError { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError { file, message } => {
                if let Some(file) = file {
                    write!(f, "Failed to parse config file '{}': {}", file, message)
                } else {
                    write!(f, "Failed to parse config: {}", message)
                }
            }
            ConfigError::IoError { message } => {
                write!(f, "IO error: {}", message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for LinksError {
    fn from(err: ConfigError) -> Self {
        LinksError::Config(err)
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError {
            file: None,
            message: err.to_string(),
        }
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors around the identity header resolved by the upstream session layer
#[derive(Debug)]
pub enum RequestError {
    /// A mutation or owner-only read arrived without an identity header
    MissingIdentity,

    /// The identity header value is not a UUID
    InvalidIdentity { value: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::MissingIdentity => {
                write!(f, "Request requires an authenticated identity")
            }
            RequestError::InvalidIdentity { value } => {
                write!(f, "Invalid identity header value: '{}'", value)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::MissingIdentity => StatusCode::UNAUTHORIZED,
            RequestError::InvalidIdentity { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::MissingIdentity => "MISSING_IDENTITY",
            RequestError::InvalidIdentity { .. } => "INVALID_IDENTITY",
        }
    }
}

impl From<RequestError> for LinksError {
    fn from(err: RequestError) -> Self {
        LinksError::Request(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for social-links operations
pub type LinksResult<T> = Result<T, LinksError>;

// =============================================================================
// Tests
// =============================================================================
