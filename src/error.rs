// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the importer.
//! Each variant says what went wrong and where, so the HTTP layer can
//! pick a status code without string matching on messages.

use std::fmt;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the codes Notion reports are encoded in the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotionErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is not shared with the integration
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request body contains invalid JSON
    InvalidJson,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Conflict with current state of the resource
    Conflict,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl NotionErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "invalid_json" => Self::InvalidJson,
            "validation_error" => Self::ValidationFailed,
            "conflict_error" => Self::Conflict,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether the code means the integration may not read the resource.
    pub fn is_access_denied(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized | Self::RestrictedResource | Self::HttpStatus(401 | 403)
        )
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound | Self::HttpStatus(404))
    }
}

impl fmt::Display for NotionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::InvalidJson => write!(f, "invalid_json"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::Conflict => write!(f, "conflict_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid Notion page reference: {0}")]
    InvalidReference(String),

    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Notion API returned an error ({code}): {message}")]
    NotionService {
        code: NotionErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Upstream unavailable while {operation}: {source}")]
    UpstreamUnavailable {
        operation: String,
        #[source]
        source: Box<AppError>,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] crate::types::ValidationError),

    #[error("Internal error: {message}")]
    InternalError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl AppError {
    /// Wraps a remote failure with the import step it interrupted.
    pub fn upstream(operation: impl Into<String>, source: AppError) -> Self {
        AppError::UpstreamUnavailable {
            operation: operation.into(),
            source: Box::new(source),
        }
    }

    /// Whether the failure means the caller gave us something that is not a page reference.
    pub fn is_invalid_reference(&self) -> bool {
        match self {
            AppError::InvalidReference(_) => true,
            AppError::Validation(crate::types::ValidationError::InvalidId(_)) => true,
            _ => false,
        }
    }

    /// Whether Notion refused access to the page.
    ///
    /// Besides the typed codes, messages mentioning authorization or
    /// permissions count, since Notion reports some restrictions only in
    /// prose.
    pub fn is_access_denied(&self) -> bool {
        match self {
            AppError::NotionService {
                code,
                message,
                status,
            } => {
                code.is_access_denied()
                    || matches!(status.as_u16(), 401 | 403)
                    || mentions_access(message)
            }
            AppError::UpstreamUnavailable { source, .. } => source.is_access_denied(),
            _ => false,
        }
    }

    /// Whether Notion reported the object as missing.
    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::NotionService { code, status, .. } => {
                code.is_not_found() || status.as_u16() == 404
            }
            AppError::UpstreamUnavailable { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

fn mentions_access(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    ["unauthorized", "permission", "restricted"]
        .iter()
        .any(|needle| message.contains(needle))
}

// Allow converting from anyhow::Error, preserving the message
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalError {
            message: err.to_string(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}
