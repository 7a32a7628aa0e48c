//! Error types for route registration and request handling.
//!
//! Registration problems (conflicting patterns, empty handler chains, malformed
//! patterns) are reported through the same opaque [`Error`] as configuration and
//! I/O failures. All errors implement `IntoResponse` so that a handler can abort
//! a request with one and have it serialized to JSON.
//!
//! # Design
//!
//! This module uses an opaque `Error` struct paired with an `ErrorKind` enum,
//! following the `std::io::Error` pattern. Internal error sources can change
//! without breaking consumers.
//!
//! # Example
//!
//! ```rust
//! use axum_approuter::{Error, ErrorKind};
//!
//! let error = Error::internal("Something went wrong");
//!
//! match error.kind() {
//!     ErrorKind::RouteConflict => println!("Bad route table: {}", error),
//!     ErrorKind::Internal => println!("Internal error: {}", error),
//!     _ => println!("Other error: {}", error),
//! }
//!
//! use axum::http::StatusCode;
//! assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
//! ```

use {
    crate::routing::RouteMethod,
    axum::{
        Json,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Serialize,
    std::fmt,
    thiserror::Error,
};

/// The kind of error that occurred.
///
/// This enum is marked `#[non_exhaustive]`, so new variants may be added
/// in future versions without breaking existing code. Always include a
/// wildcard arm when matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Two route patterns cannot coexist in the routing tree.
    #[error("route conflict")]
    RouteConflict,

    /// A route was registered without any handler.
    #[error("empty handler chain")]
    EmptyChain,

    /// Configuration error (invalid TOML, missing values).
    #[error("configuration error")]
    Configuration,

    /// I/O error (listener bind, serving).
    #[error("I/O error")]
    Io,

    /// Invalid input (malformed pattern, header or address).
    #[error("invalid input")]
    InvalidInput,

    /// Internal/unexpected error.
    #[error("internal error")]
    Internal,
}

/// Where and why two route patterns collide in the routing tree.
///
/// Carried as the source of every [`ErrorKind::RouteConflict`] error; retrieve
/// it with [`Error::conflict`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{method} {pattern}: segment `{segment}` conflicts with `{existing_segment}` of existing route {existing_pattern}"
)]
pub struct ConflictDetail {
    /// Method tree in which the collision happened.
    pub method: RouteMethod,
    /// The pattern being registered.
    pub pattern: String,
    /// The segment of `pattern` that cannot be inserted.
    pub segment: String,
    /// The segment already present at that position.
    pub existing_segment: String,
    /// A previously registered pattern going through `existing_segment`.
    pub existing_pattern: String,
}

/// An error that can occur in the axum-approuter library.
///
/// Use [`Error::kind()`] to determine the category of error for matching,
/// and the `Display` implementation to get a human-readable message.
///
/// ```rust
/// use axum_approuter::Error;
///
/// let err = Error::internal("unexpected state");
/// let err = Error::invalid_input("pattern must start with '/'");
/// let err = Error::config("bind_addr cannot be empty");
/// ```
pub struct Error {
    kind: ErrorKind,
    source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl Error {
    /// Creates a new error with the given kind and source.
    ///
    /// ```rust
    /// use axum_approuter::{Error, ErrorKind};
    ///
    /// let err = Error::new(ErrorKind::Internal, "something went wrong");
    /// assert_eq!(err.kind(), ErrorKind::Internal);
    /// ```
    pub fn new<E>(kind: ErrorKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self {
            kind,
            source: error.into(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the conflict details when this is a route conflict.
    pub fn conflict(&self) -> Option<&ConflictDetail> {
        match self.kind {
            ErrorKind::RouteConflict => self.source.downcast_ref::<ConflictDetail>(),
            _ => None,
        }
    }

    /// Returns the error code string for this error.
    ///
    /// This is a stable identifier suitable for client-side error handling.
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ErrorKind::RouteConflict => "ROUTE_CONFLICT",
            ErrorKind::EmptyChain => "EMPTY_CHAIN",
            ErrorKind::Configuration => "CONFIG_ERROR",
            ErrorKind::Io => "IO_ERROR",
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::Internal => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::RouteConflict
            | ErrorKind::EmptyChain
            | ErrorKind::Configuration
            | ErrorKind::Io
            | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into a structured error response.
    ///
    /// A route conflict names the route it collided with in `details`.
    pub fn to_error_response(&self) -> ErrorResponse {
        let response = ErrorResponse::new(self.error_code(), self.to_string());
        match self.conflict() {
            Some(detail) => response.with_details(format!(
                "existing route {} via `{}`",
                detail.existing_pattern, detail.existing_segment
            )),
            None => response,
        }
    }

    /// Consumes the error and returns the inner error source.
    pub fn into_inner(self) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self.source
    }
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl Error {
    /// Creates a route conflict error.
    pub fn route_conflict(detail: ConflictDetail) -> Self {
        Self::new(ErrorKind::RouteConflict, detail)
    }

    /// Creates an empty handler chain error for the given route.
    pub fn empty_chain(method: RouteMethod, pattern: impl AsRef<str>) -> Self {
        Self::new(
            ErrorKind::EmptyChain,
            format!(
                "{method} {}: at least one handler is required",
                pattern.as_ref()
            ),
        )
    }

    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, msg.into())
    }

    /// Creates an invalid input error.
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg.into())
    }

    /// Creates an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, msg.into())
    }
}

// ============================================================================
// Trait implementations
// ============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&*self.source)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_response = self.to_error_response();

        tracing::error!(
            error_code = %error_response.error_code,
            message = %error_response.message,
            status = %status.as_u16(),
            "Error occurred"
        );

        (status, Json(error_response)).into_response()
    }
}

// ============================================================================
// From implementations
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorKind::Io, err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Self::new(ErrorKind::Configuration, err)
    }
}

impl From<http::header::InvalidHeaderValue> for Error {
    fn from(err: http::header::InvalidHeaderValue) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

impl From<http::header::InvalidHeaderName> for Error {
    fn from(err: http::header::InvalidHeaderName) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(err: std::net::AddrParseError) -> Self {
        Self::new(ErrorKind::InvalidInput, err)
    }
}

impl From<ConflictDetail> for Error {
    fn from(detail: ConflictDetail) -> Self {
        Self::route_conflict(detail)
    }
}

// ============================================================================
// ErrorResponse
// ============================================================================

/// Structured error response with error code and details.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Unique error code for client-side error handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Adds details to the error response.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
