//! Centralized Error Handling Module
//!
//! Every failure carries a unique error code so it can be traced in logs
//! and surfaced to API clients.
//!
//! Error codes follow pattern: CATEGORY_SPECIFIC_ERROR
//! - DOMA_xxx: Doma registry errors
//! - API_xxx: API errors
//! - CFG_xxx: Configuration errors

use std::fmt;

/// Application-wide error type
#[derive(Debug)]
pub struct AppError {
    /// Unique error code for logging/monitoring
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Optional underlying error
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl AppError {
    /// Create a new AppError
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create AppError with source error
    pub fn with_source(
        code: ErrorCode,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Get error code as string (for logging)
    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// Whether the registry refused the request in a way that looks like
    /// missing or bad credentials. These trigger demo mode.
    pub fn is_auth_rejection(&self) -> bool {
        match self.code {
            ErrorCode::DomaUnauthorized => true,
            ErrorCode::DomaHttpError | ErrorCode::DomaGraphQlError => {
                self.message.contains("API Key")
                    || self.message.contains("401")
                    || self.message.contains("400")
            }
            _ => false,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Unique error codes for monitoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // ============================================
    // Doma Registry Errors (1xx)
    // ============================================
    /// Registry could not be reached
    DomaConnectionFailed,
    /// Registry request timed out
    DomaTimeout,
    /// Registry answered with a non-success HTTP status
    DomaHttpError,
    /// Registry rejected the credentials (HTTP 400/401)
    DomaUnauthorized,
    /// GraphQL `errors` array in an otherwise successful response
    DomaGraphQlError,
    /// Response body did not match the expected shape
    DomaInvalidResponse,

    // ============================================
    // API Errors (3xx)
    // ============================================
    /// Invalid request format
    ApiBadRequest,
    /// Rate limit exceeded
    ApiRateLimited,
    /// Internal server error
    ApiInternalError,
    /// Resource not found
    ApiNotFound,

    // ============================================
    // Configuration Errors (4xx)
    // ============================================
    /// Invalid configuration value
    ConfigInvalidValue,

    // ============================================
    // Generic Errors (9xx)
    // ============================================
    /// Unknown error
    Unknown,
}

impl ErrorCode {
    /// Get string representation of error code
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomaConnectionFailed => "DOMA_CONNECTION_FAILED",
            Self::DomaTimeout => "DOMA_TIMEOUT",
            Self::DomaHttpError => "DOMA_HTTP_ERROR",
            Self::DomaUnauthorized => "DOMA_UNAUTHORIZED",
            Self::DomaGraphQlError => "DOMA_GRAPHQL_ERROR",
            Self::DomaInvalidResponse => "DOMA_INVALID_RESPONSE",

            Self::ApiBadRequest => "API_BAD_REQUEST",
            Self::ApiRateLimited => "API_RATE_LIMITED",
            Self::ApiInternalError => "API_INTERNAL_ERROR",
            Self::ApiNotFound => "API_NOT_FOUND",

            Self::ConfigInvalidValue => "CFG_INVALID_VALUE",

            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    /// Get HTTP status code for API responses.
    ///
    /// Upstream registry failures are reported as 500: the caller did
    /// nothing wrong, the registry did.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::ApiBadRequest => 400,
            Self::ApiNotFound => 404,
            Self::ApiRateLimited => 429,
            _ => 500,
        }
    }
}

// ============================================
// Convenience constructors
// ============================================

impl AppError {
    /// Registry returned a non-success HTTP status
    pub fn doma_http(status: u16, reason: &str) -> Self {
        let code = if status == 400 || status == 401 {
            ErrorCode::DomaUnauthorized
        } else {
            ErrorCode::DomaHttpError
        };
        Self::new(code, format!("HTTP {}: {}", status, reason))
    }

    /// Registry returned GraphQL errors
    pub fn doma_graphql(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DomaGraphQlError, msg)
    }

    /// Registry response could not be interpreted
    pub fn doma_invalid_response(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DomaInvalidResponse, msg)
    }

    /// API bad request
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiBadRequest, msg)
    }

    /// Domain not present in the registry
    pub fn domain_not_found(domain: &str) -> Self {
        Self::new(
            ErrorCode::ApiNotFound,
            format!("Domain \"{}\" not found in Doma registry", domain),
        )
    }

    /// API internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ApiInternalError, msg)
    }

    /// Invalid configuration value
    pub fn invalid_config(key: &str, value: &str) -> Self {
        Self::new(
            ErrorCode::ConfigInvalidValue,
            format!("Invalid value for {}: {:?}", key, value),
        )
    }
}

// ============================================
// Result type alias
// ============================================

/// Application Result type
pub type AppResult<T> = Result<T, AppError>;

// ============================================
// Conversion from common error types
// ============================================

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::with_source(ErrorCode::DomaTimeout, "Request timeout", err)
        } else if err.is_connect() {
            Self::with_source(ErrorCode::DomaConnectionFailed, "Connection failed", err)
        } else if err.is_decode() {
            Self::with_source(ErrorCode::DomaInvalidResponse, "Malformed registry response", err)
        } else {
            Self::new(ErrorCode::Unknown, err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(ErrorCode::DomaInvalidResponse, "JSON parse error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = AppError::domain_not_found("example.eth");
        assert_eq!(err.code, ErrorCode::ApiNotFound);
        assert_eq!(err.code_str(), "API_NOT_FOUND");
        assert_eq!(err.message, "Domain \"example.eth\" not found in Doma registry");
    }

    #[test]
    fn test_http_status() {
        assert_eq!(ErrorCode::ApiBadRequest.http_status(), 400);
        assert_eq!(ErrorCode::ApiNotFound.http_status(), 404);
        assert_eq!(ErrorCode::ApiRateLimited.http_status(), 429);
        assert_eq!(ErrorCode::DomaHttpError.http_status(), 500);
        assert_eq!(ErrorCode::DomaUnauthorized.http_status(), 500);
    }

    #[test]
    fn test_auth_rejection_detection() {
        assert!(AppError::doma_http(401, "Unauthorized").is_auth_rejection());
        assert!(AppError::doma_http(400, "Bad Request").is_auth_rejection());
        assert!(AppError::doma_graphql("Invalid API Key provided").is_auth_rejection());

        assert!(!AppError::doma_http(503, "Service Unavailable").is_auth_rejection());
        assert!(!AppError::doma_graphql("Field 'name' not found").is_auth_rejection());
        assert!(!AppError::bad_request("API Key").is_auth_rejection());
    }
}
