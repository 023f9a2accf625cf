//! API Request/Response Types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::core::analyzer::{Comparison, DomainAnalysis};
use crate::models::errors::{AppError, ErrorCode};

/// Success envelope: `{"success": true, ...body}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(body: T) -> Json<Self> {
        Json(Self { success: true, body })
    }
}

/// Error envelope: `{"success": false, "error": "...", "code": "..."}`
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub success: bool,
    pub error: String,
    pub code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            status,
            success: false,
            error: message.into(),
            code: code.as_str(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, ErrorCode::ApiBadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ErrorCode::ApiNotFound, message)
    }

    pub fn rate_limited(retry_after: u64) -> Self {
        Self::new(
            StatusCode::TOO_MANY_REQUESTS,
            ErrorCode::ApiRateLimited,
            format!("Too many requests, please try again in {} seconds", retry_after),
        )
    }

    /// Map an analysis failure to a response. 400/404 keep their message;
    /// anything else is reported with `fallback` and logged in full.
    pub fn from_app_error(err: AppError, fallback: &str) -> Self {
        let status = StatusCode::from_u16(err.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(code = err.code_str(), error = %err, "{}", fallback);
            Self::new(status, err.code, fallback)
        } else {
            Self::new(status, err.code, err.message)
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

// ============================================
// Requests
// ============================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Body of `/api/analyze-batch` and `/api/compare`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainsRequest {
    #[serde(default)]
    pub domains: Option<Vec<String>>,
    #[serde(default)]
    pub api_key: Option<String>,
}

// ============================================
// Batch Analysis
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    Fulfilled,
    Rejected,
}

#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub domain: String,
    pub status: BatchStatus,
    pub data: Option<ApiResponse<DomainAnalysis>>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchData {
    pub total: usize,
    pub results: Vec<BatchItem>,
}

// ============================================
// Compare
// ============================================

#[derive(Debug, Serialize)]
pub struct CompareData {
    pub comparison: Comparison,
}

// ============================================
// Health / Metadata
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthData {
    pub status: String,
    pub timestamp: String,
    pub doma_endpoint: String,
    pub version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
pub struct SupportedTldsData {
    pub tlds: Vec<&'static str>,
    pub note: &'static str,
}
