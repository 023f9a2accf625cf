//! API Request Handlers

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    Json,
};
use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use super::middleware::{ClientApiKey, RateLimiter};
use super::types::*;
use crate::core::analyzer::{compare, ActivityHistory, DomainAnalysis, DomainAnalyzer, QuickScore};
use crate::models::config::AppConfig;
use crate::models::errors::AppResult;
use crate::utils::constants::{
    APP_VERSION, MAX_BATCH_DOMAINS, MAX_COMPARE_DOMAINS, MIN_COMPARE_DOMAINS, SUPPORTED_TLDS,
};

/// Shared application state
pub struct AppState {
    pub analyzer: Arc<DomainAnalyzer>,
    pub rate_limiter: Arc<RateLimiter>,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: &AppConfig) -> AppResult<Self> {
        let analyzer = DomainAnalyzer::from_config(config)?;
        Ok(Self::with_analyzer(analyzer, config))
    }

    pub fn with_analyzer(analyzer: DomainAnalyzer, config: &AppConfig) -> Self {
        Self {
            analyzer: Arc::new(analyzer),
            rate_limiter: Arc::new(RateLimiter::new(config.rate_limit.clone())),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// Malformed or missing JSON bodies are a client error
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<ApiResponse<HealthData>> {
    ApiResponse::success(HealthData {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        doma_endpoint: state.analyzer.endpoint().to_string(),
        version: APP_VERSION.to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

pub async fn supported_tlds() -> Json<ApiResponse<SupportedTldsData>> {
    ApiResponse::success(SupportedTldsData {
        tlds: SUPPORTED_TLDS.to_vec(),
        note: "Availability depends on Doma registry",
    })
}

// ============================================
// Domain Analysis
// ============================================

pub async fn analyze_domain(
    State(state): State<Arc<AppState>>,
    Extension(client_key): Extension<ClientApiKey>,
    body: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> ApiResult<DomainAnalysis> {
    let req = parse_body(body)?;
    let domain = req
        .domain_name
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Domain name is required"))?;
    let api_key = client_key.or_body(req.api_key);

    let analysis = state
        .analyzer
        .analyze(&domain, api_key.as_deref())
        .await
        .map_err(|e| ApiError::from_app_error(e, "Failed to analyze domain"))?;

    Ok(ApiResponse::success(analysis))
}

// ============================================
// Batch Analysis
// ============================================

pub async fn analyze_batch(
    State(state): State<Arc<AppState>>,
    Extension(client_key): Extension<ClientApiKey>,
    body: Result<Json<DomainsRequest>, JsonRejection>,
) -> ApiResult<BatchData> {
    let start = Instant::now();
    let req = parse_body(body)?;
    let domains = req
        .domains
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::bad_request("Array of domain names is required"))?;

    if domains.len() > MAX_BATCH_DOMAINS {
        return Err(ApiError::bad_request(format!(
            "Maximum {} domains per batch",
            MAX_BATCH_DOMAINS
        )));
    }

    let api_key = client_key.or_body(req.api_key);
    let outcomes = state.analyzer.analyze_many(&domains, api_key).await;

    let results: Vec<BatchItem> = outcomes
        .into_iter()
        .map(|(domain, result)| match result {
            Ok(analysis) => BatchItem {
                domain,
                status: BatchStatus::Fulfilled,
                data: Some(ApiResponse {
                    success: true,
                    body: analysis,
                }),
                error: None,
            },
            Err(e) => BatchItem {
                domain,
                status: BatchStatus::Rejected,
                data: None,
                error: Some(e.message),
            },
        })
        .collect();

    let fulfilled = results
        .iter()
        .filter(|r| r.status == BatchStatus::Fulfilled)
        .count();
    info!(
        total = results.len(),
        fulfilled,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Batch analysis complete"
    );

    Ok(ApiResponse::success(BatchData {
        total: domains.len(),
        results,
    }))
}

// ============================================
// Activities & Quick Score
// ============================================

pub async fn get_activities(
    State(state): State<Arc<AppState>>,
    Extension(client_key): Extension<ClientApiKey>,
    Path(domain): Path<String>,
) -> ApiResult<ActivityHistory> {
    let history = state
        .analyzer
        .activities(&domain, client_key.0.as_deref())
        .await
        .map_err(|e| ApiError::from_app_error(e, "Failed to fetch activities"))?;

    Ok(ApiResponse::success(history))
}

pub async fn get_quick_score(
    State(state): State<Arc<AppState>>,
    Extension(client_key): Extension<ClientApiKey>,
    Path(domain): Path<String>,
) -> ApiResult<QuickScore> {
    let score = state
        .analyzer
        .quick_score(&domain, client_key.0.as_deref())
        .await
        .map_err(|e| ApiError::from_app_error(e, "Failed to calculate quick score"))?;

    Ok(ApiResponse::success(score))
}

// ============================================
// Compare
// ============================================

pub async fn compare_domains(
    State(state): State<Arc<AppState>>,
    Extension(client_key): Extension<ClientApiKey>,
    body: Result<Json<DomainsRequest>, JsonRejection>,
) -> ApiResult<CompareData> {
    let req = parse_body(body)?;
    let domains = req
        .domains
        .filter(|d| (MIN_COMPARE_DOMAINS..=MAX_COMPARE_DOMAINS).contains(&d.len()))
        .ok_or_else(|| {
            ApiError::bad_request(format!(
                "Provide {}-{} domains to compare",
                MIN_COMPARE_DOMAINS, MAX_COMPARE_DOMAINS
            ))
        })?;

    let api_key = client_key.or_body(req.api_key);
    let outcomes = state.analyzer.analyze_many(&domains, api_key).await;

    Ok(ApiResponse::success(CompareData {
        comparison: compare(&outcomes),
    }))
}

// ============================================
// Fallback
// ============================================

pub async fn not_found() -> ApiError {
    ApiError::not_found("Endpoint not found")
}
