//! API Middleware (Client Keys, Rate Limiting, Logging)

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::handlers::AppState;
use super::types::ApiError;
use crate::models::config::RateLimitConfig;

/// Paths that bypass the rate limiter
const RATE_LIMIT_EXEMPT: [&str; 1] = ["/api/health"];

pub const CLIENT_KEY_HEADER: &str = "x-doma-api-key";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Doma API key supplied by the caller, if any
#[derive(Debug, Clone, Default)]
pub struct ClientApiKey(pub Option<String>);

impl ClientApiKey {
    /// `x-doma-api-key` header, else the `Authorization: Bearer` token
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header_key = headers
            .get(CLIENT_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|k| !k.is_empty());

        let bearer = || {
            headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(strip_bearer)
        };

        Self(header_key.or_else(bearer).map(str::to_string))
    }

    /// Header key wins; the request body key is the fallback
    pub fn or_body(self, body_key: Option<String>) -> Option<String> {
        self.0
            .or_else(|| body_key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty()))
    }
}

fn strip_bearer(value: &str) -> Option<&str> {
    let value = value.trim();
    let (scheme, token) = value.split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim()).filter(|t| !t.is_empty())
}

/// Fixed-window in-memory rate limiter
pub struct RateLimiter {
    /// Request counts per client IP
    requests: DashMap<String, (u32, Instant)>,
    config: RateLimitConfig,
}

/// Outcome of a rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_secs: u64,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            requests: DashMap::new(),
            config,
        }
    }

    /// Count a request against `key`'s window
    pub fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        let limit = self.config.requests_per_window;

        let mut entry = self.requests.entry(key.to_string()).or_insert((0, now));

        // Reset window if expired
        if now.duration_since(entry.1) >= self.config.window_duration {
            entry.0 = 0;
            entry.1 = now;
        }

        let reset_secs = self
            .config
            .window_duration
            .saturating_sub(now.duration_since(entry.1))
            .as_secs();

        if entry.0 >= limit {
            return RateDecision {
                allowed: false,
                limit,
                remaining: 0,
                reset_secs,
            };
        }

        entry.0 += 1;
        RateDecision {
            allowed: true,
            limit,
            remaining: limit - entry.0,
            reset_secs,
        }
    }

    /// Drop windows that ended long ago, returns how many were removed
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.requests.len();
        let window = self.config.window_duration;
        self.requests
            .retain(|_, (_, started)| now.duration_since(*started) < window * 2);
        before.saturating_sub(self.requests.len())
    }

    pub fn tracked_clients(&self) -> usize {
        self.requests.len()
    }

    pub fn window(&self) -> Duration {
        self.config.window_duration
    }
}

/// Periodically purge stale rate limit windows
pub fn start_cleanup_task(limiter: Arc<RateLimiter>) -> JoinHandle<()> {
    let period = limiter.window().max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let removed = limiter.cleanup();
            if removed > 0 {
                debug!(removed, remaining = limiter.tracked_clients(), "Rate limiter cleanup");
            }
        }
    })
}

/// Resolve the caller's Doma API key and stash it in request extensions
pub async fn api_key_middleware(mut request: Request, next: Next) -> Response {
    let key = ClientApiKey::from_headers(request.headers());
    request.extensions_mut().insert(key);
    next.run(request).await
}

/// Rate limiting middleware for `/api/*`
pub async fn rate_limit_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if !path.starts_with("/api/") || RATE_LIMIT_EXEMPT.contains(&path) {
        return next.run(request).await;
    }

    let rate_key = rate_key(&request);
    let decision = state.rate_limiter.check(&rate_key);

    if !decision.allowed {
        warn!(key = %rate_key, reset_secs = decision.reset_secs, "Rate limit exceeded");
        let mut response = ApiError::rate_limited(decision.reset_secs).into_response();
        apply_rate_headers(response.headers_mut(), &decision);
        response
            .headers_mut()
            .insert(axum::http::header::RETRY_AFTER, HeaderValue::from(decision.reset_secs));
        return response;
    }

    let mut response = next.run(request).await;
    apply_rate_headers(response.headers_mut(), &decision);
    response
}

/// Forwarded IP, else the socket peer, else a shared bucket.
/// Caller-supplied API keys are never buckets: they are unverified.
fn rate_key(request: &Request) -> String {
    let headers = request.headers();
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|ip| !ip.is_empty());

    if let Some(ip) = forwarded {
        return format!("ip:{}", ip);
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| format!("ip:{}", addr.ip()))
        .unwrap_or_else(|| "unknown".to_string())
}

fn apply_rate_headers(headers: &mut HeaderMap, decision: &RateDecision) {
    headers.insert("x-ratelimit-limit", HeaderValue::from(decision.limit));
    headers.insert("x-ratelimit-remaining", HeaderValue::from(decision.remaining));
    headers.insert("x-ratelimit-reset", HeaderValue::from(decision.reset_secs));
}

/// Request logging middleware
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();
    let method = request.method().clone();
    let uri = request.uri().clone();

    let mut response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    info!(
        request_id = %request_id,
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        latency_ms = %latency.as_millis(),
        "Request completed"
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn limiter(max: u32, window: Duration) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            requests_per_window: max,
            window_duration: window,
        })
    }

    #[test]
    fn test_fixed_window_limit() {
        let limiter = limiter(2, Duration::from_secs(60));

        let first = limiter.check("a");
        assert!(first.allowed);
        assert_eq!(first.remaining, 1);

        let second = limiter.check("a");
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);

        let third = limiter.check("a");
        assert!(!third.allowed);
        assert!(third.reset_secs <= 60);

        // Separate bucket
        assert!(limiter.check("b").allowed);
    }

    #[test]
    fn test_window_resets() {
        let limiter = limiter(1, Duration::from_millis(20));
        assert!(limiter.check("a").allowed);
        assert!(!limiter.check("a").allowed);
        std::thread::sleep(Duration::from_millis(30));
        assert!(limiter.check("a").allowed);
    }

    #[test]
    fn test_cleanup_drops_stale_windows() {
        let limiter = limiter(5, Duration::from_millis(10));
        limiter.check("a");
        limiter.check("b");
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(limiter.cleanup(), 2);
        assert_eq!(limiter.tracked_clients(), 0);
    }

    #[test]
    fn test_client_key_resolution_order() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer bearer-key"));
        assert_eq!(
            ClientApiKey::from_headers(&headers).0.as_deref(),
            Some("bearer-key")
        );

        headers.insert(CLIENT_KEY_HEADER, HeaderValue::from_static("header-key"));
        let key = ClientApiKey::from_headers(&headers);
        assert_eq!(key.0.as_deref(), Some("header-key"));
        assert_eq!(
            key.or_body(Some("body-key".to_string())).as_deref(),
            Some("header-key")
        );

        let empty = ClientApiKey::from_headers(&HeaderMap::new());
        assert_eq!(
            empty.or_body(Some("body-key".to_string())).as_deref(),
            Some("body-key")
        );
    }

    fn request(headers: &[(&'static str, &'static str)], peer: Option<[u8; 4]>) -> Request {
        let mut builder = Request::builder().uri("/api/analyze");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        if let Some(ip) = peer {
            builder = builder.extension(ConnectInfo(SocketAddr::from((ip, 4000))));
        }
        builder.body(axum::body::Body::empty()).unwrap()
    }

    #[test]
    fn test_rate_key_prefers_forwarded_then_peer() {
        let forwarded = request(&[("x-forwarded-for", "9.9.9.9, 10.0.0.1")], Some([1, 1, 1, 1]));
        assert_eq!(rate_key(&forwarded), "ip:9.9.9.9");

        let real_ip = request(&[("x-real-ip", " 8.8.8.8 ")], None);
        assert_eq!(rate_key(&real_ip), "ip:8.8.8.8");

        let peer_only = request(&[], Some([1, 1, 1, 1]));
        assert_eq!(rate_key(&peer_only), "ip:1.1.1.1");

        assert_eq!(rate_key(&request(&[], None)), "unknown");
    }

    #[test]
    fn test_rate_key_ignores_client_api_key() {
        let mut keyed = request(&[(CLIENT_KEY_HEADER, "rotating-1")], Some([2, 2, 2, 2]));
        keyed
            .extensions_mut()
            .insert(ClientApiKey(Some("rotating-1".to_string())));
        assert_eq!(rate_key(&keyed), "ip:2.2.2.2");
    }

    #[test]
    fn test_bearer_parsing() {
        assert_eq!(strip_bearer("bearer abc"), Some("abc"));
        assert_eq!(strip_bearer("Bearer   abc "), Some("abc"));
        assert_eq!(strip_bearer("Basic abc"), None);
        assert_eq!(strip_bearer("Bearer"), None);
    }
}
