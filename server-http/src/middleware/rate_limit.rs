use crate::state::AppState;
use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use dashmap::DashMap;
use shared::config::ThrottleConfig;
use shared_http::api::ErrorResponse;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const ANONYMOUS_CLIENT: &str = "anonymous";

/// Sliding-window request limiter keyed by client address.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    window: Duration,
    max_requests: u32,
    trust_proxy: bool,
    buckets: Arc<DashMap<String, Vec<Instant>>>,
    last_sweep: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32) -> Self {
        Self {
            window,
            max_requests,
            trust_proxy: false,
            buckets: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.window, config.limit).with_trusted_proxy(config.trust_proxy)
    }

    /// Key clients on `X-Forwarded-For` when set.
    pub fn with_trusted_proxy(mut self, trust_proxy: bool) -> Self {
        self.trust_proxy = trust_proxy;
        self
    }

    /// Record a request for `key` and report whether it fits in the window.
    /// Rejected requests are not recorded.
    pub fn allow(&self, key: &str) -> bool {
        self.allow_at(key, Instant::now())
    }

    fn allow_at(&self, key: &str, now: Instant) -> bool {
        self.sweep_expired(now);

        let window = self.window;
        let mut entry = self.buckets.entry(key.to_string()).or_default();
        entry.retain(|instant| now.saturating_duration_since(*instant) < window);

        if entry.len() as u32 >= self.max_requests {
            return false;
        }

        entry.push(now);
        true
    }

    /// Drop buckets with no request left in the window, at most once per window.
    fn sweep_expired(&self, now: Instant) {
        {
            let mut last_sweep = match self.last_sweep.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if now.saturating_duration_since(*last_sweep) < self.window {
                return;
            }
            *last_sweep = now;
        }

        let window = self.window;
        let before = self.buckets.len();
        self.buckets.retain(|_, hits| {
            hits.retain(|instant| now.saturating_duration_since(*instant) < window);
            !hits.is_empty()
        });
        debug!(
            removed = before.saturating_sub(self.buckets.len()),
            "Swept idle rate-limit buckets"
        );
    }

    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }

    /// Peer IP by default. The first `X-Forwarded-For` hop wins only when
    /// the proxy in front is trusted.
    fn client_key(&self, request: &Request<Body>) -> String {
        if self.trust_proxy {
            let forwarded = request
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty());

            if let Some(addr) = forwarded {
                return addr.to_string();
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| ANONYMOUS_CLIENT.to_string())
    }
}

fn rate_limited(retry_after: u64) -> Response {
    let body = ErrorResponse::new(
        StatusCode::TOO_MANY_REQUESTS.as_u16(),
        "Rate limit exceeded. Please try again later.",
        "Too Many Requests",
    );
    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = state.rate_limiter.client_key(&request);

    if !state.rate_limiter.allow(&key) {
        warn!(client = %key, path = %request.uri().path(), "Rate limit exceeded");
        return rate_limited(state.rate_limiter.retry_after_secs());
    }

    next.run(request).await
}
