use crate::error::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DashMapStateStore,
    Quota, RateLimiter,
};
use std::{
    net::{IpAddr, SocketAddr},
    num::NonZeroU32,
    sync::Arc,
    time::Duration,
};

/// Rate limiter keyed by client IP address.
pub type IpRateLimiter = Arc<RateLimiter<IpAddr, DashMapStateStore<IpAddr>, DefaultClock>>;

/// Create a per-IP rate limiter allowing `max_requests` within each
/// `window_seconds` interval. Counters live in a DashMap, so concurrent
/// requests from the same client are counted atomically.
pub fn create_ip_rate_limiter(max_requests: u32, window_seconds: u64) -> IpRateLimiter {
    let max_requests = max_requests.max(1);
    let period = Duration::from_millis(((window_seconds * 1000) / max_requests as u64).max(1));
    let quota = Quota::with_period(period)
        .expect("rate limit period is guaranteed to be non-zero")
        .allow_burst(NonZeroU32::new(max_requests).expect("max_requests is clamped to >= 1"));

    Arc::new(RateLimiter::dashmap(quota))
}

/// Middleware for per-IP rate limiting.
///
/// Client identity is the first `x-forwarded-for` entry when present,
/// otherwise the socket peer address. Requests over quota are rejected with
/// 429 before the inner handler runs.
pub async fn ip_rate_limit_middleware(
    State(limiter): State<IpRateLimiter>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let client_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            request
                .extensions()
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip())
        });

    match client_ip {
        Some(ip) => match limiter.check_key(&ip) {
            Ok(_) => Ok(next.run(request).await),
            Err(negative) => {
                let wait_time = negative.wait_time_from(DefaultClock::default().now());
                Err(AppError::TooManyRequests(
                    "Rate limit exceeded. Please wait a moment and try again.".to_string(),
                    Some(wait_time.as_secs()),
                ))
            }
        },
        None => {
            tracing::warn!("Could not determine client IP for rate limiting");
            Ok(next.run(request).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limiter_rejects_over_quota_and_isolates_clients() {
        let limiter = create_ip_rate_limiter(2, 900);
        let alice: IpAddr = "10.0.0.1".parse().unwrap();
        let bob: IpAddr = "10.0.0.2".parse().unwrap();

        assert!(limiter.check_key(&alice).is_ok());
        assert!(limiter.check_key(&alice).is_ok());
        assert!(limiter.check_key(&alice).is_err());

        // A different client is unaffected.
        assert!(limiter.check_key(&bob).is_ok());
    }

    #[test]
    fn zero_max_requests_is_clamped() {
        let limiter = create_ip_rate_limiter(0, 900);
        let ip: IpAddr = "10.0.0.3".parse().unwrap();
        assert!(limiter.check_key(&ip).is_ok());
        assert!(limiter.check_key(&ip).is_err());
    }
}
