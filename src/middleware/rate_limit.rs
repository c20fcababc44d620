//! Rate limiting middleware using Redis
//!
//! Sliding window per authenticated user, sized from configuration.

use crate::{
    config::RateLimitSettings,
    error::{ApiError, Result},
    middleware::jwt_auth::UserIdentity,
};
use axum::{extract::Request, middleware::Next, response::Response};
use redis::Client;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Create the rate limiting middleware
///
/// Uses sliding window counter in Redis to track request rates per identity.
/// Returns 429 Too Many Requests when limit is exceeded.
pub fn create_rate_limiter(
    redis_client: Arc<Client>,
    settings: RateLimitSettings,
) -> impl Fn(
    Request,
    Next,
) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response>> + Send>>
       + Clone {
    move |request: Request, next: Next| {
        let redis_client = redis_client.clone();
        let settings = settings.clone();

        Box::pin(async move {
            // Identity is set by the auth middleware
            let email = request
                .extensions()
                .get::<UserIdentity>()
                .map(|identity| identity.email.clone())
                .ok_or_else(|| {
                    ApiError::Internal(anyhow::anyhow!(
                        "Rate limit middleware requires jwt_auth_middleware"
                    ))
                })?;

            let allowed = check_rate_limit(
                &redis_client,
                &email,
                settings.max_requests,
                settings.window_seconds,
            )
            .await?;

            if !allowed {
                warn!("Rate limit exceeded for user: {}", email);
                return Err(ApiError::RateLimitExceeded);
            }

            debug!("Rate limit check passed for user: {}", email);

            Ok(next.run(request).await)
        })
    }
}

/// Sliding window check: prune and count atomically, then record the request.
///
/// Returns true if request is allowed, false if rate limit exceeded.
async fn check_rate_limit(
    redis_client: &Client,
    email: &str,
    limit: u32,
    window_seconds: u32,
) -> Result<bool> {
    let mut conn = redis_client
        .get_multiplexed_async_connection()
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Redis connection failed: {}", e)))?;

    let now = OffsetDateTime::now_utc().unix_timestamp();
    let key = window_key(email);

    let (count,): (u32,) = redis::pipe()
        .atomic()
        .zrembyscore(&key, 0, window_start(now, window_seconds) as f64)
        .ignore()
        .zcard(&key)
        .query_async(&mut conn)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Redis window count failed: {}", e)))?;

    if !has_capacity(count, limit) {
        return Ok(false);
    }

    let member = format!("{}:{}", now, uuid::Uuid::new_v4());
    let _: () = redis::pipe()
        .atomic()
        .zadd(&key, member, now as f64)
        .ignore()
        .expire(&key, key_ttl(window_seconds))
        .ignore()
        .query_async(&mut conn)
        .await
        .map_err(|e| ApiError::Internal(anyhow::anyhow!("Redis window update failed: {}", e)))?;

    Ok(true)
}

fn window_key(email: &str) -> String {
    format!("rate_limit:user:{}", email)
}

/// Entries scored at or before this timestamp fall outside the window
fn window_start(now: i64, window_seconds: u32) -> i64 {
    now - i64::from(window_seconds)
}

/// Key expiry, ten seconds past the window
fn key_ttl(window_seconds: u32) -> i64 {
    i64::from(window_seconds) + 10
}

fn has_capacity(count: u32, limit: u32) -> bool {
    count < limit
}
