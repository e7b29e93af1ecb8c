/*!
 * 速率限制中间件
 *
 * 固定时间窗口计数：键为 `前缀:客户端:窗口序号`，窗口结束后计数自然失效。
 * 用于登录与刷新令牌等未认证端点，客户端按 IP 识别；已认证请求按用户 ID 识别。
 *
 * ```rust,ignore
 * web::resource("/login")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::CONTENT_TYPE,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode, users::entities::User};

// 最长窗口为一小时，条目存活时间覆盖它即可
static RATE_LIMIT_COUNTERS: Lazy<Cache<String, Arc<AtomicU32>>> = Lazy::new(|| {
    Cache::builder()
        .time_to_live(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: &'static str,
}

impl RateLimit {
    pub fn new(key_prefix: &'static str, max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs: window_secs.clamp(1, 3600),
            key_prefix,
        }
    }

    /// 登录：每 IP 每分钟 5 次
    pub fn login() -> Self {
        Self::new("login", 5, 60)
    }

    /// 刷新令牌：每 IP 每分钟 10 次
    pub fn refresh_token() -> Self {
        Self::new("refresh", 10, 60)
    }

    fn window_key(&self, client: &str, now_secs: u64) -> String {
        format!("{}:{}:{}", self.key_prefix, client, now_secs / self.window_secs)
    }

    // 当前窗口剩余秒数
    fn retry_after(&self, now_secs: u64) -> u64 {
        self.window_secs - now_secs % self.window_secs
    }
}

/// 客户端标识：已认证用户按 ID，否则按 IP
fn client_identity(req: &ServiceRequest) -> String {
    if let Some(user_id) = req.extensions().get::<User>().map(|u| u.id) {
        return format!("user:{user_id}");
    }

    let ip = req
        .connection_info()
        .realip_remote_addr()
        .map(|addr| addr.trim().to_string())
        .filter(|addr| addr.parse::<std::net::IpAddr>().is_ok())
        .unwrap_or_else(|| "unknown".to_string());
    format!("ip:{ip}")
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Too many requests, please try again later",
        ))
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limit: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limit: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let limit = self.limit.clone();

        Box::pin(async move {
            let now_secs = chrono::Utc::now().timestamp().max(0) as u64;
            let key = limit.window_key(&client_identity(&req), now_secs);

            let counter = RATE_LIMIT_COUNTERS
                .get_with(key.clone(), async { Arc::new(AtomicU32::new(0)) })
                .await;
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;

            if count > limit.max_requests {
                warn!(
                    "Rate limit exceeded for {} ({}/{})",
                    key, count, limit.max_requests
                );
                let response = create_rate_limit_response(limit.retry_after(now_secs));
                return Ok(req.into_response(response.map_into_right_body()));
            }

            Ok(srv.call(req).await?.map_into_left_body())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!(login.max_requests, 5);
        assert_eq!(login.window_secs, 60);
        assert_eq!(login.key_prefix, "login");

        let refresh = RateLimit::refresh_token();
        assert_eq!(refresh.max_requests, 10);
        assert_eq!(refresh.key_prefix, "refresh");
    }

    #[test]
    fn test_window_key_rolls_over() {
        let limit = RateLimit::new("t", 3, 60);
        assert_eq!(limit.window_key("ip:1.2.3.4", 119), "t:ip:1.2.3.4:1");
        assert_eq!(limit.window_key("ip:1.2.3.4", 120), "t:ip:1.2.3.4:2");
        assert_eq!(limit.retry_after(119), 1);
        assert_eq!(limit.retry_after(120), 60);
    }

    #[test]
    fn test_window_is_clamped() {
        assert_eq!(RateLimit::new("t", 1, 0).window_secs, 1);
        assert_eq!(RateLimit::new("t", 1, 86_400).window_secs, 3600);
    }
}
