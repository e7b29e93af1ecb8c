/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <token>`，按 token 从缓存（未命中时从存储）加载用户，
 * 拒绝非 active 状态的账号，并把 `User` 放入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/api/students")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_students))
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user(&req)` 取得当前用户。
 */

use crate::cache::{ObjectCache, keys};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::User;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpRequest, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, error, info};

use super::create_error_response;

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone)]
pub struct RequireJWT;

/// 从请求头中取出 bearer token
pub(crate) fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// 认证失败的原因，决定日志级别和返回的错误码
enum AuthFailure {
    Unauthenticated(&'static str),
    Disabled,
    Internal(&'static str),
}

async fn authenticate(req: &ServiceRequest) -> Result<User, AuthFailure> {
    let token = bearer_token(req.request())
        .ok_or(AuthFailure::Unauthenticated("Missing or invalid Authorization header"))?;

    let claims = JwtUtils::verify_access_token(&token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        AuthFailure::Unauthenticated("Invalid or expired token")
    })?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(AuthFailure::Internal("Cache not configured"))?;

    let cache_key = keys::user_by_token(&token);
    if let Some(user) = cache.get_json::<User>(&cache_key).await {
        return Ok(user);
    }

    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or(AuthFailure::Internal("Storage not configured"))?;

    let user_id = claims
        .user_id()
        .ok_or(AuthFailure::Unauthenticated("Invalid token subject"))?;

    let user = storage
        .get_user_by_id(user_id)
        .await
        .map_err(|e| {
            error!("Failed to load user {} for authentication: {}", user_id, e);
            AuthFailure::Internal("Failed to load user")
        })?
        .ok_or(AuthFailure::Unauthenticated("User not found"))?;

    if !user.is_active() {
        return Err(AuthFailure::Disabled);
    }

    cache
        .insert_json(cache_key, &user, AppConfig::get().cache.default_ttl)
        .await;

    Ok(user)
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
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
        Box::pin(async move {
            // 预检请求直接放行给 CORS 处理
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(req.into_response(HttpResponse::NoContent().finish().map_into_right_body()));
            }

            let response = match authenticate(&req).await {
                Ok(user) => {
                    debug!("JWT authentication successful for user {}", user.id);
                    req.extensions_mut().insert(user);
                    return Ok(srv.call(req).await?.map_into_left_body());
                }
                Err(AuthFailure::Unauthenticated(reason)) => {
                    info!("JWT authentication failed for {}: {}", req.path(), reason);
                    create_error_response(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, reason)
                }
                Err(AuthFailure::Disabled) => create_error_response(
                    StatusCode::UNAUTHORIZED,
                    ErrorCode::AccountDisabled,
                    "Account is not active",
                ),
                Err(AuthFailure::Internal(reason)) => create_error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::InternalServerError,
                    reason,
                ),
            };

            Ok(req.into_response(response.map_into_right_body()))
        })
    }
}

impl RequireJWT {
    /// 当前登录用户，仅在 RequireJWT 之后的处理函数中可用
    pub fn extract_user(req: &HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }
}
