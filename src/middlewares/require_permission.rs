/*!
 * 基于权限表的访问控制中间件
 *
 * 必须在 RequireJWT 之后使用。
 *
 * ```rust,ignore
 * web::scope("/api/students")
 *     .wrap(RequirePermission::new(Permission::ViewStudents))
 *     .wrap(RequireJWT)
 * ```
 *
 * 平台接口使用 `RequirePermission::super_admin()`。
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::{info, warn};

use crate::models::{
    ErrorCode,
    permissions::{Permission, has_permission},
    users::entities::User,
};

use super::create_error_response;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Requirement {
    One(Permission),
    // 任一权限即可
    Any(&'static [Permission]),
    SuperAdmin,
}

impl Requirement {
    fn is_met_by(self, user: &User) -> bool {
        match self {
            Requirement::One(perm) => has_permission(user, perm),
            Requirement::Any(perms) => perms.iter().any(|p| has_permission(user, *p)),
            Requirement::SuperAdmin => user.is_super_admin,
        }
    }
}

#[derive(Clone)]
pub struct RequirePermission {
    requirement: Requirement,
}

impl RequirePermission {
    pub fn new(permission: Permission) -> Self {
        Self {
            requirement: Requirement::One(permission),
        }
    }

    /// 拥有其中任一权限即可
    pub fn any(permissions: &'static [Permission]) -> Self {
        Self {
            requirement: Requirement::Any(permissions),
        }
    }

    pub fn super_admin() -> Self {
        Self {
            requirement: Requirement::SuperAdmin,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            requirement: self.requirement,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    requirement: Requirement,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
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
        let requirement = self.requirement;

        Box::pin(async move {
            let user = req.extensions().get::<User>().cloned();

            match user {
                Some(user) if requirement.is_met_by(&user) => {
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Some(user) => {
                    warn!(
                        "Access denied for user {} (role: {}) on {}: requires {:?}",
                        user.id,
                        user.role,
                        req.path(),
                        requirement
                    );
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            "Permission denied",
                        )
                        .map_into_right_body(),
                    ))
                }
                None => {
                    info!("Permission check without authenticated user; RequireJWT must run first");
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::UNAUTHORIZED,
                            ErrorCode::Unauthorized,
                            "Authentication required",
                        )
                        .map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(role: UserRole, is_super_admin: bool) -> User {
        User {
            id: 7,
            school_id: Some(1),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role,
            is_super_admin,
            status: UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_requirement_any() {
        let req = RequirePermission::any(&[Permission::ReviewLeaves, Permission::RequestLeave]);
        assert!(req.requirement.is_met_by(&user(UserRole::Student, false)));

        let req = RequirePermission::new(Permission::ManageStudents);
        assert!(!req.requirement.is_met_by(&user(UserRole::Teacher, false)));
        assert!(req.requirement.is_met_by(&user(UserRole::SchoolAdmin, false)));
    }

    #[test]
    fn test_requirement_super_admin() {
        let req = RequirePermission::super_admin();
        assert!(!req.requirement.is_met_by(&user(UserRole::SchoolAdmin, false)));
        assert!(req.requirement.is_met_by(&user(UserRole::SchoolAdmin, true)));
    }
}
