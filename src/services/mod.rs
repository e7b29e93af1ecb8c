pub mod assignments;
pub mod attendance;
pub mod audit;
pub mod auth;
pub mod classes;
pub mod dashboard;
pub mod enrollments;
pub mod leaves;
pub mod platform;
pub mod schools;
pub mod students;
pub mod system;
pub mod teachers;
pub mod users;

pub use assignments::AssignmentService;
pub use attendance::AttendanceService;
pub use auth::AuthService;
pub use classes::ClassService;
pub use dashboard::DashboardService;
pub use enrollments::EnrollmentService;
pub use leaves::LeaveService;
pub use platform::PlatformService;
pub use schools::SchoolService;
pub use students::StudentService;
pub use system::SystemService;
pub use teachers::TeacherService;
pub use users::UserService;

use actix_web::{HttpRequest, HttpResponse};

use crate::errors::SchoolHubError;
use crate::middlewares::RequireJWT;
use crate::models::{
    ApiResponse, ErrorCode,
    permissions::{Permission, has_permission},
    users::entities::User,
};

/// 声明一个按需从 app_data 取得存储的服务
macro_rules! define_service {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        pub struct $name {
            storage: Option<std::sync::Arc<dyn $crate::storage::Storage>>,
        }

        impl $name {
            pub fn new_lazy() -> Self {
                Self { storage: None }
            }

            pub fn with_storage(storage: std::sync::Arc<dyn $crate::storage::Storage>) -> Self {
                Self {
                    storage: Some(storage),
                }
            }

            pub(crate) fn get_storage(
                &self,
                request: &actix_web::HttpRequest,
            ) -> std::sync::Arc<dyn $crate::storage::Storage> {
                if let Some(storage) = &self.storage {
                    storage.clone()
                } else {
                    request
                        .app_data::<actix_web::web::Data<std::sync::Arc<dyn $crate::storage::Storage>>>()
                        .expect("Storage not found in app data")
                        .get_ref()
                        .clone()
                }
            }
        }
    };
}
pub(crate) use define_service;

/// 处理函数中的提前返回：`Err(response)` 直接作为响应
macro_rules! try_respond {
    ($expr:expr) => {
        match $expr {
            Ok(value) => value,
            Err(response) => return Ok(response),
        }
    };
}
pub(crate) use try_respond;

/// 当前登录用户；RequireJWT 未生效时返回 401
pub(crate) fn current_user(request: &HttpRequest) -> Result<User, HttpResponse> {
    RequireJWT::extract_user(request).ok_or_else(|| {
        HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Authentication required",
        ))
    })
}

pub(crate) fn require_permission(user: &User, permission: Permission) -> Result<(), HttpResponse> {
    if has_permission(user, permission) {
        Ok(())
    } else {
        tracing::warn!("User {} lacks permission {}", user.id, permission);
        Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::Forbidden,
            "Permission denied",
        )))
    }
}

/// 存储层错误转换为响应：冲突 409，其余 500
pub(crate) fn storage_error(context: &str, err: SchoolHubError) -> HttpResponse {
    match err {
        SchoolHubError::Conflict(msg) => {
            tracing::warn!("{}: {}", context, msg);
            HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::Conflict,
                format!("{context}: resource already exists"),
            ))
        }
        other => {
            tracing::error!("{}: {}", context, other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("{context}: {}", other.message()),
            ))
        }
    }
}

pub(crate) fn bad_request(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn not_found(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn conflict(code: ErrorCode, message: impl Into<String>) -> HttpResponse {
    HttpResponse::Conflict().json(ApiResponse::error_empty(code, message))
}

pub(crate) fn forbidden(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Forbidden().json(ApiResponse::error_empty(ErrorCode::Forbidden, message))
}

/// 按 ID 读取的租户内资源：不存在 404，跨学校 403
pub(crate) fn scoped_entity<T>(
    actor: &User,
    found: crate::errors::Result<Option<T>>,
    school_of: impl Fn(&T) -> i64,
    code: ErrorCode,
    label: &str,
) -> Result<T, HttpResponse> {
    let entity = match found {
        Ok(Some(entity)) => entity,
        Ok(None) => return Err(not_found(code, format!("{label} not found"))),
        Err(e) => return Err(storage_error(&format!("Failed to get {label}"), e)),
    };
    crate::utils::ensure_school_access(actor, school_of(&entity)).map_err(|e| e.into_response())?;
    Ok(entity)
}

/// 请求中的学校范围
pub(crate) fn school_scope(actor: &User, requested: Option<i64>) -> Result<i64, HttpResponse> {
    crate::utils::resolve_school_id(actor, requested).map_err(|e| e.into_response())
}
