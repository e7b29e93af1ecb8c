//! 租户（学校）范围解析

use actix_web::HttpResponse;

use crate::models::users::entities::User;
use crate::models::{ApiResponse, ErrorCode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeError {
    // 超级管理员未指定 school_id
    SchoolRequired,
    // 用户未归属任何学校
    NoSchool,
    // 请求了其他学校的数据
    AccessDenied,
}

impl ScopeError {
    pub fn into_response(self) -> HttpResponse {
        match self {
            ScopeError::SchoolRequired => HttpResponse::BadRequest().json(
                ApiResponse::error_empty(ErrorCode::SchoolScopeRequired, "school_id is required"),
            ),
            ScopeError::NoSchool => HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::SchoolScopeRequired,
                "Your profile is not attached to a school",
            )),
            ScopeError::AccessDenied => HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::SchoolAccessDenied,
                "You do not have access to this school",
            )),
        }
    }
}

/// 确定本次请求作用的学校
///
/// 超级管理员必须显式指定；其他用户使用自己的学校，指定其他学校时拒绝。
pub fn resolve_school_id(user: &User, requested: Option<i64>) -> Result<i64, ScopeError> {
    if user.is_super_admin {
        return requested.ok_or(ScopeError::SchoolRequired);
    }
    let own = user.school_id.ok_or(ScopeError::NoSchool)?;
    match requested {
        Some(id) if id != own => Err(ScopeError::AccessDenied),
        _ => Ok(own),
    }
}

/// 检查用户能否访问某个学校的资源
pub fn ensure_school_access(user: &User, school_id: i64) -> Result<(), ScopeError> {
    if user.is_super_admin || user.school_id == Some(school_id) {
        Ok(())
    } else {
        Err(ScopeError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserRole, UserStatus};

    fn user(school_id: Option<i64>, is_super_admin: bool) -> User {
        User {
            id: 1,
            school_id,
            username: "someone".to_string(),
            email: "someone@school.edu".to_string(),
            password_hash: String::new(),
            role: UserRole::SchoolAdmin,
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
    fn test_super_admin_must_name_school() {
        let admin = user(None, true);
        assert_eq!(resolve_school_id(&admin, Some(9)), Ok(9));
        assert_eq!(
            resolve_school_id(&admin, None),
            Err(ScopeError::SchoolRequired)
        );
    }

    #[test]
    fn test_school_user_scoped_to_own_school() {
        let member = user(Some(3), false);
        assert_eq!(resolve_school_id(&member, None), Ok(3));
        assert_eq!(resolve_school_id(&member, Some(3)), Ok(3));
        assert_eq!(
            resolve_school_id(&member, Some(4)),
            Err(ScopeError::AccessDenied)
        );
        assert_eq!(
            resolve_school_id(&user(None, false), None),
            Err(ScopeError::NoSchool)
        );
    }

    #[test]
    fn test_ensure_school_access() {
        assert!(ensure_school_access(&user(None, true), 12).is_ok());
        assert!(ensure_school_access(&user(Some(12), false), 12).is_ok());
        assert_eq!(
            ensure_school_access(&user(Some(12), false), 13),
            Err(ScopeError::AccessDenied)
        );
    }
}
