#![allow(dead_code, unused_macros)]

/// 按线上配置装配完整路由（含参数错误处理器）
macro_rules! test_app {
    ($storage:expr) => {{
        let cache: std::sync::Arc<dyn schoolhub::cache::ObjectCache> = std::sync::Arc::new(
            schoolhub::cache::object_cache::moka::MokaCacheWrapper::with_capacity(1_000, 60),
        );
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(schoolhub::utils::query_error_handler),
                )
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(schoolhub::utils::json_error_handler),
                )
                .app_data(actix_web::web::Data::new($storage.clone()))
                .app_data(actix_web::web::Data::new(cache))
                .app_data(actix_web::web::Data::new(schoolhub::models::AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .configure(schoolhub::routes::configure_api_routes),
        )
        .await
    }};
}

use std::sync::Arc;

use schoolhub::models::{
    classes::{entities::Class, requests::CreateClassRequest},
    enrollments::{entities::Enrollment, requests::CreateEnrollmentRequest},
    schools::{entities::School, requests::CreateSchoolRequest},
    students::{entities::Student, requests::NewStudent},
    users::{
        entities::{User, UserRole},
        requests::CreateUserRequest,
    },
};
use schoolhub::storage::{Storage, sea_orm_storage::SeaOrmStorage};
use schoolhub::utils::jwt::JwtUtils;

pub const ACADEMIC_YEAR: &str = "2025-2026";

/// 每个测试独立的内存数据库（已执行迁移）
pub async fn storage() -> Arc<dyn Storage> {
    let storage = SeaOrmStorage::connect_with_url("sqlite::memory:", 1)
        .await
        .expect("in-memory sqlite should start");
    Arc::new(storage)
}

pub async fn school(storage: &Arc<dyn Storage>, code: &str) -> School {
    storage
        .create_school(CreateSchoolRequest {
            name: format!("School {code}"),
            code: code.to_string(),
            address: None,
            contact_email: None,
            phone: None,
        })
        .await
        .expect("create school")
}

pub async fn user(
    storage: &Arc<dyn Storage>,
    school_id: Option<i64>,
    username: &str,
    role: UserRole,
) -> User {
    storage
        .create_user(CreateUserRequest {
            school_id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hashed".to_string(),
            role,
            is_super_admin: false,
            display_name: None,
            phone: None,
        })
        .await
        .expect("create user")
}

pub async fn super_admin(storage: &Arc<dyn Storage>) -> User {
    storage
        .create_user(CreateUserRequest {
            school_id: None,
            username: "root".to_string(),
            email: "root@example.com".to_string(),
            password: "hashed".to_string(),
            role: UserRole::SchoolAdmin,
            is_super_admin: true,
            display_name: None,
            phone: None,
        })
        .await
        .expect("create super admin")
}

/// 直接签发访问令牌，绕开登录限流
pub fn bearer(user: &User) -> (&'static str, String) {
    let token = JwtUtils::generate_access_token(user.id, user.role.as_str())
        .expect("token should be issued");
    ("Authorization", format!("Bearer {token}"))
}

pub fn new_student(school_id: i64, admission_no: &str) -> NewStudent {
    NewStudent {
        school_id,
        user_id: None,
        guardian_id: None,
        admission_no: admission_no.to_string(),
        first_name: "Li".to_string(),
        last_name: admission_no.to_string(),
        gender: None,
        date_of_birth: None,
    }
}

pub async fn student(storage: &Arc<dyn Storage>, school_id: i64, admission_no: &str) -> Student {
    storage
        .create_student(new_student(school_id, admission_no))
        .await
        .expect("create student")
}

pub async fn class(storage: &Arc<dyn Storage>, school_id: i64, name: &str) -> Class {
    storage
        .create_class(
            school_id,
            CreateClassRequest {
                school_id: Some(school_id),
                name: name.to_string(),
                grade_level: Some(7),
                academic_year: ACADEMIC_YEAR.to_string(),
                class_teacher_id: None,
            },
        )
        .await
        .expect("create class")
}

pub async fn enroll(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    student_id: i64,
    class_id: i64,
) -> Enrollment {
    storage
        .create_enrollment(
            school_id,
            CreateEnrollmentRequest {
                student_id,
                class_id,
                section_id: None,
                academic_year: ACADEMIC_YEAR.to_string(),
                roll_no: None,
            },
        )
        .await
        .expect("create enrollment")
}
