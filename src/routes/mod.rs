pub mod assignments;
pub mod attendance;
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

pub use assignments::configure_assignment_routes;
pub use attendance::configure_attendance_routes;
pub use auth::configure_auth_routes;
pub use classes::configure_classes_routes;
pub use dashboard::configure_dashboard_routes;
pub use enrollments::configure_enrollment_routes;
pub use leaves::configure_leave_routes;
pub use platform::configure_platform_routes;
pub use schools::configure_school_routes;
pub use students::configure_student_routes;
pub use system::configure_system_routes;
pub use teachers::configure_teacher_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部 API 路由
pub fn configure_api_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_user_routes)
        .configure(configure_school_routes)
        .configure(configure_student_routes)
        .configure(configure_teacher_routes)
        .configure(configure_classes_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_attendance_routes)
        .configure(configure_assignment_routes)
        .configure(configure_leave_routes)
        .configure(configure_dashboard_routes)
        .configure(configure_platform_routes)
        .configure(configure_system_routes);
}
