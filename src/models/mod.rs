pub mod assignments;
pub mod attendance;
pub mod auth;
pub mod classes;
pub mod common;
pub mod dashboard;
pub mod enrollments;
pub mod leaves;
pub mod permissions;
pub mod platform;
pub mod schools;
pub mod students;
pub mod system;
pub mod teachers;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginationInfo, PaginationQuery};
pub use system::AppStartTime;
