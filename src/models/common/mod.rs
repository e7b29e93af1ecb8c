pub mod error_code;
pub mod pagination;
pub mod query;
pub mod response;
pub mod string_enum;

pub use error_code::ErrorCode;
pub use pagination::{PaginationInfo, PaginationQuery};
pub use query::{deserialize_optional_bool, deserialize_optional_i64};
pub use response::ApiResponse;
