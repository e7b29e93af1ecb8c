pub mod bulk;
pub mod extractor;
pub mod jwt;
pub mod parameter_error_handler;
pub mod password;
pub mod random_code;
pub mod sql;
pub mod tenant;
pub mod validate;

pub use extractor::{SafeAssignmentIdI64, SafeIDI64};
pub use parameter_error_handler::{json_error_handler, query_error_handler};
pub use sql::{contains_pattern, escape_like_pattern};
pub use tenant::{ScopeError, ensure_school_access, resolve_school_id};
