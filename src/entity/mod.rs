//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod assignments;
pub mod attendance_records;
pub mod attendance_sessions;
pub mod audit_logs;
pub mod classes;
pub mod enrollments;
pub mod feature_flags;
pub mod grades;
pub mod integrations;
pub mod leaves;
pub mod schools;
pub mod sections;
pub mod students;
pub mod subjects;
pub mod submissions;
pub mod teacher_assignments;
pub mod teachers;
pub mod users;

use chrono::{DateTime, NaiveDate, Utc};

// 数据库中时间戳为 unix 秒
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}

pub(crate) fn to_optional_datetime(ts: Option<i64>) -> Option<DateTime<Utc>> {
    ts.map(to_datetime)
}

// 日期以 ISO 文本 YYYY-MM-DD 存储
pub(crate) fn to_date(value: &str) -> NaiveDate {
    value.parse::<NaiveDate>().unwrap_or_default()
}

pub(crate) fn date_to_string(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
