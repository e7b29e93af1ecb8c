use super::entities::{AttendanceStatus, SessionAction};
use crate::models::common::{PaginationQuery, deserialize_optional_bool, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub section_id: Option<i64>,
    pub date: Option<chrono::NaiveDate>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub is_locked: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct CreateSessionRequest {
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub session_date: chrono::NaiveDate,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct UpdateSessionRequest {
    pub action: SessionAction,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub session_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceEntry {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceRequest {
    pub session_id: i64,
    pub records: Vec<AttendanceEntry>,
}

// 待创建的场次（用于存储层）
#[derive(Debug, Clone)]
pub struct NewAttendanceSession {
    pub school_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub session_date: chrono::NaiveDate,
    pub taken_by: Option<i64>,
    pub notes: Option<String>,
}

// 场次列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct SessionListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: i64,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub date: Option<chrono::NaiveDate>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
    pub is_locked: Option<bool>,
}

// 考勤记录查询参数（用于存储层），结果限定在 school_id 内
#[derive(Debug, Clone, Default)]
pub struct RecordListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: i64,
    pub session_id: Option<i64>,
    pub student_id: Option<i64>,
    pub from: Option<chrono::NaiveDate>,
    pub to: Option<chrono::NaiveDate>,
}
