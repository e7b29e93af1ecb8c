use super::entities::{AttendanceRecord, AttendanceSession, AttendanceSummary};
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionListResponse {
    pub items: Vec<AttendanceSession>,
    pub pagination: PaginationInfo,
}

// create-or-get 的结果
#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionUpsertResponse {
    pub session: AttendanceSession,
    pub created: bool,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct SessionDetailResponse {
    pub session: AttendanceSession,
    pub records: Vec<AttendanceRecord>,
    pub summary: AttendanceSummary,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordListResponse {
    pub items: Vec<AttendanceRecord>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct RecordError {
    pub student_id: i64,
    pub error: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct MarkAttendanceResponse {
    pub saved: Vec<AttendanceRecord>,
    pub errors: Vec<RecordError>,
}
