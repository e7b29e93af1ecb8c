use crate::models::attendance::entities::AttendanceSummary;
use crate::models::common::deserialize_optional_i64;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardQuery {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
}

// 学校概览统计
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct DashboardStats {
    pub school_id: i64,
    pub active_students: i64,
    pub active_teachers: i64,
    pub classes: i64,
    pub pending_leaves: i64,
    pub today_sessions: i64,
    pub today_attendance: AttendanceSummary,
}
