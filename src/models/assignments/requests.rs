use super::entities::AssignmentStatus;
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub section_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub subject_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: f64,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: Option<f64>,
    pub status: Option<AssignmentStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct SubmitAssignmentRequest {
    pub content: Option<String>,
    pub attachment_url: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

// 存储层使用的作业更新，状态时间戳由服务层计算
#[derive(Debug, Clone, Default)]
pub struct AssignmentChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: Option<f64>,
    pub status: Option<AssignmentStatus>,
    pub published_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

// 作业列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AssignmentListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: i64,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub status: Option<AssignmentStatus>,
    // 额外的可见状态限制（学生 / 家长）
    pub visible_statuses: Option<Vec<AssignmentStatus>>,
}
