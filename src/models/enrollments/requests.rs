use super::entities::EnrollmentStatus;
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub section_id: Option<i64>,
    pub academic_year: Option<String>,
    pub status: Option<EnrollmentStatus>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub academic_year: String,
    pub roll_no: Option<i32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct UpdateEnrollmentRequest {
    pub section_id: Option<i64>,
    pub roll_no: Option<i32>,
    pub status: Option<EnrollmentStatus>,
}

// 入班列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct EnrollmentListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: i64,
    pub student_id: Option<i64>,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    pub academic_year: Option<String>,
    pub status: Option<EnrollmentStatus>,
}
