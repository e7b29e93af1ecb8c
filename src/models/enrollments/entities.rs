use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 选课/入班状态
    pub enum EnrollmentStatus ("../frontend/src/types/generated/enrollment.ts") {
        Active => "active",
        Completed => "completed",
        Withdrawn => "withdrawn",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub school_id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub academic_year: String,
    pub roll_no: Option<i32>,
    pub status: EnrollmentStatus,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
