use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 教师状态
    pub enum TeacherStatus ("../frontend/src/types/generated/teacher.ts") {
        Active => "active",
        Inactive => "inactive",
        OnLeave => "on_leave",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub id: i64,
    pub school_id: i64,
    pub user_id: Option<i64>,
    // 工号，校内唯一
    pub employee_no: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub qualification: Option<String>,
    pub hired_on: Option<chrono::NaiveDate>,
    pub status: TeacherStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

// 教学安排：教师负责的班级 / 分班 / 科目
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherAssignment {
    pub id: i64,
    pub school_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub is_class_teacher: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
