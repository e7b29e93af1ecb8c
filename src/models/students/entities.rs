use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 学生状态
    pub enum StudentStatus ("../frontend/src/types/generated/student.ts") {
        Active => "active",
        Inactive => "inactive",
        Graduated => "graduated",
        Transferred => "transferred",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub id: i64,
    pub school_id: i64,
    // 关联的登录账号
    pub user_id: Option<i64>,
    // 监护人账号
    pub guardian_id: Option<i64>,
    // 学号，校内唯一
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub status: StudentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
