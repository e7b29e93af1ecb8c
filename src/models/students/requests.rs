use super::entities::StudentStatus;
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

// 学生查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub section_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub school_id: Option<i64>,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub guardian_id: Option<i64>,
    pub user_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
    pub guardian_id: Option<i64>,
    pub user_id: Option<i64>,
    pub status: Option<StudentStatus>,
}

// 批量导入中的单行，字段全部可选以便逐行报告错误
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct BulkStudentRow {
    pub admission_no: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub guardian_id: Option<i64>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct BulkCreateStudentsRequest {
    pub school_id: Option<i64>,
    pub students: Vec<BulkStudentRow>,
}

// 待写入的学生（用于存储层）
#[derive(Debug, Clone, PartialEq)]
pub struct NewStudent {
    pub school_id: i64,
    pub user_id: Option<i64>,
    pub guardian_id: Option<i64>,
    pub admission_no: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<chrono::NaiveDate>,
}

fn required(value: &Option<String>, field: &str) -> Result<String, String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(format!("{field} is required")),
    }
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl BulkStudentRow {
    /// 校验单行数据并转换为待写入记录
    pub fn validate(&self, school_id: i64) -> Result<NewStudent, String> {
        let admission_no = required(&self.admission_no, "admission_no")?;
        let first_name = required(&self.first_name, "first_name")?;
        let last_name = required(&self.last_name, "last_name")?;
        let date_of_birth = match optional(&self.date_of_birth) {
            Some(raw) => Some(
                raw.parse::<chrono::NaiveDate>()
                    .map_err(|_| format!("invalid date_of_birth: '{raw}'"))?,
            ),
            None => None,
        };

        Ok(NewStudent {
            school_id,
            user_id: None,
            guardian_id: self.guardian_id,
            admission_no,
            first_name,
            last_name,
            gender: optional(&self.gender),
            date_of_birth,
        })
    }
}

impl CreateStudentRequest {
    pub fn into_new_student(self, school_id: i64) -> NewStudent {
        NewStudent {
            school_id,
            user_id: self.user_id,
            guardian_id: self.guardian_id,
            admission_no: self.admission_no.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            gender: self.gender,
            date_of_birth: self.date_of_birth,
        }
    }
}

// 学生列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct StudentListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: i64,
    pub class_id: Option<i64>,
    pub section_id: Option<i64>,
    // 仅返回该监护人的孩子
    pub guardian_id: Option<i64>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(admission_no: &str, first: &str, last: &str) -> BulkStudentRow {
        BulkStudentRow {
            admission_no: Some(admission_no.to_string()),
            first_name: Some(first.to_string()),
            last_name: Some(last.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_bulk_row_trims_and_validates() {
        let student = row(" A-001 ", "Ada", "Lovelace").validate(3).unwrap();
        assert_eq!(student.school_id, 3);
        assert_eq!(student.admission_no, "A-001");
        assert_eq!(student.date_of_birth, None);
    }

    #[test]
    fn test_bulk_row_missing_fields() {
        let err = row("", "Ada", "Lovelace").validate(1).unwrap_err();
        assert_eq!(err, "admission_no is required");
        let err = row("A-2", "Ada", "  ").validate(1).unwrap_err();
        assert_eq!(err, "last_name is required");
    }

    #[test]
    fn test_bulk_row_date_of_birth() {
        let mut r = row("A-3", "Ada", "Lovelace");
        r.date_of_birth = Some("2012-02-30".to_string());
        assert!(r.validate(1).unwrap_err().contains("date_of_birth"));
        r.date_of_birth = Some("2012-02-28".to_string());
        assert_eq!(
            r.validate(1).unwrap().date_of_birth,
            chrono::NaiveDate::from_ymd_opt(2012, 2, 28)
        );
    }
}
