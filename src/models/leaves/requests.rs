use super::entities::{LeaveAction, LeaveStatus, LeaveType};
use crate::models::common::{PaginationQuery, deserialize_optional_i64};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct LeaveListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    pub status: Option<LeaveStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub teacher_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub student_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct CreateLeaveRequest {
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub leave_type: LeaveType,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub reason: Option<String>,
}

impl CreateLeaveRequest {
    /// teacher_id 与 student_id 必须且只能填写一个，结束日期不能早于开始日期
    pub fn validate(&self) -> Result<(), String> {
        match (self.teacher_id, self.student_id) {
            (Some(_), Some(_)) | (None, None) => {
                return Err("exactly one of teacher_id or student_id is required".to_string());
            }
            _ => {}
        }
        if self.end_date < self.start_date {
            return Err("end_date must not be before start_date".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct UpdateLeaveRequest {
    pub action: LeaveAction,
    pub note: Option<String>,
}

// 待写入的请假（用于存储层）
#[derive(Debug, Clone)]
pub struct NewLeave {
    pub school_id: i64,
    pub requester_id: i64,
    pub request: CreateLeaveRequest,
}

// 请假列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct LeaveListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: i64,
    pub status: Option<LeaveStatus>,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    // 仅返回该用户发起的请假
    pub requester_id: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn request(teacher_id: Option<i64>, student_id: Option<i64>) -> CreateLeaveRequest {
        CreateLeaveRequest {
            teacher_id,
            student_id,
            leave_type: LeaveType::Sick,
            start_date: NaiveDate::from_ymd_opt(2025, 5, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 5, 3).unwrap(),
            reason: None,
        }
    }

    #[test]
    fn test_exactly_one_subject() {
        assert!(request(Some(1), None).validate().is_ok());
        assert!(request(None, Some(2)).validate().is_ok());
        assert!(request(Some(1), Some(2)).validate().is_err());
        assert!(request(None, None).validate().is_err());
    }

    #[test]
    fn test_date_range() {
        let mut req = request(Some(1), None);
        req.end_date = NaiveDate::from_ymd_opt(2025, 4, 30).unwrap();
        assert!(req.validate().is_err());
        req.end_date = req.start_date;
        assert!(req.validate().is_ok());
    }
}
