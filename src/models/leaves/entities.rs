use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 请假类型
    pub enum LeaveType ("../frontend/src/types/generated/leave.ts") {
        Sick => "sick",
        Casual => "casual",
        Personal => "personal",
        Emergency => "emergency",
        Other => "other",
    }
}

crate::define_string_enum! {
    /// 请假状态
    pub enum LeaveStatus ("../frontend/src/types/generated/leave.ts") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
        Cancelled => "cancelled",
    }
}

crate::define_string_enum! {
    /// 请假审批操作
    pub enum LeaveAction ("../frontend/src/types/generated/leave.ts") {
        Approve => "approve",
        Reject => "reject",
        Cancel => "cancel",
    }
}

impl LeaveStatus {
    /// 只有待审批的请假可以被处理
    pub fn apply(self, action: LeaveAction) -> Option<LeaveStatus> {
        match (self, action) {
            (LeaveStatus::Pending, LeaveAction::Approve) => Some(LeaveStatus::Approved),
            (LeaveStatus::Pending, LeaveAction::Reject) => Some(LeaveStatus::Rejected),
            (LeaveStatus::Pending, LeaveAction::Cancel) => Some(LeaveStatus::Cancelled),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct Leave {
    pub id: i64,
    pub school_id: i64,
    // 发起请求的用户
    pub requester_id: i64,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub leave_type: LeaveType,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub reason: Option<String>,
    pub status: LeaveStatus,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub review_note: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert_eq!(
            LeaveStatus::Pending.apply(LeaveAction::Approve),
            Some(LeaveStatus::Approved)
        );
        assert_eq!(
            LeaveStatus::Pending.apply(LeaveAction::Reject),
            Some(LeaveStatus::Rejected)
        );
        assert_eq!(
            LeaveStatus::Pending.apply(LeaveAction::Cancel),
            Some(LeaveStatus::Cancelled)
        );
    }

    #[test]
    fn test_final_states_are_terminal() {
        for status in [
            LeaveStatus::Approved,
            LeaveStatus::Rejected,
            LeaveStatus::Cancelled,
        ] {
            for action in LeaveAction::all() {
                assert_eq!(status.apply(*action), None);
            }
        }
    }
}
