use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 考勤状态
    pub enum AttendanceStatus ("../frontend/src/types/generated/attendance.ts") {
        Present => "present",
        Absent => "absent",
        Late => "late",
        Excused => "excused",
    }
}

crate::define_string_enum! {
    /// 考勤场次操作
    pub enum SessionAction ("../frontend/src/types/generated/attendance.ts") {
        Lock => "lock",
        Unlock => "unlock",
    }
}

// 考勤场次：某班级（分班 / 科目）某一天的一次点名
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSession {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub session_date: chrono::NaiveDate,
    pub taken_by: Option<i64>,
    pub is_locked: bool,
    pub locked_by: Option<i64>,
    pub locked_at: Option<chrono::DateTime<chrono::Utc>>,
    pub notes: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl AttendanceSession {
    /// 锁定/解锁后的目标状态，已处于目标状态时返回 None
    pub fn target_lock_state(&self, action: SessionAction) -> Option<bool> {
        let target = action == SessionAction::Lock;
        (self.is_locked != target).then_some(target)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceRecord {
    pub id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
    pub marked_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 考勤统计
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/attendance.ts")]
pub struct AttendanceSummary {
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub late: i64,
    pub excused: i64,
}

impl AttendanceSummary {
    pub fn add(&mut self, status: AttendanceStatus, count: i64) {
        self.total += count;
        match status {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Absent => self.absent += count,
            AttendanceStatus::Late => self.late += count,
            AttendanceStatus::Excused => self.excused += count,
        }
    }

    pub fn from_records(records: &[AttendanceRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            summary.add(record.status, 1);
        }
        summary
    }
}

/// 场次日期不能晚于今天
pub fn validate_session_date(
    date: chrono::NaiveDate,
    today: chrono::NaiveDate,
) -> Result<(), String> {
    if date > today {
        return Err(format!("session_date {date} is in the future"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn session(is_locked: bool) -> AttendanceSession {
        AttendanceSession {
            id: 1,
            school_id: 1,
            class_id: 1,
            section_id: None,
            subject_id: None,
            session_date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            taken_by: None,
            is_locked,
            locked_by: None,
            locked_at: None,
            notes: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn test_lock_transitions_are_idempotent() {
        assert_eq!(session(false).target_lock_state(SessionAction::Lock), Some(true));
        assert_eq!(session(true).target_lock_state(SessionAction::Lock), None);
        assert_eq!(session(true).target_lock_state(SessionAction::Unlock), Some(false));
        assert_eq!(session(false).target_lock_state(SessionAction::Unlock), None);
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(serde_json::from_str::<SessionAction>("\"freeze\"").is_err());
        assert_eq!(
            serde_json::from_str::<SessionAction>("\"unlock\"").unwrap(),
            SessionAction::Unlock
        );
    }

    #[test]
    fn test_future_session_date() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert!(validate_session_date(today, today).is_ok());
        assert!(validate_session_date(today.pred_opt().unwrap(), today).is_ok());
        assert!(validate_session_date(today.succ_opt().unwrap(), today).is_err());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = AttendanceSummary::default();
        summary.add(AttendanceStatus::Present, 3);
        summary.add(AttendanceStatus::Late, 1);
        summary.add(AttendanceStatus::Excused, 2);
        assert_eq!(summary.total, 6);
        assert_eq!(summary.present, 3);
        assert_eq!(summary.absent, 0);
    }
}
