use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 作业状态：draft → published → closed → archived
    pub enum AssignmentStatus ("../frontend/src/types/generated/assignment.ts") {
        Draft => "draft",
        Published => "published",
        Closed => "closed",
        Archived => "archived",
    }
}

impl AssignmentStatus {
    /// 状态迁移是否合法；published → draft 仅在还没有提交时允许
    pub fn can_transition_to(self, next: AssignmentStatus, has_submissions: bool) -> bool {
        use AssignmentStatus::*;
        match (self, next) {
            (a, b) if a == b => true,
            (Draft, Published) | (Published, Closed) | (Closed, Archived) => true,
            (Published, Draft) => !has_submissions,
            _ => false,
        }
    }

    // 学生可见的状态
    pub fn visible_to_students() -> &'static [AssignmentStatus] {
        &[AssignmentStatus::Published, AssignmentStatus::Closed]
    }
}

crate::define_string_enum! {
    /// 提交状态
    pub enum SubmissionStatus ("../frontend/src/types/generated/assignment.ts") {
        Submitted => "submitted",
        Late => "late",
        Graded => "graded",
    }
}

impl SubmissionStatus {
    /// 根据截止时间判断本次提交是否迟交
    pub fn for_submission_time(now: DateTime<Utc>, due_at: Option<DateTime<Utc>>) -> Self {
        match due_at {
            Some(due) if now > due => SubmissionStatus::Late,
            _ => SubmissionStatus::Submitted,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub max_score: f64,
    pub status: AssignmentStatus,
    pub published_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub attachment_url: Option<String>,
    pub status: SubmissionStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Grade {
    pub id: i64,
    pub submission_id: i64,
    pub graded_by: i64,
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 分数必须在 0..=max_score 之间
pub fn validate_score(score: f64, max_score: f64) -> Result<(), String> {
    if !score.is_finite() || score < 0.0 || score > max_score {
        return Err(format!("score must be between 0 and {max_score}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use AssignmentStatus::*;

    #[test]
    fn test_forward_transitions() {
        assert!(Draft.can_transition_to(Published, false));
        assert!(Published.can_transition_to(Closed, true));
        assert!(Closed.can_transition_to(Archived, true));
        assert!(Closed.can_transition_to(Closed, true));
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(!Draft.can_transition_to(Closed, false));
        assert!(!Draft.can_transition_to(Archived, false));
        assert!(!Archived.can_transition_to(Published, false));
        assert!(!Closed.can_transition_to(Published, false));
    }

    #[test]
    fn test_unpublish_only_without_submissions() {
        assert!(Published.can_transition_to(Draft, false));
        assert!(!Published.can_transition_to(Draft, true));
    }

    #[test]
    fn test_late_submission() {
        let due = Utc::now();
        let before = due - chrono::Duration::minutes(5);
        let after = due + chrono::Duration::minutes(5);
        assert_eq!(
            SubmissionStatus::for_submission_time(before, Some(due)),
            SubmissionStatus::Submitted
        );
        assert_eq!(
            SubmissionStatus::for_submission_time(after, Some(due)),
            SubmissionStatus::Late
        );
        assert_eq!(
            SubmissionStatus::for_submission_time(after, None),
            SubmissionStatus::Submitted
        );
    }

    #[test]
    fn test_score_bounds() {
        assert!(validate_score(0.0, 100.0).is_ok());
        assert!(validate_score(100.0, 100.0).is_ok());
        assert!(validate_score(-1.0, 100.0).is_err());
        assert!(validate_score(100.5, 100.0).is_err());
        assert!(validate_score(f64::NAN, 100.0).is_err());
    }
}
