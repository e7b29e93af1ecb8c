//! 请假实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "leaves")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub requester_id: i64,
    pub teacher_id: Option<i64>,
    pub student_id: Option<i64>,
    pub leave_type: String,
    pub start_date: String,
    pub end_date: String,
    pub reason: Option<String>,
    pub status: String,
    pub reviewed_by: Option<i64>,
    pub reviewed_at: Option<i64>,
    pub review_note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_leave(self) -> crate::models::leaves::entities::Leave {
        use super::{to_date, to_datetime, to_optional_datetime};
        use crate::models::leaves::entities::{Leave, LeaveStatus, LeaveType};

        Leave {
            id: self.id,
            school_id: self.school_id,
            requester_id: self.requester_id,
            teacher_id: self.teacher_id,
            student_id: self.student_id,
            leave_type: self
                .leave_type
                .parse::<LeaveType>()
                .unwrap_or(LeaveType::Other),
            start_date: to_date(&self.start_date),
            end_date: to_date(&self.end_date),
            reason: self.reason,
            status: self
                .status
                .parse::<LeaveStatus>()
                .unwrap_or(LeaveStatus::Pending),
            reviewed_by: self.reviewed_by,
            reviewed_at: to_optional_datetime(self.reviewed_at),
            review_note: self.review_note,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
