//! 考勤场次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attendance_sessions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub session_date: String,
    pub taken_by: Option<i64>,
    pub is_locked: bool,
    pub locked_by: Option<i64>,
    pub locked_at: Option<i64>,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance_records::Entity")]
    Records,
}

impl Related<super::attendance_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Records.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_session(self) -> crate::models::attendance::entities::AttendanceSession {
        use super::{to_date, to_datetime, to_optional_datetime};
        use crate::models::attendance::entities::AttendanceSession;

        AttendanceSession {
            id: self.id,
            school_id: self.school_id,
            class_id: self.class_id,
            section_id: self.section_id,
            subject_id: self.subject_id,
            session_date: to_date(&self.session_date),
            taken_by: self.taken_by,
            is_locked: self.is_locked,
            locked_by: self.locked_by,
            locked_at: to_optional_datetime(self.locked_at),
            notes: self.notes,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
