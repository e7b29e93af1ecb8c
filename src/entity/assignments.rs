//! 作业实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub created_by: i64,
    pub title: String,
    pub description: Option<String>,
    pub due_at: Option<i64>,
    pub max_score: f64,
    pub status: String,
    pub published_at: Option<i64>,
    pub closed_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// 从数据库模型转换为业务模型
impl Model {
    pub fn into_assignment(self) -> crate::models::assignments::entities::Assignment {
        use super::{to_datetime, to_optional_datetime};
        use crate::models::assignments::entities::{Assignment, AssignmentStatus};

        Assignment {
            id: self.id,
            school_id: self.school_id,
            class_id: self.class_id,
            section_id: self.section_id,
            subject_id: self.subject_id,
            created_by: self.created_by,
            title: self.title,
            description: self.description,
            due_at: to_optional_datetime(self.due_at),
            max_score: self.max_score,
            status: self
                .status
                .parse::<AssignmentStatus>()
                .unwrap_or(AssignmentStatus::Draft),
            published_at: to_optional_datetime(self.published_at),
            closed_at: to_optional_datetime(self.closed_at),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
