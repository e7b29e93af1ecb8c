//! 评分实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "grades")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub submission_id: i64,
    pub graded_by: i64,
    pub score: f64,
    pub feedback: Option<String>,
    pub graded_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id"
    )]
    Submission,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_grade(self) -> crate::models::assignments::entities::Grade {
        use super::to_datetime;
        use crate::models::assignments::entities::Grade;

        Grade {
            id: self.id,
            submission_id: self.submission_id,
            graded_by: self.graded_by,
            score: self.score,
            feedback: self.feedback,
            graded_at: to_datetime(self.graded_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
