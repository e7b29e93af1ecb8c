//! 教学安排实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teacher_assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub teacher_id: i64,
    pub class_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub is_class_teacher: bool,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::teachers::Entity",
        from = "Column::TeacherId",
        to = "super::teachers::Column::Id"
    )]
    Teacher,
}

impl Related<super::teachers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_teacher_assignment(self) -> crate::models::teachers::entities::TeacherAssignment {
        use crate::models::teachers::entities::TeacherAssignment;

        TeacherAssignment {
            id: self.id,
            school_id: self.school_id,
            teacher_id: self.teacher_id,
            class_id: self.class_id,
            section_id: self.section_id,
            subject_id: self.subject_id,
            is_class_teacher: self.is_class_teacher,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
