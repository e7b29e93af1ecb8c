//! 第三方集成实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "integrations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: i64,
    pub provider: String,
    pub name: String,
    pub is_enabled: bool,
    // JSON 对象文本
    pub config: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::schools::Entity",
        from = "Column::SchoolId",
        to = "super::schools::Column::Id"
    )]
    School,
}

impl Related<super::schools::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::School.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_integration(self) -> crate::models::platform::integrations::Integration {
        use super::to_datetime;
        use crate::models::platform::integrations::Integration;

        Integration {
            id: self.id,
            school_id: self.school_id,
            provider: self.provider,
            name: self.name,
            is_enabled: self.is_enabled,
            config: serde_json::from_str(&self.config)
                .unwrap_or_else(|_| serde_json::Value::Object(serde_json::Map::new())),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
