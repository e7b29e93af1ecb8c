//! 功能开关实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feature_flags")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub flag_key: String,
    pub name: String,
    pub description: Option<String>,
    pub is_enabled: bool,
    pub rollout_percentage: i32,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_feature_flag(self) -> crate::models::platform::feature_flags::FeatureFlag {
        use super::to_datetime;
        use crate::models::platform::feature_flags::FeatureFlag;

        FeatureFlag {
            id: self.id,
            key: self.flag_key,
            name: self.name,
            description: self.description,
            is_enabled: self.is_enabled,
            rollout_percentage: self.rollout_percentage,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
