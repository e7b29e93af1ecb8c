//! 审计日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "audit_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub school_id: Option<i64>,
    pub actor_id: Option<i64>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub details: Option<String>,
    pub ip_address: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_audit_log(self) -> crate::models::platform::audit_logs::AuditLog {
        use crate::models::platform::audit_logs::AuditLog;

        AuditLog {
            id: self.id,
            school_id: self.school_id,
            actor_id: self.actor_id,
            action: self.action,
            entity_type: self.entity_type,
            entity_id: self.entity_id,
            // 非 JSON 的历史数据按字符串返回
            details: self.details.map(|raw| {
                serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw))
            }),
            ip_address: self.ip_address,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
