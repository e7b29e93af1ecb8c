use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginationInfo, PaginationQuery, deserialize_optional_i64};

// 审计日志
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit_log.ts")]
pub struct AuditLog {
    pub id: i64,
    pub school_id: Option<i64>,
    pub actor_id: Option<i64>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 待写入的审计日志
#[derive(Debug, Clone, Default)]
pub struct NewAuditLog {
    pub school_id: Option<i64>,
    pub actor_id: Option<i64>,
    pub action: String,
    pub entity_type: String,
    pub entity_id: Option<i64>,
    pub details: Option<serde_json::Value>,
    pub ip_address: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit_log.ts")]
pub struct AuditLogListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub actor_id: Option<i64>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

// 审计日志查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AuditLogListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: Option<i64>,
    pub actor_id: Option<i64>,
    pub action: Option<String>,
    pub entity_type: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/audit_log.ts")]
pub struct AuditLogListResponse {
    pub items: Vec<AuditLog>,
    pub pagination: PaginationInfo,
}
