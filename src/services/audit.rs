//! 审计日志记录
//!
//! 写入失败只记录告警，不影响业务请求。

use actix_web::HttpRequest;
use std::sync::Arc;
use tracing::warn;

use crate::models::platform::audit_logs::NewAuditLog;
use crate::models::users::entities::User;
use crate::storage::Storage;

pub(crate) struct AuditEntry {
    inner: NewAuditLog,
}

impl AuditEntry {
    pub fn new(action: impl Into<String>, entity_type: &str) -> Self {
        Self {
            inner: NewAuditLog {
                action: action.into(),
                entity_type: entity_type.to_string(),
                ..Default::default()
            },
        }
    }

    pub fn entity(mut self, entity_id: i64) -> Self {
        self.inner.entity_id = Some(entity_id);
        self
    }

    pub fn school(mut self, school_id: Option<i64>) -> Self {
        self.inner.school_id = school_id;
        self
    }

    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.inner.details = Some(details);
        self
    }

    pub async fn record(self, storage: &Arc<dyn Storage>, actor: &User, request: &HttpRequest) {
        let mut entry = self.inner;
        entry.actor_id = Some(actor.id);
        entry.ip_address = request
            .connection_info()
            .realip_remote_addr()
            .map(str::to_string);

        if let Err(e) = storage.create_audit_log(entry).await {
            warn!("Failed to write audit log: {}", e);
        }
    }
}
