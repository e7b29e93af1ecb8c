use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::common::{PaginationInfo, PaginationQuery, deserialize_optional_i64};

// 第三方集成配置（短信、支付、LMS 等）
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct Integration {
    pub id: i64,
    pub school_id: i64,
    pub provider: String,
    pub name: String,
    pub is_enabled: bool,
    pub config: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

fn default_enabled() -> bool {
    true
}

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct CreateIntegrationRequest {
    pub school_id: i64,
    pub provider: String,
    pub name: String,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
    #[serde(default = "empty_config")]
    pub config: serde_json::Value,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct UpdateIntegrationRequest {
    pub provider: Option<String>,
    pub name: Option<String>,
    pub is_enabled: Option<bool>,
    pub config: Option<serde_json::Value>,
}

/// 配置必须是 JSON 对象
pub fn validate_config(config: &serde_json::Value) -> Result<(), String> {
    if !config.is_object() {
        return Err("config must be a JSON object".to_string());
    }
    Ok(())
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct IntegrationListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub school_id: Option<i64>,
}

#[derive(Debug, Clone, Default)]
pub struct IntegrationListQuery {
    pub page: u64,
    pub size: u64,
    pub school_id: Option<i64>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/integration.ts")]
pub struct IntegrationListResponse {
    pub items: Vec<Integration>,
    pub pagination: PaginationInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_must_be_object() {
        assert!(validate_config(&serde_json::json!({"api_key": "x"})).is_ok());
        assert!(validate_config(&empty_config()).is_ok());
        assert!(validate_config(&serde_json::json!([1, 2])).is_err());
        assert!(validate_config(&serde_json::json!("text")).is_err());
    }

    #[test]
    fn test_create_defaults() {
        let req: CreateIntegrationRequest =
            serde_json::from_str(r#"{"school_id":1,"provider":"sms","name":"SMS"}"#).unwrap();
        assert!(req.is_enabled);
        assert!(req.config.is_object());
    }
}
