use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::ErrorCode;

// 统一的API响应结构
//
// 失败响应总是带有 `error` 字段（与 `message` 相同），
// 前端只需判断 `error` 是否存在。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/api.ts")]
pub struct ApiResponse<T: TS> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl<T: TS> ApiResponse<T> {
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error(code: ErrorCode, data: T, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code as i32,
            error: Some(message.clone()),
            message,
            data: Some(data),
            timestamp: chrono::Utc::now(),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty(message: impl Into<String>) -> Self {
        Self {
            code: ErrorCode::Success as i32,
            message: message.into(),
            data: None,
            error: None,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn error_empty(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            code: code as i32,
            error: Some(message.clone()),
            message,
            data: None,
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_has_error_field() {
        let resp = ApiResponse::error_empty(ErrorCode::BadRequest, "school_id is required");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["error"], "school_id is required");
        assert_eq!(json["code"], 1000);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_response_omits_error() {
        let resp = ApiResponse::success(42i64, "ok");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["data"], 42);
        assert!(json.get("error").is_none());
    }
}
