use crate::models::common::{PaginationQuery, deserialize_optional_bool};
use serde::Deserialize;
use ts_rs::TS;

// 学校查询参数（来自HTTP请求）
#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_bool")]
    pub include_inactive: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct CreateSchoolRequest {
    pub name: String,
    pub code: String,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct UpdateSchoolRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub is_active: Option<bool>,
}

// 学校列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct SchoolListQuery {
    pub page: u64,
    pub size: u64,
    pub search: Option<String>,
    pub include_inactive: bool,
}
