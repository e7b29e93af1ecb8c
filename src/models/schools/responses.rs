use super::entities::School;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/school.ts")]
pub struct SchoolListResponse {
    pub items: Vec<School>,
    pub pagination: PaginationInfo,
}
