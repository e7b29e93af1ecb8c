use super::entities::Leave;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/leave.ts")]
pub struct LeaveListResponse {
    pub items: Vec<Leave>,
    pub pagination: PaginationInfo,
}
