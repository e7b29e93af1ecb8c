use super::entities::Student;
use crate::models::common::PaginationInfo;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListResponse {
    pub items: Vec<Student>,
    pub pagination: PaginationInfo,
}

// 批量导入中失败的行，row 从 1 开始
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct BulkRowError {
    pub row: usize,
    pub admission_no: Option<String>,
    pub error: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct BulkImportResponse {
    pub total: usize,
    pub created: usize,
    pub failed: usize,
    pub errors: Vec<BulkRowError>,
}
