//! 学生批量导入
//!
//! 每行单独校验，重复的学号（数据库中已有或本次请求内重复）按行报告，
//! 合法的行按 `bulk.batch_size` 分批写入，瞬时错误按指数退避重试。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::collections::{HashMap, HashSet};
use tracing::{error, info};

use super::StudentService;
use crate::config::AppConfig;
use crate::models::students::requests::{BulkCreateStudentsRequest, NewStudent};
use crate::models::students::responses::{BulkImportResponse, BulkRowError};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{bad_request, current_user, school_scope, storage_error, try_respond};
use crate::utils::bulk::{chunk_rows, retry_with_backoff};
use crate::utils::validate::validate_code;

// 行号从 1 开始，与导入文件中的行对应
struct ValidRow {
    row: usize,
    student: NewStudent,
}

pub async fn bulk_create_students(
    service: &StudentService,
    request: &HttpRequest,
    bulk_data: BulkCreateStudentsRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, bulk_data.school_id));
    let config = AppConfig::get();

    let total = bulk_data.students.len();
    if total == 0 {
        return Ok(bad_request(
            ErrorCode::BulkImportInvalid,
            "students must not be empty",
        ));
    }
    if total > config.bulk.max_rows {
        return Ok(bad_request(
            ErrorCode::BulkImportInvalid,
            format!(
                "Too many rows: {total} (at most {} per request)",
                config.bulk.max_rows
            ),
        ));
    }

    let storage = service.get_storage(request);
    let mut errors = Vec::new();
    let mut candidates = Vec::with_capacity(total);

    for (index, row) in bulk_data.students.iter().enumerate() {
        let row_no = index + 1;
        let result = row.validate(school_id).and_then(|student| {
            validate_code("admission_no", &student.admission_no).map(|_| student)
        });
        match result {
            Ok(student) => candidates.push(ValidRow {
                row: row_no,
                student,
            }),
            Err(message) => errors.push(BulkRowError {
                row: row_no,
                admission_no: row.admission_no.clone(),
                error: message,
            }),
        }
    }

    // 家长账号逐个校验一次
    let guardian_ids: HashSet<i64> = candidates
        .iter()
        .filter_map(|c| c.student.guardian_id)
        .collect();
    let mut valid_guardians = HashMap::with_capacity(guardian_ids.len());
    for guardian_id in guardian_ids {
        let ok = match storage.get_user_by_id(guardian_id).await {
            Ok(Some(user)) => {
                user.school_id == Some(school_id) && user.role == UserRole::Guardian
            }
            Ok(None) => false,
            Err(e) => return Ok(storage_error("Failed to check guardians", e)),
        };
        valid_guardians.insert(guardian_id, ok);
    }

    let admission_nos: Vec<String> = candidates
        .iter()
        .map(|c| c.student.admission_no.clone())
        .collect();
    let existing: HashSet<String> = match storage
        .find_existing_admission_nos(school_id, &admission_nos)
        .await
    {
        Ok(found) => found.into_iter().collect(),
        Err(e) => return Ok(storage_error("Failed to check admission numbers", e)),
    };

    let mut seen = HashSet::new();
    let mut accepted = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let admission_no = candidate.student.admission_no.clone();
        let problem = if existing.contains(&admission_no) {
            Some("admission_no already exists in this school".to_string())
        } else if !seen.insert(admission_no.clone()) {
            Some("duplicate admission_no in request".to_string())
        } else if let Some(guardian_id) = candidate.student.guardian_id
            && !valid_guardians.get(&guardian_id).copied().unwrap_or(false)
        {
            Some(format!("guardian_id {guardian_id} is not a guardian of this school"))
        } else {
            None
        };
        match problem {
            Some(error) => errors.push(BulkRowError {
                row: candidate.row,
                admission_no: Some(admission_no),
                error,
            }),
            None => accepted.push(candidate),
        }
    }

    let policy = config.bulk_retry_policy();
    let mut created = 0;
    for batch in chunk_rows(accepted, config.bulk.batch_size) {
        let students: Vec<NewStudent> = batch.iter().map(|c| c.student.clone()).collect();
        let result = retry_with_backoff(&policy, || {
            let storage = storage.clone();
            let students = students.clone();
            async move { storage.bulk_create_students(students).await }
        })
        .await;

        match result {
            Ok(count) => created += count,
            Err(e) => {
                error!(
                    "Bulk student batch of {} rows failed for school {}: {}",
                    batch.len(),
                    school_id,
                    e
                );
                errors.extend(batch.into_iter().map(|c| BulkRowError {
                    row: c.row,
                    admission_no: Some(c.student.admission_no),
                    error: format!("insert failed: {}", e.message()),
                }));
            }
        }
    }

    errors.sort_by_key(|e| e.row);
    let response = BulkImportResponse {
        total,
        created,
        failed: errors.len(),
        errors,
    };

    info!(
        "Bulk import into school {}: {} created, {} failed",
        school_id, response.created, response.failed
    );
    AuditEntry::new("student.bulk_create", "student")
        .school(Some(school_id))
        .details(serde_json::json!({
            "total": response.total,
            "created": response.created,
            "failed": response.failed,
        }))
        .record(&storage, &actor, request)
        .await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Bulk import finished")))
}
