use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, load_subject};
use crate::models::classes::requests::{
    CreateSubjectRequest, SubjectListQuery, SubjectQueryParams, UpdateSubjectRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, conflict, current_user, not_found, school_scope, storage_error, try_respond,
};
use crate::utils::validate::{require_non_blank, validate_code};

fn normalize_code(raw: &str) -> Result<String, HttpResponse> {
    let code = require_non_blank("code", raw)
        .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?
        .to_uppercase();
    validate_code("code", &code).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))?;
    Ok(code)
}

pub async fn list_subjects(
    service: &ClassService,
    request: &HttpRequest,
    query: SubjectQueryParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));
    let (page, size) = query.pagination.normalized();

    let storage = service.get_storage(request);
    match storage
        .list_subjects_with_pagination(SubjectListQuery {
            page,
            size,
            school_id,
            search: query.search,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Subjects retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list subjects", e)),
    }
}

pub async fn create_subject(
    service: &ClassService,
    request: &HttpRequest,
    mut subject_data: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, subject_data.school_id));

    subject_data.name = try_respond!(
        require_non_blank("name", &subject_data.name)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    subject_data.code = try_respond!(normalize_code(&subject_data.code));

    let storage = service.get_storage(request);
    match storage.get_subject_by_code(school_id, &subject_data.code).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::SubjectCodeExists,
                format!("Subject code '{}' already exists", subject_data.code),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check subject code", e)),
    }

    match storage.create_subject(school_id, subject_data).await {
        Ok(subject) => {
            info!("Subject {} created in school {}", subject.code, school_id);
            AuditEntry::new("subject.create", "subject")
                .entity(subject.id)
                .school(Some(school_id))
                .details(serde_json::json!({ "code": subject.code, "name": subject.name }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(subject, "Subject created")))
        }
        Err(e) => Ok(storage_error("Failed to create subject", e)),
    }
}

pub async fn update_subject(
    service: &ClassService,
    request: &HttpRequest,
    subject_id: i64,
    mut update_data: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let subject = try_respond!(load_subject(&storage, &actor, subject_id).await);

    if let Some(name) = update_data.name.as_deref() {
        update_data.name = Some(try_respond!(
            require_non_blank("name", name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
        ));
    }
    if let Some(raw) = update_data.code.as_deref() {
        let code = try_respond!(normalize_code(raw));
        if code != subject.code {
            match storage.get_subject_by_code(subject.school_id, &code).await {
                Ok(Some(_)) => {
                    return Ok(conflict(
                        ErrorCode::SubjectCodeExists,
                        format!("Subject code '{code}' already exists"),
                    ));
                }
                Ok(None) => {}
                Err(e) => return Ok(storage_error("Failed to check subject code", e)),
            }
        }
        update_data.code = Some(code);
    }

    match storage.update_subject(subject_id, update_data).await {
        Ok(Some(updated)) => {
            info!("Subject {} updated by {}", updated.id, actor.id);
            AuditEntry::new("subject.update", "subject")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Subject updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error("Failed to update subject", e)),
    }
}

pub async fn delete_subject(
    service: &ClassService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let subject = try_respond!(load_subject(&storage, &actor, subject_id).await);

    match storage.delete_subject(subject_id).await {
        Ok(true) => {
            info!("Subject {} deleted by {}", subject.code, actor.id);
            AuditEntry::new("subject.delete", "subject")
                .entity(subject.id)
                .school(Some(subject.school_id))
                .details(serde_json::json!({ "code": subject.code }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Subject deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SubjectNotFound, "Subject not found")),
        Err(e) => Ok(storage_error("Failed to delete subject", e)),
    }
}
