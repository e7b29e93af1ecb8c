use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{ClassService, load_class};
use crate::models::classes::requests::{
    ClassListQuery, ClassQueryParams, CreateClassRequest, UpdateClassRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, conflict, current_user, not_found, school_scope, storage_error, try_respond,
};
use crate::storage::Storage;
use crate::utils::validate::require_non_blank;

async fn check_class_teacher(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    teacher_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_teacher_by_id(teacher_id).await {
        Ok(Some(teacher)) if teacher.school_id == school_id => Ok(()),
        Ok(_) => Err(bad_request(
            ErrorCode::TeacherNotFound,
            "class_teacher_id must reference a teacher of the same school",
        )),
        Err(e) => Err(storage_error("Failed to check class teacher", e)),
    }
}

pub async fn list_classes(
    service: &ClassService,
    request: &HttpRequest,
    query: ClassQueryParams,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, query.school_id));
    let (page, size) = query.pagination.normalized();

    let storage = service.get_storage(request);
    match storage
        .list_classes_with_pagination(ClassListQuery {
            page,
            size,
            school_id,
            academic_year: query.academic_year,
            search: query.search,
        })
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Classes retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list classes", e)),
    }
}

pub async fn create_class(
    service: &ClassService,
    request: &HttpRequest,
    mut class_data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let school_id = try_respond!(school_scope(&actor, class_data.school_id));

    class_data.name = try_respond!(
        require_non_blank("name", &class_data.name)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    class_data.academic_year = try_respond!(
        require_non_blank("academic_year", &class_data.academic_year)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );

    let storage = service.get_storage(request);
    if let Some(teacher_id) = class_data.class_teacher_id {
        try_respond!(check_class_teacher(&storage, school_id, teacher_id).await);
    }

    match storage
        .find_class_by_name(school_id, &class_data.name, &class_data.academic_year)
        .await
    {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::ClassAlreadyExists,
                format!(
                    "Class '{}' already exists for {}",
                    class_data.name, class_data.academic_year
                ),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check class", e)),
    }

    match storage.create_class(school_id, class_data).await {
        Ok(class) => {
            info!("Class {} created in school {}", class.name, school_id);
            AuditEntry::new("class.create", "class")
                .entity(class.id)
                .school(Some(school_id))
                .details(serde_json::json!({
                    "name": class.name,
                    "academic_year": class.academic_year,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created")))
        }
        Err(e) => Ok(storage_error("Failed to create class", e)),
    }
}

pub async fn get_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let class = try_respond!(load_class(&storage, &actor, class_id).await);
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class retrieved")))
}

pub async fn update_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut update_data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let class = try_respond!(load_class(&storage, &actor, class_id).await);

    for (field, value) in [
        ("name", &mut update_data.name),
        ("academic_year", &mut update_data.academic_year),
    ] {
        if let Some(raw) = value.as_deref() {
            *value = Some(try_respond!(
                require_non_blank(field, raw).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
            ));
        }
    }
    if let Some(teacher_id) = update_data.class_teacher_id {
        try_respond!(check_class_teacher(&storage, class.school_id, teacher_id).await);
    }

    // 名称或学年变化时重新检查唯一性
    let name = update_data.name.as_deref().unwrap_or(&class.name);
    let academic_year = update_data
        .academic_year
        .as_deref()
        .unwrap_or(&class.academic_year);
    if name != class.name || academic_year != class.academic_year {
        match storage
            .find_class_by_name(class.school_id, name, academic_year)
            .await
        {
            Ok(Some(other)) if other.id != class.id => {
                return Ok(conflict(
                    ErrorCode::ClassAlreadyExists,
                    format!("Class '{name}' already exists for {academic_year}"),
                ));
            }
            Ok(_) => {}
            Err(e) => return Ok(storage_error("Failed to check class", e)),
        }
    }

    match storage.update_class(class_id, update_data).await {
        Ok(Some(updated)) => {
            info!("Class {} updated by {}", updated.id, actor.id);
            AuditEntry::new("class.update", "class")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Class updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error("Failed to update class", e)),
    }
}

pub async fn delete_class(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let class = try_respond!(load_class(&storage, &actor, class_id).await);

    // 仍有在读学生的班级不能删除
    match storage.active_student_ids_in_class(class.id, None).await {
        Ok(ids) if !ids.is_empty() => {
            return Ok(conflict(
                ErrorCode::Conflict,
                format!("Class still has {} active enrollments", ids.len()),
            ));
        }
        Ok(_) => {}
        Err(e) => return Ok(storage_error("Failed to check enrollments", e)),
    }

    match storage.delete_class(class_id).await {
        Ok(true) => {
            info!("Class {} deleted by {}", class.name, actor.id);
            AuditEntry::new("class.delete", "class")
                .entity(class.id)
                .school(Some(class.school_id))
                .details(serde_json::json!({
                    "name": class.name,
                    "academic_year": class.academic_year,
                }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::ClassNotFound, "Class not found")),
        Err(e) => Ok(storage_error("Failed to delete class", e)),
    }
}
