use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{ClassService, load_class, load_section};
use crate::models::classes::requests::{CreateSectionRequest, UpdateSectionRequest};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::audit::AuditEntry;
use crate::services::{
    bad_request, conflict, current_user, not_found, storage_error, try_respond,
};
use crate::utils::validate::require_non_blank;

fn check_capacity(capacity: Option<i32>) -> Result<(), HttpResponse> {
    match capacity {
        Some(c) if c < 1 => Err(bad_request(
            ErrorCode::BadRequest,
            "capacity must be at least 1",
        )),
        _ => Ok(()),
    }
}

pub async fn list_sections(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let class = try_respond!(load_class(&storage, &actor, class_id).await);

    match storage.list_sections(class.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            items,
            "Sections retrieved",
        ))),
        Err(e) => Ok(storage_error("Failed to list sections", e)),
    }
}

pub async fn create_section(
    service: &ClassService,
    request: &HttpRequest,
    class_id: i64,
    mut section_data: CreateSectionRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let class = try_respond!(load_class(&storage, &actor, class_id).await);

    section_data.name = try_respond!(
        require_non_blank("name", &section_data.name)
            .map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
    );
    try_respond!(check_capacity(section_data.capacity));

    match storage.find_section_by_name(class.id, &section_data.name).await {
        Ok(Some(_)) => {
            return Ok(conflict(
                ErrorCode::SectionAlreadyExists,
                format!("Section '{}' already exists in this class", section_data.name),
            ));
        }
        Ok(None) => {}
        Err(e) => return Ok(storage_error("Failed to check section", e)),
    }

    match storage
        .create_section(class.school_id, class.id, section_data)
        .await
    {
        Ok(section) => {
            info!("Section {} created in class {}", section.name, class.id);
            AuditEntry::new("section.create", "section")
                .entity(section.id)
                .school(Some(class.school_id))
                .details(serde_json::json!({ "class_id": class.id, "name": section.name }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(section, "Section created")))
        }
        Err(e) => Ok(storage_error("Failed to create section", e)),
    }
}

pub async fn update_section(
    service: &ClassService,
    request: &HttpRequest,
    section_id: i64,
    mut update_data: UpdateSectionRequest,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let section = try_respond!(load_section(&storage, &actor, section_id).await);

    if let Some(name) = update_data.name.as_deref() {
        let name = try_respond!(
            require_non_blank("name", name).map_err(|msg| bad_request(ErrorCode::BadRequest, msg))
        );
        if name != section.name {
            match storage.find_section_by_name(section.class_id, &name).await {
                Ok(Some(_)) => {
                    return Ok(conflict(
                        ErrorCode::SectionAlreadyExists,
                        format!("Section '{name}' already exists in this class"),
                    ));
                }
                Ok(None) => {}
                Err(e) => return Ok(storage_error("Failed to check section", e)),
            }
        }
        update_data.name = Some(name);
    }
    try_respond!(check_capacity(update_data.capacity));

    match storage.update_section(section_id, update_data).await {
        Ok(Some(updated)) => {
            info!("Section {} updated by {}", updated.id, actor.id);
            AuditEntry::new("section.update", "section")
                .entity(updated.id)
                .school(Some(updated.school_id))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(updated, "Section updated")))
        }
        Ok(None) => Ok(not_found(ErrorCode::SectionNotFound, "Section not found")),
        Err(e) => Ok(storage_error("Failed to update section", e)),
    }
}

pub async fn delete_section(
    service: &ClassService,
    request: &HttpRequest,
    section_id: i64,
) -> ActixResult<HttpResponse> {
    let actor = try_respond!(current_user(request));
    let storage = service.get_storage(request);
    let section = try_respond!(load_section(&storage, &actor, section_id).await);

    match storage.delete_section(section_id).await {
        Ok(true) => {
            info!("Section {} deleted by {}", section.name, actor.id);
            AuditEntry::new("section.delete", "section")
                .entity(section.id)
                .school(Some(section.school_id))
                .details(serde_json::json!({ "class_id": section.class_id, "name": section.name }))
                .record(&storage, &actor, request)
                .await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Section deleted")))
        }
        Ok(false) => Ok(not_found(ErrorCode::SectionNotFound, "Section not found")),
        Err(e) => Ok(storage_error("Failed to delete section", e)),
    }
}
