use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::classes::requests::{
    ClassQueryParams, CreateClassRequest, CreateSectionRequest, CreateSubjectRequest,
    SubjectQueryParams, UpdateClassRequest, UpdateSectionRequest, UpdateSubjectRequest,
};
use crate::models::permissions::Permission;
use crate::services::ClassService;
use crate::utils::SafeIDI64;

// 懒加载的全局 CLASS_SERVICE 实例
static CLASS_SERVICE: Lazy<ClassService> = Lazy::new(ClassService::new_lazy);

// HTTP处理程序
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    class_data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_class(&req, class_data.into_inner())
        .await
}

pub async fn get_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.get_class(&req, class_id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    class_id: SafeIDI64,
    update_data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_class(&req, class_id.0, update_data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_class(&req, class_id.0).await
}

pub async fn list_sections(req: HttpRequest, class_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_sections(&req, class_id.0).await
}

pub async fn create_section(
    req: HttpRequest,
    class_id: SafeIDI64,
    section_data: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_section(&req, class_id.0, section_data.into_inner())
        .await
}

pub async fn update_section(
    req: HttpRequest,
    section_id: SafeIDI64,
    update_data: web::Json<UpdateSectionRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_section(&req, section_id.0, update_data.into_inner())
        .await
}

pub async fn delete_section(req: HttpRequest, section_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_section(&req, section_id.0).await
}

pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<SubjectQueryParams>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.list_subjects(&req, query.into_inner()).await
}

pub async fn create_subject(
    req: HttpRequest,
    subject_data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .create_subject(&req, subject_data.into_inner())
        .await
}

pub async fn update_subject(
    req: HttpRequest,
    subject_id: SafeIDI64,
    update_data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    CLASS_SERVICE
        .update_subject(&req, subject_id.0, update_data.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, subject_id: SafeIDI64) -> ActixResult<HttpResponse> {
    CLASS_SERVICE.delete_subject(&req, subject_id.0).await
}

fn view() -> middlewares::RequirePermission {
    middlewares::RequirePermission::new(Permission::ViewClasses)
}

fn manage() -> middlewares::RequirePermission {
    middlewares::RequirePermission::new(Permission::ManageClasses)
}

// 班级、小组与科目
pub fn configure_classes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_classes).wrap(view()))
                    .route(web::post().to(create_class).wrap(manage())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_class).wrap(view()))
                    .route(web::put().to(update_class).wrap(manage()))
                    .route(web::delete().to(delete_class).wrap(manage())),
            )
            .service(
                web::resource("/{id}/sections")
                    .route(web::get().to(list_sections).wrap(view()))
                    .route(web::post().to(create_section).wrap(manage())),
            ),
    )
    .service(
        web::scope("/api/sections")
            .wrap(manage())
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_section))
                    .route(web::delete().to(delete_section)),
            ),
    )
    .service(
        web::scope("/api/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_subjects).wrap(view()))
                    .route(web::post().to(create_subject).wrap(manage())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::put().to(update_subject).wrap(manage()))
                    .route(web::delete().to(delete_subject).wrap(manage())),
            ),
    );
}
