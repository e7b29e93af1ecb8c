use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::permissions::Permission;
use crate::models::students::requests::{
    BulkCreateStudentsRequest, CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::services::StudentService;
use crate::utils::SafeIDI64;

static STUDENT_SERVICE: Lazy<StudentService> = Lazy::new(StudentService::new_lazy);

pub async fn list_students(
    req: HttpRequest,
    query: web::Query<StudentListParams>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.list_students(&req, query.into_inner()).await
}

pub async fn create_student(
    req: HttpRequest,
    student_data: web::Json<CreateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .create_student(&req, student_data.into_inner())
        .await
}

pub async fn bulk_create_students(
    req: HttpRequest,
    bulk_data: web::Json<BulkCreateStudentsRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .bulk_create_students(&req, bulk_data.into_inner())
        .await
}

pub async fn get_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.get_student(&req, student_id.0).await
}

pub async fn update_student(
    req: HttpRequest,
    student_id: SafeIDI64,
    update_data: web::Json<UpdateStudentRequest>,
) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE
        .update_student(&req, student_id.0, update_data.into_inner())
        .await
}

pub async fn delete_student(req: HttpRequest, student_id: SafeIDI64) -> ActixResult<HttpResponse> {
    STUDENT_SERVICE.delete_student(&req, student_id.0).await
}

// 配置路由
pub fn configure_student_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/students")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_students)
                            .wrap(middlewares::RequirePermission::new(Permission::ViewStudents)),
                    )
                    .route(
                        web::post()
                            .to(create_student)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageStudents)),
                    ),
            )
            // 必须在 /{id} 之前注册
            .service(
                web::resource("/bulk").route(
                    web::post()
                        .to(bulk_create_students)
                        .wrap(middlewares::RequirePermission::new(Permission::ManageStudents)),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_student)
                            .wrap(middlewares::RequirePermission::new(Permission::ViewStudents)),
                    )
                    .route(
                        web::put()
                            .to(update_student)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageStudents)),
                    )
                    .route(
                        web::delete()
                            .to(delete_student)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageStudents)),
                    ),
            ),
    );
}
