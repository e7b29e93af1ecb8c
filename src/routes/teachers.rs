use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::leaves::requests::LeaveListParams;
use crate::models::permissions::Permission;
use crate::models::teachers::requests::{
    CreateTeacherAssignmentRequest, CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest,
};
use crate::services::TeacherService;
use crate::utils::{SafeAssignmentIdI64, SafeIDI64};

static TEACHER_SERVICE: Lazy<TeacherService> = Lazy::new(TeacherService::new_lazy);

pub async fn list_teachers(
    req: HttpRequest,
    query: web::Query<TeacherListParams>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_teachers(&req, query.into_inner()).await
}

pub async fn create_teacher(
    req: HttpRequest,
    teacher_data: web::Json<CreateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_teacher(&req, teacher_data.into_inner())
        .await
}

pub async fn get_teacher(req: HttpRequest, teacher_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.get_teacher(&req, teacher_id.0).await
}

pub async fn update_teacher(
    req: HttpRequest,
    teacher_id: SafeIDI64,
    update_data: web::Json<UpdateTeacherRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .update_teacher(&req, teacher_id.0, update_data.into_inner())
        .await
}

pub async fn delete_teacher(req: HttpRequest, teacher_id: SafeIDI64) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.delete_teacher(&req, teacher_id.0).await
}

pub async fn list_teacher_assignments(
    req: HttpRequest,
    teacher_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE.list_assignments(&req, teacher_id.0).await
}

pub async fn create_teacher_assignment(
    req: HttpRequest,
    teacher_id: SafeIDI64,
    assignment_data: web::Json<CreateTeacherAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .create_assignment(&req, teacher_id.0, assignment_data.into_inner())
        .await
}

pub async fn delete_teacher_assignment(
    req: HttpRequest,
    teacher_id: SafeIDI64,
    assignment_id: SafeAssignmentIdI64,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .delete_assignment(&req, teacher_id.0, assignment_id.0)
        .await
}

pub async fn list_teacher_leaves(
    req: HttpRequest,
    teacher_id: SafeIDI64,
    query: web::Query<LeaveListParams>,
) -> ActixResult<HttpResponse> {
    TEACHER_SERVICE
        .list_leaves(&req, teacher_id.0, query.into_inner())
        .await
}

// 配置路由
pub fn configure_teacher_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/teachers")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_teachers)
                            .wrap(middlewares::RequirePermission::new(Permission::ViewTeachers)),
                    )
                    .route(
                        web::post()
                            .to(create_teacher)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageTeachers)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_teacher)
                            .wrap(middlewares::RequirePermission::new(Permission::ViewTeachers)),
                    )
                    .route(
                        web::put()
                            .to(update_teacher)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageTeachers)),
                    )
                    .route(
                        web::delete()
                            .to(delete_teacher)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageTeachers)),
                    ),
            )
            .service(
                web::resource("/{id}/assignments")
                    .route(
                        web::get()
                            .to(list_teacher_assignments)
                            .wrap(middlewares::RequirePermission::new(Permission::ViewTeachers)),
                    )
                    .route(
                        web::post()
                            .to(create_teacher_assignment)
                            .wrap(middlewares::RequirePermission::new(Permission::ManageTeachers)),
                    ),
            )
            .service(
                web::resource("/{id}/assignments/{assignment_id}").route(
                    web::delete()
                        .to(delete_teacher_assignment)
                        .wrap(middlewares::RequirePermission::new(Permission::ManageTeachers)),
                ),
            )
            // 教师本人或审批人，在服务层细分
            .service(
                web::resource("/{id}/leaves").route(
                    web::get()
                        .to(list_teacher_leaves)
                        .wrap(middlewares::RequirePermission::new(Permission::ViewTeachers)),
                ),
            ),
    );
}
