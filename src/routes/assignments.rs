use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, GradeSubmissionRequest,
    SubmitAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::permissions::Permission;
use crate::services::AssignmentService;
use crate::utils::SafeIDI64;

static ASSIGNMENT_SERVICE: Lazy<AssignmentService> = Lazy::new(AssignmentService::new_lazy);

pub async fn list_assignments(
    req: HttpRequest,
    query: web::Query<AssignmentListParams>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_assignments(&req, query.into_inner())
        .await
}

pub async fn create_assignment(
    req: HttpRequest,
    assignment_data: web::Json<CreateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .create_assignment(&req, assignment_data.into_inner())
        .await
}

pub async fn get_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .get_assignment(&req, assignment_id.0)
        .await
}

pub async fn update_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    update_data: web::Json<UpdateAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .update_assignment(&req, assignment_id.0, update_data.into_inner())
        .await
}

pub async fn delete_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .delete_assignment(&req, assignment_id.0)
        .await
}

pub async fn list_submissions(
    req: HttpRequest,
    assignment_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .list_submissions(&req, assignment_id.0)
        .await
}

pub async fn submit_assignment(
    req: HttpRequest,
    assignment_id: SafeIDI64,
    submission_data: web::Json<SubmitAssignmentRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .submit(&req, assignment_id.0, submission_data.into_inner())
        .await
}

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
    grade_data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE
        .grade_submission(&req, submission_id.0, grade_data.into_inner())
        .await
}

pub async fn get_grade(req: HttpRequest, submission_id: SafeIDI64) -> ActixResult<HttpResponse> {
    ASSIGNMENT_SERVICE.get_grade(&req, submission_id.0).await
}

fn require(permission: Permission) -> middlewares::RequirePermission {
    middlewares::RequirePermission::new(permission)
}

// 作业、提交与评分
pub fn configure_assignment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/assignments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_assignments)
                            .wrap(require(Permission::ViewAssignments)),
                    )
                    .route(
                        web::post()
                            .to(create_assignment)
                            .wrap(require(Permission::ManageAssignments)),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::get()
                            .to(get_assignment)
                            .wrap(require(Permission::ViewAssignments)),
                    )
                    .route(
                        web::put()
                            .to(update_assignment)
                            .wrap(require(Permission::ManageAssignments)),
                    )
                    .route(
                        web::delete()
                            .to(delete_assignment)
                            .wrap(require(Permission::ManageAssignments)),
                    ),
            )
            .service(
                web::resource("/{id}/submissions")
                    .route(
                        web::get()
                            .to(list_submissions)
                            .wrap(require(Permission::ManageAssignments)),
                    )
                    .route(
                        web::post()
                            .to(submit_assignment)
                            .wrap(require(Permission::SubmitAssignments)),
                    ),
            ),
    )
    .service(
        web::scope("/api/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("/{id}/grade")
                    // 学生和家长查看自己的成绩，在服务层校验
                    .route(web::get().to(get_grade))
                    .route(
                        web::post()
                            .to(grade_submission)
                            .wrap(require(Permission::GradeSubmissions)),
                    ),
            ),
    );
}
