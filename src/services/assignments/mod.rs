pub mod create;
pub mod delete;
pub mod get;
pub mod grades;
pub mod list;
pub mod submissions;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::assignments::entities::{Assignment, AssignmentStatus};
use crate::models::assignments::requests::{
    AssignmentListParams, CreateAssignmentRequest, GradeSubmissionRequest,
    SubmitAssignmentRequest, UpdateAssignmentRequest,
};
use crate::models::permissions::{Permission, has_permission};
use crate::models::users::entities::User;
use crate::storage::Storage;

use super::{not_found, scoped_entity};

super::define_service!(
    /// 作业、提交与评分
    AssignmentService
);

impl AssignmentService {
    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        query: AssignmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, request, query).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        assignment_data: CreateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, request, assignment_data).await
    }

    pub async fn get_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_assignment(self, request, assignment_id).await
    }

    pub async fn update_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        update_data: UpdateAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, request, assignment_id, update_data).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, request, assignment_id).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        submissions::list_submissions(self, request, assignment_id).await
    }

    pub async fn submit(
        &self,
        request: &HttpRequest,
        assignment_id: i64,
        submission_data: SubmitAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        submissions::submit_assignment(self, request, assignment_id, submission_data).await
    }

    pub async fn grade_submission(
        &self,
        request: &HttpRequest,
        submission_id: i64,
        grade_data: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        grades::grade_submission(self, request, submission_id, grade_data).await
    }

    pub async fn get_grade(
        &self,
        request: &HttpRequest,
        submission_id: i64,
    ) -> ActixResult<HttpResponse> {
        grades::get_grade(self, request, submission_id).await
    }
}

/// 读取作业；无管理权限的用户看不到草稿和已归档的作业
pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    assignment_id: i64,
) -> Result<Assignment, HttpResponse> {
    let assignment = scoped_entity(
        actor,
        storage.get_assignment_by_id(assignment_id).await,
        |a: &Assignment| a.school_id,
        ErrorCode::AssignmentNotFound,
        "Assignment",
    )?;
    if !has_permission(actor, Permission::ManageAssignments)
        && !AssignmentStatus::visible_to_students().contains(&assignment.status)
    {
        return Err(not_found(ErrorCode::AssignmentNotFound, "Assignment not found"));
    }
    Ok(assignment)
}

pub(crate) fn validate_max_score(max_score: f64) -> Result<(), String> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err("max_score must be a positive number".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_score_must_be_positive() {
        assert!(validate_max_score(100.0).is_ok());
        assert!(validate_max_score(0.5).is_ok());
        assert!(validate_max_score(0.0).is_err());
        assert!(validate_max_score(-10.0).is_err());
        assert!(validate_max_score(f64::NAN).is_err());
    }
}
