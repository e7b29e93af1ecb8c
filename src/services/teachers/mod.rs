pub mod assignments;
pub mod create;
pub mod delete;
pub mod get;
pub mod leaves;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::leaves::requests::LeaveListParams;
use crate::models::teachers::entities::Teacher;
use crate::models::teachers::requests::{
    CreateTeacherAssignmentRequest, CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest,
};
use crate::models::users::entities::User;
use crate::storage::Storage;

use super::scoped_entity;

super::define_service!(
    /// 教师档案与教学分配
    TeacherService
);

impl TeacherService {
    pub async fn list_teachers(
        &self,
        request: &HttpRequest,
        query: TeacherListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_teachers(self, request, query).await
    }

    pub async fn create_teacher(
        &self,
        request: &HttpRequest,
        teacher_data: CreateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_teacher(self, request, teacher_data).await
    }

    pub async fn get_teacher(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_teacher(self, request, teacher_id).await
    }

    pub async fn update_teacher(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
        update_data: UpdateTeacherRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_teacher(self, request, teacher_id, update_data).await
    }

    pub async fn delete_teacher(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_teacher(self, request, teacher_id).await
    }

    pub async fn list_assignments(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::list_assignments(self, request, teacher_id).await
    }

    pub async fn create_assignment(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
        assignment_data: CreateTeacherAssignmentRequest,
    ) -> ActixResult<HttpResponse> {
        assignments::create_assignment(self, request, teacher_id, assignment_data).await
    }

    pub async fn delete_assignment(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
        assignment_id: i64,
    ) -> ActixResult<HttpResponse> {
        assignments::delete_assignment(self, request, teacher_id, assignment_id).await
    }

    pub async fn list_leaves(
        &self,
        request: &HttpRequest,
        teacher_id: i64,
        query: LeaveListParams,
    ) -> ActixResult<HttpResponse> {
        leaves::list_teacher_leaves(self, request, teacher_id, query).await
    }
}

pub(crate) async fn load_teacher(
    storage: &Arc<dyn Storage>,
    actor: &User,
    teacher_id: i64,
) -> Result<Teacher, HttpResponse> {
    scoped_entity(
        actor,
        storage.get_teacher_by_id(teacher_id).await,
        |t: &Teacher| t.school_id,
        ErrorCode::TeacherNotFound,
        "Teacher",
    )
}
