pub mod bulk;
pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::students::entities::Student;
use crate::models::students::requests::{
    BulkCreateStudentsRequest, CreateStudentRequest, StudentListParams, UpdateStudentRequest,
};
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;

use super::{bad_request, forbidden, scoped_entity, storage_error};

super::define_service!(
    /// 学生档案管理
    StudentService
);

impl StudentService {
    pub async fn list_students(
        &self,
        request: &HttpRequest,
        query: StudentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_students(self, request, query).await
    }

    pub async fn create_student(
        &self,
        request: &HttpRequest,
        student_data: CreateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_student(self, request, student_data).await
    }

    pub async fn bulk_create_students(
        &self,
        request: &HttpRequest,
        bulk_data: BulkCreateStudentsRequest,
    ) -> ActixResult<HttpResponse> {
        bulk::bulk_create_students(self, request, bulk_data).await
    }

    pub async fn get_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_student(self, request, student_id).await
    }

    pub async fn update_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
        update_data: UpdateStudentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student(self, request, student_id, update_data).await
    }

    pub async fn delete_student(
        &self,
        request: &HttpRequest,
        student_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_student(self, request, student_id).await
    }
}

/// 读取学生；家长只能访问自己的孩子
pub(crate) async fn load_visible_student(
    storage: &Arc<dyn Storage>,
    actor: &User,
    student_id: i64,
) -> Result<Student, HttpResponse> {
    let student = scoped_entity(
        actor,
        storage.get_student_by_id(student_id).await,
        |s: &Student| s.school_id,
        ErrorCode::StudentNotFound,
        "Student",
    )?;
    if !actor.is_super_admin
        && actor.role == UserRole::Guardian
        && student.guardian_id != Some(actor.id)
    {
        return Err(forbidden("You can only view your own children"));
    }
    Ok(student)
}

/// 关联账号必须存在、属于同一学校且角色匹配
pub(crate) async fn check_linked_user(
    storage: &Arc<dyn Storage>,
    school_id: i64,
    user_id: i64,
    role: UserRole,
    field: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) if user.school_id == Some(school_id) && user.role == role => Ok(()),
        Ok(_) => Err(bad_request(
            ErrorCode::BadRequest,
            format!("{field} must reference a {role} account of the same school"),
        )),
        Err(e) => Err(storage_error("Failed to check linked user", e)),
    }
}
