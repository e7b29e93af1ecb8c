pub mod create;
pub mod delete;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::enrollments::entities::Enrollment;
use crate::models::enrollments::requests::{
    CreateEnrollmentRequest, EnrollmentListParams, UpdateEnrollmentRequest,
};
use crate::models::users::entities::User;
use crate::storage::Storage;

use super::scoped_entity;

super::define_service!(
    /// 学生选课（学籍）
    EnrollmentService
);

impl EnrollmentService {
    pub async fn list_enrollments(
        &self,
        request: &HttpRequest,
        query: EnrollmentListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_enrollments(self, request, query).await
    }

    pub async fn create_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_data: CreateEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, request, enrollment_data).await
    }

    pub async fn update_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
        update_data: UpdateEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_enrollment(self, request, enrollment_id, update_data).await
    }

    pub async fn delete_enrollment(
        &self,
        request: &HttpRequest,
        enrollment_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::withdraw_enrollment(self, request, enrollment_id).await
    }
}

pub(crate) async fn load_enrollment(
    storage: &Arc<dyn Storage>,
    actor: &User,
    enrollment_id: i64,
) -> Result<Enrollment, HttpResponse> {
    scoped_entity(
        actor,
        storage.get_enrollment_by_id(enrollment_id).await,
        |e: &Enrollment| e.school_id,
        ErrorCode::EnrollmentNotFound,
        "Enrollment",
    )
}

pub(crate) fn validate_roll_no(roll_no: Option<i32>) -> Result<(), String> {
    match roll_no {
        Some(n) if n < 1 => Err("roll_no must be a positive number".to_string()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roll_no_must_be_positive() {
        assert!(validate_roll_no(None).is_ok());
        assert!(validate_roll_no(Some(1)).is_ok());
        assert!(validate_roll_no(Some(0)).is_err());
        assert!(validate_roll_no(Some(-4)).is_err());
    }
}
