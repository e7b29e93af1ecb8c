pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::schools::requests::{CreateSchoolRequest, SchoolListParams, UpdateSchoolRequest};

super::define_service!(
    /// 学校（租户）管理，仅超级管理员
    SchoolService
);

impl SchoolService {
    pub async fn list_schools(
        &self,
        request: &HttpRequest,
        query: SchoolListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_schools(self, request, query).await
    }

    pub async fn create_school(
        &self,
        request: &HttpRequest,
        school_data: CreateSchoolRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_school(self, request, school_data).await
    }

    pub async fn get_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        get::get_school(self, request, school_id).await
    }

    pub async fn update_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
        update_data: UpdateSchoolRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_school(self, request, school_id, update_data).await
    }

    pub async fn delete_school(
        &self,
        request: &HttpRequest,
        school_id: i64,
    ) -> ActixResult<HttpResponse> {
        delete::delete_school(self, request, school_id).await
    }
}
