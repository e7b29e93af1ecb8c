pub mod create;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::leaves::requests::{CreateLeaveRequest, LeaveListParams, UpdateLeaveRequest};

super::define_service!(
    /// 请假申请与审批
    LeaveService
);

impl LeaveService {
    pub async fn list_leaves(
        &self,
        request: &HttpRequest,
        query: LeaveListParams,
    ) -> ActixResult<HttpResponse> {
        list::list_leaves(self, request, query).await
    }

    pub async fn create_leave(
        &self,
        request: &HttpRequest,
        leave_data: CreateLeaveRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_leave(self, request, leave_data).await
    }

    pub async fn update_leave(
        &self,
        request: &HttpRequest,
        leave_id: i64,
        update_data: UpdateLeaveRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_leave(self, request, leave_id, update_data).await
    }
}
