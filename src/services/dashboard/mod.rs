pub mod stats;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::dashboard::DashboardQuery;

super::define_service!(
    /// 学校概览
    DashboardService
);

impl DashboardService {
    pub async fn get_stats(
        &self,
        request: &HttpRequest,
        query: DashboardQuery,
    ) -> ActixResult<HttpResponse> {
        stats::get_stats(self, request, query).await
    }
}
