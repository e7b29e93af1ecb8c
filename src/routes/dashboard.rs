use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::dashboard::DashboardQuery;
use crate::models::permissions::Permission;
use crate::services::DashboardService;

static DASHBOARD_SERVICE: Lazy<DashboardService> = Lazy::new(DashboardService::new_lazy);

pub async fn get_stats(
    req: HttpRequest,
    query: web::Query<DashboardQuery>,
) -> ActixResult<HttpResponse> {
    DASHBOARD_SERVICE.get_stats(&req, query.into_inner()).await
}

pub fn configure_dashboard_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/dashboard")
            .wrap(middlewares::RequirePermission::new(Permission::ViewDashboard))
            .wrap(middlewares::RequireJWT)
            .route("/stats", web::get().to(get_stats)),
    );
}
