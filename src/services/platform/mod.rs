pub mod audit_logs;
pub mod feature_flags;
pub mod integrations;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::models::common::PaginationQuery;
use crate::models::platform::audit_logs::AuditLogListParams;
use crate::models::platform::feature_flags::{CreateFeatureFlagRequest, UpdateFeatureFlagRequest};
use crate::models::platform::integrations::{
    CreateIntegrationRequest, IntegrationListParams, UpdateIntegrationRequest,
};

super::define_service!(
    /// 平台管理：功能开关、审计日志与第三方集成
    PlatformService
);

impl PlatformService {
    pub async fn list_feature_flags(
        &self,
        request: &HttpRequest,
        query: PaginationQuery,
    ) -> ActixResult<HttpResponse> {
        feature_flags::list_feature_flags(self, request, query).await
    }

    pub async fn create_feature_flag(
        &self,
        request: &HttpRequest,
        flag_data: CreateFeatureFlagRequest,
    ) -> ActixResult<HttpResponse> {
        feature_flags::create_feature_flag(self, request, flag_data).await
    }

    pub async fn update_feature_flag(
        &self,
        request: &HttpRequest,
        flag_id: i64,
        update_data: UpdateFeatureFlagRequest,
    ) -> ActixResult<HttpResponse> {
        feature_flags::update_feature_flag(self, request, flag_id, update_data).await
    }

    pub async fn delete_feature_flag(
        &self,
        request: &HttpRequest,
        flag_id: i64,
    ) -> ActixResult<HttpResponse> {
        feature_flags::delete_feature_flag(self, request, flag_id).await
    }

    pub async fn evaluate_feature_flag(
        &self,
        request: &HttpRequest,
        key: &str,
    ) -> ActixResult<HttpResponse> {
        feature_flags::evaluate_feature_flag(self, request, key).await
    }

    pub async fn list_audit_logs(
        &self,
        request: &HttpRequest,
        query: AuditLogListParams,
    ) -> ActixResult<HttpResponse> {
        audit_logs::list_audit_logs(self, request, query).await
    }

    pub async fn list_integrations(
        &self,
        request: &HttpRequest,
        query: IntegrationListParams,
    ) -> ActixResult<HttpResponse> {
        integrations::list_integrations(self, request, query).await
    }

    pub async fn create_integration(
        &self,
        request: &HttpRequest,
        integration_data: CreateIntegrationRequest,
    ) -> ActixResult<HttpResponse> {
        integrations::create_integration(self, request, integration_data).await
    }

    pub async fn update_integration(
        &self,
        request: &HttpRequest,
        integration_id: i64,
        update_data: UpdateIntegrationRequest,
    ) -> ActixResult<HttpResponse> {
        integrations::update_integration(self, request, integration_id, update_data).await
    }

    pub async fn delete_integration(
        &self,
        request: &HttpRequest,
        integration_id: i64,
    ) -> ActixResult<HttpResponse> {
        integrations::delete_integration(self, request, integration_id).await
    }
}
