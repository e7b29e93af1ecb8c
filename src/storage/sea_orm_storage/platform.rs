//! 平台级数据：功能开关、审计日志、第三方集成

use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::audit_logs::{
    ActiveModel as AuditLogActiveModel, Column as AuditLogColumn, Entity as AuditLogs,
};
use crate::entity::feature_flags::{
    ActiveModel as FeatureFlagActiveModel, Column as FeatureFlagColumn, Entity as FeatureFlags,
};
use crate::entity::integrations::{
    ActiveModel as IntegrationActiveModel, Column as IntegrationColumn, Entity as Integrations,
};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    platform::{
        audit_logs::{AuditLog, AuditLogListQuery, AuditLogListResponse, NewAuditLog},
        feature_flags::{
            CreateFeatureFlagRequest, FeatureFlag, FeatureFlagListResponse,
            UpdateFeatureFlagRequest,
        },
        integrations::{
            CreateIntegrationRequest, Integration, IntegrationListQuery, IntegrationListResponse,
            UpdateIntegrationRequest,
        },
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    // 功能开关

    pub async fn create_feature_flag_impl(
        &self,
        req: CreateFeatureFlagRequest,
    ) -> Result<FeatureFlag> {
        let now = chrono::Utc::now().timestamp();

        let model = FeatureFlagActiveModel {
            flag_key: Set(req.key.trim().to_string()),
            name: Set(req.name.trim().to_string()),
            description: Set(req.description),
            is_enabled: Set(req.is_enabled),
            rollout_percentage: Set(req.rollout_percentage),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建功能开关失败"))?;

        Ok(result.into_feature_flag())
    }

    pub async fn get_feature_flag_by_id_impl(&self, id: i64) -> Result<Option<FeatureFlag>> {
        let result = FeatureFlags::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询功能开关失败"))?;

        Ok(result.map(|m| m.into_feature_flag()))
    }

    pub async fn get_feature_flag_by_key_impl(&self, key: &str) -> Result<Option<FeatureFlag>> {
        let result = FeatureFlags::find()
            .filter(FeatureFlagColumn::FlagKey.eq(key))
            .one(&self.db)
            .await
            .map_err(db_error("查询功能开关失败"))?;

        Ok(result.map(|m| m.into_feature_flag()))
    }

    pub async fn list_feature_flags_with_pagination_impl(
        &self,
        page: u64,
        size: u64,
    ) -> Result<FeatureFlagListResponse> {
        let (page, size) = page_params(page, size);

        let paginator = FeatureFlags::find()
            .order_by_asc(FeatureFlagColumn::FlagKey)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询功能开关总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询功能开关页数失败"))?;
        let flags = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询功能开关列表失败"))?;

        Ok(FeatureFlagListResponse {
            items: flags.into_iter().map(|m| m.into_feature_flag()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 全部功能开关（供缓存整表）
    pub async fn list_all_feature_flags_impl(&self) -> Result<Vec<FeatureFlag>> {
        let result = FeatureFlags::find()
            .order_by_asc(FeatureFlagColumn::FlagKey)
            .all(&self.db)
            .await
            .map_err(db_error("查询功能开关列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_feature_flag()).collect())
    }

    pub async fn update_feature_flag_impl(
        &self,
        id: i64,
        update: UpdateFeatureFlagRequest,
    ) -> Result<Option<FeatureFlag>> {
        if self.get_feature_flag_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = FeatureFlagActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(is_enabled) = update.is_enabled {
            model.is_enabled = Set(is_enabled);
        }
        if let Some(rollout_percentage) = update.rollout_percentage {
            model.rollout_percentage = Set(rollout_percentage);
        }

        model
            .update(&self.db)
            .await
            .map_err(db_error("更新功能开关失败"))?;

        self.get_feature_flag_by_id_impl(id).await
    }

    pub async fn delete_feature_flag_impl(&self, id: i64) -> Result<bool> {
        let result = FeatureFlags::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除功能开关失败"))?;

        Ok(result.rows_affected > 0)
    }

    // 审计日志

    pub async fn create_audit_log_impl(&self, entry: NewAuditLog) -> Result<AuditLog> {
        let model = AuditLogActiveModel {
            school_id: Set(entry.school_id),
            actor_id: Set(entry.actor_id),
            action: Set(entry.action),
            entity_type: Set(entry.entity_type),
            entity_id: Set(entry.entity_id),
            details: Set(entry.details.map(|d| d.to_string())),
            ip_address: Set(entry.ip_address),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("写入审计日志失败"))?;

        Ok(result.into_audit_log())
    }

    pub async fn list_audit_logs_with_pagination_impl(
        &self,
        query: AuditLogListQuery,
    ) -> Result<AuditLogListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = AuditLogs::find();

        if let Some(school_id) = query.school_id {
            select = select.filter(AuditLogColumn::SchoolId.eq(school_id));
        }
        if let Some(actor_id) = query.actor_id {
            select = select.filter(AuditLogColumn::ActorId.eq(actor_id));
        }
        if let Some(ref action) = query.action {
            select = select.filter(AuditLogColumn::Action.eq(action.as_str()));
        }
        if let Some(ref entity_type) = query.entity_type {
            select = select.filter(AuditLogColumn::EntityType.eq(entity_type.as_str()));
        }

        let paginator = select
            .order_by_desc(AuditLogColumn::CreatedAt)
            .order_by_desc(AuditLogColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询审计日志总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询审计日志页数失败"))?;
        let logs = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询审计日志列表失败"))?;

        Ok(AuditLogListResponse {
            items: logs.into_iter().map(|m| m.into_audit_log()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    // 第三方集成

    pub async fn create_integration_impl(
        &self,
        req: CreateIntegrationRequest,
    ) -> Result<Integration> {
        let now = chrono::Utc::now().timestamp();

        let model = IntegrationActiveModel {
            school_id: Set(req.school_id),
            provider: Set(req.provider.trim().to_string()),
            name: Set(req.name.trim().to_string()),
            is_enabled: Set(req.is_enabled),
            config: Set(req.config.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建集成失败"))?;

        Ok(result.into_integration())
    }

    pub async fn get_integration_by_id_impl(&self, id: i64) -> Result<Option<Integration>> {
        let result = Integrations::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询集成失败"))?;

        Ok(result.map(|m| m.into_integration()))
    }

    pub async fn list_integrations_with_pagination_impl(
        &self,
        query: IntegrationListQuery,
    ) -> Result<IntegrationListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Integrations::find();
        if let Some(school_id) = query.school_id {
            select = select.filter(IntegrationColumn::SchoolId.eq(school_id));
        }

        let paginator = select
            .order_by_asc(IntegrationColumn::SchoolId)
            .order_by_asc(IntegrationColumn::Provider)
            .order_by_asc(IntegrationColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询集成总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询集成页数失败"))?;
        let integrations = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询集成列表失败"))?;

        Ok(IntegrationListResponse {
            items: integrations
                .into_iter()
                .map(|m| m.into_integration())
                .collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_integration_impl(
        &self,
        id: i64,
        update: UpdateIntegrationRequest,
    ) -> Result<Option<Integration>> {
        if self.get_integration_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = IntegrationActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(provider) = update.provider {
            model.provider = Set(provider.trim().to_string());
        }
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(is_enabled) = update.is_enabled {
            model.is_enabled = Set(is_enabled);
        }
        if let Some(config) = update.config {
            model.config = Set(config.to_string());
        }

        model.update(&self.db).await.map_err(db_error("更新集成失败"))?;

        self.get_integration_by_id_impl(id).await
    }

    pub async fn delete_integration_impl(&self, id: i64) -> Result<bool> {
        let result = Integrations::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除集成失败"))?;

        Ok(result.rows_affected > 0)
    }
}
