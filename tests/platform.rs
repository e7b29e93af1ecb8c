mod common;

use schoolhub::errors::SchoolHubError;
use schoolhub::models::platform::{
    audit_logs::{AuditLogListQuery, NewAuditLog},
    feature_flags::{CreateFeatureFlagRequest, UpdateFeatureFlagRequest},
    integrations::{CreateIntegrationRequest, IntegrationListQuery, UpdateIntegrationRequest},
};
use schoolhub::models::users::entities::UserRole;
use schoolhub::storage::Storage;
use serde_json::json;

fn flag(key: &str) -> CreateFeatureFlagRequest {
    CreateFeatureFlagRequest {
        key: key.to_string(),
        name: "Online fees".to_string(),
        description: None,
        is_enabled: false,
        rollout_percentage: 100,
    }
}

#[tokio::test]
async fn feature_flag_lifecycle() {
    let storage = common::storage().await;

    let created = storage.create_feature_flag(flag("fees.online")).await.unwrap();
    assert!(!created.is_enabled_for(Some(1)));

    let err = storage
        .create_feature_flag(flag("fees.online"))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Conflict(_)));

    let updated = storage
        .update_feature_flag(
            created.id,
            UpdateFeatureFlagRequest {
                name: None,
                description: None,
                is_enabled: Some(true),
                rollout_percentage: None,
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(updated.is_enabled_for(Some(1)));
    assert!(updated.is_enabled_for(None));

    let by_key = storage
        .get_feature_flag_by_key("fees.online")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_key.id, created.id);
    assert_eq!(storage.list_all_feature_flags().await.unwrap().len(), 1);

    assert!(storage.delete_feature_flag(created.id).await.unwrap());
    assert!(
        storage
            .get_feature_flag_by_key("fees.online")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn audit_logs_filter_by_school_and_action() {
    let storage = common::storage().await;
    let school = common::school(&storage, "AUD").await;
    let admin = common::user(&storage, Some(school.id), "auditor", UserRole::SchoolAdmin).await;

    for action in ["student.create", "student.create", "leave.approve"] {
        storage
            .create_audit_log(NewAuditLog {
                school_id: Some(school.id),
                actor_id: Some(admin.id),
                action: action.to_string(),
                entity_type: action.split('.').next().unwrap_or_default().to_string(),
                entity_id: Some(1),
                details: Some(json!({"source": "test"})),
                ip_address: Some("127.0.0.1".to_string()),
            })
            .await
            .unwrap();
    }
    storage
        .create_audit_log(NewAuditLog {
            action: "school.create".to_string(),
            entity_type: "school".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let created = storage
        .list_audit_logs_with_pagination(AuditLogListQuery {
            page: 1,
            size: 10,
            school_id: Some(school.id),
            action: Some("student.create".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(created.pagination.total, 2);
    assert_eq!(
        created.items[0].details.as_ref().and_then(|d| d.get("source")),
        Some(&json!("test"))
    );

    let all = storage
        .list_audit_logs_with_pagination(AuditLogListQuery {
            page: 1,
            size: 10,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(all.pagination.total, 4);
}

#[tokio::test]
async fn integrations_store_config_as_json() {
    let storage = common::storage().await;
    let school = common::school(&storage, "INT").await;

    let integration = storage
        .create_integration(CreateIntegrationRequest {
            school_id: school.id,
            provider: "sms".to_string(),
            name: "Campus SMS".to_string(),
            is_enabled: true,
            config: json!({"sender": "SCHOOL"}),
        })
        .await
        .unwrap();
    assert_eq!(integration.config["sender"], json!("SCHOOL"));

    let updated = storage
        .update_integration(
            integration.id,
            UpdateIntegrationRequest {
                provider: None,
                name: None,
                is_enabled: Some(false),
                config: Some(json!({"sender": "NEW"})),
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert!(!updated.is_enabled);
    assert_eq!(updated.config["sender"], json!("NEW"));

    let listed = storage
        .list_integrations_with_pagination(IntegrationListQuery {
            page: 1,
            size: 10,
            school_id: Some(school.id),
        })
        .await
        .unwrap();
    assert_eq!(listed.items.len(), 1);

    assert!(storage.delete_integration(integration.id).await.unwrap());
    assert!(storage.get_integration_by_id(integration.id).await.unwrap().is_none());
}
