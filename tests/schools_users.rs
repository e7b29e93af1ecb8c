mod common;

use schoolhub::errors::SchoolHubError;
use schoolhub::models::schools::requests::{CreateSchoolRequest, SchoolListQuery};
use schoolhub::models::users::entities::UserRole;
use schoolhub::storage::Storage;

#[tokio::test]
async fn duplicate_school_code_is_conflict() {
    let storage = common::storage().await;
    common::school(&storage, "NORTH").await;

    let err = storage
        .create_school(CreateSchoolRequest {
            name: "Another".to_string(),
            code: "NORTH".to_string(),
            address: None,
            contact_email: None,
            phone: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, SchoolHubError::Conflict(_)));
}

#[tokio::test]
async fn soft_deleted_school_is_hidden() {
    let storage = common::storage().await;
    let north = common::school(&storage, "NORTH").await;
    common::school(&storage, "SOUTH").await;

    assert!(storage.soft_delete_school(north.id).await.unwrap());
    assert!(!storage.soft_delete_school(north.id).await.unwrap());
    assert!(storage.get_school_by_id(north.id).await.unwrap().is_none());

    // 代码仍被占用
    let by_code = storage.get_school_by_code("NORTH").await.unwrap().unwrap();
    assert!(by_code.deleted_at.is_some());

    let list = storage
        .list_schools_with_pagination(SchoolListQuery {
            page: 1,
            size: 20,
            include_inactive: true,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.pagination.total, 1);
    assert_eq!(list.items[0].code, "SOUTH");
}

#[tokio::test]
async fn users_are_counted_and_unique() {
    let storage = common::storage().await;
    assert_eq!(storage.count_users().await.unwrap(), 0);

    let school = common::school(&storage, "EAST").await;
    let admin = common::user(&storage, Some(school.id), "admin1", UserRole::SchoolAdmin).await;
    common::user(&storage, Some(school.id), "teacher1", UserRole::Teacher).await;
    assert_eq!(storage.count_users().await.unwrap(), 2);

    let found = storage
        .get_user_by_username_or_email("admin1@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, admin.id);
    assert_eq!(found.school_id, Some(school.id));
}
