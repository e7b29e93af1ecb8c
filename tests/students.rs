mod common;

use schoolhub::errors::SchoolHubError;
use schoolhub::models::students::{entities::StudentStatus, requests::StudentListQuery};
use schoolhub::models::users::entities::UserRole;
use schoolhub::storage::Storage;

#[tokio::test]
async fn bulk_create_reports_existing_admission_numbers() {
    let storage = common::storage().await;
    let school = common::school(&storage, "BULK").await;
    common::student(&storage, school.id, "A-001").await;

    let wanted = vec!["A-001".to_string(), "A-002".to_string(), "A-003".to_string()];
    let existing = storage
        .find_existing_admission_nos(school.id, &wanted)
        .await
        .unwrap();
    assert_eq!(existing, vec!["A-001".to_string()]);

    let fresh = wanted
        .iter()
        .filter(|no| !existing.contains(no))
        .map(|no| common::new_student(school.id, no))
        .collect();
    assert_eq!(storage.bulk_create_students(fresh).await.unwrap(), 2);
    assert_eq!(storage.bulk_create_students(Vec::new()).await.unwrap(), 0);

    let list = storage
        .list_students_with_pagination(StudentListQuery {
            page: 1,
            size: 50,
            school_id: school.id,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.pagination.total, 3);
}

#[tokio::test]
async fn admission_numbers_are_unique_per_school() {
    let storage = common::storage().await;
    let first = common::school(&storage, "ONE").await;
    let second = common::school(&storage, "TWO").await;
    common::student(&storage, first.id, "S-1").await;

    // 不同学校可以复用学号
    common::student(&storage, second.id, "S-1").await;

    let err = storage
        .create_student(common::new_student(first.id, "S-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, SchoolHubError::Conflict(_)));

    let none = storage
        .find_existing_admission_nos(second.id, &["S-2".to_string()])
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn guardian_and_class_filters() {
    let storage = common::storage().await;
    let school = common::school(&storage, "FAM").await;
    let guardian = common::user(&storage, Some(school.id), "parent", UserRole::Guardian).await;

    let mut child = common::new_student(school.id, "C-1");
    child.guardian_id = Some(guardian.id);
    let child = storage.create_student(child).await.unwrap();
    let other = common::student(&storage, school.id, "C-2").await;

    let mine = storage
        .list_students_with_pagination(StudentListQuery {
            page: 1,
            size: 10,
            school_id: school.id,
            guardian_id: Some(guardian.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(mine.items.len(), 1);
    assert_eq!(mine.items[0].id, child.id);

    let class = common::class(&storage, school.id, "7A").await;
    common::enroll(&storage, school.id, other.id, class.id).await;
    let roster = storage
        .list_students_with_pagination(StudentListQuery {
            page: 1,
            size: 10,
            school_id: school.id,
            class_id: Some(class.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(roster.items.len(), 1);
    assert_eq!(roster.items[0].id, other.id);
}

#[tokio::test]
async fn soft_deleted_student_leaves_listing() {
    let storage = common::storage().await;
    let school = common::school(&storage, "DEL").await;
    let student = common::student(&storage, school.id, "D-1").await;
    assert_eq!(student.status, StudentStatus::Active);

    assert!(storage.soft_delete_student(student.id).await.unwrap());
    assert!(storage.get_student_by_id(student.id).await.unwrap().is_none());

    let list = storage
        .list_students_with_pagination(StudentListQuery {
            page: 1,
            size: 10,
            school_id: school.id,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(list.pagination.total, 0);
}
