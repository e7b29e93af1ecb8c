#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use schoolhub::config::AppConfig;
use schoolhub::models::users::entities::UserRole;
use schoolhub::storage::Storage;

#[actix_web::test]
async fn super_admin_must_name_the_school() {
    let storage = common::storage().await;
    let school = common::school(&storage, "STU1").await;
    let root = common::super_admin(&storage).await;
    let app = test_app!(storage);

    let student = json!({
        "admission_no": "S-001",
        "first_name": "Li",
        "last_name": "Lei",
    });

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/students")
            .insert_header(common::bearer(&root))
            .set_json(&student)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let mut scoped = student.clone();
    scoped["school_id"] = json!(school.id);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/students")
            .insert_header(common::bearer(&root))
            .set_json(&scoped)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["school_id"], school.id);

    // 同校重复学号
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/students")
            .insert_header(common::bearer(&root))
            .set_json(&scoped)
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn bulk_import_checks_row_count() {
    let storage = common::storage().await;
    let school = common::school(&storage, "STU2").await;
    let admin = common::user(&storage, Some(school.id), "admin", UserRole::SchoolAdmin).await;
    let app = test_app!(storage);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/students/bulk")
            .insert_header(common::bearer(&admin))
            .set_json(json!({ "students": [] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let too_many: Vec<Value> = (0..=AppConfig::get().bulk.max_rows)
        .map(|i| json!({ "admission_no": format!("B-{i:05}"), "first_name": "Li", "last_name": "Lei" }))
        .collect();
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/students/bulk")
            .insert_header(common::bearer(&admin))
            .set_json(json!({ "students": too_many }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        storage
            .find_existing_admission_nos(school.id, &["B-00000".to_string()])
            .await
            .unwrap()
            .len(),
        0
    );

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/students/bulk")
            .insert_header(common::bearer(&admin))
            .set_json(json!({
                "students": [
                    { "admission_no": "B-1", "first_name": "Li", "last_name": "Lei" },
                    { "admission_no": "B-1", "first_name": "Han", "last_name": "Meimei" },
                    { "admission_no": "B-2", "first_name": "Wang" },
                    { "admission_no": "B-3", "first_name": "Zhang", "last_name": "San" },
                ],
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["total"], 4);
    assert_eq!(body["data"]["created"], 2);
    assert_eq!(body["data"]["failed"], 2);
}
