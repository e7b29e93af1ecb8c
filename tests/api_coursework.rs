#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::{Value, json};

use schoolhub::models::{
    students::requests::NewStudent,
    teachers::requests::CreateTeacherRequest,
    users::entities::{User, UserRole},
};
use schoolhub::storage::Storage;

fn teacher_record(school_id: i64, user_id: Option<i64>, employee_no: &str) -> CreateTeacherRequest {
    CreateTeacherRequest {
        school_id: Some(school_id),
        user_id,
        employee_no: employee_no.to_string(),
        first_name: "Zhang".to_string(),
        last_name: employee_no.to_string(),
        email: None,
        phone: None,
        qualification: None,
        hired_on: None,
    }
}

fn leave_for(target: &str, id: i64) -> Value {
    json!({
        target: id,
        "leave_type": "sick",
        "start_date": "2026-11-02",
        "end_date": "2026-11-03",
    })
}

#[actix_web::test]
async fn leave_can_only_be_filed_for_self_or_own_child() {
    let storage = common::storage().await;
    let school = common::school(&storage, "LV1").await;
    let admin = common::user(&storage, Some(school.id), "admin", UserRole::SchoolAdmin).await;
    let teacher_user = common::user(&storage, Some(school.id), "teacher", UserRole::Teacher).await;
    let pupil = common::user(&storage, Some(school.id), "pupil", UserRole::Student).await;
    let parent = common::user(&storage, Some(school.id), "parent", UserRole::Guardian).await;

    let own_teacher = storage
        .create_teacher(school.id, teacher_record(school.id, Some(teacher_user.id), "T-1"))
        .await
        .unwrap();
    let other_teacher = storage
        .create_teacher(school.id, teacher_record(school.id, None, "T-2"))
        .await
        .unwrap();
    let pupil_record = storage
        .create_student(NewStudent {
            user_id: Some(pupil.id),
            ..common::new_student(school.id, "S-001")
        })
        .await
        .unwrap();
    let child = storage
        .create_student(NewStudent {
            guardian_id: Some(parent.id),
            ..common::new_student(school.id, "S-002")
        })
        .await
        .unwrap();
    let app = test_app!(storage);

    let cases: [(&User, Value, StatusCode); 8] = [
        (&pupil, leave_for("student_id", pupil_record.id), StatusCode::CREATED),
        (&pupil, leave_for("student_id", child.id), StatusCode::FORBIDDEN),
        (&parent, leave_for("student_id", child.id), StatusCode::CREATED),
        (&parent, leave_for("student_id", pupil_record.id), StatusCode::FORBIDDEN),
        (&teacher_user, leave_for("teacher_id", own_teacher.id), StatusCode::CREATED),
        (&teacher_user, leave_for("teacher_id", other_teacher.id), StatusCode::FORBIDDEN),
        // 审批人可以代为申请
        (&admin, leave_for("teacher_id", other_teacher.id), StatusCode::CREATED),
        (
            &admin,
            json!({
                "teacher_id": own_teacher.id,
                "student_id": child.id,
                "leave_type": "sick",
                "start_date": "2026-11-02",
                "end_date": "2026-11-03",
            }),
            StatusCode::BAD_REQUEST,
        ),
    ];

    for (actor, body, expected) in cases {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/leaves")
                .insert_header(common::bearer(actor))
                .set_json(&body)
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), expected, "{} filing {body}", actor.username);
    }

    // 结束日期早于开始日期
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/leaves")
            .insert_header(common::bearer(&pupil))
            .set_json(json!({
                "student_id": pupil_record.id,
                "leave_type": "sick",
                "start_date": "2026-11-03",
                "end_date": "2026-11-02",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn assignment_lifecycle_through_the_api() {
    let storage = common::storage().await;
    let school = common::school(&storage, "AS1").await;
    let teacher = common::user(&storage, Some(school.id), "teacher", UserRole::Teacher).await;
    let pupil = common::user(&storage, Some(school.id), "pupil", UserRole::Student).await;
    let class = common::class(&storage, school.id, "7A").await;
    let pupil_record = storage
        .create_student(NewStudent {
            user_id: Some(pupil.id),
            ..common::new_student(school.id, "S-001")
        })
        .await
        .unwrap();
    common::enroll(&storage, school.id, pupil_record.id, class.id).await;
    let app = test_app!(storage);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/assignments")
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "class_id": class.id, "title": "Essay", "max_score": 10.0 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "draft");
    let assignment_id = body["data"]["id"].as_i64().unwrap();
    let assignment_uri = format!("/api/assignments/{assignment_id}");
    let submit_uri = format!("/api/assignments/{assignment_id}/submissions");

    // 学生看不到草稿
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/assignments")
            .insert_header(common::bearer(&pupil))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["pagination"]["total"], 0);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&assignment_uri)
            .insert_header(common::bearer(&pupil))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&assignment_uri)
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "status": "published" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/assignments")
            .insert_header(common::bearer(&pupil))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&submit_uri)
            .insert_header(common::bearer(&pupil))
            .set_json(json!({ "content": "My essay" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let grade_uri = format!("/api/submissions/{}/grade", body["data"]["id"]);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&grade_uri)
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "score": 10.5 }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&grade_uri)
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "score": 9.5, "feedback": "Good" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["score"], 9.5);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&assignment_uri)
            .insert_header(common::bearer(&teacher))
            .set_json(json!({ "status": "closed" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 关闭后不再接收提交
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&submit_uri)
            .insert_header(common::bearer(&pupil))
            .set_json(json!({ "content": "Late edit" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}
