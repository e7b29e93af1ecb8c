mod common;

use chrono::{Duration, Utc};
use schoolhub::models::assignments::{
    entities::{AssignmentStatus, SubmissionStatus},
    requests::{
        AssignmentChanges, CreateAssignmentRequest, GradeSubmissionRequest,
        SubmitAssignmentRequest,
    },
};
use schoolhub::models::users::entities::UserRole;
use schoolhub::storage::Storage;

fn homework(class_id: i64) -> CreateAssignmentRequest {
    CreateAssignmentRequest {
        class_id,
        section_id: None,
        subject_id: None,
        title: "  Fractions  ".to_string(),
        description: None,
        due_at: Some(Utc::now() + Duration::days(3)),
        max_score: 20.0,
    }
}

fn answer(content: &str) -> SubmitAssignmentRequest {
    SubmitAssignmentRequest {
        content: Some(content.to_string()),
        attachment_url: None,
    }
}

#[tokio::test]
async fn assignment_starts_as_draft_and_publishes() {
    let storage = common::storage().await;
    let school = common::school(&storage, "HW").await;
    let teacher = common::user(&storage, Some(school.id), "math", UserRole::Teacher).await;
    let class = common::class(&storage, school.id, "6A").await;

    let assignment = storage
        .create_assignment(school.id, teacher.id, homework(class.id))
        .await
        .unwrap();
    assert_eq!(assignment.status, AssignmentStatus::Draft);
    assert_eq!(assignment.school_id, school.id);
    assert_eq!(assignment.created_by, teacher.id);

    let now = Utc::now();
    let published = storage
        .update_assignment(
            assignment.id,
            AssignmentChanges {
                status: Some(AssignmentStatus::Published),
                published_at: Some(now),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(published.status, AssignmentStatus::Published);
    assert_eq!(
        published.published_at.map(|t| t.timestamp()),
        Some(now.timestamp())
    );

    assert!(
        storage
            .update_assignment(assignment.id + 1, AssignmentChanges::default())
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn resubmission_replaces_content_and_grading_marks_graded() {
    let storage = common::storage().await;
    let school = common::school(&storage, "SUB").await;
    let teacher = common::user(&storage, Some(school.id), "sci", UserRole::Teacher).await;
    let class = common::class(&storage, school.id, "6B").await;
    let student = common::student(&storage, school.id, "H-1").await;
    common::enroll(&storage, school.id, student.id, class.id).await;

    let assignment = storage
        .create_assignment(school.id, teacher.id, homework(class.id))
        .await
        .unwrap();

    let first = storage
        .upsert_submission(
            assignment.id,
            student.id,
            answer("draft answer"),
            SubmissionStatus::Submitted,
        )
        .await
        .unwrap();
    let second = storage
        .upsert_submission(
            assignment.id,
            student.id,
            answer("final answer"),
            SubmissionStatus::Late,
        )
        .await
        .unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(second.status, SubmissionStatus::Late);
    assert_eq!(storage.count_submissions(assignment.id).await.unwrap(), 1);

    let grade = storage
        .grade_submission(
            second.id,
            teacher.id,
            GradeSubmissionRequest {
                score: 18.5,
                feedback: Some("good".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(grade.score, 18.5);

    // 重新评分只更新原记录
    let regraded = storage
        .grade_submission(
            second.id,
            teacher.id,
            GradeSubmissionRequest {
                score: 19.0,
                feedback: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(regraded.id, grade.id);

    let submission = storage.get_submission_by_id(second.id).await.unwrap().unwrap();
    assert_eq!(submission.status, SubmissionStatus::Graded);
    assert_eq!(submission.content.as_deref(), Some("final answer"));

    let listed = storage.list_submissions(assignment.id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].grade.as_ref().map(|g| g.score), Some(19.0));
}

#[tokio::test]
async fn delete_assignment_removes_it() {
    let storage = common::storage().await;
    let school = common::school(&storage, "DRA").await;
    let teacher = common::user(&storage, Some(school.id), "eng", UserRole::Teacher).await;
    let class = common::class(&storage, school.id, "6C").await;

    let assignment = storage
        .create_assignment(school.id, teacher.id, homework(class.id))
        .await
        .unwrap();
    assert_eq!(assignment.title, "Fractions");

    assert!(storage.delete_assignment(assignment.id).await.unwrap());
    assert!(storage.get_assignment_by_id(assignment.id).await.unwrap().is_none());
    assert!(!storage.delete_assignment(assignment.id).await.unwrap());
}
