mod common;

use chrono::NaiveDate;
use schoolhub::models::leaves::{
    entities::{LeaveStatus, LeaveType},
    requests::{CreateLeaveRequest, LeaveListQuery, NewLeave},
};
use schoolhub::models::users::entities::UserRole;
use schoolhub::storage::Storage;

fn sick_day(school_id: i64, requester_id: i64, student_id: i64) -> NewLeave {
    let day = NaiveDate::from_ymd_opt(2025, 10, 8).unwrap();
    NewLeave {
        school_id,
        requester_id,
        request: CreateLeaveRequest {
            teacher_id: None,
            student_id: Some(student_id),
            leave_type: LeaveType::Sick,
            start_date: day,
            end_date: day,
            reason: Some("fever".to_string()),
        },
    }
}

#[tokio::test]
async fn review_only_applies_to_pending_leaves() {
    let storage = common::storage().await;
    let school = common::school(&storage, "LV").await;
    let parent = common::user(&storage, Some(school.id), "parent", UserRole::Guardian).await;
    let admin = common::user(&storage, Some(school.id), "admin", UserRole::SchoolAdmin).await;
    let student = common::student(&storage, school.id, "L-1").await;

    let leave = storage
        .create_leave(sick_day(school.id, parent.id, student.id))
        .await
        .unwrap();
    assert_eq!(leave.status, LeaveStatus::Pending);
    assert_eq!(leave.requester_id, parent.id);

    let approved = storage
        .review_leave(leave.id, LeaveStatus::Approved, admin.id, Some("ok".into()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, LeaveStatus::Approved);
    assert_eq!(approved.reviewed_by, Some(admin.id));
    assert!(approved.reviewed_at.is_some());

    // 已审批的请假不能再次审批
    let again = storage
        .review_leave(leave.id, LeaveStatus::Rejected, admin.id, None)
        .await
        .unwrap();
    assert!(again.is_none());

    let stored = storage.get_leave_by_id(leave.id).await.unwrap().unwrap();
    assert_eq!(stored.status, LeaveStatus::Approved);
}

#[tokio::test]
async fn list_filters_by_requester_and_status() {
    let storage = common::storage().await;
    let school = common::school(&storage, "LVL").await;
    let mom = common::user(&storage, Some(school.id), "mom", UserRole::Guardian).await;
    let dad = common::user(&storage, Some(school.id), "dad", UserRole::Guardian).await;
    let first = common::student(&storage, school.id, "L-2").await;
    let second = common::student(&storage, school.id, "L-3").await;

    storage
        .create_leave(sick_day(school.id, mom.id, first.id))
        .await
        .unwrap();
    let cancelled = storage
        .create_leave(sick_day(school.id, dad.id, second.id))
        .await
        .unwrap();
    storage
        .review_leave(cancelled.id, LeaveStatus::Cancelled, dad.id, None)
        .await
        .unwrap();

    let moms = storage
        .list_leaves_with_pagination(LeaveListQuery {
            page: 1,
            size: 10,
            school_id: school.id,
            requester_id: Some(mom.id),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(moms.items.len(), 1);
    assert_eq!(moms.items[0].student_id, Some(first.id));

    let pending = storage
        .list_leaves_with_pagination(LeaveListQuery {
            page: 1,
            size: 10,
            school_id: school.id,
            status: Some(LeaveStatus::Pending),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(pending.pagination.total, 1);

    let stats = storage
        .dashboard_stats(school.id, NaiveDate::from_ymd_opt(2025, 10, 8).unwrap())
        .await
        .unwrap();
    assert_eq!(stats.pending_leaves, 1);
}
