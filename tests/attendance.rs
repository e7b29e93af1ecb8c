mod common;

use chrono::NaiveDate;
use schoolhub::models::attendance::{
    entities::AttendanceStatus,
    requests::{AttendanceEntry, NewAttendanceSession},
};
use schoolhub::models::users::entities::UserRole;
use schoolhub::storage::Storage;

fn session_key(school_id: i64, class_id: i64, day: NaiveDate) -> NewAttendanceSession {
    NewAttendanceSession {
        school_id,
        class_id,
        section_id: None,
        subject_id: None,
        session_date: day,
        taken_by: None,
        notes: None,
    }
}

#[tokio::test]
async fn session_is_found_by_natural_key() {
    let storage = common::storage().await;
    let school = common::school(&storage, "ATT").await;
    let class = common::class(&storage, school.id, "8B").await;
    let day = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();

    let key = session_key(school.id, class.id, day);
    assert!(storage.find_attendance_session(&key).await.unwrap().is_none());

    let created = storage.create_attendance_session(key.clone()).await.unwrap();
    assert_eq!(created.session_date, day);
    assert!(!created.is_locked);

    let found = storage.find_attendance_session(&key).await.unwrap().unwrap();
    assert_eq!(found.id, created.id);

    let next_day = session_key(school.id, class.id, day.succ_opt().unwrap());
    assert!(storage.find_attendance_session(&next_day).await.unwrap().is_none());
}

#[tokio::test]
async fn marking_twice_updates_the_record() {
    let storage = common::storage().await;
    let school = common::school(&storage, "MARK").await;
    let teacher = common::user(&storage, Some(school.id), "t1", UserRole::Teacher).await;
    let class = common::class(&storage, school.id, "9C").await;
    let student = common::student(&storage, school.id, "M-1").await;
    common::enroll(&storage, school.id, student.id, class.id).await;

    let day = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();
    let session = storage
        .create_attendance_session(session_key(school.id, class.id, day))
        .await
        .unwrap();

    let first = storage
        .upsert_attendance_record(
            session.id,
            AttendanceEntry {
                student_id: student.id,
                status: AttendanceStatus::Absent,
                remarks: None,
            },
            teacher.id,
        )
        .await
        .unwrap();
    let second = storage
        .upsert_attendance_record(
            session.id,
            AttendanceEntry {
                student_id: student.id,
                status: AttendanceStatus::Late,
                remarks: Some("bus".to_string()),
            },
            teacher.id,
        )
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.status, AttendanceStatus::Late);

    let records = storage.list_session_records(session.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].remarks.as_deref(), Some("bus"));

    let stats = storage.dashboard_stats(school.id, day).await.unwrap();
    assert_eq!(stats.today_sessions, 1);
    assert_eq!(stats.today_attendance.late, 1);
    assert_eq!(stats.active_students, 1);
}

#[tokio::test]
async fn lock_and_unlock_session() {
    let storage = common::storage().await;
    let school = common::school(&storage, "LOCK").await;
    let admin = common::user(&storage, Some(school.id), "a1", UserRole::SchoolAdmin).await;
    let class = common::class(&storage, school.id, "10A").await;
    let day = NaiveDate::from_ymd_opt(2025, 9, 3).unwrap();
    let session = storage
        .create_attendance_session(session_key(school.id, class.id, day))
        .await
        .unwrap();

    let locked = storage
        .set_attendance_session_lock(session.id, true, admin.id)
        .await
        .unwrap()
        .unwrap();
    assert!(locked.is_locked);
    assert_eq!(locked.locked_by, Some(admin.id));
    assert!(locked.locked_at.is_some());

    let unlocked = storage
        .set_attendance_session_lock(session.id, false, admin.id)
        .await
        .unwrap()
        .unwrap();
    assert!(!unlocked.is_locked);
    assert!(unlocked.locked_by.is_none());

    assert!(
        storage
            .set_attendance_session_lock(session.id + 100, true, admin.id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn roster_only_holds_active_enrollments() {
    let storage = common::storage().await;
    let school = common::school(&storage, "ROS").await;
    let class = common::class(&storage, school.id, "11A").await;
    let stays = common::student(&storage, school.id, "R-1").await;
    let leaves = common::student(&storage, school.id, "R-2").await;
    common::enroll(&storage, school.id, stays.id, class.id).await;
    let gone = common::enroll(&storage, school.id, leaves.id, class.id).await;

    assert!(storage.withdraw_enrollment(gone.id).await.unwrap());
    // 重复退课不再生效
    assert!(!storage.withdraw_enrollment(gone.id).await.unwrap());

    let roster = storage.active_student_ids_in_class(class.id, None).await.unwrap();
    assert_eq!(roster, vec![stays.id]);
}
