//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod academics;
mod assignments;
mod attendance;
mod dashboard;
mod enrollments;
mod leaves;
mod platform;
mod schools;
mod students;
mod teachers;
mod users;

use crate::config::AppConfig;
use crate::errors::{Result, SchoolHubError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr, SqlErr};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

/// 将 DbErr 映射为带上下文的业务错误
///
/// 连接层面的错误保持为 DatabaseConnection（可重试），唯一约束冲突映射为 Conflict。
pub(crate) fn db_error(context: &'static str) -> impl FnOnce(DbErr) -> SchoolHubError {
    move |err| {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return SchoolHubError::conflict(format!("{context}: {detail}"));
        }
        match SchoolHubError::from(err) {
            SchoolHubError::DatabaseConnection(msg) => {
                SchoolHubError::database_connection(format!("{context}: {msg}"))
            }
            other => SchoolHubError::database_operation(format!("{context}: {}", other.message())),
        }
    }
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例并运行迁移
    pub async fn new_async() -> Result<Self> {
        let config = AppConfig::get();
        Self::connect_with_url(&config.database.url, config.database.pool_size).await
    }

    /// 使用指定 URL 和连接池大小创建存储实例并运行迁移
    pub async fn connect_with_url(url: &str, pool_size: u32) -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(url)?;
        let pool_size = pool_size.max(1);

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, pool_size, config.database.timeout).await?
        } else {
            Self::connect_generic(&db_url, pool_size, config.database.timeout).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = url.contains(":memory:");
        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| SchoolHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5))
            .pragma("temp_store", "memory");

        // 内存数据库每个连接都是独立的库，只能使用单连接
        let pool_size = if in_memory {
            1
        } else {
            opt = opt
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("wal_autocheckpoint", "1000");
            pool_size
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(if in_memory {
                None
            } else {
                Some(Duration::from_secs(300))
            })
            .max_lifetime(if in_memory {
                None
            } else {
                Some(Duration::from_secs(1800))
            })
            .connect_with(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, pool_size: u32, timeout: u64) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(pool_size)
            .min_connections(pool_size.min(5))
            .connect_timeout(Duration::from_secs(timeout))
            .acquire_timeout(Duration::from_secs(timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| SchoolHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(SchoolHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 数据库连通性检查
    pub async fn ping_impl(&self) -> Result<()> {
        self.db.ping().await.map_err(db_error("数据库连通性检查失败"))
    }
}

/// 计算分页参数：页码从 1 开始，每页 1..=100
pub(crate) fn page_params(page: u64, size: u64) -> (u64, u64) {
    (page.max(1), size.clamp(1, 100))
}

// Storage trait 实现

use crate::models::{
    assignments::{
        entities::{Assignment, Grade, Submission, SubmissionStatus},
        requests::{
            AssignmentChanges, AssignmentListQuery, CreateAssignmentRequest,
            GradeSubmissionRequest, SubmitAssignmentRequest,
        },
        responses::{AssignmentListResponse, SubmissionWithGrade},
    },
    attendance::{
        entities::{AttendanceRecord, AttendanceSession},
        requests::{AttendanceEntry, NewAttendanceSession, RecordListQuery, SessionListQuery},
        responses::{RecordListResponse, SessionListResponse},
    },
    classes::{
        entities::{Class, Section, Subject},
        requests::{
            ClassListQuery, CreateClassRequest, CreateSectionRequest, CreateSubjectRequest,
            SubjectListQuery, UpdateClassRequest, UpdateSectionRequest, UpdateSubjectRequest,
        },
        responses::{ClassListResponse, SubjectListResponse},
    },
    dashboard::DashboardStats,
    enrollments::{
        entities::Enrollment,
        requests::{CreateEnrollmentRequest, EnrollmentListQuery, UpdateEnrollmentRequest},
        responses::EnrollmentListResponse,
    },
    leaves::{
        entities::{Leave, LeaveStatus},
        requests::{LeaveListQuery, NewLeave},
        responses::LeaveListResponse,
    },
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
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
        responses::SchoolListResponse,
    },
    students::{
        entities::Student,
        requests::{NewStudent, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
    teachers::{
        entities::{Teacher, TeacherAssignment},
        requests::{
            CreateTeacherAssignmentRequest, CreateTeacherRequest, TeacherListQuery,
            UpdateTeacherRequest,
        },
        responses::TeacherListResponse,
    },
    users::{
        entities::User,
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};
use chrono::NaiveDate;
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn deactivate_user(&self, id: i64) -> Result<bool> {
        self.deactivate_user_impl(id).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 学校模块
    async fn create_school(&self, req: CreateSchoolRequest) -> Result<School> {
        self.create_school_impl(req).await
    }

    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>> {
        self.get_school_by_id_impl(id).await
    }

    async fn get_school_by_code(&self, code: &str) -> Result<Option<School>> {
        self.get_school_by_code_impl(code).await
    }

    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse> {
        self.list_schools_with_pagination_impl(query).await
    }

    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>> {
        self.update_school_impl(id, update).await
    }

    async fn soft_delete_school(&self, id: i64) -> Result<bool> {
        self.soft_delete_school_impl(id).await
    }

    // 学生模块
    async fn create_student(&self, student: NewStudent) -> Result<Student> {
        self.create_student_impl(student).await
    }

    async fn bulk_create_students(&self, students: Vec<NewStudent>) -> Result<usize> {
        self.bulk_create_students_impl(students).await
    }

    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>> {
        self.get_student_by_id_impl(id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn get_student_by_admission_no(
        &self,
        school_id: i64,
        admission_no: &str,
    ) -> Result<Option<Student>> {
        self.get_student_by_admission_no_impl(school_id, admission_no).await
    }

    async fn find_existing_admission_nos(
        &self,
        school_id: i64,
        admission_nos: &[String],
    ) -> Result<Vec<String>> {
        self.find_existing_admission_nos_impl(school_id, admission_nos).await
    }

    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        self.list_students_with_pagination_impl(query).await
    }

    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(id, update).await
    }

    async fn soft_delete_student(&self, id: i64) -> Result<bool> {
        self.soft_delete_student_impl(id).await
    }

    // 教师模块
    async fn create_teacher(&self, school_id: i64, req: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(school_id, req).await
    }

    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_id_impl(id).await
    }

    async fn get_teacher_by_employee_no(
        &self,
        school_id: i64,
        employee_no: &str,
    ) -> Result<Option<Teacher>> {
        self.get_teacher_by_employee_no_impl(school_id, employee_no).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        self.list_teachers_with_pagination_impl(query).await
    }

    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(id, update).await
    }

    async fn soft_delete_teacher(&self, id: i64) -> Result<bool> {
        self.soft_delete_teacher_impl(id).await
    }

    async fn create_teacher_assignment(
        &self,
        school_id: i64,
        teacher_id: i64,
        req: CreateTeacherAssignmentRequest,
    ) -> Result<TeacherAssignment> {
        self.create_teacher_assignment_impl(school_id, teacher_id, req).await
    }

    async fn find_teacher_assignment(
        &self,
        teacher_id: i64,
        req: &CreateTeacherAssignmentRequest,
    ) -> Result<Option<TeacherAssignment>> {
        self.find_teacher_assignment_impl(teacher_id, req).await
    }

    async fn get_teacher_assignment_by_id(&self, id: i64) -> Result<Option<TeacherAssignment>> {
        self.get_teacher_assignment_by_id_impl(id).await
    }

    async fn list_teacher_assignments(&self, teacher_id: i64) -> Result<Vec<TeacherAssignment>> {
        self.list_teacher_assignments_impl(teacher_id).await
    }

    async fn delete_teacher_assignment(&self, id: i64) -> Result<bool> {
        self.delete_teacher_assignment_impl(id).await
    }

    // 班级、小组与科目模块
    async fn create_class(&self, school_id: i64, req: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(school_id, req).await
    }

    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(id).await
    }

    async fn find_class_by_name(
        &self,
        school_id: i64,
        name: &str,
        academic_year: &str,
    ) -> Result<Option<Class>> {
        self.find_class_by_name_impl(school_id, name, academic_year).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(&self, id: i64, update: UpdateClassRequest) -> Result<Option<Class>> {
        self.update_class_impl(id, update).await
    }

    async fn delete_class(&self, id: i64) -> Result<bool> {
        self.delete_class_impl(id).await
    }

    async fn create_section(
        &self,
        school_id: i64,
        class_id: i64,
        req: CreateSectionRequest,
    ) -> Result<Section> {
        self.create_section_impl(school_id, class_id, req).await
    }

    async fn get_section_by_id(&self, id: i64) -> Result<Option<Section>> {
        self.get_section_by_id_impl(id).await
    }

    async fn find_section_by_name(&self, class_id: i64, name: &str) -> Result<Option<Section>> {
        self.find_section_by_name_impl(class_id, name).await
    }

    async fn list_sections(&self, class_id: i64) -> Result<Vec<Section>> {
        self.list_sections_impl(class_id).await
    }

    async fn update_section(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        self.update_section_impl(id, update).await
    }

    async fn delete_section(&self, id: i64) -> Result<bool> {
        self.delete_section_impl(id).await
    }

    async fn create_subject(&self, school_id: i64, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(school_id, req).await
    }

    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>> {
        self.get_subject_by_id_impl(id).await
    }

    async fn get_subject_by_code(&self, school_id: i64, code: &str) -> Result<Option<Subject>> {
        self.get_subject_by_code_impl(school_id, code).await
    }

    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        self.list_subjects_with_pagination_impl(query).await
    }

    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        self.update_subject_impl(id, update).await
    }

    async fn delete_subject(&self, id: i64) -> Result<bool> {
        self.delete_subject_impl(id).await
    }

    // 选课模块
    async fn create_enrollment(
        &self,
        school_id: i64,
        req: CreateEnrollmentRequest,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(school_id, req).await
    }

    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_by_id_impl(id).await
    }

    async fn find_active_enrollment(
        &self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Option<Enrollment>> {
        self.find_active_enrollment_impl(student_id, academic_year).await
    }

    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        self.list_enrollments_with_pagination_impl(query).await
    }

    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        self.update_enrollment_impl(id, update).await
    }

    async fn withdraw_enrollment(&self, id: i64) -> Result<bool> {
        self.withdraw_enrollment_impl(id).await
    }

    async fn active_student_ids_in_class(
        &self,
        class_id: i64,
        section_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        self.active_student_ids_in_class_impl(class_id, section_id).await
    }

    // 考勤模块
    async fn find_attendance_session(
        &self,
        key: &NewAttendanceSession,
    ) -> Result<Option<AttendanceSession>> {
        self.find_attendance_session_impl(key).await
    }

    async fn create_attendance_session(
        &self,
        session: NewAttendanceSession,
    ) -> Result<AttendanceSession> {
        self.create_attendance_session_impl(session).await
    }

    async fn get_attendance_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>> {
        self.get_attendance_session_by_id_impl(id).await
    }

    async fn list_attendance_sessions_with_pagination(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse> {
        self.list_attendance_sessions_with_pagination_impl(query).await
    }

    async fn set_attendance_session_lock(
        &self,
        id: i64,
        locked: bool,
        actor_id: i64,
    ) -> Result<Option<AttendanceSession>> {
        self.set_attendance_session_lock_impl(id, locked, actor_id).await
    }

    async fn delete_attendance_session(&self, id: i64) -> Result<bool> {
        self.delete_attendance_session_impl(id).await
    }

    async fn upsert_attendance_record(
        &self,
        session_id: i64,
        entry: AttendanceEntry,
        marked_by: i64,
    ) -> Result<AttendanceRecord> {
        self.upsert_attendance_record_impl(session_id, entry, marked_by).await
    }

    async fn list_session_records(&self, session_id: i64) -> Result<Vec<AttendanceRecord>> {
        self.list_session_records_impl(session_id).await
    }

    async fn list_attendance_records_with_pagination(
        &self,
        query: RecordListQuery,
    ) -> Result<RecordListResponse> {
        self.list_attendance_records_with_pagination_impl(query).await
    }

    // 作业模块
    async fn create_assignment(
        &self,
        school_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        self.create_assignment_impl(school_id, created_by, req).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, changes).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn count_submissions(&self, assignment_id: i64) -> Result<u64> {
        self.count_submissions_impl(assignment_id).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn find_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.find_submission_impl(assignment_id, student_id).await
    }

    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<SubmissionWithGrade>> {
        self.list_submissions_impl(assignment_id).await
    }

    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: SubmitAssignmentRequest,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        self.upsert_submission_impl(assignment_id, student_id, req, status).await
    }

    async fn get_grade_by_submission(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_submission_impl(submission_id).await
    }

    async fn grade_submission(
        &self,
        submission_id: i64,
        graded_by: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Grade> {
        self.grade_submission_impl(submission_id, graded_by, req).await
    }

    // 请假模块
    async fn create_leave(&self, leave: NewLeave) -> Result<Leave> {
        self.create_leave_impl(leave).await
    }

    async fn get_leave_by_id(&self, id: i64) -> Result<Option<Leave>> {
        self.get_leave_by_id_impl(id).await
    }

    async fn list_leaves_with_pagination(&self, query: LeaveListQuery) -> Result<LeaveListResponse> {
        self.list_leaves_with_pagination_impl(query).await
    }

    async fn review_leave(
        &self,
        id: i64,
        status: LeaveStatus,
        reviewer_id: i64,
        note: Option<String>,
    ) -> Result<Option<Leave>> {
        self.review_leave_impl(id, status, reviewer_id, note).await
    }

    // 概览模块
    async fn dashboard_stats(&self, school_id: i64, today: NaiveDate) -> Result<DashboardStats> {
        self.dashboard_stats_impl(school_id, today).await
    }

    // 平台模块
    async fn create_feature_flag(&self, req: CreateFeatureFlagRequest) -> Result<FeatureFlag> {
        self.create_feature_flag_impl(req).await
    }

    async fn get_feature_flag_by_id(&self, id: i64) -> Result<Option<FeatureFlag>> {
        self.get_feature_flag_by_id_impl(id).await
    }

    async fn get_feature_flag_by_key(&self, key: &str) -> Result<Option<FeatureFlag>> {
        self.get_feature_flag_by_key_impl(key).await
    }

    async fn list_feature_flags_with_pagination(
        &self,
        page: u64,
        size: u64,
    ) -> Result<FeatureFlagListResponse> {
        self.list_feature_flags_with_pagination_impl(page, size).await
    }

    async fn list_all_feature_flags(&self) -> Result<Vec<FeatureFlag>> {
        self.list_all_feature_flags_impl().await
    }

    async fn update_feature_flag(
        &self,
        id: i64,
        update: UpdateFeatureFlagRequest,
    ) -> Result<Option<FeatureFlag>> {
        self.update_feature_flag_impl(id, update).await
    }

    async fn delete_feature_flag(&self, id: i64) -> Result<bool> {
        self.delete_feature_flag_impl(id).await
    }

    async fn create_audit_log(&self, entry: NewAuditLog) -> Result<AuditLog> {
        self.create_audit_log_impl(entry).await
    }

    async fn list_audit_logs_with_pagination(
        &self,
        query: AuditLogListQuery,
    ) -> Result<AuditLogListResponse> {
        self.list_audit_logs_with_pagination_impl(query).await
    }

    async fn create_integration(&self, req: CreateIntegrationRequest) -> Result<Integration> {
        self.create_integration_impl(req).await
    }

    async fn get_integration_by_id(&self, id: i64) -> Result<Option<Integration>> {
        self.get_integration_by_id_impl(id).await
    }

    async fn list_integrations_with_pagination(
        &self,
        query: IntegrationListQuery,
    ) -> Result<IntegrationListResponse> {
        self.list_integrations_with_pagination_impl(query).await
    }

    async fn update_integration(
        &self,
        id: i64,
        update: UpdateIntegrationRequest,
    ) -> Result<Option<Integration>> {
        self.update_integration_impl(id, update).await
    }

    async fn delete_integration(&self, id: i64) -> Result<bool> {
        self.delete_integration_impl(id).await
    }

    // 系统
    async fn ping(&self) -> Result<()> {
        self.ping_impl().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("schoolhub.db").unwrap(),
            "sqlite://schoolhub.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("postgres://u:p@db/school").unwrap(),
            "postgres://u:p@db/school"
        );
        assert!(SeaOrmStorage::build_database_url("oracle://nope").is_err());
    }

    #[test]
    fn test_page_params() {
        assert_eq!(page_params(0, 0), (1, 1));
        assert_eq!(page_params(3, 500), (3, 100));
    }
}
