use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

/// 服务层与数据库之间的存储接口
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户模块
    // 创建用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 停用用户
    async fn deactivate_user(&self, id: i64) -> Result<bool>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 学校模块
    async fn create_school(&self, req: CreateSchoolRequest) -> Result<School>;
    async fn get_school_by_id(&self, id: i64) -> Result<Option<School>>;
    async fn get_school_by_code(&self, code: &str) -> Result<Option<School>>;
    async fn list_schools_with_pagination(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse>;
    async fn update_school(&self, id: i64, update: UpdateSchoolRequest) -> Result<Option<School>>;
    async fn soft_delete_school(&self, id: i64) -> Result<bool>;

    /// 学生模块
    async fn create_student(&self, student: NewStudent) -> Result<Student>;
    // 单事务批量写入，返回写入行数
    async fn bulk_create_students(&self, students: Vec<NewStudent>) -> Result<usize>;
    async fn get_student_by_id(&self, id: i64) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn get_student_by_admission_no(
        &self,
        school_id: i64,
        admission_no: &str,
    ) -> Result<Option<Student>>;
    // 返回给定学号中已存在的那些
    async fn find_existing_admission_nos(
        &self,
        school_id: i64,
        admission_nos: &[String],
    ) -> Result<Vec<String>>;
    async fn list_students_with_pagination(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse>;
    async fn update_student(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    async fn soft_delete_student(&self, id: i64) -> Result<bool>;

    /// 教师模块
    async fn create_teacher(&self, school_id: i64, req: CreateTeacherRequest) -> Result<Teacher>;
    async fn get_teacher_by_id(&self, id: i64) -> Result<Option<Teacher>>;
    async fn get_teacher_by_employee_no(
        &self,
        school_id: i64,
        employee_no: &str,
    ) -> Result<Option<Teacher>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers_with_pagination(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse>;
    async fn update_teacher(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;
    async fn soft_delete_teacher(&self, id: i64) -> Result<bool>;
    // 教学分配
    async fn create_teacher_assignment(
        &self,
        school_id: i64,
        teacher_id: i64,
        req: CreateTeacherAssignmentRequest,
    ) -> Result<TeacherAssignment>;
    async fn find_teacher_assignment(
        &self,
        teacher_id: i64,
        req: &CreateTeacherAssignmentRequest,
    ) -> Result<Option<TeacherAssignment>>;
    async fn get_teacher_assignment_by_id(&self, id: i64) -> Result<Option<TeacherAssignment>>;
    async fn list_teacher_assignments(&self, teacher_id: i64) -> Result<Vec<TeacherAssignment>>;
    async fn delete_teacher_assignment(&self, id: i64) -> Result<bool>;

    /// 班级、小组与科目模块
    async fn create_class(&self, school_id: i64, req: CreateClassRequest) -> Result<Class>;
    async fn get_class_by_id(&self, id: i64) -> Result<Option<Class>>;
    async fn find_class_by_name(
        &self,
        school_id: i64,
        name: &str,
        academic_year: &str,
    ) -> Result<Option<Class>>;
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    async fn update_class(&self, id: i64, update: UpdateClassRequest) -> Result<Option<Class>>;
    async fn delete_class(&self, id: i64) -> Result<bool>;
    async fn create_section(
        &self,
        school_id: i64,
        class_id: i64,
        req: CreateSectionRequest,
    ) -> Result<Section>;
    async fn get_section_by_id(&self, id: i64) -> Result<Option<Section>>;
    async fn find_section_by_name(&self, class_id: i64, name: &str) -> Result<Option<Section>>;
    async fn list_sections(&self, class_id: i64) -> Result<Vec<Section>>;
    async fn update_section(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>>;
    async fn delete_section(&self, id: i64) -> Result<bool>;
    async fn create_subject(&self, school_id: i64, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject_by_id(&self, id: i64) -> Result<Option<Subject>>;
    async fn get_subject_by_code(&self, school_id: i64, code: &str) -> Result<Option<Subject>>;
    async fn list_subjects_with_pagination(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse>;
    async fn update_subject(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>>;
    async fn delete_subject(&self, id: i64) -> Result<bool>;

    /// 选课模块
    async fn create_enrollment(
        &self,
        school_id: i64,
        req: CreateEnrollmentRequest,
    ) -> Result<Enrollment>;
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    // 学生在某学年内的有效选课
    async fn find_active_enrollment(
        &self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Option<Enrollment>>;
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    async fn update_enrollment(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>>;
    async fn withdraw_enrollment(&self, id: i64) -> Result<bool>;
    // 班级（及小组）中当前在读学生
    async fn active_student_ids_in_class(
        &self,
        class_id: i64,
        section_id: Option<i64>,
    ) -> Result<Vec<i64>>;

    /// 考勤模块
    async fn find_attendance_session(
        &self,
        key: &NewAttendanceSession,
    ) -> Result<Option<AttendanceSession>>;
    async fn create_attendance_session(
        &self,
        session: NewAttendanceSession,
    ) -> Result<AttendanceSession>;
    async fn get_attendance_session_by_id(&self, id: i64) -> Result<Option<AttendanceSession>>;
    async fn list_attendance_sessions_with_pagination(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse>;
    async fn set_attendance_session_lock(
        &self,
        id: i64,
        locked: bool,
        actor_id: i64,
    ) -> Result<Option<AttendanceSession>>;
    async fn delete_attendance_session(&self, id: i64) -> Result<bool>;
    async fn upsert_attendance_record(
        &self,
        session_id: i64,
        entry: AttendanceEntry,
        marked_by: i64,
    ) -> Result<AttendanceRecord>;
    async fn list_session_records(&self, session_id: i64) -> Result<Vec<AttendanceRecord>>;
    async fn list_attendance_records_with_pagination(
        &self,
        query: RecordListQuery,
    ) -> Result<RecordListResponse>;

    /// 作业模块
    async fn create_assignment(
        &self,
        school_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    async fn count_submissions(&self, assignment_id: i64) -> Result<u64>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn find_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<SubmissionWithGrade>>;
    async fn upsert_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: SubmitAssignmentRequest,
        status: SubmissionStatus,
    ) -> Result<Submission>;
    async fn get_grade_by_submission(&self, submission_id: i64) -> Result<Option<Grade>>;
    // 评分并标记提交为已评分
    async fn grade_submission(
        &self,
        submission_id: i64,
        graded_by: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Grade>;

    /// 请假模块
    async fn create_leave(&self, leave: NewLeave) -> Result<Leave>;
    async fn get_leave_by_id(&self, id: i64) -> Result<Option<Leave>>;
    async fn list_leaves_with_pagination(&self, query: LeaveListQuery) -> Result<LeaveListResponse>;
    // 仅当请假仍为 pending 时生效
    async fn review_leave(
        &self,
        id: i64,
        status: LeaveStatus,
        reviewer_id: i64,
        note: Option<String>,
    ) -> Result<Option<Leave>>;

    /// 概览模块
    async fn dashboard_stats(&self, school_id: i64, today: NaiveDate) -> Result<DashboardStats>;

    /// 平台模块
    async fn create_feature_flag(&self, req: CreateFeatureFlagRequest) -> Result<FeatureFlag>;
    async fn get_feature_flag_by_id(&self, id: i64) -> Result<Option<FeatureFlag>>;
    async fn get_feature_flag_by_key(&self, key: &str) -> Result<Option<FeatureFlag>>;
    async fn list_feature_flags_with_pagination(
        &self,
        page: u64,
        size: u64,
    ) -> Result<FeatureFlagListResponse>;
    async fn list_all_feature_flags(&self) -> Result<Vec<FeatureFlag>>;
    async fn update_feature_flag(
        &self,
        id: i64,
        update: UpdateFeatureFlagRequest,
    ) -> Result<Option<FeatureFlag>>;
    async fn delete_feature_flag(&self, id: i64) -> Result<bool>;
    async fn create_audit_log(&self, entry: NewAuditLog) -> Result<AuditLog>;
    async fn list_audit_logs_with_pagination(
        &self,
        query: AuditLogListQuery,
    ) -> Result<AuditLogListResponse>;
    async fn create_integration(&self, req: CreateIntegrationRequest) -> Result<Integration>;
    async fn get_integration_by_id(&self, id: i64) -> Result<Option<Integration>>;
    async fn list_integrations_with_pagination(
        &self,
        query: IntegrationListQuery,
    ) -> Result<IntegrationListResponse>;
    async fn update_integration(
        &self,
        id: i64,
        update: UpdateIntegrationRequest,
    ) -> Result<Option<Integration>>;
    async fn delete_integration(&self, id: i64) -> Result<bool>;

    /// 系统
    // 数据库连通性检查
    async fn ping(&self) -> Result<()>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
