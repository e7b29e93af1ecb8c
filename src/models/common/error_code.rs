/// 业务错误码
///
/// 响应体中的 `code` 字段，HTTP 状态码之外的机器可读分类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用错误 1xxx
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    // 认证与用户 2xxx
    AuthFailed = 2000,
    UserNotFound = 2001,
    UserNameInvalid = 2002,
    UserEmailInvalid = 2003,
    UserPasswordInvalid = 2004,
    UserAlreadyExists = 2005,
    CanNotDeleteCurrentUser = 2006,
    AccountDisabled = 2007,

    // 学校 / 租户 3xxx
    SchoolNotFound = 3000,
    SchoolCodeExists = 3001,
    SchoolScopeRequired = 3002,
    SchoolAccessDenied = 3003,

    // 学生 / 教师 4xxx
    StudentNotFound = 4000,
    StudentAdmissionNoExists = 4001,
    BulkImportInvalid = 4002,
    TeacherNotFound = 4100,
    TeacherEmployeeNoExists = 4101,
    TeacherAssignmentExists = 4102,

    // 班级 / 科目 / 学籍 5xxx
    ClassNotFound = 5000,
    ClassAlreadyExists = 5001,
    SectionNotFound = 5100,
    SectionAlreadyExists = 5101,
    SubjectNotFound = 5200,
    SubjectCodeExists = 5201,
    EnrollmentNotFound = 5300,
    EnrollmentAlreadyActive = 5301,

    // 考勤 6xxx
    AttendanceSessionNotFound = 6000,
    AttendanceSessionLocked = 6001,
    AttendanceInvalidDate = 6003,

    // 作业 7xxx
    AssignmentNotFound = 7000,
    AssignmentInvalidTransition = 7001,
    AssignmentNotOpen = 7002,
    SubmissionNotFound = 7100,
    SubmissionAlreadyGraded = 7101,
    GradeNotFound = 7200,
    GradeScoreInvalid = 7201,

    // 请假 8xxx
    LeaveNotFound = 8000,
    LeaveInvalidTransition = 8001,

    // 平台 9xxx
    FeatureFlagNotFound = 9000,
    FeatureFlagKeyExists = 9001,
    IntegrationNotFound = 9100,
}
