//! 预导入模块，方便使用

pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::attendance_records::{
    ActiveModel as AttendanceRecordActiveModel, Entity as AttendanceRecords,
    Model as AttendanceRecordModel,
};
pub use super::attendance_sessions::{
    ActiveModel as AttendanceSessionActiveModel, Entity as AttendanceSessions,
    Model as AttendanceSessionModel,
};
pub use super::audit_logs::{
    ActiveModel as AuditLogActiveModel, Entity as AuditLogs, Model as AuditLogModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::enrollments::{
    ActiveModel as EnrollmentActiveModel, Entity as Enrollments, Model as EnrollmentModel,
};
pub use super::feature_flags::{
    ActiveModel as FeatureFlagActiveModel, Entity as FeatureFlags, Model as FeatureFlagModel,
};
pub use super::grades::{ActiveModel as GradeActiveModel, Entity as Grades, Model as GradeModel};
pub use super::integrations::{
    ActiveModel as IntegrationActiveModel, Entity as Integrations, Model as IntegrationModel,
};
pub use super::leaves::{ActiveModel as LeaveActiveModel, Entity as Leaves, Model as LeaveModel};
pub use super::schools::{
    ActiveModel as SchoolActiveModel, Entity as Schools, Model as SchoolModel,
};
pub use super::sections::{
    ActiveModel as SectionActiveModel, Entity as Sections, Model as SectionModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
pub use super::teacher_assignments::{
    ActiveModel as TeacherAssignmentActiveModel, Entity as TeacherAssignments,
    Model as TeacherAssignmentModel,
};
pub use super::teachers::{
    ActiveModel as TeacherActiveModel, Entity as Teachers, Model as TeacherModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
