//! 角色权限表
//!
//! 每个角色对应一组静态权限；超级管理员拥有全部权限，
//! 平台级权限（学校、功能开关、审计日志、集成）只属于超级管理员。

use super::users::entities::{User, UserRole};

crate::define_string_enum! {
    /// 权限
    pub enum Permission ("../frontend/src/types/generated/permission.ts") {
        ManageSchools => "manage_schools",
        ManageFeatureFlags => "manage_feature_flags",
        ViewAuditLogs => "view_audit_logs",
        ManageIntegrations => "manage_integrations",
        ManageUsers => "manage_users",
        ViewStudents => "view_students",
        ManageStudents => "manage_students",
        ViewTeachers => "view_teachers",
        ManageTeachers => "manage_teachers",
        ViewClasses => "view_classes",
        ManageClasses => "manage_classes",
        ManageEnrollments => "manage_enrollments",
        ViewAttendance => "view_attendance",
        TakeAttendance => "take_attendance",
        LockAttendance => "lock_attendance",
        UnlockAttendance => "unlock_attendance",
        ViewAssignments => "view_assignments",
        ManageAssignments => "manage_assignments",
        SubmitAssignments => "submit_assignments",
        GradeSubmissions => "grade_submissions",
        RequestLeave => "request_leave",
        ReviewLeaves => "review_leaves",
        ViewDashboard => "view_dashboard",
    }
}

use Permission::*;

const SCHOOL_ADMIN_PERMISSIONS: &[Permission] = &[
    ManageUsers,
    ViewStudents,
    ManageStudents,
    ViewTeachers,
    ManageTeachers,
    ViewClasses,
    ManageClasses,
    ManageEnrollments,
    ViewAttendance,
    TakeAttendance,
    LockAttendance,
    UnlockAttendance,
    ViewAssignments,
    ManageAssignments,
    SubmitAssignments,
    GradeSubmissions,
    RequestLeave,
    ReviewLeaves,
    ViewDashboard,
];

const TEACHER_PERMISSIONS: &[Permission] = &[
    ViewStudents,
    ViewTeachers,
    ViewClasses,
    ViewAttendance,
    TakeAttendance,
    LockAttendance,
    ViewAssignments,
    ManageAssignments,
    GradeSubmissions,
    RequestLeave,
    ViewDashboard,
];

const STUDENT_PERMISSIONS: &[Permission] = &[
    ViewClasses,
    ViewAttendance,
    ViewAssignments,
    SubmitAssignments,
    RequestLeave,
];

const GUARDIAN_PERMISSIONS: &[Permission] =
    &[ViewStudents, ViewAttendance, ViewAssignments, RequestLeave];

/// 角色 → 权限
pub static ROLE_PERMISSIONS: &[(UserRole, &[Permission])] = &[
    (UserRole::SchoolAdmin, SCHOOL_ADMIN_PERMISSIONS),
    (UserRole::Teacher, TEACHER_PERMISSIONS),
    (UserRole::Student, STUDENT_PERMISSIONS),
    (UserRole::Guardian, GUARDIAN_PERMISSIONS),
];

pub fn permissions_for_role(role: UserRole) -> &'static [Permission] {
    ROLE_PERMISSIONS
        .iter()
        .find(|(r, _)| *r == role)
        .map(|(_, perms)| *perms)
        .unwrap_or(&[])
}

pub fn has_permission(user: &User, permission: Permission) -> bool {
    user.is_super_admin || permissions_for_role(user.role).contains(&permission)
}

/// 用户拥有的全部权限
pub fn effective_permissions(user: &User) -> Vec<Permission> {
    if user.is_super_admin {
        Permission::all().to_vec()
    } else {
        permissions_for_role(user.role).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::UserStatus;

    fn user(role: UserRole, is_super_admin: bool) -> User {
        User {
            id: 1,
            school_id: Some(1),
            username: "someone".to_string(),
            email: "someone@example.com".to_string(),
            password_hash: String::new(),
            role,
            is_super_admin,
            status: UserStatus::Active,
            display_name: None,
            phone: None,
            last_login: None,
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
        }
    }

    const PLATFORM: &[Permission] = &[
        ManageSchools,
        ManageFeatureFlags,
        ViewAuditLogs,
        ManageIntegrations,
    ];

    #[test]
    fn test_every_role_has_an_entry() {
        for role in UserRole::all_roles() {
            assert!(!permissions_for_role(*role).is_empty(), "{role} has no permissions");
        }
    }

    #[test]
    fn test_school_admin_has_everything_but_platform() {
        let admin = user(UserRole::SchoolAdmin, false);
        for perm in Permission::all() {
            assert_eq!(has_permission(&admin, *perm), !PLATFORM.contains(perm), "{perm}");
        }
    }

    #[test]
    fn test_super_admin_has_all() {
        let root = user(UserRole::SchoolAdmin, true);
        assert!(Permission::all().iter().all(|p| has_permission(&root, *p)));
        assert_eq!(effective_permissions(&root).len(), Permission::all().len());
    }

    #[test]
    fn test_teacher_cannot_unlock_or_manage_students() {
        let teacher = user(UserRole::Teacher, false);
        assert!(has_permission(&teacher, LockAttendance));
        assert!(!has_permission(&teacher, UnlockAttendance));
        assert!(!has_permission(&teacher, ManageStudents));
        assert!(has_permission(&teacher, GradeSubmissions));
    }

    #[test]
    fn test_student_and_guardian() {
        let student = user(UserRole::Student, false);
        assert!(has_permission(&student, SubmitAssignments));
        assert!(!has_permission(&student, ViewStudents));
        assert!(!has_permission(&student, ViewDashboard));

        let guardian = user(UserRole::Guardian, false);
        assert!(has_permission(&guardian, ViewStudents));
        assert!(!has_permission(&guardian, SubmitAssignments));
        assert!(!has_permission(&guardian, TakeAttendance));
    }
}
