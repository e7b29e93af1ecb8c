use super::{SeaOrmStorage, db_error};
use crate::entity::classes::{Column as ClassColumn, Entity as Classes};
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::teachers::{Column as TeacherColumn, Entity as Teachers};
use crate::errors::Result;
use crate::models::{
    dashboard::DashboardStats, leaves::entities::LeaveStatus,
    students::entities::StudentStatus, teachers::entities::TeacherStatus,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

impl SeaOrmStorage {
    /// 学校概览：在读学生、在职教师、班级、待审批请假与当日考勤
    pub async fn dashboard_stats_impl(
        &self,
        school_id: i64,
        today: chrono::NaiveDate,
    ) -> Result<DashboardStats> {
        let active_students = Students::find()
            .filter(StudentColumn::SchoolId.eq(school_id))
            .filter(StudentColumn::DeletedAt.is_null())
            .filter(StudentColumn::Status.eq(StudentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("统计学生数量失败"))?;

        let active_teachers = Teachers::find()
            .filter(TeacherColumn::SchoolId.eq(school_id))
            .filter(TeacherColumn::DeletedAt.is_null())
            .filter(TeacherColumn::Status.eq(TeacherStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("统计教师数量失败"))?;

        let classes = Classes::find()
            .filter(ClassColumn::SchoolId.eq(school_id))
            .count(&self.db)
            .await
            .map_err(db_error("统计班级数量失败"))?;

        let pending_leaves = self
            .count_leaves_by_status_impl(school_id, LeaveStatus::Pending)
            .await?;
        let today_sessions = self.count_attendance_sessions_on_impl(school_id, today).await?;
        let today_attendance = self.attendance_summary_for_date_impl(school_id, today).await?;

        Ok(DashboardStats {
            school_id,
            active_students: active_students as i64,
            active_teachers: active_teachers as i64,
            classes: classes as i64,
            pending_leaves: pending_leaves as i64,
            today_sessions: today_sessions as i64,
            today_attendance,
        })
    }
}
