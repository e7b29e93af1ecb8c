use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::attendance_records::{
    ActiveModel as RecordActiveModel, Column as RecordColumn, Entity as AttendanceRecords,
};
use crate::entity::attendance_sessions::{
    ActiveModel as SessionActiveModel, Column as SessionColumn, Entity as AttendanceSessions,
};
use crate::entity::date_to_string;
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    attendance::{
        entities::{AttendanceRecord, AttendanceSession, AttendanceStatus, AttendanceSummary},
        requests::{AttendanceEntry, NewAttendanceSession, RecordListQuery, SessionListQuery},
        responses::{RecordListResponse, SessionListResponse},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, QueryTrait, Set,
};

impl SeaOrmStorage {
    /// 按 (学校, 班级, 小组, 科目, 日期) 查找场次，可空列按 IS NULL 匹配
    pub async fn find_attendance_session_impl(
        &self,
        key: &NewAttendanceSession,
    ) -> Result<Option<AttendanceSession>> {
        let mut select = AttendanceSessions::find()
            .filter(SessionColumn::SchoolId.eq(key.school_id))
            .filter(SessionColumn::ClassId.eq(key.class_id))
            .filter(SessionColumn::SessionDate.eq(date_to_string(key.session_date)));

        select = match key.section_id {
            Some(section_id) => select.filter(SessionColumn::SectionId.eq(section_id)),
            None => select.filter(SessionColumn::SectionId.is_null()),
        };
        select = match key.subject_id {
            Some(subject_id) => select.filter(SessionColumn::SubjectId.eq(subject_id)),
            None => select.filter(SessionColumn::SubjectId.is_null()),
        };

        let result = select
            .one(&self.db)
            .await
            .map_err(db_error("查询考勤场次失败"))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn create_attendance_session_impl(
        &self,
        session: NewAttendanceSession,
    ) -> Result<AttendanceSession> {
        let now = chrono::Utc::now().timestamp();

        let model = SessionActiveModel {
            school_id: Set(session.school_id),
            class_id: Set(session.class_id),
            section_id: Set(session.section_id),
            subject_id: Set(session.subject_id),
            session_date: Set(date_to_string(session.session_date)),
            taken_by: Set(session.taken_by),
            is_locked: Set(false),
            locked_by: Set(None),
            locked_at: Set(None),
            notes: Set(session.notes),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建考勤场次失败"))?;

        Ok(result.into_session())
    }

    pub async fn get_attendance_session_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<AttendanceSession>> {
        let result = AttendanceSessions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询考勤场次失败"))?;

        Ok(result.map(|m| m.into_session()))
    }

    pub async fn list_attendance_sessions_with_pagination_impl(
        &self,
        query: SessionListQuery,
    ) -> Result<SessionListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select =
            AttendanceSessions::find().filter(SessionColumn::SchoolId.eq(query.school_id));

        if let Some(class_id) = query.class_id {
            select = select.filter(SessionColumn::ClassId.eq(class_id));
        }
        if let Some(section_id) = query.section_id {
            select = select.filter(SessionColumn::SectionId.eq(section_id));
        }
        if let Some(date) = query.date {
            select = select.filter(SessionColumn::SessionDate.eq(date_to_string(date)));
        }
        // ISO 日期文本可直接按字典序比较
        if let Some(from) = query.from {
            select = select.filter(SessionColumn::SessionDate.gte(date_to_string(from)));
        }
        if let Some(to) = query.to {
            select = select.filter(SessionColumn::SessionDate.lte(date_to_string(to)));
        }
        if let Some(is_locked) = query.is_locked {
            select = select.filter(SessionColumn::IsLocked.eq(is_locked));
        }

        let paginator = select
            .order_by_desc(SessionColumn::SessionDate)
            .order_by_desc(SessionColumn::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询考勤场次总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询考勤场次页数失败"))?;
        let sessions = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询考勤场次列表失败"))?;

        Ok(SessionListResponse {
            items: sessions.into_iter().map(|m| m.into_session()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 锁定时记录操作人和时间，解锁时清空
    pub async fn set_attendance_session_lock_impl(
        &self,
        id: i64,
        locked: bool,
        actor_id: i64,
    ) -> Result<Option<AttendanceSession>> {
        if self.get_attendance_session_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let now = chrono::Utc::now().timestamp();
        let model = SessionActiveModel {
            id: Set(id),
            is_locked: Set(locked),
            locked_by: Set(locked.then_some(actor_id)),
            locked_at: Set(locked.then_some(now)),
            updated_at: Set(now),
            ..Default::default()
        };

        model
            .update(&self.db)
            .await
            .map_err(db_error("更新考勤场次锁定状态失败"))?;

        self.get_attendance_session_by_id_impl(id).await
    }

    /// 删除场次（记录随外键级联删除）
    pub async fn delete_attendance_session_impl(&self, id: i64) -> Result<bool> {
        let result = AttendanceSessions::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除考勤场次失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 按 (场次, 学生) 写入或更新考勤记录
    pub async fn upsert_attendance_record_impl(
        &self,
        session_id: i64,
        entry: AttendanceEntry,
        marked_by: i64,
    ) -> Result<AttendanceRecord> {
        let now = chrono::Utc::now().timestamp();

        let existing = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .filter(RecordColumn::StudentId.eq(entry.student_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询考勤记录失败"))?;

        let result = match existing {
            Some(record) => {
                let model = RecordActiveModel {
                    id: Set(record.id),
                    status: Set(entry.status.to_string()),
                    remarks: Set(entry.remarks),
                    marked_by: Set(Some(marked_by)),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .update(&self.db)
                    .await
                    .map_err(db_error("更新考勤记录失败"))?
            }
            None => {
                let model = RecordActiveModel {
                    session_id: Set(session_id),
                    student_id: Set(entry.student_id),
                    status: Set(entry.status.to_string()),
                    remarks: Set(entry.remarks),
                    marked_by: Set(Some(marked_by)),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model
                    .insert(&self.db)
                    .await
                    .map_err(db_error("创建考勤记录失败"))?
            }
        };

        Ok(result.into_record())
    }

    pub async fn list_session_records_impl(&self, session_id: i64) -> Result<Vec<AttendanceRecord>> {
        let result = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.eq(session_id))
            .order_by_asc(RecordColumn::StudentId)
            .all(&self.db)
            .await
            .map_err(db_error("查询考勤记录失败"))?;

        Ok(result.into_iter().map(|m| m.into_record()).collect())
    }

    pub async fn list_attendance_records_with_pagination_impl(
        &self,
        query: RecordListQuery,
    ) -> Result<RecordListResponse> {
        let (page, size) = page_params(query.page, query.size);

        // 先按学校和日期范围确定场次
        let mut sessions = AttendanceSessions::find()
            .select_only()
            .column(SessionColumn::Id)
            .filter(SessionColumn::SchoolId.eq(query.school_id));
        if let Some(session_id) = query.session_id {
            sessions = sessions.filter(SessionColumn::Id.eq(session_id));
        }
        if let Some(from) = query.from {
            sessions = sessions.filter(SessionColumn::SessionDate.gte(date_to_string(from)));
        }
        if let Some(to) = query.to {
            sessions = sessions.filter(SessionColumn::SessionDate.lte(date_to_string(to)));
        }

        let mut select = AttendanceRecords::find()
            .filter(RecordColumn::SessionId.in_subquery(sessions.into_query()));

        if let Some(student_id) = query.student_id {
            select = select.filter(RecordColumn::StudentId.eq(student_id));
        }

        let paginator = select
            .order_by_desc(RecordColumn::SessionId)
            .order_by_asc(RecordColumn::StudentId)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询考勤记录总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询考勤记录页数失败"))?;
        let records = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询考勤记录列表失败"))?;

        Ok(RecordListResponse {
            items: records.into_iter().map(|m| m.into_record()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 某校某日全部场次的考勤统计
    pub async fn attendance_summary_for_date_impl(
        &self,
        school_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<AttendanceSummary> {
        let sessions = AttendanceSessions::find()
            .select_only()
            .column(SessionColumn::Id)
            .filter(SessionColumn::SchoolId.eq(school_id))
            .filter(SessionColumn::SessionDate.eq(date_to_string(date)));

        let rows: Vec<(String, i64)> = AttendanceRecords::find()
            .select_only()
            .column(RecordColumn::Status)
            .column_as(RecordColumn::Id.count(), "count")
            .filter(RecordColumn::SessionId.in_subquery(sessions.into_query()))
            .group_by(RecordColumn::Status)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(db_error("统计考勤失败"))?;

        let mut summary = AttendanceSummary::default();
        for (status, count) in rows {
            if let Ok(status) = status.parse::<AttendanceStatus>() {
                summary.add(status, count);
            }
        }

        Ok(summary)
    }

    pub async fn count_attendance_sessions_on_impl(
        &self,
        school_id: i64,
        date: chrono::NaiveDate,
    ) -> Result<u64> {
        AttendanceSessions::find()
            .filter(SessionColumn::SchoolId.eq(school_id))
            .filter(SessionColumn::SessionDate.eq(date_to_string(date)))
            .count(&self.db)
            .await
            .map_err(db_error("统计考勤场次失败"))
    }
}
