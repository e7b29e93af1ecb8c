use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::date_to_string;
use crate::entity::leaves::{ActiveModel, Column, Entity as Leaves};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    leaves::{
        entities::{Leave, LeaveStatus},
        requests::{LeaveListQuery, NewLeave},
        responses::LeaveListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    pub async fn create_leave_impl(&self, leave: NewLeave) -> Result<Leave> {
        let now = chrono::Utc::now().timestamp();
        let req = leave.request;

        let model = ActiveModel {
            school_id: Set(leave.school_id),
            requester_id: Set(leave.requester_id),
            teacher_id: Set(req.teacher_id),
            student_id: Set(req.student_id),
            leave_type: Set(req.leave_type.to_string()),
            start_date: Set(date_to_string(req.start_date)),
            end_date: Set(date_to_string(req.end_date)),
            reason: Set(req.reason),
            status: Set(LeaveStatus::Pending.to_string()),
            reviewed_by: Set(None),
            reviewed_at: Set(None),
            review_note: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建请假失败"))?;

        Ok(result.into_leave())
    }

    pub async fn get_leave_by_id_impl(&self, id: i64) -> Result<Option<Leave>> {
        let result = Leaves::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询请假失败"))?;

        Ok(result.map(|m| m.into_leave()))
    }

    pub async fn list_leaves_with_pagination_impl(
        &self,
        query: LeaveListQuery,
    ) -> Result<LeaveListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Leaves::find().filter(Column::SchoolId.eq(query.school_id));

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(requester_id) = query.requester_id {
            select = select.filter(Column::RequesterId.eq(requester_id));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询请假总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询请假页数失败"))?;
        let leaves = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询请假列表失败"))?;

        Ok(LeaveListResponse {
            items: leaves.into_iter().map(|m| m.into_leave()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    /// 仅当请假仍处于 pending 时写入新状态，否则返回 None
    pub async fn review_leave_impl(
        &self,
        id: i64,
        status: LeaveStatus,
        reviewer_id: i64,
        note: Option<String>,
    ) -> Result<Option<Leave>> {
        let now = chrono::Utc::now().timestamp();

        let result = Leaves::update_many()
            .col_expr(Column::Status, Expr::value(status.to_string()))
            .col_expr(Column::ReviewedBy, Expr::value(reviewer_id))
            .col_expr(Column::ReviewedAt, Expr::value(now))
            .col_expr(Column::ReviewNote, Expr::value(note))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::Status.eq(LeaveStatus::Pending.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_error("审批请假失败"))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.get_leave_by_id_impl(id).await
    }

    pub async fn count_leaves_by_status_impl(
        &self,
        school_id: i64,
        status: LeaveStatus,
    ) -> Result<u64> {
        Leaves::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::Status.eq(status.to_string()))
            .count(&self.db)
            .await
            .map_err(db_error("统计请假数量失败"))
    }
}
