//! 作业、提交与评分

use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::grades::{
    ActiveModel as GradeActiveModel, Column as GradeColumn, Entity as Grades,
};
use crate::entity::submissions::{
    ActiveModel as SubmissionActiveModel, Column as SubmissionColumn, Entity as Submissions,
};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    assignments::{
        entities::{Assignment, AssignmentStatus, Grade, Submission, SubmissionStatus},
        requests::{
            AssignmentChanges, AssignmentListQuery, CreateAssignmentRequest,
            GradeSubmissionRequest, SubmitAssignmentRequest,
        },
        responses::{AssignmentListResponse, SubmissionWithGrade},
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use std::collections::HashMap;

impl SeaOrmStorage {
    /// 新作业总是以草稿状态创建
    pub async fn create_assignment_impl(
        &self,
        school_id: i64,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(school_id),
            class_id: Set(req.class_id),
            section_id: Set(req.section_id),
            subject_id: Set(req.subject_id),
            created_by: Set(created_by),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            due_at: Set(req.due_at.map(|d| d.timestamp())),
            max_score: Set(req.max_score),
            status: Set(AssignmentStatus::Draft.to_string()),
            published_at: Set(None),
            closed_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建作业失败"))?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询作业失败"))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Assignments::find().filter(Column::SchoolId.eq(query.school_id));

        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(section_id) = query.section_id {
            select = select.filter(Column::SectionId.eq(section_id));
        }
        if let Some(subject_id) = query.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }
        if let Some(ref statuses) = query.visible_statuses {
            select = select.filter(Column::Status.is_in(statuses.iter().map(|s| s.to_string())));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询作业总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询作业页数失败"))?;
        let assignments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询作业列表失败"))?;

        Ok(AssignmentListResponse {
            items: assignments.into_iter().map(|m| m.into_assignment()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        changes: AssignmentChanges,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = changes.title {
            model.title = Set(title.trim().to_string());
        }
        if let Some(description) = changes.description {
            model.description = Set(Some(description));
        }
        if let Some(due_at) = changes.due_at {
            model.due_at = Set(Some(due_at.timestamp()));
        }
        if let Some(max_score) = changes.max_score {
            model.max_score = Set(max_score);
        }
        if let Some(status) = changes.status {
            model.status = Set(status.to_string());
        }
        if let Some(published_at) = changes.published_at {
            model.published_at = Set(Some(published_at.timestamp()));
        }
        if let Some(closed_at) = changes.closed_at {
            model.closed_at = Set(Some(closed_at.timestamp()));
        }

        model.update(&self.db).await.map_err(db_error("更新作业失败"))?;

        self.get_assignment_by_id_impl(id).await
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除作业失败"))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_submissions_impl(&self, assignment_id: i64) -> Result<u64> {
        Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .count(&self.db)
            .await
            .map_err(db_error("统计提交数量失败"))
    }

    // 提交

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询提交失败"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn find_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询提交失败"))?;

        Ok(result.map(|m| m.into_submission()))
    }

    /// 列出作业的全部提交，附带评分
    pub async fn list_submissions_impl(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<SubmissionWithGrade>> {
        let submissions = Submissions::find()
            .filter(SubmissionColumn::AssignmentId.eq(assignment_id))
            .order_by_asc(SubmissionColumn::SubmittedAt)
            .order_by_asc(SubmissionColumn::Id)
            .all(&self.db)
            .await
            .map_err(db_error("查询提交列表失败"))?;

        if submissions.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = submissions.iter().map(|s| s.id).collect();
        let mut grades: HashMap<i64, Grade> = Grades::find()
            .filter(GradeColumn::SubmissionId.is_in(ids))
            .all(&self.db)
            .await
            .map_err(db_error("查询评分失败"))?
            .into_iter()
            .map(|g| (g.submission_id, g.into_grade()))
            .collect();

        Ok(submissions
            .into_iter()
            .map(|s| {
                let grade = grades.remove(&s.id);
                SubmissionWithGrade {
                    submission: s.into_submission(),
                    grade,
                }
            })
            .collect())
    }

    /// 写入或覆盖学生的提交
    pub async fn upsert_submission_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
        req: SubmitAssignmentRequest,
        status: SubmissionStatus,
    ) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let result = match self.find_submission_impl(assignment_id, student_id).await? {
            Some(existing) => {
                let model = SubmissionActiveModel {
                    id: Set(existing.id),
                    content: Set(req.content),
                    attachment_url: Set(req.attachment_url),
                    status: Set(status.to_string()),
                    submitted_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.update(&self.db).await.map_err(db_error("更新提交失败"))?
            }
            None => {
                let model = SubmissionActiveModel {
                    assignment_id: Set(assignment_id),
                    student_id: Set(student_id),
                    content: Set(req.content),
                    attachment_url: Set(req.attachment_url),
                    status: Set(status.to_string()),
                    submitted_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.insert(&self.db).await.map_err(db_error("创建提交失败"))?
            }
        };

        Ok(result.into_submission())
    }

    // 评分

    pub async fn get_grade_by_submission_impl(&self, submission_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(GradeColumn::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(db_error("查询评分失败"))?;

        Ok(result.map(|m| m.into_grade()))
    }

    /// 创建或更新评分，并把提交标记为已评分（同一事务）
    pub async fn grade_submission_impl(
        &self,
        submission_id: i64,
        graded_by: i64,
        req: GradeSubmissionRequest,
    ) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;

        let existing = Grades::find()
            .filter(GradeColumn::SubmissionId.eq(submission_id))
            .one(&txn)
            .await
            .map_err(db_error("查询评分失败"))?;

        let grade = match existing {
            Some(grade) => {
                let model = GradeActiveModel {
                    id: Set(grade.id),
                    graded_by: Set(graded_by),
                    score: Set(req.score),
                    feedback: Set(req.feedback),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.update(&txn).await.map_err(db_error("更新评分失败"))?
            }
            None => {
                let model = GradeActiveModel {
                    submission_id: Set(submission_id),
                    graded_by: Set(graded_by),
                    score: Set(req.score),
                    feedback: Set(req.feedback),
                    graded_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                model.insert(&txn).await.map_err(db_error("创建评分失败"))?
            }
        };

        Submissions::update_many()
            .col_expr(
                SubmissionColumn::Status,
                sea_orm::sea_query::Expr::value(SubmissionStatus::Graded.to_string()),
            )
            .col_expr(
                SubmissionColumn::UpdatedAt,
                sea_orm::sea_query::Expr::value(now),
            )
            .filter(SubmissionColumn::Id.eq(submission_id))
            .exec(&txn)
            .await
            .map_err(db_error("更新提交状态失败"))?;

        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(grade.into_grade())
    }
}
