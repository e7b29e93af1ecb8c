use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    enrollments::{
        entities::{Enrollment, EnrollmentStatus},
        requests::{CreateEnrollmentRequest, EnrollmentListQuery, UpdateEnrollmentRequest},
        responses::EnrollmentListResponse,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_enrollment_impl(
        &self,
        school_id: i64,
        req: CreateEnrollmentRequest,
    ) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(school_id),
            student_id: Set(req.student_id),
            class_id: Set(req.class_id),
            section_id: Set(req.section_id),
            academic_year: Set(req.academic_year.trim().to_string()),
            roll_no: Set(req.roll_no),
            status: Set(EnrollmentStatus::Active.to_string()),
            enrolled_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建选课失败"))?;

        Ok(result.into_enrollment())
    }

    pub async fn get_enrollment_by_id_impl(&self, id: i64) -> Result<Option<Enrollment>> {
        let result = Enrollments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询选课失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 学生在某学年内的有效选课
    pub async fn find_active_enrollment_impl(
        &self,
        student_id: i64,
        academic_year: &str,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AcademicYear.eq(academic_year))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()))
            .one(&self.db)
            .await
            .map_err(db_error("查询选课失败"))?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    pub async fn list_enrollments_with_pagination_impl(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Enrollments::find().filter(Column::SchoolId.eq(query.school_id));

        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(class_id) = query.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(section_id) = query.section_id {
            select = select.filter(Column::SectionId.eq(section_id));
        }
        if let Some(ref academic_year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(academic_year.as_str()));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::EnrolledAt)
            .order_by_desc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询选课总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询选课页数失败"))?;
        let enrollments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询选课列表失败"))?;

        Ok(EnrollmentListResponse {
            items: enrollments.into_iter().map(|m| m.into_enrollment()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_enrollment_impl(
        &self,
        id: i64,
        update: UpdateEnrollmentRequest,
    ) -> Result<Option<Enrollment>> {
        if self.get_enrollment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(section_id) = update.section_id {
            model.section_id = Set(Some(section_id));
        }
        if let Some(roll_no) = update.roll_no {
            model.roll_no = Set(Some(roll_no));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model.update(&self.db).await.map_err(db_error("更新选课失败"))?;

        self.get_enrollment_by_id_impl(id).await
    }

    /// 退课：状态置为 withdrawn
    pub async fn withdraw_enrollment_impl(&self, id: i64) -> Result<bool> {
        let result = Enrollments::update_many()
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(EnrollmentStatus::Withdrawn.to_string()),
            )
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .filter(Column::Status.ne(EnrollmentStatus::Withdrawn.to_string()))
            .exec(&self.db)
            .await
            .map_err(db_error("退课失败"))?;

        Ok(result.rows_affected > 0)
    }

    /// 班级（及小组）中当前在读学生的 ID
    pub async fn active_student_ids_in_class_impl(
        &self,
        class_id: i64,
        section_id: Option<i64>,
    ) -> Result<Vec<i64>> {
        let mut select = Enrollments::find()
            .select_only()
            .column(Column::StudentId)
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Status.eq(EnrollmentStatus::Active.to_string()));

        if let Some(section_id) = section_id {
            select = select.filter(Column::SectionId.eq(section_id));
        }

        select
            .distinct()
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(db_error("查询在读学生失败"))
    }
}
