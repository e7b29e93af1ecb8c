use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::date_to_string;
use crate::entity::teacher_assignments::{
    ActiveModel as AssignmentActiveModel, Column as AssignmentColumn,
    Entity as TeacherAssignments,
};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    teachers::{
        entities::{Teacher, TeacherAssignment, TeacherStatus},
        requests::{
            CreateTeacherAssignmentRequest, CreateTeacherRequest, TeacherListQuery,
            UpdateTeacherRequest,
        },
        responses::TeacherListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_teacher_impl(
        &self,
        school_id: i64,
        req: CreateTeacherRequest,
    ) -> Result<Teacher> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            school_id: Set(school_id),
            user_id: Set(req.user_id),
            employee_no: Set(req.employee_no.trim().to_string()),
            first_name: Set(req.first_name.trim().to_string()),
            last_name: Set(req.last_name.trim().to_string()),
            email: Set(req.email),
            phone: Set(req.phone),
            qualification: Set(req.qualification),
            hired_on: Set(req.hired_on.map(date_to_string)),
            status: Set(TeacherStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建教师失败"))?;

        Ok(result.into_teacher())
    }

    pub async fn get_teacher_by_id_impl(&self, id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_error("查询教师失败"))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 工号在校内唯一（包含已删除的教师）
    pub async fn get_teacher_by_employee_no_impl(
        &self,
        school_id: i64,
        employee_no: &str,
    ) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::EmployeeNo.eq(employee_no))
            .one(&self.db)
            .await
            .map_err(db_error("查询教师失败"))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_error("查询教师失败"))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    pub async fn list_teachers_with_pagination_impl(
        &self,
        query: TeacherListQuery,
    ) -> Result<TeacherListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Teachers::find()
            .filter(Column::SchoolId.eq(query.school_id))
            .filter(Column::DeletedAt.is_null());

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::EmployeeNo.like(pattern.clone()))
                    .add(Column::FirstName.like(pattern.clone()))
                    .add(Column::LastName.like(pattern.clone()))
                    .add(Column::Email.like(pattern)),
            );
        }

        let paginator = select
            .order_by_asc(Column::LastName)
            .order_by_asc(Column::FirstName)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询教师总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询教师页数失败"))?;
        let teachers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询教师列表失败"))?;

        Ok(TeacherListResponse {
            items: teachers.into_iter().map(|m| m.into_teacher()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_teacher_impl(
        &self,
        id: i64,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        if self.get_teacher_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }
        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(email) = update.email {
            model.email = Set(Some(email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(qualification) = update.qualification {
            model.qualification = Set(Some(qualification));
        }
        if let Some(hired_on) = update.hired_on {
            model.hired_on = Set(Some(date_to_string(hired_on)));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model.update(&self.db).await.map_err(db_error("更新教师失败"))?;

        self.get_teacher_by_id_impl(id).await
    }

    pub async fn soft_delete_teacher_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Teachers::update_many()
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(TeacherStatus::Inactive.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_error("删除教师失败"))?;

        Ok(result.rows_affected > 0)
    }

    // 教学分配

    pub async fn create_teacher_assignment_impl(
        &self,
        school_id: i64,
        teacher_id: i64,
        req: CreateTeacherAssignmentRequest,
    ) -> Result<TeacherAssignment> {
        let model = AssignmentActiveModel {
            school_id: Set(school_id),
            teacher_id: Set(teacher_id),
            class_id: Set(req.class_id),
            section_id: Set(req.section_id),
            subject_id: Set(req.subject_id),
            is_class_teacher: Set(req.is_class_teacher),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(db_error("创建教学分配失败"))?;

        Ok(result.into_teacher_assignment())
    }

    /// 查找完全相同的教学分配（可空列按 IS NULL 匹配）
    pub async fn find_teacher_assignment_impl(
        &self,
        teacher_id: i64,
        req: &CreateTeacherAssignmentRequest,
    ) -> Result<Option<TeacherAssignment>> {
        let mut select = TeacherAssignments::find()
            .filter(AssignmentColumn::TeacherId.eq(teacher_id))
            .filter(AssignmentColumn::ClassId.eq(req.class_id));

        select = match req.section_id {
            Some(section_id) => select.filter(AssignmentColumn::SectionId.eq(section_id)),
            None => select.filter(AssignmentColumn::SectionId.is_null()),
        };
        select = match req.subject_id {
            Some(subject_id) => select.filter(AssignmentColumn::SubjectId.eq(subject_id)),
            None => select.filter(AssignmentColumn::SubjectId.is_null()),
        };

        let result = select
            .one(&self.db)
            .await
            .map_err(db_error("查询教学分配失败"))?;

        Ok(result.map(|m| m.into_teacher_assignment()))
    }

    pub async fn get_teacher_assignment_by_id_impl(
        &self,
        id: i64,
    ) -> Result<Option<TeacherAssignment>> {
        let result = TeacherAssignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询教学分配失败"))?;

        Ok(result.map(|m| m.into_teacher_assignment()))
    }

    pub async fn list_teacher_assignments_impl(
        &self,
        teacher_id: i64,
    ) -> Result<Vec<TeacherAssignment>> {
        let result = TeacherAssignments::find()
            .filter(AssignmentColumn::TeacherId.eq(teacher_id))
            .order_by_asc(AssignmentColumn::ClassId)
            .order_by_asc(AssignmentColumn::Id)
            .all(&self.db)
            .await
            .map_err(db_error("查询教学分配列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_teacher_assignment()).collect())
    }

    pub async fn delete_teacher_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = TeacherAssignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除教学分配失败"))?;

        Ok(result.rows_affected > 0)
    }
}
