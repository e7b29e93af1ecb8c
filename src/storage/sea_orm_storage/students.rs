use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::date_to_string;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    students::{
        entities::{Student, StudentStatus},
        requests::{NewStudent, StudentListQuery, UpdateStudentRequest},
        responses::StudentListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};

fn new_student_model(student: NewStudent, now: i64) -> ActiveModel {
    ActiveModel {
        school_id: Set(student.school_id),
        user_id: Set(student.user_id),
        guardian_id: Set(student.guardian_id),
        admission_no: Set(student.admission_no),
        first_name: Set(student.first_name),
        last_name: Set(student.last_name),
        gender: Set(student.gender),
        date_of_birth: Set(student.date_of_birth.map(date_to_string)),
        status: Set(StudentStatus::Active.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        ..Default::default()
    }
}

impl SeaOrmStorage {
    pub async fn create_student_impl(&self, student: NewStudent) -> Result<Student> {
        let now = chrono::Utc::now().timestamp();
        let result = new_student_model(student, now)
            .insert(&self.db)
            .await
            .map_err(db_error("创建学生失败"))?;

        Ok(result.into_student())
    }

    /// 在单个事务中写入一批学生，返回写入行数
    pub async fn bulk_create_students_impl(&self, students: Vec<NewStudent>) -> Result<usize> {
        if students.is_empty() {
            return Ok(0);
        }

        let count = students.len();
        let now = chrono::Utc::now().timestamp();
        let models: Vec<ActiveModel> = students
            .into_iter()
            .map(|s| new_student_model(s, now))
            .collect();

        let txn = self.db.begin().await.map_err(db_error("开启事务失败"))?;
        Students::insert_many(models)
            .exec(&txn)
            .await
            .map_err(db_error("批量创建学生失败"))?;
        txn.commit().await.map_err(db_error("提交事务失败"))?;

        Ok(count)
    }

    pub async fn get_student_by_id_impl(&self, id: i64) -> Result<Option<Student>> {
        let result = Students::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 按登录账号查找学生档案
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 学号在校内唯一（包含已删除的学生）
    pub async fn get_student_by_admission_no_impl(
        &self,
        school_id: i64,
        admission_no: &str,
    ) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::AdmissionNo.eq(admission_no))
            .one(&self.db)
            .await
            .map_err(db_error("查询学生失败"))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 返回给定学号中已存在的那些
    pub async fn find_existing_admission_nos_impl(
        &self,
        school_id: i64,
        admission_nos: &[String],
    ) -> Result<Vec<String>> {
        if admission_nos.is_empty() {
            return Ok(Vec::new());
        }

        Students::find()
            .select_only()
            .column(Column::AdmissionNo)
            .filter(Column::SchoolId.eq(school_id))
            .filter(Column::AdmissionNo.is_in(admission_nos.iter().cloned()))
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .map_err(db_error("查询学号失败"))
    }

    pub async fn list_students_with_pagination_impl(
        &self,
        query: StudentListQuery,
    ) -> Result<StudentListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Students::find()
            .filter(Column::SchoolId.eq(query.school_id))
            .filter(Column::DeletedAt.is_null());

        // 班级/小组筛选：先取当前在读的学生 ID
        if let Some(class_id) = query.class_id {
            let ids = self
                .active_student_ids_in_class_impl(class_id, query.section_id)
                .await?;
            select = select.filter(Column::Id.is_in(ids));
        }

        if let Some(guardian_id) = query.guardian_id {
            select = select.filter(Column::GuardianId.eq(guardian_id));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::AdmissionNo.like(pattern.clone()))
                    .add(Column::FirstName.like(pattern.clone()))
                    .add(Column::LastName.like(pattern)),
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
            .map_err(db_error("查询学生总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询学生页数失败"))?;
        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询学生列表失败"))?;

        Ok(StudentListResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_student_impl(
        &self,
        id: i64,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        if self.get_student_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(first_name) = update.first_name {
            model.first_name = Set(first_name);
        }
        if let Some(last_name) = update.last_name {
            model.last_name = Set(last_name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender));
        }
        if let Some(date_of_birth) = update.date_of_birth {
            model.date_of_birth = Set(Some(date_to_string(date_of_birth)));
        }
        if let Some(guardian_id) = update.guardian_id {
            model.guardian_id = Set(Some(guardian_id));
        }
        if let Some(user_id) = update.user_id {
            model.user_id = Set(Some(user_id));
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        model.update(&self.db).await.map_err(db_error("更新学生失败"))?;

        self.get_student_by_id_impl(id).await
    }

    /// 软删除学生
    pub async fn soft_delete_student_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Students::update_many()
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(
                Column::Status,
                sea_orm::sea_query::Expr::value(StudentStatus::Inactive.to_string()),
            )
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_error("删除学生失败"))?;

        Ok(result.rows_affected > 0)
    }
}
