//! 班级、小组（section）与科目

use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::classes::{ActiveModel as ClassActiveModel, Column as ClassColumn, Entity as Classes};
use crate::entity::sections::{
    ActiveModel as SectionActiveModel, Column as SectionColumn, Entity as Sections,
};
use crate::entity::subjects::{
    ActiveModel as SubjectActiveModel, Column as SubjectColumn, Entity as Subjects,
};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    classes::{
        entities::{Class, Section, Subject},
        requests::{
            ClassListQuery, CreateClassRequest, CreateSectionRequest, CreateSubjectRequest,
            SubjectListQuery, UpdateClassRequest, UpdateSectionRequest, UpdateSubjectRequest,
        },
        responses::{ClassListResponse, SubjectListResponse},
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_class_impl(&self, school_id: i64, req: CreateClassRequest) -> Result<Class> {
        let now = chrono::Utc::now().timestamp();

        let model = ClassActiveModel {
            school_id: Set(school_id),
            name: Set(req.name.trim().to_string()),
            grade_level: Set(req.grade_level),
            academic_year: Set(req.academic_year.trim().to_string()),
            class_teacher_id: Set(req.class_teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建班级失败"))?;

        Ok(result.into_class())
    }

    pub async fn get_class_by_id_impl(&self, id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询班级失败"))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 同一学校同一学年内班级名称唯一
    pub async fn find_class_by_name_impl(
        &self,
        school_id: i64,
        name: &str,
        academic_year: &str,
    ) -> Result<Option<Class>> {
        let result = Classes::find()
            .filter(ClassColumn::SchoolId.eq(school_id))
            .filter(ClassColumn::Name.eq(name))
            .filter(ClassColumn::AcademicYear.eq(academic_year))
            .one(&self.db)
            .await
            .map_err(db_error("查询班级失败"))?;

        Ok(result.map(|m| m.into_class()))
    }

    pub async fn list_classes_with_pagination_impl(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Classes::find().filter(ClassColumn::SchoolId.eq(query.school_id));

        if let Some(ref academic_year) = query.academic_year {
            select = select.filter(ClassColumn::AcademicYear.eq(academic_year.as_str()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            select = select.filter(ClassColumn::Name.like(contains_pattern(search.trim())));
        }

        let paginator = select
            .order_by_desc(ClassColumn::AcademicYear)
            .order_by_asc(ClassColumn::GradeLevel)
            .order_by_asc(ClassColumn::Name)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询班级总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询班级页数失败"))?;
        let classes = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询班级列表失败"))?;

        Ok(ClassListResponse {
            items: classes.into_iter().map(|m| m.into_class()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_class_impl(
        &self,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        if self.get_class_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ClassActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(grade_level) = update.grade_level {
            model.grade_level = Set(Some(grade_level));
        }
        if let Some(academic_year) = update.academic_year {
            model.academic_year = Set(academic_year.trim().to_string());
        }
        if let Some(class_teacher_id) = update.class_teacher_id {
            model.class_teacher_id = Set(Some(class_teacher_id));
        }

        model.update(&self.db).await.map_err(db_error("更新班级失败"))?;

        self.get_class_by_id_impl(id).await
    }

    pub async fn delete_class_impl(&self, id: i64) -> Result<bool> {
        let result = Classes::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除班级失败"))?;

        Ok(result.rows_affected > 0)
    }

    // 小组

    pub async fn create_section_impl(
        &self,
        school_id: i64,
        class_id: i64,
        req: CreateSectionRequest,
    ) -> Result<Section> {
        let now = chrono::Utc::now().timestamp();

        let model = SectionActiveModel {
            school_id: Set(school_id),
            class_id: Set(class_id),
            name: Set(req.name.trim().to_string()),
            capacity: Set(req.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建小组失败"))?;

        Ok(result.into_section())
    }

    pub async fn get_section_by_id_impl(&self, id: i64) -> Result<Option<Section>> {
        let result = Sections::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询小组失败"))?;

        Ok(result.map(|m| m.into_section()))
    }

    pub async fn find_section_by_name_impl(
        &self,
        class_id: i64,
        name: &str,
    ) -> Result<Option<Section>> {
        let result = Sections::find()
            .filter(SectionColumn::ClassId.eq(class_id))
            .filter(SectionColumn::Name.eq(name))
            .one(&self.db)
            .await
            .map_err(db_error("查询小组失败"))?;

        Ok(result.map(|m| m.into_section()))
    }

    pub async fn list_sections_impl(&self, class_id: i64) -> Result<Vec<Section>> {
        let result = Sections::find()
            .filter(SectionColumn::ClassId.eq(class_id))
            .order_by_asc(SectionColumn::Name)
            .all(&self.db)
            .await
            .map_err(db_error("查询小组列表失败"))?;

        Ok(result.into_iter().map(|m| m.into_section()).collect())
    }

    pub async fn update_section_impl(
        &self,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        if self.get_section_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = SectionActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(capacity) = update.capacity {
            model.capacity = Set(Some(capacity));
        }

        model.update(&self.db).await.map_err(db_error("更新小组失败"))?;

        self.get_section_by_id_impl(id).await
    }

    pub async fn delete_section_impl(&self, id: i64) -> Result<bool> {
        let result = Sections::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除小组失败"))?;

        Ok(result.rows_affected > 0)
    }

    // 科目

    pub async fn create_subject_impl(
        &self,
        school_id: i64,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        let now = chrono::Utc::now().timestamp();

        let model = SubjectActiveModel {
            school_id: Set(school_id),
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.trim().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建科目失败"))?;

        Ok(result.into_subject())
    }

    pub async fn get_subject_by_id_impl(&self, id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_error("查询科目失败"))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn get_subject_by_code_impl(
        &self,
        school_id: i64,
        code: &str,
    ) -> Result<Option<Subject>> {
        let result = Subjects::find()
            .filter(SubjectColumn::SchoolId.eq(school_id))
            .filter(SubjectColumn::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_error("查询科目失败"))?;

        Ok(result.map(|m| m.into_subject()))
    }

    pub async fn list_subjects_with_pagination_impl(
        &self,
        query: SubjectListQuery,
    ) -> Result<SubjectListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Subjects::find().filter(SubjectColumn::SchoolId.eq(query.school_id));

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(SubjectColumn::Name.like(pattern.clone()))
                    .add(SubjectColumn::Code.like(pattern)),
            );
        }

        let paginator = select
            .order_by_asc(SubjectColumn::Code)
            .paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询科目总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询科目页数失败"))?;
        let subjects = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询科目列表失败"))?;

        Ok(SubjectListResponse {
            items: subjects.into_iter().map(|m| m.into_subject()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_subject_impl(
        &self,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Option<Subject>> {
        if self.get_subject_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = SubjectActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(code) = update.code {
            model.code = Set(code.trim().to_string());
        }

        model.update(&self.db).await.map_err(db_error("更新科目失败"))?;

        self.get_subject_by_id_impl(id).await
    }

    pub async fn delete_subject_impl(&self, id: i64) -> Result<bool> {
        let result = Subjects::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_error("删除科目失败"))?;

        Ok(result.rows_affected > 0)
    }
}
