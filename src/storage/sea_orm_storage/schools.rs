use super::{SeaOrmStorage, db_error, page_params};
use crate::entity::schools::{ActiveModel, Column, Entity as Schools};
use crate::errors::Result;
use crate::models::{
    PaginationInfo,
    schools::{
        entities::School,
        requests::{CreateSchoolRequest, SchoolListQuery, UpdateSchoolRequest},
        responses::SchoolListResponse,
    },
};
use crate::utils::contains_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};

impl SeaOrmStorage {
    pub async fn create_school_impl(&self, req: CreateSchoolRequest) -> Result<School> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            name: Set(req.name),
            code: Set(req.code),
            address: Set(req.address),
            contact_email: Set(req.contact_email),
            phone: Set(req.phone),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(db_error("创建学校失败"))?;

        Ok(result.into_school())
    }

    /// 获取学校（已删除的学校视为不存在）
    pub async fn get_school_by_id_impl(&self, id: i64) -> Result<Option<School>> {
        let result = Schools::find_by_id(id)
            .filter(Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .map_err(db_error("查询学校失败"))?;

        Ok(result.map(|m| m.into_school()))
    }

    /// 按代码查找学校（包含已删除，代码全局唯一）
    pub async fn get_school_by_code_impl(&self, code: &str) -> Result<Option<School>> {
        let result = Schools::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(db_error("查询学校失败"))?;

        Ok(result.map(|m| m.into_school()))
    }

    pub async fn list_schools_with_pagination_impl(
        &self,
        query: SchoolListQuery,
    ) -> Result<SchoolListResponse> {
        let (page, size) = page_params(query.page, query.size);

        let mut select = Schools::find().filter(Column::DeletedAt.is_null());

        if !query.include_inactive {
            select = select.filter(Column::IsActive.eq(true));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Name.like(pattern.clone()))
                    .add(Column::Code.like(pattern)),
            );
        }

        let paginator = select.order_by_asc(Column::Name).paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(db_error("查询学校总数失败"))?;
        let pages = paginator
            .num_pages()
            .await
            .map_err(db_error("查询学校页数失败"))?;
        let schools = paginator
            .fetch_page(page - 1)
            .await
            .map_err(db_error("查询学校列表失败"))?;

        Ok(SchoolListResponse {
            items: schools.into_iter().map(|m| m.into_school()).collect(),
            pagination: PaginationInfo::new(page, size, total, pages),
        })
    }

    pub async fn update_school_impl(
        &self,
        id: i64,
        update: UpdateSchoolRequest,
    ) -> Result<Option<School>> {
        if self.get_school_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(address) = update.address {
            model.address = Set(Some(address));
        }
        if let Some(contact_email) = update.contact_email {
            model.contact_email = Set(Some(contact_email));
        }
        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }
        if let Some(is_active) = update.is_active {
            model.is_active = Set(is_active);
        }

        model.update(&self.db).await.map_err(db_error("更新学校失败"))?;

        self.get_school_by_id_impl(id).await
    }

    /// 软删除学校：标记 deleted_at 并停用
    pub async fn soft_delete_school_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Schools::update_many()
            .col_expr(Column::DeletedAt, sea_orm::sea_query::Expr::value(now))
            .col_expr(Column::IsActive, sea_orm::sea_query::Expr::value(false))
            .col_expr(Column::UpdatedAt, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .filter(Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .map_err(db_error("删除学校失败"))?;

        Ok(result.rows_affected > 0)
    }
}
