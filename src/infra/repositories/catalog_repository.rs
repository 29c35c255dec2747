//! Catalog repository: categories, sub-categories, tour types and themes,
//! plus the per-partner category grants that reference them.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::base::{conflict_on_unique, convert_all};
use super::entities::{
    category, category_permission, ids_to_json, sub_category, tour_theme, tour_type,
};
use crate::domain::{
    Category, CategoryGrant, NewCategory, NewSubCategory, NewTourTheme, NewTourType,
    SubCategory, TourTheme, TourType,
};
use crate::errors::{AppError, AppResult};

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn create_category(&self, input: NewCategory) -> AppResult<Category>;

    async fn find_category(&self, id: Uuid) -> AppResult<Option<Category>>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    async fn create_sub_category(&self, input: NewSubCategory) -> AppResult<SubCategory>;

    async fn sub_categories_of(&self, category_id: Uuid) -> AppResult<Vec<SubCategory>>;

    async fn create_tour_type(&self, input: NewTourType) -> AppResult<TourType>;

    async fn create_tour_theme(&self, input: NewTourTheme) -> AppResult<TourTheme>;

    async fn grants_for_partner(&self, partner_id: Uuid) -> AppResult<Vec<CategoryGrant>>;

    async fn find_grant(
        &self,
        partner_id: Uuid,
        category_id: Uuid,
    ) -> AppResult<Option<CategoryGrant>>;

    /// Insert or replace the grant for (partner, category).
    async fn upsert_grant(&self, grant: CategoryGrant) -> AppResult<CategoryGrant>;
}

pub struct CatalogStore {
    db: DatabaseConnection,
}

impl CatalogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_grant_model(
        &self,
        partner_id: Uuid,
        category_id: Uuid,
    ) -> AppResult<Option<category_permission::Model>> {
        category_permission::Entity::find()
            .filter(category_permission::Column::PartnerId.eq(partner_id))
            .filter(category_permission::Column::CategoryId.eq(category_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl CatalogRepository for CatalogStore {
    async fn create_category(&self, input: NewCategory) -> AppResult<Category> {
        let model = category::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            kind: Set(input.kind.as_str().to_string()),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(conflict_on_unique("Category"))?;

        Category::try_from(model)
    }

    async fn find_category(&self, id: Uuid) -> AppResult<Option<Category>> {
        category::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Category::try_from)
            .transpose()
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let models = category::Entity::find()
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        convert_all(models)
    }

    async fn create_sub_category(&self, input: NewSubCategory) -> AppResult<SubCategory> {
        let model = sub_category::ActiveModel {
            id: Set(Uuid::new_v4()),
            category_id: Set(input.category_id),
            name: Set(input.name),
            description: Set(input.description),
            required_fields: Set(input.required_fields),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(conflict_on_unique("Sub-category"))?;

        Ok(SubCategory::from(model))
    }

    async fn sub_categories_of(&self, category_id: Uuid) -> AppResult<Vec<SubCategory>> {
        let models = sub_category::Entity::find()
            .filter(sub_category::Column::CategoryId.eq(category_id))
            .order_by_asc(sub_category::Column::Name)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(models.into_iter().map(SubCategory::from).collect())
    }

    async fn create_tour_type(&self, input: NewTourType) -> AppResult<TourType> {
        let model = tour_type::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(conflict_on_unique("Tour type"))?;

        Ok(TourType::from(model))
    }

    async fn create_tour_theme(&self, input: NewTourTheme) -> AppResult<TourTheme> {
        let model = tour_theme::ActiveModel {
            id: Set(Uuid::new_v4()),
            theme: Set(input.theme),
            description: Set(input.description),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .map_err(conflict_on_unique("Tour theme"))?;

        Ok(TourTheme::from(model))
    }

    async fn grants_for_partner(&self, partner_id: Uuid) -> AppResult<Vec<CategoryGrant>> {
        let models = category_permission::Entity::find()
            .filter(category_permission::Column::PartnerId.eq(partner_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;
        convert_all(models)
    }

    async fn find_grant(
        &self,
        partner_id: Uuid,
        category_id: Uuid,
    ) -> AppResult<Option<CategoryGrant>> {
        self.find_grant_model(partner_id, category_id)
            .await?
            .map(CategoryGrant::try_from)
            .transpose()
    }

    async fn upsert_grant(&self, grant: CategoryGrant) -> AppResult<CategoryGrant> {
        let now = Utc::now();
        let model = match self
            .find_grant_model(grant.partner_id, grant.category_id)
            .await?
        {
            Some(existing) => {
                let mut active: category_permission::ActiveModel = existing.into();
                active.sub_category_ids = Set(ids_to_json(&grant.sub_category_ids));
                active.tour_type_ids = Set(ids_to_json(&grant.tour_type_ids));
                active.tour_theme_ids = Set(ids_to_json(&grant.tour_theme_ids));
                active.updated_at = Set(now);
                active.update(&self.db).await
            }
            None => {
                category_permission::ActiveModel {
                    id: Set(grant.id),
                    partner_id: Set(grant.partner_id),
                    category_id: Set(grant.category_id),
                    sub_category_ids: Set(ids_to_json(&grant.sub_category_ids)),
                    tour_type_ids: Set(ids_to_json(&grant.tour_type_ids)),
                    tour_theme_ids: Set(ids_to_json(&grant.tour_theme_ids)),
                    created_at: Set(now),
                    updated_at: Set(now),
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(AppError::from)?;

        CategoryGrant::try_from(model)
    }
}
