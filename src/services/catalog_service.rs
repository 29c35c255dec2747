//! Catalog management: categories, sub-categories, tour types and themes.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::AccessControl;
use crate::domain::{
    AdminActionType, Category, NewCategory, NewSubCategory, NewTourTheme, NewTourType,
    SubCategory, TourTheme, TourType,
};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    async fn list_sub_categories(&self, category_id: Uuid) -> AppResult<Vec<SubCategory>>;

    async fn create_category(&self, actor_id: Uuid, input: NewCategory) -> AppResult<Category>;

    async fn create_sub_category(
        &self,
        actor_id: Uuid,
        input: NewSubCategory,
    ) -> AppResult<SubCategory>;

    async fn create_tour_type(&self, actor_id: Uuid, input: NewTourType) -> AppResult<TourType>;

    async fn create_tour_theme(&self, actor_id: Uuid, input: NewTourTheme)
        -> AppResult<TourTheme>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
    access: Arc<dyn AccessControl>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>, access: Arc<dyn AccessControl>) -> Self {
        Self { uow, access }
    }

    async fn authorize(&self, actor_id: Uuid) -> AppResult<()> {
        self.access
            .require(actor_id, AdminActionType::CategoryManagement)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.catalog().list_categories().await
    }

    async fn list_sub_categories(&self, category_id: Uuid) -> AppResult<Vec<SubCategory>> {
        self.uow
            .catalog()
            .find_category(category_id)
            .await?
            .ok_or_not_found()?;
        self.uow.catalog().sub_categories_of(category_id).await
    }

    async fn create_category(&self, actor_id: Uuid, input: NewCategory) -> AppResult<Category> {
        self.authorize(actor_id).await?;
        input.validate()?;

        let category = self.uow.catalog().create_category(input).await?;
        tracing::info!(%actor_id, category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    async fn create_sub_category(
        &self,
        actor_id: Uuid,
        input: NewSubCategory,
    ) -> AppResult<SubCategory> {
        self.authorize(actor_id).await?;
        input.validate()?;

        self.uow
            .catalog()
            .find_category(input.category_id)
            .await?
            .ok_or_not_found()?;

        let sub_category = self.uow.catalog().create_sub_category(input).await?;
        tracing::info!(
            %actor_id,
            sub_category_id = %sub_category.id,
            category_id = %sub_category.category_id,
            "Sub-category created"
        );
        Ok(sub_category)
    }

    async fn create_tour_type(&self, actor_id: Uuid, input: NewTourType) -> AppResult<TourType> {
        self.authorize(actor_id).await?;
        input.validate()?;

        let tour_type = self.uow.catalog().create_tour_type(input).await?;
        tracing::info!(%actor_id, tour_type_id = %tour_type.id, "Tour type created");
        Ok(tour_type)
    }

    async fn create_tour_theme(
        &self,
        actor_id: Uuid,
        input: NewTourTheme,
    ) -> AppResult<TourTheme> {
        self.authorize(actor_id).await?;
        input.validate()?;

        let theme = self.uow.catalog().create_tour_theme(input).await?;
        tracing::info!(%actor_id, tour_theme_id = %theme.id, "Tour theme created");
        Ok(theme)
    }
}
