//! Partner category grant entity. Unique per (partner, category).

use sea_orm::entity::prelude::*;

use super::ids_from_json;
use crate::domain::CategoryGrant;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "category_permissions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub partner_id: Uuid,
    pub category_id: Uuid,
    pub sub_category_ids: Json,
    pub tour_type_ids: Json,
    pub tour_theme_ids: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for CategoryGrant {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(CategoryGrant {
            id: model.id,
            partner_id: model.partner_id,
            category_id: model.category_id,
            sub_category_ids: ids_from_json(model.sub_category_ids)?,
            tour_type_ids: ids_from_json(model.tour_type_ids)?,
            tour_theme_ids: ids_from_json(model.tour_theme_ids)?,
        })
    }
}
