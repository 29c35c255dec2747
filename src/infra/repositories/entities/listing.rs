//! Listing database entity.

use sea_orm::entity::prelude::*;

use super::strings_from_json;
use crate::domain::Listing;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub partner_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category_id: Uuid,
    pub sub_category_id: Option<Uuid>,
    pub customer_type: Option<String>,
    pub tour_kind: Option<String>,
    /// Minor currency units
    pub base_price: i64,
    pub currency: String,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub images: Json,
    pub status: String,
    pub rejection_reason: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Listing {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Listing {
            id: model.id,
            partner_id: model.partner_id,
            title: model.title,
            description: model.description,
            category_id: model.category_id,
            sub_category_id: model.sub_category_id,
            customer_type: model.customer_type.as_deref().map(str::parse).transpose()?,
            tour_kind: model.tour_kind.as_deref().map(str::parse).transpose()?,
            base_price: model.base_price,
            currency: model.currency,
            location: model.location,
            capacity: model.capacity,
            images: strings_from_json(model.images)?,
            status: model.status.parse()?,
            rejection_reason: model.rejection_reason,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
