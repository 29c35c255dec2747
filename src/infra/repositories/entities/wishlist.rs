//! Wishlist entry entity. Unique per (user, listing).

use sea_orm::entity::prelude::*;

use crate::domain::WishlistEntry;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "wishlist_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for WishlistEntry {
    fn from(model: Model) -> Self {
        WishlistEntry {
            id: model.id,
            user_id: model.user_id,
            listing_id: model.listing_id,
            created_at: model.created_at,
        }
    }
}
