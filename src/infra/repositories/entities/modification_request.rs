//! Listing modification request entity.

use sea_orm::entity::prelude::*;

use crate::domain::ModificationRequest;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "listing_modification_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub listing_id: Uuid,
    pub partner_id: Uuid,
    /// Serialized `ListingPatch`
    pub patch: Json,
    pub status: String,
    pub admin_notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for ModificationRequest {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(ModificationRequest {
            id: model.id,
            listing_id: model.listing_id,
            partner_id: model.partner_id,
            patch: serde_json::from_value(model.patch)
                .map_err(|e| AppError::internal(format!("Corrupt listing patch: {}", e)))?,
            status: model.status.parse()?,
            admin_notes: model.admin_notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
