//! Booking database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Booking;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub listing_id: Option<Uuid>,
    pub traveler_id: Uuid,
    pub partner_id: Uuid,
    pub booking_type: String,
    pub group_size: Option<i32>,
    pub total_amount: i64,
    pub booking_dates: Json,
    pub status: String,
    pub payment_status: String,
    #[sea_orm(unique)]
    pub transaction_ref: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Booking {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Booking {
            id: model.id,
            listing_id: model.listing_id,
            traveler_id: model.traveler_id,
            partner_id: model.partner_id,
            booking_type: model.booking_type.parse()?,
            group_size: model.group_size,
            total_amount: model.total_amount,
            booking_dates: model.booking_dates,
            status: model.status.parse()?,
            payment_status: model.payment_status.parse()?,
            transaction_ref: model.transaction_ref,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
