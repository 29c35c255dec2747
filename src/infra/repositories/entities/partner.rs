//! Partner database entity.

use sea_orm::entity::prelude::*;

use crate::domain::Partner;
use crate::errors::AppError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "partners")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub partner_type: String,
    pub verification_status: String,
    pub commission_rate: f64,
    pub allow_international: bool,
    pub allow_group: bool,
    pub allow_private: bool,
    pub business_name: String,
    pub contact_person: String,
    pub phone_number: String,
    pub profile: Json,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Partner {
    type Error = AppError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Partner {
            id: model.id,
            user_id: model.user_id,
            partner_type: model.partner_type.parse()?,
            verification_status: model.verification_status.parse()?,
            commission_rate: model.commission_rate,
            allow_international: model.allow_international,
            allow_group: model.allow_group,
            allow_private: model.allow_private,
            business_name: model.business_name,
            contact_person: model.contact_person,
            phone_number: model.phone_number,
            profile: model.profile,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
