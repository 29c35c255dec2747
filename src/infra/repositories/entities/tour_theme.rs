//! Tour theme database entity.

use sea_orm::entity::prelude::*;

use crate::domain::TourTheme;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tour_themes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub theme: String,
    pub description: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for TourTheme {
    fn from(model: Model) -> Self {
        TourTheme {
            id: model.id,
            theme: model.theme,
            description: model.description,
            created_at: model.created_at,
        }
    }
}
