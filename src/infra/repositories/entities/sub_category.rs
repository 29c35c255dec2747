//! Sub-category database entity.

use sea_orm::entity::prelude::*;

use crate::domain::SubCategory;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "sub_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub required_fields: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for SubCategory {
    fn from(model: Model) -> Self {
        SubCategory {
            id: model.id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            required_fields: model.required_fields,
            created_at: model.created_at,
        }
    }
}
