//! Listing catalog (categories, sub-categories, tour types and themes) and
//! the per-partner category grants that bound what a partner may list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

string_enum! {
    /// Broad family a category belongs to.
    pub enum CategoryKind {
        Accommodation => "ACCOMMODATION",
        Tour => "TOUR",
        Activity => "ACTIVITY",
        VehicleRental => "VEHICLE_RENTAL",
        Guide => "GUIDE",
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubCategory {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    /// Descriptor of extra listing fields this sub-category expects
    #[schema(value_type = Option<Object>)]
    pub required_fields: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TourType {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TourTheme {
    pub id: Uuid,
    pub theme: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Grant allowing a partner to list under a category.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategoryGrant {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub category_id: Uuid,
    pub sub_category_ids: Vec<Uuid>,
    pub tour_type_ids: Vec<Uuid>,
    pub tour_theme_ids: Vec<Uuid>,
}

impl CategoryGrant {
    pub fn allows_sub_category(&self, sub_category_id: Uuid) -> bool {
        self.sub_category_ids.contains(&sub_category_id)
    }
}

/// Upsert of a partner's grant for one category.
///
/// Provided id sets replace the stored ones; omitted sets are kept
/// (or start empty for a new grant).
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CategoryGrantUpdate {
    pub partner_id: Uuid,
    pub category_id: Uuid,
    pub sub_category_ids: Option<Vec<Uuid>>,
    pub tour_type_ids: Option<Vec<Uuid>>,
    pub tour_theme_ids: Option<Vec<Uuid>>,
}

impl CategoryGrantUpdate {
    /// Resulting grant after applying this update to `existing`.
    pub fn merge(self, existing: Option<CategoryGrant>) -> CategoryGrant {
        let (id, subs, types, themes) = match existing {
            Some(grant) => (
                grant.id,
                grant.sub_category_ids,
                grant.tour_type_ids,
                grant.tour_theme_ids,
            ),
            None => (Uuid::new_v4(), Vec::new(), Vec::new(), Vec::new()),
        };

        CategoryGrant {
            id,
            partner_id: self.partner_id,
            category_id: self.category_id,
            sub_category_ids: dedup(self.sub_category_ids.unwrap_or(subs)),
            tour_type_ids: dedup(self.tour_type_ids.unwrap_or(types)),
            tour_theme_ids: dedup(self.tour_theme_ids.unwrap_or(themes)),
        }
    }
}

fn dedup(mut ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::new();
    ids.retain(|id| seen.insert(*id));
    ids
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewCategory {
    #[validate(length(min = 2, message = "Category name must be at least 2 characters"))]
    pub name: String,
    pub kind: CategoryKind,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewSubCategory {
    pub category_id: Uuid,
    #[validate(length(min = 2, message = "Sub-category name must be at least 2 characters"))]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub required_fields: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewTourType {
    #[validate(length(min = 2, message = "Tour type name must be at least 2 characters"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewTourTheme {
    #[validate(length(min = 2, message = "Tour theme must be at least 2 characters"))]
    pub theme: String,
    pub description: Option<String>,
}
