//! Listings, their moderation state and the partner permission rules a
//! listing must satisfy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::{CategoryGrant, Partner};
use crate::config::DEFAULT_CURRENCY;

string_enum! {
    /// Moderation state of a listing.
    pub enum ListingStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

string_enum! {
    /// Travelers a listing is offered to.
    pub enum CustomerType {
        Local => "LOCAL",
        International => "INTERNATIONAL",
        Both => "BOTH",
    }
}

string_enum! {
    /// Group or private tour.
    pub enum TourKind {
        Group => "GROUP",
        Private => "PRIVATE",
    }
}

string_enum! {
    /// State of a partner-submitted modification request.
    pub enum ModificationStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

/// Listing domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Listing {
    pub id: Uuid,
    pub partner_id: Uuid,
    pub title: String,
    pub description: String,
    pub category_id: Uuid,
    pub sub_category_id: Option<Uuid>,
    pub customer_type: Option<CustomerType>,
    pub tour_kind: Option<TourKind>,
    /// Base price in minor currency units
    pub base_price: i64,
    pub currency: String,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub images: Vec<String>,
    pub status: ListingStatus,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Listing {
    pub fn is_bookable(&self) -> bool {
        self.status == ListingStatus::Approved
    }

    pub fn scope(&self) -> ListingScope {
        ListingScope {
            category_id: self.category_id,
            sub_category_id: self.sub_category_id,
            customer_type: self.customer_type,
            tour_kind: self.tour_kind,
        }
    }
}

/// Partner input for a new listing.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ListingDraft {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub category_id: Uuid,
    pub sub_category_id: Option<Uuid>,
    pub customer_type: Option<CustomerType>,
    pub tour_kind: Option<TourKind>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub base_price: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl ListingDraft {
    pub fn scope(&self) -> ListingScope {
        ListingScope {
            category_id: self.category_id,
            sub_category_id: self.sub_category_id,
            customer_type: self.customer_type,
            tour_kind: self.tour_kind,
        }
    }
}

/// Partial listing update; omitted fields are untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ListingPatch {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,
    pub category_id: Option<Uuid>,
    pub sub_category_id: Option<Uuid>,
    pub customer_type: Option<CustomerType>,
    pub tour_kind: Option<TourKind>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub base_price: Option<i64>,
    pub location: Option<String>,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,
    pub images: Option<Vec<String>>,
}

impl ListingPatch {
    pub fn is_empty(&self) -> bool {
        *self == ListingPatch::default()
    }

    /// Whether applying this patch can change what the partner must be
    /// permitted to offer.
    pub fn touches_permissions(&self) -> bool {
        self.category_id.is_some()
            || self.sub_category_id.is_some()
            || self.customer_type.is_some()
            || self.tour_kind.is_some()
    }

    pub fn apply(&self, listing: &mut Listing) {
        if let Some(title) = &self.title {
            listing.title = title.clone();
        }
        if let Some(description) = &self.description {
            listing.description = description.clone();
        }
        if let Some(category_id) = self.category_id {
            listing.category_id = category_id;
            // A sub-category never survives a category change on its own.
            listing.sub_category_id = None;
        }
        if let Some(sub_category_id) = self.sub_category_id {
            listing.sub_category_id = Some(sub_category_id);
        }
        if let Some(customer_type) = self.customer_type {
            listing.customer_type = Some(customer_type);
        }
        if let Some(tour_kind) = self.tour_kind {
            listing.tour_kind = Some(tour_kind);
        }
        if let Some(price) = self.base_price {
            listing.base_price = price;
        }
        if let Some(location) = &self.location {
            listing.location = Some(location.clone());
        }
        if let Some(capacity) = self.capacity {
            listing.capacity = Some(capacity);
        }
        if let Some(images) = &self.images {
            listing.images = images.clone();
        }
    }
}

/// Partner-submitted change awaiting admin review.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ModificationRequest {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub partner_id: Uuid,
    pub patch: ListingPatch,
    pub status: ModificationStatus,
    pub admin_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The attributes of a listing that partner permissions constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingScope {
    pub category_id: Uuid,
    pub sub_category_id: Option<Uuid>,
    pub customer_type: Option<CustomerType>,
    pub tour_kind: Option<TourKind>,
}

/// Reason a partner may not offer a listing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListingPermissionError {
    #[error("Unauthorized customer type: {0}")]
    CustomerType(CustomerType),

    #[error("Group tours not allowed")]
    GroupToursNotAllowed,

    #[error("Private tours not allowed")]
    PrivateToursNotAllowed,

    #[error("No permission for this category")]
    CategoryNotGranted,

    #[error("No permission for selected subcategory")]
    SubCategoryNotGranted,
}

/// Check a listing scope against the partner's flags and category grants.
///
/// Customer type, tour kind and category are checked in that order; the
/// first failure is returned.
pub fn validate_listing_permissions(
    partner: &Partner,
    grants: &[CategoryGrant],
    scope: &ListingScope,
) -> Result<(), ListingPermissionError> {
    check_customer_type(partner, scope.customer_type)?;
    check_tour_kind(partner, scope.tour_kind)?;
    check_category(grants, scope.category_id, scope.sub_category_id)
}

fn check_customer_type(
    partner: &Partner,
    customer_type: Option<CustomerType>,
) -> Result<(), ListingPermissionError> {
    let allowed = match customer_type {
        None => true,
        Some(CustomerType::Local) => !partner.allow_international,
        Some(CustomerType::International) | Some(CustomerType::Both) => {
            partner.allow_international
        }
    };

    match customer_type {
        Some(requested) if !allowed => Err(ListingPermissionError::CustomerType(requested)),
        _ => Ok(()),
    }
}

fn check_tour_kind(
    partner: &Partner,
    tour_kind: Option<TourKind>,
) -> Result<(), ListingPermissionError> {
    match tour_kind {
        Some(TourKind::Group) if !partner.allow_group => {
            Err(ListingPermissionError::GroupToursNotAllowed)
        }
        Some(TourKind::Private) if !partner.allow_private => {
            Err(ListingPermissionError::PrivateToursNotAllowed)
        }
        _ => Ok(()),
    }
}

fn check_category(
    grants: &[CategoryGrant],
    category_id: Uuid,
    sub_category_id: Option<Uuid>,
) -> Result<(), ListingPermissionError> {
    let grant = grants
        .iter()
        .find(|grant| grant.category_id == category_id)
        .ok_or(ListingPermissionError::CategoryNotGranted)?;

    match sub_category_id {
        Some(sub) if !grant.allows_sub_category(sub) => {
            Err(ListingPermissionError::SubCategoryNotGranted)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PartnerType, VerificationStatus};

    fn partner(international: bool, group: bool, private: bool) -> Partner {
        Partner {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            partner_type: PartnerType::Operator,
            verification_status: VerificationStatus::Approved,
            commission_rate: 0.0,
            allow_international: international,
            allow_group: group,
            allow_private: private,
            business_name: "Skardu Treks".into(),
            contact_person: "Imran".into(),
            phone_number: "03001234567".into(),
            profile: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn grant(partner: &Partner, category_id: Uuid, subs: Vec<Uuid>) -> CategoryGrant {
        CategoryGrant {
            id: Uuid::new_v4(),
            partner_id: partner.id,
            category_id,
            sub_category_ids: subs,
            tour_type_ids: vec![],
            tour_theme_ids: vec![],
        }
    }

    fn scope(category_id: Uuid) -> ListingScope {
        ListingScope {
            category_id,
            sub_category_id: None,
            customer_type: None,
            tour_kind: None,
        }
    }

    #[test]
    fn test_customer_type_rules() {
        let category = Uuid::new_v4();
        let domestic = partner(false, true, true);
        let global = partner(true, true, true);
        let grants_d = vec![grant(&domestic, category, vec![])];
        let grants_g = vec![grant(&global, category, vec![])];

        let with = |ct| ListingScope {
            customer_type: Some(ct),
            ..scope(category)
        };

        assert!(validate_listing_permissions(&domestic, &grants_d, &with(CustomerType::Local)).is_ok());
        assert_eq!(
            validate_listing_permissions(&domestic, &grants_d, &with(CustomerType::Both)),
            Err(ListingPermissionError::CustomerType(CustomerType::Both))
        );
        assert!(
            validate_listing_permissions(&global, &grants_g, &with(CustomerType::International))
                .is_ok()
        );
        assert_eq!(
            validate_listing_permissions(&global, &grants_g, &with(CustomerType::Local)),
            Err(ListingPermissionError::CustomerType(CustomerType::Local))
        );
    }

    #[test]
    fn test_tour_kind_rules() {
        let category = Uuid::new_v4();
        let p = partner(false, false, true);
        let grants = vec![grant(&p, category, vec![])];

        let group = ListingScope {
            tour_kind: Some(TourKind::Group),
            ..scope(category)
        };
        let private = ListingScope {
            tour_kind: Some(TourKind::Private),
            ..scope(category)
        };

        assert_eq!(
            validate_listing_permissions(&p, &grants, &group),
            Err(ListingPermissionError::GroupToursNotAllowed)
        );
        assert!(validate_listing_permissions(&p, &grants, &private).is_ok());
    }

    #[test]
    fn test_category_must_be_granted() {
        let category = Uuid::new_v4();
        let p = partner(false, true, true);

        assert_eq!(
            validate_listing_permissions(&p, &[], &scope(category)),
            Err(ListingPermissionError::CategoryNotGranted)
        );

        let grants = vec![grant(&p, category, vec![])];
        assert!(validate_listing_permissions(&p, &grants, &scope(category)).is_ok());
    }

    #[test]
    fn test_sub_category_must_be_in_grant() {
        let category = Uuid::new_v4();
        let allowed = Uuid::new_v4();
        let p = partner(false, true, true);
        let grants = vec![grant(&p, category, vec![allowed])];

        let ok = ListingScope {
            sub_category_id: Some(allowed),
            ..scope(category)
        };
        let denied = ListingScope {
            sub_category_id: Some(Uuid::new_v4()),
            ..scope(category)
        };

        assert!(validate_listing_permissions(&p, &grants, &ok).is_ok());
        assert_eq!(
            validate_listing_permissions(&p, &grants, &denied),
            Err(ListingPermissionError::SubCategoryNotGranted)
        );
    }

    #[test]
    fn test_patch_category_change_clears_sub_category() {
        let mut listing = Listing {
            id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            title: "Fairy Meadows trek".into(),
            description: "Three days".into(),
            category_id: Uuid::new_v4(),
            sub_category_id: Some(Uuid::new_v4()),
            customer_type: None,
            tour_kind: None,
            base_price: 1_000_000,
            currency: "PKR".into(),
            location: None,
            capacity: None,
            images: vec![],
            status: ListingStatus::Approved,
            rejection_reason: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let new_category = Uuid::new_v4();
        let patch = ListingPatch {
            category_id: Some(new_category),
            base_price: Some(1_200_000),
            ..Default::default()
        };

        assert!(patch.touches_permissions());
        patch.apply(&mut listing);

        assert_eq!(listing.category_id, new_category);
        assert_eq!(listing.sub_category_id, None);
        assert_eq!(listing.base_price, 1_200_000);
    }

    #[test]
    fn test_price_only_patch_does_not_touch_permissions() {
        let patch = ListingPatch {
            base_price: Some(5),
            ..Default::default()
        };
        assert!(!patch.touches_permissions());
        assert!(!patch.is_empty());
        assert!(ListingPatch::default().is_empty());
    }
}
