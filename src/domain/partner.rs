//! Partner (supplier) accounts and onboarding profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::errors::{AppError, AppResult};

string_enum! {
    /// Kind of business a partner runs.
    pub enum PartnerType {
        Hotel => "HOTEL",
        Operator => "OPERATOR",
        ActivityProvider => "ACTIVITY_PROVIDER",
        RentalProviders => "RENTAL_PROVIDERS",
        TourGuide => "TOUR_GUIDE",
    }
}

string_enum! {
    /// Back-office verification state of a partner.
    pub enum VerificationStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

/// Partner domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Partner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub partner_type: PartnerType,
    pub verification_status: VerificationStatus,
    /// Commission in percent (0-100)
    pub commission_rate: f64,
    pub allow_international: bool,
    pub allow_group: bool,
    pub allow_private: bool,
    pub business_name: String,
    pub contact_person: String,
    pub phone_number: String,
    /// Type-specific onboarding data as submitted
    #[schema(value_type = Object)]
    pub profile: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields every partner type submits.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct BusinessDetails {
    #[validate(length(min = 2, message = "Business name is required"))]
    pub business_name: String,
    #[validate(length(min = 2, message = "Contact person name is required"))]
    pub contact_person: String,
    #[validate(length(min = 10, message = "Invalid phone number"))]
    pub phone_number: String,
    #[serde(default)]
    pub regions_operated: Option<Vec<String>>,
    #[serde(default)]
    pub services_offered: Option<Vec<String>>,
    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,
    #[validate(url(message = "Invalid Facebook link"))]
    pub facebook_link: Option<String>,
    #[validate(url(message = "Invalid Instagram link"))]
    pub instagram_link: Option<String>,
    #[validate(url(message = "Invalid logo URL"))]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub payout_details: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HotelProfile {
    #[serde(flatten)]
    #[validate(nested)]
    pub business: BusinessDetails,
    #[validate(range(min = 1800, message = "Year established must be 1800 or later"))]
    pub year_established: Option<i32>,
    pub hotel_type: Option<String>,
    pub location: Option<String>,
    pub whatsapp_no: Option<String>,
    pub max_occupancy: Option<i32>,
    pub hotel_policy: Option<String>,
    #[validate(range(min = 1, message = "Number of rooms is required"))]
    pub total_rooms: i32,
    pub amenities: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TourOperatorProfile {
    #[serde(flatten)]
    #[validate(nested)]
    pub business: BusinessDetails,
    pub dts_license_no: Option<String>,
    pub office_address: Option<String>,
    pub operating_city: Option<String>,
    #[serde(default)]
    pub cater_international: bool,
    pub organize_treks: Option<bool>,
    pub tours_each_month: Option<i32>,
    pub tour_types: Option<Vec<String>>,
    pub tour_theme: Option<String>,
    pub specializations: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ActivityProviderProfile {
    #[serde(flatten)]
    #[validate(nested)]
    pub business: BusinessDetails,
    #[validate(range(min = 1800, message = "Year established must be 1800 or later"))]
    pub year_established: Option<i32>,
    pub office_address: Option<String>,
    pub license_no: Option<String>,
    pub activity_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VehicleRentalProfile {
    #[serde(flatten)]
    #[validate(nested)]
    pub business: BusinessDetails,
    #[validate(range(min = 1800, message = "Year established must be 1800 or later"))]
    pub year_established: Option<i32>,
    pub business_registration_no: Option<String>,
    pub office_address: Option<String>,
    pub vehicle_types: Option<Vec<String>>,
    pub vehicle_count: Option<i32>,
    pub pickup_address: Option<String>,
    pub rental_policy: Option<String>,
    pub deposit_requirements: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TourGuideProfile {
    #[serde(flatten)]
    #[validate(nested)]
    pub business: BusinessDetails,
    pub languages: Option<Vec<String>>,
    pub specializations: Option<Vec<String>>,
    pub certificates: Option<Vec<String>>,
    pub years_of_experience: Option<i32>,
}

/// Onboarding data, typed by partner type.
#[derive(Debug, Clone)]
pub enum PartnerProfile {
    Hotel(HotelProfile),
    Operator(TourOperatorProfile),
    ActivityProvider(ActivityProviderProfile),
    RentalProviders(VehicleRentalProfile),
    TourGuide(TourGuideProfile),
}

impl PartnerProfile {
    /// Parse and validate submitted data against the schema for `partner_type`.
    pub fn parse(partner_type: PartnerType, data: serde_json::Value) -> AppResult<Self> {
        let profile = match partner_type {
            PartnerType::Hotel => PartnerProfile::Hotel(decode(data)?),
            PartnerType::Operator => PartnerProfile::Operator(decode(data)?),
            PartnerType::ActivityProvider => PartnerProfile::ActivityProvider(decode(data)?),
            PartnerType::RentalProviders => PartnerProfile::RentalProviders(decode(data)?),
            PartnerType::TourGuide => PartnerProfile::TourGuide(decode(data)?),
        };

        profile.validate()?;
        Ok(profile)
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        match self {
            PartnerProfile::Hotel(p) => p.validate(),
            PartnerProfile::Operator(p) => p.validate(),
            PartnerProfile::ActivityProvider(p) => p.validate(),
            PartnerProfile::RentalProviders(p) => p.validate(),
            PartnerProfile::TourGuide(p) => p.validate(),
        }
    }

    pub fn business(&self) -> &BusinessDetails {
        match self {
            PartnerProfile::Hotel(p) => &p.business,
            PartnerProfile::Operator(p) => &p.business,
            PartnerProfile::ActivityProvider(p) => &p.business,
            PartnerProfile::RentalProviders(p) => &p.business,
            PartnerProfile::TourGuide(p) => &p.business,
        }
    }

    /// JSON form kept alongside the partner row.
    pub fn to_json(&self) -> AppResult<serde_json::Value> {
        let value = match self {
            PartnerProfile::Hotel(p) => serde_json::to_value(p),
            PartnerProfile::Operator(p) => serde_json::to_value(p),
            PartnerProfile::ActivityProvider(p) => serde_json::to_value(p),
            PartnerProfile::RentalProviders(p) => serde_json::to_value(p),
            PartnerProfile::TourGuide(p) => serde_json::to_value(p),
        };
        value.map_err(|e| AppError::internal(format!("Profile serialization failed: {}", e)))
    }
}

fn decode<T: serde::de::DeserializeOwned>(data: serde_json::Value) -> AppResult<T> {
    serde_json::from_value(data).map_err(|e| AppError::validation(e.to_string()))
}

/// User details attached to an onboarding submission.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OnboardingUser {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

/// Partner onboarding submission.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PartnerOnboarding {
    pub partner_type: PartnerType,
    #[validate(nested)]
    pub user: OnboardingUser,
    /// Type-specific data, validated against the schema for `partner_type`
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

/// Capability flag changes; omitted flags are untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct PartnerAccessPatch {
    pub allow_international: Option<bool>,
    pub allow_group: Option<bool>,
    pub allow_private: Option<bool>,
}

impl PartnerAccessPatch {
    pub fn is_empty(&self) -> bool {
        self.allow_international.is_none()
            && self.allow_group.is_none()
            && self.allow_private.is_none()
    }

    pub fn apply(&self, partner: &mut Partner) {
        if let Some(flag) = self.allow_international {
            partner.allow_international = flag;
        }
        if let Some(flag) = self.allow_group {
            partner.allow_group = flag;
        }
        if let Some(flag) = self.allow_private {
            partner.allow_private = flag;
        }
    }
}
