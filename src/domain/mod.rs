//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! DDD: Domain layer has NO external dependencies (except error types).
//! Contains: Entities, Value Objects, Domain Services.

/// Declares an enum persisted and transported as a fixed upper-case string.
///
/// Generates `as_str`, `Display`, `FromStr` (validation error on unknown
/// values) and serde/OpenAPI derives using the same string values.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        $vis enum $name {
            $($(#[$vmeta])* #[serde(rename = $value)] $variant),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored / wire representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::errors::AppError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($name::$variant),)+
                    other => Err($crate::errors::AppError::validation(format!(
                        "Invalid {}: {}",
                        stringify!($name),
                        other
                    ))),
                }
            }
        }
    };
}

pub mod admin;
pub mod booking;
pub mod catalog;
pub mod engagement;
pub mod listing;
pub mod otp;
pub mod partner;
pub mod password;
pub mod payment;
pub mod user;

pub use admin::{authorize, AdminActionType, AdminGrant, Authorization};
pub use booking::{
    Booking, BookingStatus, BookingType, NewBooking, PaymentStatus, TransitionError,
};
pub use catalog::{
    Category, CategoryGrant, CategoryGrantUpdate, CategoryKind, NewCategory, NewSubCategory,
    NewTourTheme, NewTourType, SubCategory, TourTheme, TourType,
};
pub use engagement::{
    Message, NewMessage, NewReview, Notification, NotificationKind, Review, WishlistEntry,
};
pub use listing::{
    validate_listing_permissions, CustomerType, Listing, ListingDraft, ListingPatch,
    ListingPermissionError, ListingScope, ListingStatus, ModificationRequest,
    ModificationStatus, TourKind,
};
pub use otp::Otp;
pub use partner::{
    OnboardingUser, Partner, PartnerAccessPatch, PartnerOnboarding, PartnerProfile, PartnerType,
    VerificationStatus,
};
pub use password::Password;
pub use payment::{PaymentConfirmation, PaymentForm};
pub use user::{User, UserResponse, UserRole};
