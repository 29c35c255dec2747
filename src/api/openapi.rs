//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{
    account_handler, admin_handler, auth_handler, booking_handler, catalog_handler,
    engagement_handler, listing_handler, partner_handler, payment_handler,
};
use crate::domain::{
    AdminActionType, AdminGrant, Booking, BookingStatus, BookingType, Category, CategoryGrant,
    CategoryKind, CustomerType, Listing, ListingDraft, ListingPatch, ListingStatus, Message,
    ModificationRequest, ModificationStatus, NewBooking, NewCategory, NewMessage, NewReview,
    NewSubCategory, NewTourTheme, NewTourType, Notification, NotificationKind, Partner,
    PartnerAccessPatch, PartnerType, PaymentConfirmation, PaymentForm, PaymentStatus, Review,
    SubCategory, TourKind, TourTheme, TourType, UserResponse, UserRole, VerificationStatus,
    WishlistEntry,
};
use crate::services::{PartnerProfileView, TokenResponse};

/// OpenAPI documentation for the Wayfarer API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wayfarer API",
        version = "0.1.0",
        description = "Travel marketplace backend: partner onboarding, tour listings, bookings and payments",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // Authentication
        auth_handler::request_otp,
        auth_handler::sign_up,
        auth_handler::sign_in,
        auth_handler::reset_password,
        account_handler::get_current_user,
        // Partners
        partner_handler::initiate_onboarding,
        partner_handler::get_profile,
        // Listings
        listing_handler::create_listing,
        listing_handler::list_own_listings,
        listing_handler::get_listing,
        listing_handler::delete_listing,
        listing_handler::request_update,
        // Catalog
        catalog_handler::list_categories,
        catalog_handler::list_sub_categories,
        // Bookings
        booking_handler::create_booking,
        booking_handler::list_my_bookings,
        booking_handler::list_partner_bookings,
        booking_handler::update_status,
        booking_handler::cancel_booking,
        booking_handler::create_review,
        booking_handler::send_message,
        // Wishlist and notifications
        engagement_handler::add_to_wishlist,
        engagement_handler::list_wishlist,
        engagement_handler::remove_from_wishlist,
        engagement_handler::list_notifications,
        engagement_handler::mark_notification_read,
        // Payments
        payment_handler::initiate_payment,
        payment_handler::payment_callback,
        // Back office
        admin_handler::promote_to_admin,
        admin_handler::list_grants,
        admin_handler::grant_capability,
        admin_handler::revoke_capability,
        admin_handler::update_verification,
        admin_handler::update_commission,
        admin_handler::update_access,
        admin_handler::update_categories,
        admin_handler::list_pending_listings,
        admin_handler::approve_listing,
        admin_handler::reject_listing,
        admin_handler::update_listing,
        admin_handler::reject_modification_request,
        admin_handler::create_category,
        admin_handler::create_sub_category,
        admin_handler::create_tour_type,
        admin_handler::create_tour_theme,
    ),
    components(
        schemas(
            // Enumerations
            UserRole,
            PartnerType,
            VerificationStatus,
            AdminActionType,
            ListingStatus,
            CustomerType,
            TourKind,
            ModificationStatus,
            CategoryKind,
            BookingStatus,
            BookingType,
            PaymentStatus,
            NotificationKind,
            // Entities
            UserResponse,
            Partner,
            PartnerProfileView,
            AdminGrant,
            Category,
            SubCategory,
            TourType,
            TourTheme,
            CategoryGrant,
            Listing,
            ModificationRequest,
            Booking,
            Review,
            Message,
            Notification,
            WishlistEntry,
            PaymentForm,
            PaymentConfirmation,
            TokenResponse,
            // Inputs
            ListingDraft,
            ListingPatch,
            PartnerAccessPatch,
            NewCategory,
            NewSubCategory,
            NewTourType,
            NewTourTheme,
            NewBooking,
            NewReview,
            NewMessage,
            auth_handler::OtpRequest,
            auth_handler::SignUpRequest,
            auth_handler::SignInRequest,
            auth_handler::ResetPasswordRequest,
            partner_handler::OnboardingRequest,
            listing_handler::ListingUpload,
            booking_handler::UpdateBookingStatusRequest,
            engagement_handler::WishlistRequest,
            payment_handler::InitiatePaymentRequest,
            admin_handler::GrantCapabilityRequest,
            admin_handler::VerificationRequest,
            admin_handler::CommissionRequest,
            admin_handler::CategoryGrantRequest,
            admin_handler::RejectListingRequest,
            admin_handler::AdminListingUpdate,
            admin_handler::RejectModificationRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "OTP, sign-up, sign-in and password reset"),
        (name = "Account", description = "The calling account"),
        (name = "Partners", description = "Partner onboarding and profile"),
        (name = "Listings", description = "Tour and activity listings"),
        (name = "Catalog", description = "Categories and sub-categories"),
        (name = "Bookings", description = "Bookings, reviews and messages"),
        (name = "Wishlist", description = "Saved listings"),
        (name = "Notifications", description = "In-app notifications"),
        (name = "Payments", description = "Hosted payment gateway"),
        (name = "Admin", description = "Back-office operations")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /auth/signin"))
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_public_and_admin_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/auth/signin"));
        assert!(doc.paths.paths.contains_key("/payments/callback"));
        assert!(doc.paths.paths.contains_key("/admin/listings/{id}/approve"));
        assert!(doc
            .components
            .as_ref()
            .is_some_and(|c| c.security_schemes.contains_key("bearer_auth")));
    }
}
