//! Records created around a booking: reviews, messages, notifications and
//! wishlist entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

string_enum! {
    pub enum NotificationKind {
        NewBooking => "NEW_BOOKING",
        BookingUpdate => "BOOKING_UPDATE",
        ReviewReceived => "REVIEW_RECEIVED",
        NewMessage => "NEW_MESSAGE",
        ListingUpdate => "LISTING_UPDATE",
        AccountUpdate => "ACCOUNT_UPDATE",
        System => "SYSTEM",
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub listing_id: Option<Uuid>,
    pub traveler_id: Uuid,
    pub rating: i16,
    pub title: Option<String>,
    pub comment: String,
    /// Set for reviews tied to a real booking
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewReview {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i16,
    #[validate(length(max = 120, message = "Title is too long"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "Comment is required"))]
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Message {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub content: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewMessage {
    #[validate(length(min = 1, max = 4000, message = "Message must be 1-4000 characters"))]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub title: String,
    pub content: String,
    pub kind: NotificationKind,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WishlistEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub listing_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let review = |rating| NewReview {
            rating,
            title: None,
            comment: "Great guide".into(),
        };
        assert!(review(0).validate().is_err());
        assert!(review(1).validate().is_ok());
        assert!(review(5).validate().is_ok());
        assert!(review(6).validate().is_err());
    }

    #[test]
    fn test_empty_message_rejected() {
        assert!(NewMessage { content: String::new() }.validate().is_err());
    }
}
