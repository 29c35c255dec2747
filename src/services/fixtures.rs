//! Entity builders shared by the service tests.

use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use crate::domain::{
    Booking, BookingStatus, BookingType, CategoryGrant, Listing, ListingPatch, ListingStatus,
    ModificationRequest, ModificationStatus, Partner, PartnerType, PaymentStatus, User, UserRole,
    VerificationStatus,
};

pub fn user(role: UserRole) -> User {
    let id = Uuid::new_v4();
    let mut user = User::new(
        id,
        format!("{}@example.com", id.simple()),
        String::new(),
        "Test User".into(),
    );
    user.role = role;
    user
}

pub fn partner(user_id: Uuid) -> Partner {
    Partner {
        id: Uuid::new_v4(),
        user_id,
        partner_type: PartnerType::Operator,
        verification_status: VerificationStatus::Approved,
        commission_rate: 10.0,
        allow_international: false,
        allow_group: true,
        allow_private: false,
        business_name: "Karakoram Treks".into(),
        contact_person: "Imran Ali".into(),
        phone_number: "03001234567".into(),
        profile: json!({}),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn grant(partner_id: Uuid, category_id: Uuid, sub_category_ids: Vec<Uuid>) -> CategoryGrant {
    CategoryGrant {
        id: Uuid::new_v4(),
        partner_id,
        category_id,
        sub_category_ids,
        tour_type_ids: Vec::new(),
        tour_theme_ids: Vec::new(),
    }
}

pub fn listing(partner_id: Uuid, status: ListingStatus) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        partner_id,
        title: "Fairy Meadows Trek".into(),
        description: "Three days under Nanga Parbat".into(),
        category_id: Uuid::new_v4(),
        sub_category_id: None,
        customer_type: None,
        tour_kind: None,
        base_price: 2_500_000,
        currency: "PKR".into(),
        location: Some("Gilgit".into()),
        capacity: Some(12),
        images: Vec::new(),
        status,
        rejection_reason: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn modification_request(
    listing_id: Uuid,
    partner_id: Uuid,
    status: ModificationStatus,
) -> ModificationRequest {
    ModificationRequest {
        id: Uuid::new_v4(),
        listing_id,
        partner_id,
        patch: ListingPatch {
            title: Some("Fairy Meadows Trek (5 days)".into()),
            ..Default::default()
        },
        status,
        admin_notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn booking(traveler_id: Uuid, partner_id: Uuid, status: BookingStatus) -> Booking {
    Booking {
        id: Uuid::new_v4(),
        listing_id: Some(Uuid::new_v4()),
        traveler_id,
        partner_id,
        booking_type: BookingType::Group,
        group_size: Some(2),
        total_amount: 2_500_000,
        booking_dates: json!({ "start": "2026-11-01", "end": "2026-11-03" }),
        status,
        payment_status: PaymentStatus::Pending,
        transaction_ref: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
