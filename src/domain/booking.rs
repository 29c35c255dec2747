//! Bookings and their status lifecycle.
//!
//! ```text
//! PENDING ──► CONFIRMED ──► COMPLETED
//!    │            │
//!    └────────────┴──► CANCELLED  (payment → REFUNDED)
//! ```
//!
//! COMPLETED and CANCELLED are terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

string_enum! {
    pub enum BookingStatus {
        Pending => "PENDING",
        Confirmed => "CONFIRMED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

string_enum! {
    pub enum PaymentStatus {
        Pending => "PENDING",
        Paid => "PAID",
        Refunded => "REFUNDED",
        Failed => "FAILED",
    }
}

string_enum! {
    pub enum BookingType {
        Group => "GROUP",
        Private => "PRIVATE",
    }
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// The partner-driven forward step, if any.
    pub fn next(&self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Pending => Some(BookingStatus::Confirmed),
            BookingStatus::Confirmed => Some(BookingStatus::Completed),
            BookingStatus::Completed | BookingStatus::Cancelled => None,
        }
    }
}

/// Rejected booking status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Booking is {0} and can no longer change")]
    Terminal(BookingStatus),

    #[error("Invalid status transition from {from} to {to}")]
    NotAllowed {
        from: BookingStatus,
        to: BookingStatus,
    },
}

/// Booking domain entity
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    /// Cleared when the listing is deleted
    pub listing_id: Option<Uuid>,
    pub traveler_id: Uuid,
    pub partner_id: Uuid,
    pub booking_type: BookingType,
    pub group_size: Option<i32>,
    /// Total in minor currency units
    pub total_amount: i64,
    #[schema(value_type = Object)]
    pub booking_dates: serde_json::Value,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// Gateway transaction reference of the latest payment attempt
    pub transaction_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Partner-driven status change. Only the next forward step is allowed.
    pub fn advance_to(&self, target: BookingStatus) -> Result<BookingStatus, TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Terminal(self.status));
        }

        match self.status.next() {
            Some(next) if next == target => Ok(next),
            _ => Err(TransitionError::NotAllowed {
                from: self.status,
                to: target,
            }),
        }
    }

    /// Traveler-driven cancellation; the payment is refunded.
    pub fn cancellation(&self) -> Result<(BookingStatus, PaymentStatus), TransitionError> {
        if self.status.is_terminal() {
            return Err(TransitionError::Terminal(self.status));
        }
        Ok((BookingStatus::Cancelled, PaymentStatus::Refunded))
    }

    /// Amount that may be charged now.
    pub fn payable_amount(&self) -> AppResult<i64> {
        if self.status.is_terminal() {
            return Err(AppError::invalid_state(format!(
                "Cannot pay for a {} booking",
                self.status
            )));
        }
        if self.payment_status != PaymentStatus::Pending {
            return Err(AppError::invalid_state(format!(
                "Payment is already {}",
                self.payment_status
            )));
        }
        if self.total_amount <= 0 {
            return Err(AppError::validation("Invalid amount"));
        }
        Ok(self.total_amount)
    }
}

/// Traveler input for a new booking.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NewBooking {
    pub listing_id: Uuid,
    pub booking_type: BookingType,
    #[validate(range(min = 1, message = "Group size must be at least 1"))]
    pub group_size: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub booking_dates: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(status: BookingStatus) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            listing_id: Some(Uuid::new_v4()),
            traveler_id: Uuid::new_v4(),
            partner_id: Uuid::new_v4(),
            booking_type: BookingType::Private,
            group_size: Some(2),
            total_amount: 1_000_000,
            booking_dates: serde_json::json!({ "start": "2026-11-01" }),
            status,
            payment_status: PaymentStatus::Pending,
            transaction_ref: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_forward_steps() {
        assert_eq!(
            booking(BookingStatus::Pending).advance_to(BookingStatus::Confirmed),
            Ok(BookingStatus::Confirmed)
        );
        assert_eq!(
            booking(BookingStatus::Confirmed).advance_to(BookingStatus::Completed),
            Ok(BookingStatus::Completed)
        );
    }

    #[test]
    fn test_skipping_a_step_is_not_allowed() {
        assert_eq!(
            booking(BookingStatus::Pending).advance_to(BookingStatus::Completed),
            Err(TransitionError::NotAllowed {
                from: BookingStatus::Pending,
                to: BookingStatus::Completed,
            })
        );
        assert!(matches!(
            booking(BookingStatus::Confirmed).advance_to(BookingStatus::Cancelled),
            Err(TransitionError::NotAllowed { .. })
        ));
        assert!(matches!(
            booking(BookingStatus::Pending).advance_to(BookingStatus::Pending),
            Err(TransitionError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for terminal in [BookingStatus::Completed, BookingStatus::Cancelled] {
            let b = booking(terminal);
            for target in BookingStatus::ALL {
                assert_eq!(b.advance_to(*target), Err(TransitionError::Terminal(terminal)));
            }
            assert_eq!(b.cancellation(), Err(TransitionError::Terminal(terminal)));
        }
    }

    #[test]
    fn test_cancellation_refunds() {
        for open in [BookingStatus::Pending, BookingStatus::Confirmed] {
            assert_eq!(
                booking(open).cancellation(),
                Ok((BookingStatus::Cancelled, PaymentStatus::Refunded))
            );
        }
    }

    #[test]
    fn test_payable_amount_guards() {
        assert_eq!(booking(BookingStatus::Pending).payable_amount().unwrap(), 1_000_000);

        assert!(matches!(
            booking(BookingStatus::Cancelled).payable_amount(),
            Err(AppError::InvalidState(_))
        ));

        let mut paid = booking(BookingStatus::Confirmed);
        paid.payment_status = PaymentStatus::Paid;
        assert!(matches!(paid.payable_amount(), Err(AppError::InvalidState(_))));

        let mut free = booking(BookingStatus::Pending);
        free.total_amount = 0;
        assert!(matches!(free.payable_amount(), Err(AppError::Validation(_))));
    }
}
