//! Bookings and the records hanging off them (reviews, messages).
//!
//! Travelers create and cancel bookings; the owning partner moves them
//! forward. Every state change notifies the other party.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::container::parallel;
use super::Notifier;
use crate::domain::{
    Booking, BookingStatus, Message, NewBooking, NewMessage, NewReview, NotificationKind, Partner,
    Review,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::repositories::{BookingInsert, ReviewInsert};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingService: Send + Sync {
    async fn create_booking(&self, traveler_id: Uuid, input: NewBooking) -> AppResult<Booking>;

    /// Partner-driven forward step.
    async fn update_status(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking>;

    /// Traveler-driven cancellation; the payment is marked refunded.
    async fn cancel_booking(&self, traveler_id: Uuid, booking_id: Uuid) -> AppResult<Booking>;

    async fn create_review(
        &self,
        traveler_id: Uuid,
        booking_id: Uuid,
        input: NewReview,
    ) -> AppResult<Review>;

    /// Message the other party of a booking.
    async fn send_message(
        &self,
        sender_id: Uuid,
        booking_id: Uuid,
        input: NewMessage,
    ) -> AppResult<Message>;

    async fn list_traveler_bookings(
        &self,
        traveler_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)>;

    async fn list_partner_bookings(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)>;
}

pub struct BookingManager<U: UnitOfWork> {
    uow: Arc<U>,
    notifier: Arc<dyn Notifier>,
}

impl<U: UnitOfWork> BookingManager<U> {
    pub fn new(uow: Arc<U>, notifier: Arc<dyn Notifier>) -> Self {
        Self { uow, notifier }
    }

    async fn find_booking(&self, booking_id: Uuid) -> AppResult<Booking> {
        self.uow
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_not_found()
    }

    /// A booking of another traveler is reported as missing.
    async fn traveler_booking(&self, traveler_id: Uuid, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self.find_booking(booking_id).await?;
        if booking.traveler_id != traveler_id {
            return Err(AppError::NotFound);
        }
        Ok(booking)
    }

    async fn booking_partner(&self, booking: &Booking) -> AppResult<Partner> {
        self.uow
            .partners()
            .find_by_id(booking.partner_id)
            .await?
            .ok_or_not_found()
    }

    async fn notify_partner(&self, partner_id: Uuid, kind: NotificationKind, title: &str, content: &str) {
        match self.uow.partners().find_by_id(partner_id).await {
            Ok(Some(partner)) => {
                self.notifier
                    .notify(partner.user_id, kind, title, content)
                    .await
            }
            Ok(None) => tracing::warn!(%partner_id, "Booking partner no longer exists"),
            Err(e) => tracing::warn!(%partner_id, error = %e, "Failed to look up booking partner"),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> BookingService for BookingManager<U> {
    async fn create_booking(&self, traveler_id: Uuid, input: NewBooking) -> AppResult<Booking> {
        input.validate()?;

        let (traveler, listing) = parallel::join2(
            async { self.uow.users().find_by_id(traveler_id).await?.ok_or_not_found() },
            async {
                self.uow
                    .listings()
                    .find_by_id(input.listing_id)
                    .await?
                    .ok_or_not_found()
            },
        )
        .await?;

        if !listing.is_bookable() {
            return Err(AppError::validation("Listing is not available for booking"));
        }

        // TODO: reconcile group_size against listing.capacity and existing
        // bookings for the same dates; concurrent bookings are not limited.
        let insert = BookingInsert {
            listing_id: listing.id,
            traveler_id: traveler.id,
            partner_id: listing.partner_id,
            booking_type: input.booking_type,
            group_size: input.group_size,
            total_amount: listing.base_price,
            booking_dates: input.booking_dates,
        };
        let booking = self.uow.bookings().create(insert).await?;

        tracing::info!(
            booking_id = %booking.id,
            listing_id = %listing.id,
            %traveler_id,
            total_amount = booking.total_amount,
            "Booking created"
        );

        self.notify_partner(
            listing.partner_id,
            NotificationKind::NewBooking,
            "New Booking",
            &format!("You have a new booking request for \"{}\".", listing.title),
        )
        .await;

        Ok(booking)
    }

    async fn update_status(
        &self,
        user_id: Uuid,
        booking_id: Uuid,
        status: BookingStatus,
    ) -> AppResult<Booking> {
        let partner = self
            .uow
            .partners()
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("Partner account required"))?;

        let booking = self.find_booking(booking_id).await?;
        if booking.partner_id != partner.id {
            return Err(AppError::NotFound);
        }

        let next = booking.advance_to(status)?;
        let booking = self
            .uow
            .bookings()
            .update_status(booking_id, booking.status, next)
            .await?;
        tracing::info!(%booking_id, status = %next, "Booking status updated");

        self.notifier
            .notify(
                booking.traveler_id,
                NotificationKind::BookingUpdate,
                "Booking Status Updated",
                &format!("Your booking is now {}.", next),
            )
            .await;

        Ok(booking)
    }

    async fn cancel_booking(&self, traveler_id: Uuid, booking_id: Uuid) -> AppResult<Booking> {
        let booking = self.traveler_booking(traveler_id, booking_id).await?;
        let (status, payment_status) = booking.cancellation()?;

        let booking = self
            .uow
            .bookings()
            .cancel(booking_id, booking.status, status, payment_status)
            .await?;
        tracing::info!(%booking_id, %traveler_id, "Booking cancelled");

        self.notify_partner(
            booking.partner_id,
            NotificationKind::BookingUpdate,
            "Booking Cancelled",
            "A traveler has cancelled their booking.",
        )
        .await;

        Ok(booking)
    }

    async fn create_review(
        &self,
        traveler_id: Uuid,
        booking_id: Uuid,
        input: NewReview,
    ) -> AppResult<Review> {
        input.validate()?;
        let booking = self.traveler_booking(traveler_id, booking_id).await?;

        let review = self
            .uow
            .engagement()
            .create_review(ReviewInsert {
                booking_id,
                listing_id: booking.listing_id,
                traveler_id,
                rating: input.rating,
                title: input.title,
                comment: input.comment,
            })
            .await?;
        tracing::info!(review_id = %review.id, %booking_id, rating = review.rating, "Review created");

        self.notify_partner(
            booking.partner_id,
            NotificationKind::ReviewReceived,
            "New Review",
            &format!("You received a {}-star review.", review.rating),
        )
        .await;

        Ok(review)
    }

    async fn send_message(
        &self,
        sender_id: Uuid,
        booking_id: Uuid,
        input: NewMessage,
    ) -> AppResult<Message> {
        input.validate()?;
        let booking = self.find_booking(booking_id).await?;
        let partner = self.booking_partner(&booking).await?;

        let recipient_id = if sender_id == booking.traveler_id {
            partner.user_id
        } else if sender_id == partner.user_id {
            booking.traveler_id
        } else {
            return Err(AppError::forbidden("Not a participant in this booking"));
        };

        let message = self
            .uow
            .engagement()
            .create_message(booking_id, sender_id, recipient_id, input.content)
            .await?;
        tracing::debug!(message_id = %message.id, %booking_id, "Message sent");

        self.notifier
            .notify(
                recipient_id,
                NotificationKind::NewMessage,
                "New Message",
                "You have a new message about a booking.",
            )
            .await;

        Ok(message)
    }

    async fn list_traveler_bookings(
        &self,
        traveler_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)> {
        self.uow
            .bookings()
            .list_for_traveler(traveler_id, params)
            .await
    }

    async fn list_partner_bookings(
        &self,
        user_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)> {
        let partner = self
            .uow
            .partners()
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::forbidden("Partner account required"))?;
        self.uow.bookings().list_for_partner(partner.id, params).await
    }
}
