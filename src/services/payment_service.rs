//! Booking payments through the hosted gateway page.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use crate::config::{MINOR_UNITS_PER_MAJOR, PAYMENT_SUCCESS_CODE};
use crate::domain::payment::parse_gateway_amount;
use crate::domain::{PaymentConfirmation, PaymentForm, PaymentStatus};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::payment_gateway::{
    AMOUNT_FIELD, RESPONSE_CODE_FIELD, SECURE_HASH_FIELD, TXN_REF_FIELD,
};
use crate::infra::{PaymentGateway, UnitOfWork};

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PaymentService: Send + Sync {
    /// Signed form for paying one of the traveler's bookings.
    async fn initiate_payment(
        &self,
        traveler_id: Uuid,
        booking_id: Uuid,
        description: Option<String>,
    ) -> AppResult<PaymentForm>;

    /// Handle the gateway callback fields.
    async fn verify_payment(
        &self,
        params: BTreeMap<String, String>,
    ) -> AppResult<PaymentConfirmation>;
}

pub struct PaymentManager<U: UnitOfWork> {
    uow: Arc<U>,
    gateway: Option<Arc<dyn PaymentGateway>>,
}

impl<U: UnitOfWork> PaymentManager<U> {
    pub fn new(uow: Arc<U>, gateway: Option<Arc<dyn PaymentGateway>>) -> Self {
        Self { uow, gateway }
    }

    fn gateway(&self) -> AppResult<&dyn PaymentGateway> {
        self.gateway
            .as_deref()
            .ok_or_else(|| AppError::upstream("Payment gateway is not configured"))
    }
}

#[async_trait]
impl<U: UnitOfWork> PaymentService for PaymentManager<U> {
    async fn initiate_payment(
        &self,
        traveler_id: Uuid,
        booking_id: Uuid,
        description: Option<String>,
    ) -> AppResult<PaymentForm> {
        let gateway = self.gateway()?;

        let booking = self
            .uow
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_not_found()?;
        if booking.traveler_id != traveler_id {
            return Err(AppError::NotFound);
        }

        let amount = booking.payable_amount()?;
        let description = description.unwrap_or_else(|| format!("Booking {}", booking.id));
        let payment = gateway.build_payment(amount, &description)?;

        self.uow
            .bookings()
            .set_transaction_ref(booking_id, payment.transaction_ref.clone())
            .await?;

        tracing::info!(
            %booking_id,
            transaction_ref = %payment.transaction_ref,
            amount,
            "Payment initiated"
        );
        Ok(payment.form)
    }

    async fn verify_payment(
        &self,
        params: BTreeMap<String, String>,
    ) -> AppResult<PaymentConfirmation> {
        let gateway = self.gateway()?;

        // The callback route is public; only a signed callback is trusted
        if !params.contains_key(SECURE_HASH_FIELD) || !gateway.verify_signature(&params) {
            tracing::warn!("Payment callback signature missing or mismatched");
            return Err(AppError::validation("Invalid payment signature"));
        }

        let transaction_ref = params
            .get(TXN_REF_FIELD)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::validation("Missing transaction reference"))?;

        let booking = self
            .uow
            .bookings()
            .find_by_transaction_ref(transaction_ref)
            .await?;

        let code = params
            .get(RESPONSE_CODE_FIELD)
            .map(String::as_str)
            .unwrap_or_default();
        if code != PAYMENT_SUCCESS_CODE {
            // A replayed failure must not overwrite a settled payment
            if let Some(booking) = booking.filter(|b| b.payable_amount().is_ok()) {
                self.uow
                    .bookings()
                    .set_payment_status(booking.id, PaymentStatus::Pending, PaymentStatus::Failed)
                    .await?;
            }
            tracing::info!(%transaction_ref, code, "Payment failed");
            return Err(AppError::validation("Payment verification failed"));
        }

        let booking = booking.ok_or_not_found()?;
        let expected = booking.payable_amount()?;

        let paid = params
            .get(AMOUNT_FIELD)
            .and_then(|field| parse_gateway_amount(field));
        if paid != Some(expected) {
            tracing::warn!(
                booking_id = %booking.id,
                %transaction_ref,
                expected,
                ?paid,
                "Payment amount mismatch"
            );
            return Err(AppError::validation("Payment amount does not match the booking"));
        }

        self.uow
            .bookings()
            .set_payment_status(booking.id, PaymentStatus::Pending, PaymentStatus::Paid)
            .await?;

        let amount = expected as f64 / MINOR_UNITS_PER_MAJOR as f64;
        tracing::info!(booking_id = %booking.id, %transaction_ref, amount, "Payment confirmed");
        Ok(PaymentConfirmation {
            transaction_id: transaction_ref.clone(),
            amount,
        })
    }
}
