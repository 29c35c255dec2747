//! Booking repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

use super::base::{convert_all, fetch_page};
use super::entities::booking::{self, ActiveModel, Entity as BookingEntity};
use crate::domain::{Booking, BookingStatus, BookingType, PaymentStatus, TransitionError};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::types::PaginationParams;

/// Booking row ready for insertion; status and payment start PENDING.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingInsert {
    pub listing_id: Uuid,
    pub traveler_id: Uuid,
    pub partner_id: Uuid,
    pub booking_type: BookingType,
    pub group_size: Option<i32>,
    pub total_amount: i64,
    pub booking_dates: serde_json::Value,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create(&self, insert: BookingInsert) -> AppResult<Booking>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>>;

    /// Move the booking from `from` to `to`. Fails if the stored status is
    /// no longer `from`.
    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Booking>;

    /// Set status and payment status together, only while the stored status
    /// is still `from`.
    async fn cancel(
        &self,
        id: Uuid,
        from: BookingStatus,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> AppResult<Booking>;

    async fn set_transaction_ref(&self, id: Uuid, transaction_ref: String) -> AppResult<Booking>;

    async fn find_by_transaction_ref(&self, transaction_ref: &str) -> AppResult<Option<Booking>>;

    /// Settle the payment of a booking that is still open and whose payment
    /// status is still `from`.
    async fn set_payment_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> AppResult<Booking>;

    async fn list_for_traveler(
        &self,
        traveler_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)>;

    async fn list_for_partner(
        &self,
        partner_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)>;
}

pub struct BookingStore {
    db: DatabaseConnection,
}

impl BookingStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, id: Uuid) -> AppResult<booking::Model> {
        BookingEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or_not_found()
    }

    async fn save(&self, mut active: ActiveModel) -> AppResult<Booking> {
        active.updated_at = Set(Utc::now());
        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Booking::try_from(model)
    }

    /// Single-statement compare-and-set. Returns the row when `guard` still
    /// held, `None` when another writer got there first.
    async fn update_if(
        &self,
        id: Uuid,
        guard: Condition,
        changes: Vec<(booking::Column, SimpleExpr)>,
    ) -> AppResult<Option<Booking>> {
        let mut update = BookingEntity::update_many()
            .col_expr(booking::Column::UpdatedAt, Expr::value(Utc::now()));
        for (column, value) in changes {
            update = update.col_expr(column, value);
        }

        let result = update
            .filter(booking::Column::Id.eq(id))
            .filter(guard)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        Booking::try_from(self.find_model(id).await?).map(Some)
    }

    /// Error for a status write whose expected status no longer holds.
    async fn stale_status(&self, id: Uuid) -> AppError {
        match self.find_model(id).await.and_then(Booking::try_from) {
            Ok(current) if current.status.is_terminal() => {
                TransitionError::Terminal(current.status).into()
            }
            Ok(current) => AppError::invalid_state(format!(
                "Booking is now {} and was not updated",
                current.status
            )),
            Err(e) => e,
        }
    }
}

#[async_trait]
impl BookingRepository for BookingStore {
    async fn create(&self, insert: BookingInsert) -> AppResult<Booking> {
        let now = Utc::now();
        let model = ActiveModel {
            id: Set(Uuid::new_v4()),
            listing_id: Set(Some(insert.listing_id)),
            traveler_id: Set(insert.traveler_id),
            partner_id: Set(insert.partner_id),
            booking_type: Set(insert.booking_type.as_str().to_string()),
            group_size: Set(insert.group_size),
            total_amount: Set(insert.total_amount),
            booking_dates: Set(insert.booking_dates),
            status: Set(BookingStatus::Pending.as_str().to_string()),
            payment_status: Set(PaymentStatus::Pending.as_str().to_string()),
            transaction_ref: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(AppError::from)?;

        Booking::try_from(model)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Booking>> {
        BookingEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn update_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> AppResult<Booking> {
        let guard = Condition::all().add(booking::Column::Status.eq(from.as_str()));
        let changes = vec![(booking::Column::Status, Expr::value(to.as_str()))];

        match self.update_if(id, guard, changes).await? {
            Some(booking) => Ok(booking),
            None => Err(self.stale_status(id).await),
        }
    }

    async fn cancel(
        &self,
        id: Uuid,
        from: BookingStatus,
        status: BookingStatus,
        payment_status: PaymentStatus,
    ) -> AppResult<Booking> {
        let guard = Condition::all().add(booking::Column::Status.eq(from.as_str()));
        let changes = vec![
            (booking::Column::Status, Expr::value(status.as_str())),
            (booking::Column::PaymentStatus, Expr::value(payment_status.as_str())),
        ];

        match self.update_if(id, guard, changes).await? {
            Some(booking) => Ok(booking),
            None => Err(self.stale_status(id).await),
        }
    }

    async fn set_transaction_ref(&self, id: Uuid, transaction_ref: String) -> AppResult<Booking> {
        let mut active: ActiveModel = self.find_model(id).await?.into();
        active.transaction_ref = Set(Some(transaction_ref));
        self.save(active).await
    }

    async fn find_by_transaction_ref(&self, transaction_ref: &str) -> AppResult<Option<Booking>> {
        BookingEntity::find()
            .filter(booking::Column::TransactionRef.eq(transaction_ref))
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .map(Booking::try_from)
            .transpose()
    }

    async fn set_payment_status(
        &self,
        id: Uuid,
        from: PaymentStatus,
        to: PaymentStatus,
    ) -> AppResult<Booking> {
        let guard = Condition::all()
            .add(booking::Column::PaymentStatus.eq(from.as_str()))
            .add(booking::Column::Status.is_not_in([
                BookingStatus::Completed.as_str(),
                BookingStatus::Cancelled.as_str(),
            ]));
        let changes = vec![(booking::Column::PaymentStatus, Expr::value(to.as_str()))];

        if let Some(booking) = self.update_if(id, guard, changes).await? {
            return Ok(booking);
        }

        let current = Booking::try_from(self.find_model(id).await?)?;
        Err(current.payable_amount().err().unwrap_or_else(|| {
            AppError::invalid_state("Payment was settled by another request")
        }))
    }

    async fn list_for_traveler(
        &self,
        traveler_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)> {
        let query = BookingEntity::find()
            .filter(booking::Column::TravelerId.eq(traveler_id))
            .order_by_desc(booking::Column::CreatedAt);
        let (models, total) = fetch_page(query, &self.db, &params).await?;
        Ok((convert_all(models)?, total))
    }

    async fn list_for_partner(
        &self,
        partner_id: Uuid,
        params: PaginationParams,
    ) -> AppResult<(Vec<Booking>, u64)> {
        let query = BookingEntity::find()
            .filter(booking::Column::PartnerId.eq(partner_id))
            .order_by_desc(booking::Column::CreatedAt);
        let (models, total) = fetch_page(query, &self.db, &params).await?;
        Ok((convert_all(models)?, total))
    }
}
