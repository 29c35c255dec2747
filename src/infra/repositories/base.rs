//! Shared query helpers used by the stores.

use sea_orm::{
    ConnectionTrait, DbErr, EntityTrait, FromQueryResult, PaginatorTrait, Select, SqlErr,
};

use crate::errors::{AppError, AppResult};
use crate::types::PaginationParams;

/// Fetch one page of a query together with the total row count.
pub(crate) async fn fetch_page<E, C>(
    query: Select<E>,
    db: &C,
    params: &PaginationParams,
) -> AppResult<(Vec<E::Model>, u64)>
where
    E: EntityTrait,
    E::Model: FromQueryResult + Send + Sync,
    C: ConnectionTrait,
{
    let paginator = query.paginate(db, params.limit().max(1));
    let total = paginator.num_items().await.map_err(AppError::from)?;
    let data = paginator
        .fetch_page(params.page.saturating_sub(1))
        .await
        .map_err(AppError::from)?;
    Ok((data, total))
}

/// Convert a batch of models, failing on the first corrupt row.
pub(crate) fn convert_all<M, D>(models: Vec<M>) -> AppResult<Vec<D>>
where
    D: TryFrom<M, Error = AppError>,
{
    models.into_iter().map(D::try_from).collect()
}

/// Map a unique-constraint violation to `Conflict(entity)`; other errors
/// pass through as database errors.
pub(crate) fn conflict_on_unique(entity: &'static str) -> impl Fn(DbErr) -> AppError {
    move |err| match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(entity),
        _ => AppError::from(err),
    }
}
