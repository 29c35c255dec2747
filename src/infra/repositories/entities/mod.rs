//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.
//! Enum-valued columns are stored as their upper-case string form and
//! parsed back with `TryFrom`, so a corrupt row surfaces as an error
//! instead of a silent default.

pub mod admin_action;
pub mod booking;
pub mod category;
pub mod category_permission;
pub mod listing;
pub mod message;
pub mod modification_request;
pub mod notification;
pub mod partner;
pub mod review;
pub mod sub_category;
pub mod tour_theme;
pub mod tour_type;
pub mod user;
pub mod wishlist;

use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Decode a JSON array column of ids.
pub(crate) fn ids_from_json(value: serde_json::Value) -> AppResult<Vec<Uuid>> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("Corrupt id set column: {}", e)))
}

/// Encode ids for a JSON array column.
pub(crate) fn ids_to_json(ids: &[Uuid]) -> serde_json::Value {
    serde_json::Value::Array(
        ids.iter()
            .map(|id| serde_json::Value::String(id.to_string()))
            .collect(),
    )
}

/// Decode a JSON array column of strings.
pub(crate) fn strings_from_json(value: serde_json::Value) -> AppResult<Vec<String>> {
    serde_json::from_value(value)
        .map_err(|e| AppError::internal(format!("Corrupt string list column: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_set_column_round_trip() {
        let ids = vec![Uuid::new_v4(), Uuid::new_v4()];
        assert_eq!(ids_from_json(ids_to_json(&ids)).unwrap(), ids);
    }

    #[test]
    fn test_corrupt_id_set_is_an_error() {
        assert!(ids_from_json(serde_json::json!(["not-a-uuid"])).is_err());
    }
}
