//! Back-office capability grants.
//!
//! An admin may perform an administrative operation only when holding the
//! matching capability. Super admins hold every capability implicitly.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use super::UserRole;

string_enum! {
    /// Capability tags an admin can be granted.
    pub enum AdminActionType {
        PartnerApproval => "PARTNER_APPROVAL",
        PartnerManagement => "PARTNER_MANAGEMENT",
        CategoryManagement => "CATEGORY_MANAGEMENT",
        ListingManagement => "LISTING_MANAGEMENT",
    }
}

/// A stored capability grant.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AdminGrant {
    pub id: Uuid,
    pub admin_id: Uuid,
    pub action_type: AdminActionType,
    pub created_at: DateTime<Utc>,
}

/// Proof that an actor passed a capability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    SuperAdmin,
    Granted(AdminActionType),
}

/// Decide whether an actor with `role` and `held` grants may perform an
/// operation requiring any of `required`.
pub fn authorize(
    role: UserRole,
    held: &[AdminActionType],
    required: &[AdminActionType],
) -> Option<Authorization> {
    if role.is_super_admin() {
        return Some(Authorization::SuperAdmin);
    }

    required
        .iter()
        .find(|capability| held.contains(capability))
        .map(|capability| Authorization::Granted(*capability))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_super_admin_bypasses_without_grants() {
        for capability in AdminActionType::ALL {
            assert_eq!(
                authorize(UserRole::SuperAdmin, &[], &[*capability]),
                Some(Authorization::SuperAdmin)
            );
        }
    }

    #[test]
    fn test_matching_grant_authorizes() {
        let result = authorize(
            UserRole::Admin,
            &[AdminActionType::ListingManagement],
            &[AdminActionType::ListingManagement],
        );
        assert_eq!(
            result,
            Some(Authorization::Granted(AdminActionType::ListingManagement))
        );
    }

    #[test]
    fn test_missing_grant_denies() {
        let result = authorize(
            UserRole::Admin,
            &[AdminActionType::CategoryManagement],
            &[AdminActionType::ListingManagement],
        );
        assert!(result.is_none());
    }

    #[test]
    fn test_any_of_several_capabilities() {
        let result = authorize(
            UserRole::Admin,
            &[AdminActionType::PartnerManagement],
            &[
                AdminActionType::PartnerApproval,
                AdminActionType::PartnerManagement,
            ],
        );
        assert_eq!(
            result,
            Some(Authorization::Granted(AdminActionType::PartnerManagement))
        );
    }

    #[test]
    fn test_no_required_capability_never_authorizes_admin() {
        assert!(authorize(UserRole::Admin, &[AdminActionType::ListingManagement], &[]).is_none());
    }
}
