//! User domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

string_enum! {
    /// User roles enumeration
    pub enum UserRole {
        Traveler => "TRAVELER",
        Partner => "PARTNER",
        Admin => "ADMIN",
        SuperAdmin => "SUPER_ADMIN",
    }
}

impl UserRole {
    /// Super admins bypass every capability check.
    pub fn is_super_admin(&self) -> bool {
        matches!(self, UserRole::SuperAdmin)
    }

    /// Check if this role belongs to the back office
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::SuperAdmin)
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new traveler account
    pub fn new(id: Uuid, email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            role: UserRole::Traveler,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.is_super_admin()
    }

    pub fn is_partner(&self) -> bool {
        matches!(self.role, UserRole::Partner)
    }
}

/// User response (safe to return to client)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    /// Unique user identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    /// User email address
    #[schema(example = "traveler@example.com")]
    pub email: String,
    /// User display name
    #[schema(example = "Ayesha Khan")]
    pub name: String,
    /// User role
    pub role: UserRole,
    /// Account creation timestamp
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_storage_string() {
        for role in UserRole::ALL {
            assert_eq!(role.as_str().parse::<UserRole>().unwrap(), *role);
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        assert!("user".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_new_user_is_traveler() {
        let user = User::new(
            Uuid::new_v4(),
            "a@example.com".into(),
            "hash".into(),
            "A".into(),
        );
        assert_eq!(user.role, UserRole::Traveler);
        assert!(!user.is_super_admin());
        assert!(!user.role.is_admin());
    }

    #[test]
    fn test_super_admin_is_admin() {
        assert!(UserRole::SuperAdmin.is_admin());
        assert!(UserRole::Admin.is_admin());
        assert!(!UserRole::Partner.is_admin());
    }
}
