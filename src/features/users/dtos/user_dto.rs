use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::users::models::{User, UserRole};
use crate::shared::types::{default_page, default_page_size};
use crate::shared::validation::PHONE_REGEX;

/// Public view of a user (never includes the password hash)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponseDto {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            phone: u.phone,
            address: u.address,
            role: u.role,
            is_active: u.is_active,
            created_at: u.created_at,
            updated_at: u.updated_at,
        }
    }
}

/// Request DTO for updating the caller's own profile
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: Option<String>,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(length(max = 1000, message = "Address must not exceed 1000 characters"))]
    pub address: Option<String>,
}

/// Request DTO for changing the caller's password
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordDto {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(min = 8, message = "New password must be at least 8 characters"))]
    pub new_password: String,
}

/// Query params for the admin user listing
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct UserQueryParams {
    /// Page number (1-indexed)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,
    /// Items per page
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
    /// Filter by role
    pub role: Option<UserRole>,
    /// Filter by active flag
    pub is_active: Option<bool>,
    /// Search in name or email
    pub search: Option<String>,
}

impl UserQueryParams {
    pub fn pagination(&self) -> crate::shared::types::PaginationQuery {
        crate::shared::types::PaginationQuery {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Request DTO for admin changes to an account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdateUserDto {
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_profile_rejects_bad_phone() {
        let dto = UpdateProfileDto {
            name: None,
            phone: Some("call me".to_string()),
            address: None,
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_profile_accepts_partial_update() {
        let dto: UpdateProfileDto = serde_json::from_str(r#"{"address":"12 Lake Road"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.name.is_none());
    }

    #[test]
    fn test_admin_update_parses_role() {
        let dto: AdminUpdateUserDto =
            serde_json::from_str(r#"{"role":"collector","isActive":false}"#).unwrap();
        assert_eq!(dto.role, Some(UserRole::Collector));
        assert_eq!(dto.is_active, Some(false));
    }
}
