use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AdminPrincipal;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::validation::PHONE_REGEX;

/// Request DTO for citizen registration
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequestDto {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(regex(path = *PHONE_REGEX, message = "Invalid phone number"))]
    pub phone: Option<String>,

    #[validate(length(max = 1000, message = "Address must not exceed 1000 characters"))]
    pub address: Option<String>,
}

/// Request DTO for citizen login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request DTO for administrator login
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminLoginRequestDto {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Who the caller is: a citizen account or the administrator
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "principal", rename_all = "lowercase")]
pub enum MeResponseDto {
    User(UserResponseDto),
    Admin(AdminPrincipal),
}

/// Response DTO for authentication (register/login)
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponseDto {
    /// Signed JWT access token
    pub access_token: String,
    /// Token type (always "Bearer")
    pub token_type: String,
    /// Token expiry time in seconds
    pub expires_in: i64,
    /// Authenticated principal
    pub user: MeResponseDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use fake::faker::internet::en::SafeEmail;
    use fake::faker::name::en::Name;
    use fake::Fake;

    #[test]
    fn test_register_dto_valid() {
        let dto = RegisterRequestDto {
            name: Name().fake(),
            email: SafeEmail().fake(),
            password: "long-enough".to_string(),
            phone: Some("+919876543210".to_string()),
            address: None,
        };
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_register_dto_rejects_short_password_and_bad_email() {
        let dto = RegisterRequestDto {
            name: Name().fake(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
            phone: None,
            address: None,
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_me_response_is_tagged_by_principal() {
        let dto = MeResponseDto::Admin(AdminPrincipal {
            email: "admin@city.gov".to_string(),
            name: "City Admin".to_string(),
        });
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json["principal"], "admin");
        assert_eq!(json["email"], "admin@city.gov");
    }
}
