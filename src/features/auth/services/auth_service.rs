use std::sync::Arc;

use subtle::ConstantTimeEq;
use uuid::Uuid;

use crate::core::config::AdminConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{
    AdminLoginRequestDto, AuthResponseDto, LoginRequestDto, MeResponseDto, RegisterRequestDto,
};
use crate::features::auth::model::{AdminPrincipal, AuthenticatedUser, Principal, TokenKind};
use crate::features::auth::services::token_service::{IssuedToken, TokenService};
use crate::features::users::dtos::{ChangePasswordDto, UserResponseDto};
use crate::features::users::models::CreateUser;
use crate::features::users::services::UserService;
use crate::shared::constants::{ADMIN_SUBJECT, PASSWORD_HASH_COST};
use crate::shared::validation::{clean_optional, normalize_email};

/// Service for authentication: registration, login and principal resolution
pub struct AuthService {
    user_service: Arc<UserService>,
    token_service: Arc<TokenService>,
    admin: AdminConfig,
}

impl AuthService {
    pub fn new(
        user_service: Arc<UserService>,
        token_service: Arc<TokenService>,
        admin: AdminConfig,
    ) -> Self {
        Self {
            user_service,
            token_service,
            admin,
        }
    }

    /// Register a new citizen account and sign them in
    pub async fn register(&self, dto: RegisterRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);
        if email == self.admin.email {
            return Err(AppError::Conflict("Email is already registered".to_string()));
        }

        let password_hash = hash_password(dto.password).await?;

        let user = self
            .user_service
            .create(&CreateUser {
                name: dto.name.trim().to_string(),
                email,
                phone: clean_optional(dto.phone),
                address: clean_optional(dto.address),
                password_hash,
            })
            .await?;

        let token = self
            .token_service
            .issue_user_token(user.id, &user.role.to_string())?;

        Ok(AuthResponseDto::new(token, MeResponseDto::User(user.into())))
    }

    /// Login with email and password
    pub async fn login(&self, dto: LoginRequestDto) -> Result<AuthResponseDto> {
        let email = normalize_email(&dto.email);
        let user = self
            .user_service
            .find_by_email(&email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        if !verify_password(dto.password, user.password_hash.clone()).await? {
            tracing::info!("Failed login attempt for user: {}", user.id);
            return Err(AppError::Unauthorized(
                "Invalid email or password".to_string(),
            ));
        }

        if !user.is_active {
            return Err(AppError::Forbidden("Account is deactivated".to_string()));
        }

        let token = self
            .token_service
            .issue_user_token(user.id, &user.role.to_string())?;

        tracing::info!("User logged in: {}", user.id);
        Ok(AuthResponseDto::new(token, MeResponseDto::User(user.into())))
    }

    /// Login as the configured administrator. Never touches the users table.
    pub fn admin_login(&self, dto: AdminLoginRequestDto) -> Result<AuthResponseDto> {
        let email_matches = normalize_email(&dto.email) == self.admin.email;
        // ct_eq on slices is false for unequal lengths
        let password_matches = dto
            .password
            .as_bytes()
            .ct_eq(self.admin.password.as_bytes())
            .unwrap_u8()
            == 1;

        if !(email_matches && password_matches) {
            tracing::warn!("Failed admin login attempt");
            return Err(AppError::Unauthorized(
                "Invalid admin credentials".to_string(),
            ));
        }

        let token = self.token_service.issue_admin_token()?;
        tracing::info!("Admin logged in");
        Ok(AuthResponseDto::new(
            token,
            MeResponseDto::Admin(self.admin_principal()),
        ))
    }

    /// Resolve a bearer token to a principal
    pub async fn authenticate(&self, token: &str) -> Result<Principal> {
        let claims = self.token_service.verify(token)?;

        match claims.kind {
            TokenKind::Admin => {
                if claims.sub != ADMIN_SUBJECT {
                    return Err(AppError::Auth("Invalid admin token".to_string()));
                }
                Ok(Principal::Admin(self.admin_principal()))
            }
            TokenKind::User => {
                let user_id = Uuid::parse_str(&claims.sub)
                    .map_err(|_| AppError::Auth("Invalid token subject".to_string()))?;

                let user = self
                    .user_service
                    .find_by_id(user_id)
                    .await?
                    .ok_or_else(|| AppError::Unauthorized("User no longer exists".to_string()))?;

                if !user.is_active {
                    return Err(AppError::Forbidden("Account is deactivated".to_string()));
                }

                Ok(Principal::User(AuthenticatedUser::from(&user)))
            }
        }
    }

    /// Describe the current principal
    pub async fn current(&self, principal: &Principal) -> Result<MeResponseDto> {
        match principal {
            Principal::Admin(admin) => Ok(MeResponseDto::Admin(admin.clone())),
            Principal::User(user) => {
                let user = self.user_service.get_by_id(user.id).await?;
                Ok(MeResponseDto::User(UserResponseDto::from(user)))
            }
        }
    }

    /// Change the caller's password after checking the current one
    pub async fn change_password(&self, user_id: Uuid, dto: ChangePasswordDto) -> Result<()> {
        let user = self.user_service.get_by_id(user_id).await?;

        if !verify_password(dto.current_password, user.password_hash).await? {
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        let new_hash = hash_password(dto.new_password).await?;
        self.user_service.set_password_hash(user_id, &new_hash).await
    }

    fn admin_principal(&self) -> AdminPrincipal {
        AdminPrincipal::from(&self.admin)
    }
}

impl AuthResponseDto {
    fn new(token: IssuedToken, user: MeResponseDto) -> Self {
        Self {
            access_token: token.access_token,
            token_type: "Bearer".to_string(),
            expires_in: token.expires_in,
            user,
        }
    }
}

/// bcrypt is CPU-bound; keep it off the async workers
async fn hash_password(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_HASH_COST))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

async fn verify_password(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to verify password: {}", e)))
}
