use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::core::config::AuthConfig;
use crate::core::error::{AppError, Result};
use crate::features::auth::model::{Claims, TokenKind};
use crate::shared::constants::ADMIN_SUBJECT;

/// An issued access token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: i64,
}

/// Issues and verifies HS256 access tokens for both principal types
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    issuer: String,
    ttl_secs: u64,
    leeway: u64,
}

impl TokenService {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: config.issuer.clone(),
            ttl_secs: config.token_ttl.as_secs(),
            leeway: config.jwt_leeway.as_secs(),
        }
    }

    /// Issue a token for a persisted user
    pub fn issue_user_token(&self, user_id: uuid::Uuid, role: &str) -> Result<IssuedToken> {
        self.issue(user_id.to_string(), TokenKind::User, role)
    }

    /// Issue a token for the configured administrator
    pub fn issue_admin_token(&self) -> Result<IssuedToken> {
        self.issue(ADMIN_SUBJECT.to_string(), TokenKind::Admin, "admin")
    }

    fn issue(&self, sub: String, kind: TokenKind, role: &str) -> Result<IssuedToken> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = Claims {
            sub,
            kind,
            role: role.to_string(),
            iss: self.issuer.clone(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let access_token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.ttl_secs as i64,
        })
    }

    /// Verify signature, issuer and expiry, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = self.leeway;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Auth(format!("Invalid token: {}", e)))?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(secret: &str) -> AuthConfig {
        AuthConfig {
            jwt_secret: secret.to_string(),
            issuer: "waste-report-test".to_string(),
            token_ttl: Duration::from_secs(3600),
            jwt_leeway: Duration::from_secs(0),
        }
    }

    #[test]
    fn test_user_token_carries_subject_and_kind() {
        let service = TokenService::new(&config("0123456789abcdef0123456789abcdef"));
        let user_id = uuid::Uuid::new_v4();

        let token = service.issue_user_token(user_id, "collector").unwrap();
        let claims = service.verify(&token.access_token).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.kind, TokenKind::User);
        assert_eq!(claims.role, "collector");
        assert_eq!(token.expires_in, 3600);
    }

    #[test]
    fn test_admin_token_kind() {
        let service = TokenService::new(&config("0123456789abcdef0123456789abcdef"));
        let token = service.issue_admin_token().unwrap();
        let claims = service.verify(&token.access_token).unwrap();

        assert_eq!(claims.kind, TokenKind::Admin);
        assert_eq!(claims.sub, ADMIN_SUBJECT);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = TokenService::new(&config("0123456789abcdef0123456789abcdef"));
        let verifier = TokenService::new(&config("fedcba9876543210fedcba9876543210"));

        let token = issuer.issue_admin_token().unwrap();
        assert!(matches!(
            verifier.verify(&token.access_token),
            Err(AppError::Auth(_))
        ));
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let service = TokenService::new(&config("0123456789abcdef0123456789abcdef"));
        assert!(service.verify("not-a-jwt").is_err());
    }
}
