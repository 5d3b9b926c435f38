use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::core::config::AdminConfig;
use crate::features::users::models::{User, UserRole};

/// A citizen account resolved from a bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for AuthenticatedUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// The configured administrator. There is exactly one and it has no database row.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPrincipal {
    pub email: String,
    pub name: String,
}

impl From<&AdminConfig> for AdminPrincipal {
    fn from(config: &AdminConfig) -> Self {
        Self {
            email: config.email.clone(),
            name: config.name.clone(),
        }
    }
}

/// Whoever is behind the request
#[derive(Debug, Clone)]
pub enum Principal {
    User(AuthenticatedUser),
    Admin(AdminPrincipal),
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        matches!(self, Principal::Admin(_))
    }

    /// The user id, if this is a citizen principal
    pub fn user_id(&self) -> Option<Uuid> {
        match self {
            Principal::User(user) => Some(user.id),
            Principal::Admin(_) => None,
        }
    }

    /// Short label for logs
    pub fn actor(&self) -> String {
        match self {
            Principal::User(user) => format!("user:{}", user.id),
            Principal::Admin(admin) => format!("admin:{}", admin.email),
        }
    }
}

/// Which principal type a token was issued for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    User,
    Admin,
}

/// Claims carried by access tokens issued by this service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub kind: TokenKind,
    pub role: String,
    pub iss: String,
    pub iat: u64,
    pub exp: u64,
}
