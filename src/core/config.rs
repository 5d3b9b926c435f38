use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub admin: AdminConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub max_request_body_size: usize,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

/// Settings for the locally issued HS256 access tokens
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub issuer: String,
    pub token_ttl: Duration,
    pub jwt_leeway: Duration,
}

/// Static administrator identity.
///
/// The admin is not a row in `users`; login compares against these values only.
#[derive(Clone, Debug)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub username: Option<String>,
    pub password: Option<String>,
    pub title: String,
    pub version: String,
    pub description: String,
}

/// Required variable; missing or blank is an error
fn required(key: &str) -> Result<String, String> {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| format!("{} environment variable is required", key))
}

/// Optional variable; blank counts as unset
fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> Result<T, String> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| format!("{} must be a valid number", key)),
        None => Ok(default),
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, String> {
    parse_or(key, optional(key), default)
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // A missing .env is normal in production
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            app: AppConfig::from_env()?,
            database: DatabaseConfig::from_env()?,
            auth: AuthConfig::from_env()?,
            admin: AdminConfig::from_env()?,
            swagger: SwaggerConfig::from_env()?,
        })
    }
}

impl AppConfig {
    const DEFAULT_HOST: &'static str = "127.0.0.1";
    const DEFAULT_PORT: u16 = 5000;
    const DEFAULT_MAX_REQUEST_BODY_SIZE: usize = 2 * 1024 * 1024; // 2MB

    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            host: optional("HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string()),
            port: env_or("PORT", Self::DEFAULT_PORT)?,
            cors_allowed_origins: split_origins(
                &optional("CORS_ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()),
            ),
            max_request_body_size: env_or(
                "MAX_REQUEST_BODY_SIZE",
                Self::DEFAULT_MAX_REQUEST_BODY_SIZE,
            )?,
        })
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    const DEFAULT_MAX_CONNECTIONS: u32 = 10;
    const DEFAULT_MIN_CONNECTIONS: u32 = 1;
    const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 5;
    const DEFAULT_IDLE_TIMEOUT_SECS: u64 = 600; // 10 minutes
    const DEFAULT_MAX_LIFETIME_SECS: u64 = 1800; // 30 minutes

    pub fn from_env() -> Result<Self, String> {
        let config = Self {
            url: required("DATABASE_URL")?,
            max_connections: env_or("DB_MAX_CONNECTIONS", Self::DEFAULT_MAX_CONNECTIONS)?,
            min_connections: env_or("DB_MIN_CONNECTIONS", Self::DEFAULT_MIN_CONNECTIONS)?,
            acquire_timeout_secs: env_or(
                "DB_ACQUIRE_TIMEOUT_SECS",
                Self::DEFAULT_ACQUIRE_TIMEOUT_SECS,
            )?,
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", Self::DEFAULT_IDLE_TIMEOUT_SECS)?,
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", Self::DEFAULT_MAX_LIFETIME_SECS)?,
        };

        if config.min_connections > config.max_connections {
            return Err("DB_MIN_CONNECTIONS must not exceed DB_MAX_CONNECTIONS".to_string());
        }
        Ok(config)
    }
}

impl AuthConfig {
    const DEFAULT_ISSUER: &'static str = "waste-report-core";
    const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 3600; // 7 days
    const DEFAULT_JWT_LEEWAY_SECS: u64 = 60;
    const MIN_SECRET_LEN: usize = 32;

    pub fn from_env() -> Result<Self, String> {
        let jwt_secret = required("JWT_SECRET")?;
        if jwt_secret.len() < Self::MIN_SECRET_LEN {
            return Err(format!(
                "JWT_SECRET must be at least {} characters",
                Self::MIN_SECRET_LEN
            ));
        }

        Ok(Self {
            jwt_secret,
            issuer: optional("JWT_ISSUER").unwrap_or_else(|| Self::DEFAULT_ISSUER.to_string()),
            token_ttl: Duration::from_secs(env_or("JWT_TTL_SECS", Self::DEFAULT_TOKEN_TTL_SECS)?),
            jwt_leeway: Duration::from_secs(env_or("JWT_LEEWAY", Self::DEFAULT_JWT_LEEWAY_SECS)?),
        })
    }
}

impl AdminConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            email: required("ADMIN_EMAIL")?.trim().to_lowercase(),
            password: required("ADMIN_PASSWORD")?,
            name: optional("ADMIN_NAME").unwrap_or_else(|| "Administrator".to_string()),
        })
    }
}

impl SwaggerConfig {
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            username: optional("SWAGGER_USERNAME"),
            password: optional("SWAGGER_PASSWORD"),
            title: optional("SWAGGER_TITLE").unwrap_or_else(|| "Waste Report API".to_string()),
            version: optional("SWAGGER_VERSION").unwrap_or_else(|| "0.1.0".to_string()),
            description: optional("SWAGGER_DESCRIPTION").unwrap_or_else(|| {
                "API documentation for the municipal waste collection platform".to_string()
            }),
        })
    }

    /// Returns credentials in "username:password" format if auth is enabled
    pub fn credentials(&self) -> Option<String> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some(format!("{}:{}", user, pass)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_or_uses_default_when_unset() {
        assert_eq!(parse_or::<u16>("PORT", None, 5000), Ok(5000));
        assert_eq!(parse_or::<u16>("PORT", Some(" 8080 ".to_string()), 5000), Ok(8080));
    }

    #[test]
    fn test_parse_or_names_the_bad_key() {
        let err = parse_or::<u32>("DB_MAX_CONNECTIONS", Some("many".to_string()), 10).unwrap_err();
        assert!(err.contains("DB_MAX_CONNECTIONS"));
    }

    #[test]
    fn test_split_origins_skips_blanks() {
        assert_eq!(
            split_origins("http://a.test, ,http://b.test,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn test_swagger_credentials_need_both_parts() {
        let mut swagger = SwaggerConfig {
            username: Some("docs".to_string()),
            password: None,
            title: String::new(),
            version: String::new(),
            description: String::new(),
        };
        assert_eq!(swagger.credentials(), None);

        swagger.password = Some("pw".to_string());
        assert_eq!(swagger.credentials().as_deref(), Some("docs:pw"));
    }
}
