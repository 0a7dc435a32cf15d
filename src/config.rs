use std::env;
use thiserror::Error;

const DEFAULT_JWT_SECRET: &str = "default-secret-change-me";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be {expected}, got '{value}'")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub api_url: String,
    pub api_key: String,
    pub sender: String,
}

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    /// `None` issues tokens that never expire.
    pub token_ttl_hours: Option<i64>,
    pub bcrypt_cost: u32,
    pub mail: Option<MailConfig>,
    pub seed_demo_data: bool,
    pub allowed_origins: Vec<String>,
}

fn parse<T: std::str::FromStr>(
    name: &'static str,
    expected: &'static str,
    value: Option<String>,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value: raw,
        }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = get("JWT_SECRET").unwrap_or_else(|| {
            log::warn!("⚠️  JWT_SECRET not set, using the insecure default secret");
            DEFAULT_JWT_SECRET.to_string()
        });

        let ttl_hours: i64 = parse("JWT_EXPIRATION_HOURS", "a whole number of hours", get("JWT_EXPIRATION_HOURS"), 24)?;
        if ttl_hours < 0 {
            return Err(ConfigError::Invalid {
                name: "JWT_EXPIRATION_HOURS",
                expected: "zero or positive",
                value: ttl_hours.to_string(),
            });
        }

        let bcrypt_cost: u32 = parse("BCRYPT_COST", "an integer between 4 and 31", get("BCRYPT_COST"), bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                name: "BCRYPT_COST",
                expected: "an integer between 4 and 31",
                value: bcrypt_cost.to_string(),
            });
        }

        let mail = match (get("MAIL_API_URL"), get("MAIL_API_KEY")) {
            (Some(api_url), Some(api_key)) => Some(MailConfig {
                api_url,
                api_key,
                sender: get("MAIL_SENDER").unwrap_or_else(|| "noreply@planetary-api.com".to_string()),
            }),
            _ => None,
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse("PORT", "a TCP port number", get("PORT"), 5000)?,
            database_url: get("DATABASE_URL"),
            jwt_secret,
            jwt_issuer: get("JWT_ISSUER").unwrap_or_else(|| "planetary-api".to_string()),
            token_ttl_hours: (ttl_hours > 0).then_some(ttl_hours),
            bcrypt_cost,
            mail,
            seed_demo_data: parse("SEED_DEMO_DATA", "true or false", get("SEED_DEMO_DATA"), false)?,
            allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
        })
    }
}
