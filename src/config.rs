use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Minimum lengths enforced by `/registration`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RegistrationPolicy {
    pub min_login_length: usize,
    pub min_password_length: usize,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            min_login_length: 4,
            min_password_length: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub jwt: JwtConfig,
    pub registration: RegistrationPolicy,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let secret = match std::env::var("JWT_SECRET") {
            Ok(s) => s,
            Err(_) if database_url.is_none() => "dev-secret".into(),
            Err(e) => return Err(anyhow::anyhow!("JWT_SECRET: {}", e)),
        };

        let jwt = JwtConfig {
            secret,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "dbwork".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "dbwork-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60),
        };

        let defaults = RegistrationPolicy::default();
        let registration = RegistrationPolicy {
            min_login_length: env_parse("MIN_LOGIN_LENGTH").unwrap_or(defaults.min_login_length),
            min_password_length: env_parse("MIN_PASSWORD_LENGTH")
                .unwrap_or(defaults.min_password_length),
        };

        Ok(Self {
            database_url,
            max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            jwt,
            registration,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
