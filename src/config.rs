/*
 * Responsibility
 * - 環境変数や設定の読み込み (Auth authority, 署名検証鍵, HTTP 制限など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use jsonwebtoken::Algorithm;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Expected token issuer; also the issuer every scope requirement is bound to.
    pub auth_authority: String,
    pub auth_audience: Option<String>,
    pub auth_validate_audience: bool,

    pub access_jwt_algorithm: Algorithm,
    pub access_jwt_public_key_pem: String,
    pub access_token_leeway_seconds: u64,

    pub request_timeout_seconds: u64,
    pub request_body_limit_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (env in production, a map in tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match lookup("PORT") {
            Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let auth_authority = lookup("AUTH_AUTHORITY")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("AUTH_AUTHORITY"))?;
        // Authority must be an absolute URL; the string itself is kept verbatim
        // because issuer comparison is exact.
        url::Url::parse(&auth_authority).map_err(|_| ConfigError::Invalid("AUTH_AUTHORITY"))?;

        let auth_audience = lookup("AUTH_AUDIENCE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let auth_validate_audience = match lookup("AUTH_VALIDATE_AUDIENCE") {
            Some(v) => parse_bool(&v).ok_or(ConfigError::Invalid("AUTH_VALIDATE_AUDIENCE"))?,
            None => false,
        };
        if auth_validate_audience && auth_audience.is_none() {
            return Err(ConfigError::Missing("AUTH_AUDIENCE"));
        }

        let access_jwt_algorithm = match lookup("ACCESS_JWT_ALGORITHM") {
            Some(v) => Algorithm::from_str(v.trim())
                .map_err(|_| ConfigError::Invalid("ACCESS_JWT_ALGORITHM"))?,
            None => Algorithm::EdDSA,
        };

        let access_jwt_public_key_pem = lookup("ACCESS_JWT_PUBLIC_KEY_PEM")
            .ok_or(ConfigError::Missing("ACCESS_JWT_PUBLIC_KEY_PEM"))?
            .replace("\\n", "\n");

        let access_token_leeway_seconds: u64 = match lookup("ACCESS_TOKEN_LEEWAY_SECONDS") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("ACCESS_TOKEN_LEEWAY_SECONDS"))?,
            None => 60,
        };

        let request_timeout_seconds: u64 = match lookup("REQUEST_TIMEOUT_SECONDS") {
            Some(s) => s
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|v| *v > 0)
                .ok_or(ConfigError::Invalid("REQUEST_TIMEOUT_SECONDS"))?,
            None => 30,
        };

        let request_body_limit_bytes: usize = match lookup("REQUEST_BODY_LIMIT_BYTES") {
            Some(s) => s
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid("REQUEST_BODY_LIMIT_BYTES"))?,
            None => 1024 * 1024,
        };

        Ok(Self {
            addr,
            app_env,
            auth_authority,
            auth_audience,
            auth_validate_audience,
            access_jwt_algorithm,
            access_jwt_public_key_pem,
            access_token_leeway_seconds,
            request_timeout_seconds,
            request_body_limit_bytes,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
