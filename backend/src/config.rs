//! Environment-driven application configuration.
//!
//! Every setting is read through [`mockable::Env`] so tests can substitute a
//! mock. Debug builds fall back to development defaults with a warning where
//! release builds refuse to start.

use std::net::SocketAddr;
use std::time::Duration;

use mockable::Env;
use rand::RngCore;
use reqwest::Url;
use tracing::warn;
use zeroize::Zeroizing;

use crate::outbound::elasticsearch::ElasticsearchConfig;
use crate::outbound::pusher::PusherConfig;

pub(crate) const BIND_ADDR_ENV: &str = "BIND_ADDR";
pub(crate) const APP_ENV_ENV: &str = "APP_ENV";
pub(crate) const JWT_SECRET_ENV: &str = "JWT_SECRET_KEY";
pub(crate) const JWT_TTL_ENV: &str = "JWT_TTL_SECS";
pub(crate) const JWT_COOKIE_SECURE_ENV: &str = "JWT_COOKIE_SECURE";
pub(crate) const ES_URL_ENV: &str = "ELASTICSEARCH_URL";
pub(crate) const ES_USERNAME_ENV: &str = "ELASTICSEARCH_USERNAME";
pub(crate) const ES_PASSWORD_ENV: &str = "ELASTICSEARCH_PASSWORD";
pub(crate) const ES_TIMEOUT_ENV: &str = "ELASTICSEARCH_TIMEOUT_SECS";
pub(crate) const PUSHER_APP_ID_ENV: &str = "PUSHER_APP_ID";
pub(crate) const PUSHER_KEY_ENV: &str = "PUSHER_KEY";
pub(crate) const PUSHER_SECRET_ENV: &str = "PUSHER_SECRET";
pub(crate) const PUSHER_CLUSTER_ENV: &str = "PUSHER_CLUSTER";
pub(crate) const CRON_SECRET_ENV: &str = "CRON_SECRET";
pub(crate) const SWEEP_ENABLED_ENV: &str = "OVERDUE_SWEEP_ENABLED";
pub(crate) const SWEEP_INTERVAL_ENV: &str = "OVERDUE_SWEEP_INTERVAL_SECS";
pub(crate) const WS_ORIGINS_ENV: &str = "WS_ALLOWED_ORIGINS";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ES_URL: &str = "http://localhost:9200";
const DEFAULT_ES_TIMEOUT_SECS: u64 = 10;
const DEFAULT_JWT_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const MAX_JWT_TTL_SECS: u64 = 365 * 24 * 60 * 60;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_WS_ORIGIN: &str = "http://localhost:3000";
const EPHEMERAL_SECRET_LEN: usize = 64;

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SECONDS_EXPECTED: &str = "a positive whole number of seconds";
const APP_ENV_EXPECTED: &str = "development|production";
const JWT_TTL_EXPECTED: &str = "between 1 and 31536000 seconds";

/// Build mode used to decide between lenient and strict validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Missing or malformed settings fall back with a warning.
    Debug,
    /// Missing or malformed required settings are errors.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use backend::config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// if cfg!(debug_assertions) {
    ///     assert_eq!(mode, BuildMode::Debug);
    /// } else {
    ///     assert_eq!(mode, BuildMode::Release);
    /// }
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Deployment environment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AppEnv {
    /// Local or staging deployment.
    Development,
    /// Production deployment.
    Production,
}

/// Session token settings.
#[derive(Clone)]
pub struct JwtSettings {
    /// HMAC signing secret.
    pub secret: Zeroizing<Vec<u8>>,
    /// Token lifetime.
    pub ttl: chrono::Duration,
    /// Whether the `jwt` cookie is marked `Secure`.
    pub cookie_secure: bool,
}

impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .field("cookie_secure", &self.cookie_secure)
            .finish()
    }
}

/// Background overdue sweep settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SweepSettings {
    /// Whether the in-process sweep runs.
    pub enabled: bool,
    /// Delay between sweeps.
    pub interval: Duration,
}

/// Fully resolved application configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Listener address.
    pub bind_addr: SocketAddr,
    /// Deployment environment.
    pub app_env: AppEnv,
    /// Session token settings.
    pub jwt: JwtSettings,
    /// Document store connection.
    pub elasticsearch: ElasticsearchConfig,
    /// Pusher credentials, when live updates are relayed through Pusher.
    pub pusher: Option<PusherConfig>,
    /// Bearer secret guarding the cron endpoint.
    pub cron_secret: Option<Zeroizing<String>>,
    /// Background sweep settings.
    pub sweep: SweepSettings,
    /// Origins allowed to open the live-update socket.
    pub ws_allowed_origins: Vec<String>,
}

/// Errors raised while validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is missing.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Only some Pusher settings are present.
    #[error("incomplete Pusher configuration; missing {}", .missing.join(", "))]
    PartialPusher { missing: Vec<&'static str> },
}

/// Resolve the application configuration from the environment.
///
/// # Errors
///
/// Returns [`ConfigError`] when a release build lacks a required setting or
/// any build receives a value it cannot fall back from.
pub fn config_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<AppConfig, ConfigError> {
    let app_env = app_env_from_env(env, mode)?;
    Ok(AppConfig {
        bind_addr: bind_addr_from_env(env)?,
        app_env,
        jwt: jwt_from_env(env, mode)?,
        elasticsearch: elasticsearch_from_env(env)?,
        pusher: pusher_from_env(env, mode)?,
        cron_secret: non_blank(env, CRON_SECRET_ENV).map(Zeroizing::new),
        sweep: sweep_from_env(env, mode, app_env)?,
        ws_allowed_origins: origins_from_env(env),
    })
}

fn non_blank<E: Env>(env: &E, name: &'static str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn invalid(name: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::InvalidEnv {
        name,
        value,
        expected,
    }
}

fn bind_addr_from_env<E: Env>(env: &E) -> Result<SocketAddr, ConfigError> {
    let raw = non_blank(env, BIND_ADDR_ENV).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
    raw.parse()
        .map_err(|_| invalid(BIND_ADDR_ENV, raw, "host:port socket address"))
}

fn app_env_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<AppEnv, ConfigError> {
    let Some(value) = non_blank(env, APP_ENV_ENV) else {
        return Ok(AppEnv::Development);
    };
    match value.to_ascii_lowercase().as_str() {
        "development" | "dev" => Ok(AppEnv::Development),
        "production" | "prod" => Ok(AppEnv::Production),
        _ if mode.is_debug() => {
            warn!(value = %value, "invalid APP_ENV; defaulting to development");
            Ok(AppEnv::Development)
        }
        _ => Err(invalid(APP_ENV_ENV, value, APP_ENV_EXPECTED)),
    }
}

fn jwt_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<JwtSettings, ConfigError> {
    let secret = match non_blank(env, JWT_SECRET_ENV) {
        Some(secret) => Zeroizing::new(secret.into_bytes()),
        None if mode.is_debug() => {
            warn!("JWT_SECRET_KEY not set; using ephemeral secret (dev only)");
            let mut bytes = vec![0_u8; EPHEMERAL_SECRET_LEN];
            rand::thread_rng().fill_bytes(&mut bytes);
            Zeroizing::new(bytes)
        }
        None => return Err(ConfigError::MissingEnv { name: JWT_SECRET_ENV }),
    };
    let ttl_secs = seconds_from_env(env, JWT_TTL_ENV, DEFAULT_JWT_TTL_SECS)?;
    let ttl = Some(ttl_secs)
        .filter(|secs| *secs <= MAX_JWT_TTL_SECS)
        .and_then(|secs| i64::try_from(secs).ok())
        .and_then(chrono::Duration::try_seconds)
        .ok_or_else(|| invalid(JWT_TTL_ENV, ttl_secs.to_string(), JWT_TTL_EXPECTED))?;
    Ok(JwtSettings {
        secret,
        ttl,
        cookie_secure: bool_from_env(env, mode, JWT_COOKIE_SECURE_ENV, true)?,
    })
}

fn elasticsearch_from_env<E: Env>(env: &E) -> Result<ElasticsearchConfig, ConfigError> {
    let raw = non_blank(env, ES_URL_ENV).unwrap_or_else(|| DEFAULT_ES_URL.to_owned());
    let url = Url::parse(&raw).map_err(|_| invalid(ES_URL_ENV, raw, "an absolute URL"))?;
    Ok(ElasticsearchConfig {
        url,
        username: non_blank(env, ES_USERNAME_ENV),
        password: env.string(ES_PASSWORD_ENV),
        timeout: Duration::from_secs(seconds_from_env(
            env,
            ES_TIMEOUT_ENV,
            DEFAULT_ES_TIMEOUT_SECS,
        )?),
    })
}

fn pusher_from_env<E: Env>(env: &E, mode: BuildMode) -> Result<Option<PusherConfig>, ConfigError> {
    let names = [
        PUSHER_APP_ID_ENV,
        PUSHER_KEY_ENV,
        PUSHER_SECRET_ENV,
        PUSHER_CLUSTER_ENV,
    ];
    let values = names.map(|name| non_blank(env, name));
    match values {
        [Some(app_id), Some(key), Some(secret), Some(cluster)] => Ok(Some(PusherConfig {
            app_id,
            key,
            secret: Zeroizing::new(secret),
            cluster,
        })),
        [None, None, None, None] => {
            warn!("Pusher not configured; live updates limited to local sockets");
            Ok(None)
        }
        _ => {
            let missing: Vec<_> = names
                .iter()
                .zip(&values)
                .filter(|(_, value)| value.is_none())
                .map(|(name, _)| *name)
                .collect();
            if mode.is_debug() {
                warn!(missing = ?missing, "incomplete Pusher configuration; Pusher disabled");
                Ok(None)
            } else {
                Err(ConfigError::PartialPusher { missing })
            }
        }
    }
}

fn sweep_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    app_env: AppEnv,
) -> Result<SweepSettings, ConfigError> {
    let default_enabled = app_env != AppEnv::Production;
    let interval_secs = seconds_from_env(env, SWEEP_INTERVAL_ENV, DEFAULT_SWEEP_INTERVAL_SECS)?;
    Ok(SweepSettings {
        enabled: bool_from_env(env, mode, SWEEP_ENABLED_ENV, default_enabled)?,
        interval: Duration::from_secs(interval_secs),
    })
}

fn origins_from_env<E: Env>(env: &E) -> Vec<String> {
    let raw = non_blank(env, WS_ORIGINS_ENV).unwrap_or_else(|| DEFAULT_WS_ORIGIN.to_owned());
    raw.split(',')
        .map(|origin| origin.trim().trim_end_matches('/').to_owned())
        .filter(|origin| !origin.is_empty())
        .collect()
}

fn seconds_from_env<E: Env>(
    env: &E,
    name: &'static str,
    default_value: u64,
) -> Result<u64, ConfigError> {
    match non_blank(env, name) {
        None => Ok(default_value),
        Some(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Ok(secs),
            _ => Err(invalid(name, value, SECONDS_EXPECTED)),
        },
    }
}

fn bool_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
    name: &'static str,
    default_value: bool,
) -> Result<bool, ConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(default_value);
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None if mode.is_debug() => {
            warn!(value = %value, default_value, "invalid {name}; using default");
            Ok(default_value)
        }
        None => Err(invalid(name, value, BOOL_EXPECTED)),
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests;
