//! Environment-driven configuration, loaded once at startup.

use std::env;
use std::fmt::Display;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Ephemeral store. `None` selects the in-process backend.
    pub redis_url: Option<String>,
    /// Durable store. `None` selects the in-process backend.
    pub profile_service_url: Option<String>,
    pub jwt_secret: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            port: try_load("PORT", 8080),
            redis_url: optional("REDIS_URL"),
            profile_service_url: optional("PROFILE_SERVICE_URL"),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| {
                warn!("JWT_SECRET not set, falling back to a development secret");
                "insecure-dev-secret".to_string()
            }),
        }
    }
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn try_load<T: FromStr + Display + Copy>(key: &str, default: T) -> T
where
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("invalid {key} value: {e}, using default {default}");
            default
        }),
        Err(_) => default,
    }
}
