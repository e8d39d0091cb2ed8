use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::{FixedOffset, NaiveDateTime, Utc};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub session_ttl: usize,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    /// Company wall clock, e.g. `+07:00`.
    pub utc_offset: FixedOffset,
    pub log_dir: String,

    pub seed_admin: Option<(String, String)>,
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse()
        .with_context(|| format!("{key} has an invalid value {raw:?}"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let seed_admin = match (
            env::var("SEED_ADMIN_USERNAME"),
            env::var("SEED_ADMIN_PASSWORD"),
        ) {
            (Ok(username), Ok(password)) if !username.trim().is_empty() && !password.is_empty() => {
                Some((username.trim().to_string(), password))
            }
            _ => None,
        };

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            session_ttl: parsed_or("SESSION_TTL", "86400")?, // default 1 day

            rate_login_per_min: parsed_or("RATE_LOGIN_PER_MIN", "60")?,
            rate_protected_per_min: parsed_or("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),
            utc_offset: parsed_or("UTC_OFFSET", "+07:00")?,
            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),

            seed_admin,
        })
    }

    /// Current wall-clock time at the company.
    pub fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset).naive_local()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_parses_from_env_format() {
        let offset: FixedOffset = "+07:00".parse().unwrap();
        assert_eq!(offset.local_minus_utc(), 7 * 3600);
    }
}
