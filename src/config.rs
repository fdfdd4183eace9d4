use std::env;

use anyhow::{Context, Result, anyhow, bail};

#[derive(Clone, Debug)]
pub struct AdminConfig {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct RelayConfig {
    pub url: String,
    pub username: String,
    pub password: String,
    pub from: String,
    /// Operational mailbox receiving new-request notices.
    pub to: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub log_dir: String,
    /// Browser origins allowed to call the API; empty means any origin.
    pub cors_allowed_origins: Vec<String>,

    pub admin: AdminConfig,
    pub relay: RelayConfig,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_public_per_min: u32,
    pub rate_admin_per_min: u32,
}

impl Config {
    /// Reads the process environment (after `.env`, if any).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup. Missing required keys,
    /// unparsable numbers and zero rates are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let required = |key: &str| get(key).ok_or_else(|| anyhow!("{key} must be set"));
        let rate = |key: &str, default: u32| -> Result<u32> {
            let value = match get(key) {
                Some(raw) => raw
                    .parse::<u32>()
                    .with_context(|| format!("{key} must be a whole number"))?,
                None => default,
            };
            if value == 0 {
                bail!("{key} must be greater than zero");
            }
            Ok(value)
        };

        let server_addr = match get("SERVER_ADDR") {
            Some(addr) => addr,
            None => {
                let port = match get("PORT") {
                    Some(raw) => raw.parse::<u16>().context("PORT must be a port number")?,
                    None => 5001,
                };
                format!("0.0.0.0:{port}")
            }
        };

        let from = required("NOTIFY_FROM")?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            server_addr,
            log_dir: get("LOG_DIR").unwrap_or_else(|| "logs".to_string()),
            cors_allowed_origins: get("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),

            admin: AdminConfig {
                email: required("ADMIN_EMAIL")?,
                password: required("ADMIN_PASSWORD")?,
            },
            relay: RelayConfig {
                url: required("NOTIFY_RELAY_URL")?,
                username: required("NOTIFY_RELAY_USER")?,
                password: required("NOTIFY_RELAY_PASSWORD")?,
                to: get("NOTIFY_TO").unwrap_or_else(|| from.clone()),
                from,
            },

            rate_login_per_min: rate("RATE_LOGIN_PER_MIN", 10)?,
            rate_public_per_min: rate("RATE_PUBLIC_PER_MIN", 120)?,
            rate_admin_per_min: rate("RATE_ADMIN_PER_MIN", 600)?,
        })
    }
}
