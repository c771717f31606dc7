use std::time::Duration;

use anyhow::{Context, Result, bail};
use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;

use auditorium_remote::RemoteConfig;

/// Placeholder session secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
    "changeme",
];

const MIN_SECRET_LEN: usize = 32;

pub struct Config {
    pub host: String,
    pub port: u16,
    pub supabase_url: String,
    pub supabase_key: String,
    pub service_role_key: Option<String>,
    pub session_secret: String,
    /// Public base URL, no trailing slash.
    pub site_url: String,
    pub require_login: bool,
    pub remote_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |key: &str| var(key).with_context(|| format!("{} is not set", key));

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("PORT")
            .unwrap_or_else(|| "8080".into())
            .parse()
            .context("PORT must be a port number")?;

        let supabase_url = required("SUPABASE_URL")?;
        let supabase_key = required("SUPABASE_KEY")?;
        let service_role_key = var("SUPABASE_SERVICE_ROLE_KEY");

        let session_secret = required("SESSION_SECRET")?;
        if PLACEHOLDER_SECRETS.contains(&session_secret.as_str()) {
            bail!("SESSION_SECRET is still a placeholder");
        }
        if session_secret.len() < MIN_SECRET_LEN {
            bail!("SESSION_SECRET must be at least {} bytes", MIN_SECRET_LEN);
        }

        let site_url = var("APP_BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        let require_login = match var("REQUIRE_LOGIN_TO_RESERVE") {
            Some(v) => parse_bool(&v).context("REQUIRE_LOGIN_TO_RESERVE must be true or false")?,
            None => true,
        };

        let remote_timeout = var("REMOTE_TIMEOUT_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .context("REMOTE_TIMEOUT_SECS must be a whole number of seconds")?
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(10));

        Ok(Self {
            host,
            port,
            supabase_url,
            supabase_key,
            service_role_key,
            session_secret,
            site_url,
            require_login,
            remote_timeout,
        })
    }

    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.supabase_url.clone(),
            api_key: self.supabase_key.clone(),
            service_key: self.service_role_key.clone(),
            timeout: self.remote_timeout,
        }
    }

    /// 64-byte cookie signing key derived from the session secret.
    pub fn session_key(&self) -> Key {
        let digest = Sha512::digest(self.session_secret.as_bytes());
        Key::from(digest.as_slice())
    }

    pub fn secure_cookies(&self) -> bool {
        self.site_url.starts_with("https://")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
