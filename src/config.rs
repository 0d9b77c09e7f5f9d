use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

pub const DEFAULT_SEARCH_URL: &str = "https://api.search.brave.com/res/v1/web/search";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PACING_MS: u64 = 100;

#[derive(Clone)]
pub struct Config {
    pub brave_api_key: String,
    pub search_url: String,
    pub host: String,
    pub port: u16,
    /// Pause between two result events of the same stream.
    pub pacing: Duration,
}

// Hand-written so the credential never ends up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("brave_api_key", &"<redacted>")
            .field("search_url", &self.search_url)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("pacing", &self.pacing)
            .finish()
    }
}

impl Config {
    /// Reads the process configuration once at startup.
    ///
    /// A `.env` file in the working directory is loaded first if present;
    /// real environment variables win over it.
    pub fn from_env() -> Result<Config, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let brave_api_key = get_var(&lookup, "BRAVE_API_KEY")?;
        let search_url = get_var_or_default(&lookup, "BRAVE_SEARCH_URL", DEFAULT_SEARCH_URL);
        let host = get_var_or_default(&lookup, "HOST", DEFAULT_HOST);
        let port = parse_var_or_default(&lookup, "PORT", DEFAULT_PORT)?;
        let pacing_ms = parse_var_or_default(&lookup, "STREAM_PACING_MS", DEFAULT_PACING_MS)?;

        Ok(Config {
            brave_api_key,
            search_url,
            host,
            port,
            pacing: Duration::from_millis(pacing_ms),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn get_var<F>(lookup: &F, key: &'static str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingVar(key)),
    }
}

fn get_var_or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) else {
        return Ok(default);
    };
    match value.trim().parse() {
        Ok(parsed) => Ok(parsed),
        Err(_) => Err(ConfigError::InvalidVar { name: key, value }),
    }
}
