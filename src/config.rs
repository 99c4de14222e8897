use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub port: u16,
    pub rate_source_url: String,
    pub rate_fetch_timeout_secs: u64,
    pub log_level: String,
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("rate_source_url", &self.rate_source_url)
            .field("rate_fetch_timeout_secs", &self.rate_fetch_timeout_secs)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();

        Self {
            port: env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(3000),
            rate_source_url: env::var("RATE_SOURCE_URL")
                .unwrap_or_else(|_| "https://open.er-api.com/v6/latest".to_string()),
            rate_fetch_timeout_secs: env::var("RATE_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
