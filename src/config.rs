// Service configuration: defaults, then `config.toml`, then `APP__*` environment variables

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File, builder::DefaultState};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_address: String,
    // Base URL of the catalogue backend, e.g. "https://api.example.com/api"
    pub catalog_base_url: String,
    pub page_size: u32,
    pub fetch_timeout_secs: u64,
    // Views untouched for this long are closed and dropped
    pub view_idle_secs: u64,
    pub proxy_url: Option<String>,
    pub user_agent: String,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Self::defaults()?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., APP__CATALOG_BASE_URL)
            .add_source(Environment::with_prefix("APP").separator("__"));

        Self::from_builder(builder)
    }

    pub(crate) fn defaults() -> Result<ConfigBuilder<DefaultState>> {
        let builder = Config::builder()
            .set_default("server_address", "127.0.0.1:3000")?
            .set_default("catalog_base_url", "http://127.0.0.1:5000/api")?
            .set_default("page_size", 12)?
            .set_default("fetch_timeout_secs", 15)?
            .set_default("view_idle_secs", 1800)?
            .set_default("user_agent", concat!("storefront-discovery/", env!("CARGO_PKG_VERSION")))?;
        Ok(builder)
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .context("Failed to assemble configuration sources")?
            .try_deserialize()
            .context("Invalid configuration values")?;

        if settings.page_size == 0 {
            anyhow::bail!("page_size must be at least 1");
        }
        if settings.view_idle_secs == 0 {
            anyhow::bail!("view_idle_secs must be at least 1");
        }
        Ok(settings)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn view_idle(&self) -> Duration {
        Duration::from_secs(self.view_idle_secs)
    }
}
