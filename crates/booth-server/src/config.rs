use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
}

impl Config {
    /// Read `BOOTH_*` variables; `.env` should already be loaded.
    ///
    /// The default file name differs from the legacy service's `local.db`,
    /// whose `booth_passwords` table has an incompatible layout.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| {
                info!("{key} not set, using default: {default}");
                default.to_string()
            })
        };

        let port = var("BOOTH_PORT", "3001");
        Ok(Self {
            db_path: var("BOOTH_DB_PATH", "./booth.db").into(),
            host: var("BOOTH_HOST", "0.0.0.0"),
            port: port
                .parse()
                .with_context(|| format!("invalid BOOTH_PORT: {port}"))?,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
