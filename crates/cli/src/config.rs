//! Environment configuration.

use std::path::PathBuf;

use anyhow::Context;

use shopcart_cart::ConcurrencyPolicy;
use shopcart_observability::LogFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:3333";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub api_url: String,
    pub api_token: Option<String>,
    /// `None` means the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub concurrency: ConcurrencyPolicy,
    pub log_format: LogFormat,
}

impl CliConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Only the log format, so logging can be up before the rest is read.
    pub fn log_format_from_env() -> anyhow::Result<LogFormat> {
        let lookup = |key: &str| std::env::var(key).ok();
        log_format(&lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = lookup("SHOPCART_API_URL").unwrap_or_else(|| {
            tracing::warn!("SHOPCART_API_URL not set; using {DEFAULT_API_URL}");
            DEFAULT_API_URL.to_string()
        });

        let concurrency = match lookup("SHOPCART_CONCURRENCY") {
            Some(raw) => raw
                .parse::<ConcurrencyPolicy>()
                .context("invalid SHOPCART_CONCURRENCY")?,
            None => ConcurrencyPolicy::default(),
        };

        Ok(Self {
            api_url,
            api_token: lookup("SHOPCART_API_TOKEN").filter(|t| !t.is_empty()),
            data_dir: lookup("SHOPCART_DATA_DIR").map(PathBuf::from),
            concurrency,
            log_format: log_format(&lookup)?,
        })
    }
}

fn log_format(lookup: &impl Fn(&str) -> Option<String>) -> anyhow::Result<LogFormat> {
    match lookup("SHOPCART_LOG_FORMAT") {
        Some(raw) => raw
            .parse::<LogFormat>()
            .context("invalid SHOPCART_LOG_FORMAT"),
        None => Ok(LogFormat::default()),
    }
}
