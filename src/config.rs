// src/config.rs

use anyhow::{Context, Result};
use std::{env, path::PathBuf, time::Duration};
use tracing::debug;
use url::Url;

use crate::table::KeyPolicy;

pub const DEFAULT_URL: &str = "https://www.populationu.com/gen/countries-by-gdp";
pub const DEFAULT_TABLE_CLASS: &str = "ptable2";
pub const DEFAULT_KEY_COLUMN: &str = "Country";
pub const DEFAULT_OUTPUT: &str = "countries_data.csv";
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const ENV_URL: &str = "GDP_SCRAPER_URL";
const ENV_TABLE_CLASS: &str = "GDP_SCRAPER_TABLE_CLASS";
const ENV_KEY_COLUMN: &str = "GDP_SCRAPER_KEY_COLUMN";
const ENV_OUTPUT: &str = "GDP_SCRAPER_OUTPUT";
const ENV_UNIQUE_KEYS: &str = "GDP_SCRAPER_UNIQUE_KEYS";
const ENV_TIMEOUT_SECS: &str = "GDP_SCRAPER_TIMEOUT_SECS";

/// Runtime settings. Every field has a compiled-in default and an
/// environment override.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub url: Url,
    /// Class marker the scraped `<table>` elements must carry.
    pub table_class: String,
    pub key_column: String,
    pub output: PathBuf,
    pub key_policy: KeyPolicy,
    /// `None` waits on the server indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: Url::parse(DEFAULT_URL).expect("default URL should parse"),
            table_class: DEFAULT_TABLE_CLASS.to_string(),
            key_column: DEFAULT_KEY_COLUMN.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            key_policy: KeyPolicy::AllowDuplicates,
            timeout: None,
        }
    }
}

impl Config {
    /// Defaults overlaid with whatever `GDP_SCRAPER_*` variables are set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`Config::from_env`] but reads variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_URL) {
            cfg.url = Url::parse(raw.trim())
                .with_context(|| format!("parsing {}={:?}", ENV_URL, raw))?;
        }
        if let Some(class) = lookup(ENV_TABLE_CLASS) {
            cfg.table_class = non_empty(ENV_TABLE_CLASS, class)?;
        }
        if let Some(key) = lookup(ENV_KEY_COLUMN) {
            cfg.key_column = non_empty(ENV_KEY_COLUMN, key)?;
        }
        if let Some(out) = lookup(ENV_OUTPUT) {
            cfg.output = PathBuf::from(non_empty(ENV_OUTPUT, out)?);
        }
        if let Some(raw) = lookup(ENV_UNIQUE_KEYS) {
            cfg.key_policy = if parse_flag(ENV_UNIQUE_KEYS, &raw)? {
                KeyPolicy::Unique
            } else {
                KeyPolicy::AllowDuplicates
            };
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("parsing {}={:?}", ENV_TIMEOUT_SECS, raw))?;
            cfg.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        debug!(?cfg, "resolved configuration");
        Ok(cfg)
    }
}

fn non_empty(name: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        anyhow::bail!("{} must not be empty", name);
    }
    Ok(trimmed.to_string())
}

fn parse_flag(name: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("{} expects a boolean, got {:?}", name, other),
    }
}
