use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{CompassError, Result};

pub const DEFAULT_INPUT_DIR: &str = "XBRL";
pub const DEFAULT_MAX_CONCURRENT_FILINGS: usize = 8;
pub const DEFAULT_FILING_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_STORE_RETRIES: usize = 3;

/// Run configuration, built once at startup and passed by reference.
#[derive(Clone, Debug)]
pub struct CompassConfig {
    pub artifact_root: PathBuf,
    pub input_dir: PathBuf,
    pub max_concurrent_filings: usize,
    pub filing_timeout: Duration,
    /// Retries after the first attempt of each store call
    pub store_retries: usize,
}

impl CompassConfig {
    pub fn new(artifact_root: impl Into<PathBuf>) -> Self {
        Self {
            artifact_root: artifact_root.into(),
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            max_concurrent_filings: DEFAULT_MAX_CONCURRENT_FILINGS,
            filing_timeout: Duration::from_secs(DEFAULT_FILING_TIMEOUT_SECS),
            store_retries: DEFAULT_STORE_RETRIES,
        }
    }

    /// With `ENV=local`, seeds the process environment from a `.env` file.
    pub fn load_local_env() {
        if std::env::var("ENV").as_deref() == Ok("local") {
            if let Err(e) = dotenv::dotenv() {
                log::warn!("ENV=local but no .env file loaded: {}", e);
            }
        }
    }

    /// Reads `COMPASS_*` variables after [`Self::load_local_env`].
    pub fn from_env() -> Result<Self> {
        Self::load_local_env();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let artifact_root = lookup("COMPASS_ARTIFACT_ROOT")
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| {
                CompassError::Config(
                    "COMPASS_ARTIFACT_ROOT environment variable not set".to_string(),
                )
            })?;

        let input_dir = PathBuf::from(
            lookup("COMPASS_INPUT_DIR").unwrap_or_else(|| DEFAULT_INPUT_DIR.to_string()),
        );

        let max_concurrent_filings = parse_var(
            &lookup,
            "COMPASS_MAX_CONCURRENT_FILINGS",
            DEFAULT_MAX_CONCURRENT_FILINGS,
        )?;
        if max_concurrent_filings == 0 {
            return Err(CompassError::Config(
                "COMPASS_MAX_CONCURRENT_FILINGS must be at least 1".to_string(),
            ));
        }

        let timeout_secs = parse_var(
            &lookup,
            "COMPASS_FILING_TIMEOUT_SECS",
            DEFAULT_FILING_TIMEOUT_SECS,
        )?;
        let store_retries = parse_var(&lookup, "COMPASS_STORE_RETRIES", DEFAULT_STORE_RETRIES)?;

        Ok(Self {
            artifact_root: PathBuf::from(artifact_root),
            input_dir,
            max_concurrent_filings,
            filing_timeout: Duration::from_secs(timeout_secs),
            store_retries,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| CompassError::Config(format!("{} = {:?}: {}", name, raw, e))),
    }
}
