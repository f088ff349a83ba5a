// Application configuration.
// Loads KICKSTART_* environment variables through `config` and fills in platform-directory defaults.

use std::path::PathBuf;
use std::time::Duration;

use ::config::Environment;
use serde::Deserialize;

use crate::api::{ClientConfig, HttpLogLevel, client::DEFAULT_BASE_URL};
use crate::error::{KickstartError, Result};
use crate::store::paths;

const ENV_PREFIX: &str = "KICKSTART";
pub(crate) const DEFAULT_LOG_FILTER: &str = "info";
const DEFAULT_WORKER_THREADS: usize = 2;

/// Raw settings as they appear in the environment, keyed without the prefix.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Settings {
    base_url: Option<String>,
    http_log: Option<String>,
    db_path: Option<PathBuf>,
    log: Option<String>,
    log_file: Option<PathBuf>,
    worker_threads: Option<u64>,
    demo_delay_ms: Option<u64>,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    pub db_path: PathBuf,
    pub log_path: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive.
    pub log_filter: String,
    /// Background worker threads for network and database I/O.
    pub worker_threads: usize,
    pub demo_delay: Option<Duration>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::with_prefix(ENV_PREFIX))
    }

    fn load(source: Environment) -> Result<Self> {
        let settings: Settings = ::config::Config::builder()
            .add_source(source.ignore_empty(true))
            .build()
            .and_then(|loaded| loaded.try_deserialize())
            .map_err(|e| KickstartError::Config(e.to_string()))?;

        Self::resolve(settings)
    }

    fn resolve(settings: Settings) -> Result<Self> {
        let http_log = match settings.http_log {
            Some(value) => value.parse()?,
            None => HttpLogLevel::default(),
        };
        let base_url = settings.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL);
        let client = ClientConfig::new(base_url, http_log)?;

        let db_path = match settings.db_path {
            Some(path) => path,
            None => paths::database_path().ok_or_else(|| {
                KickstartError::Config("could not determine data directory".to_string())
            })?,
        };

        let log_path = match settings.log_file {
            Some(path) => path,
            None => paths::log_path().ok_or_else(|| {
                KickstartError::Config("could not determine cache directory".to_string())
            })?,
        };

        Ok(Self {
            client,
            db_path,
            log_path,
            log_filter: settings
                .log
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
            worker_threads: settings
                .worker_threads
                .map_or(DEFAULT_WORKER_THREADS, |n| n.max(1) as usize),
            demo_delay: settings
                .demo_delay_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        })
    }
}
