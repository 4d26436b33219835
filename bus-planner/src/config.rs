//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

use crate::cache::CacheConfig;
use crate::planner::PlannerConfig;
use crate::source::{DirectorySource, FetchError, TimetableBackend, TimetableClient, TimetableConfig};

const DATASET_VAR: &str = "BUS_PLANNER_DATASET";
const TIMETABLES_VAR: &str = "BUS_PLANNER_TIMETABLES";
const ADDR_VAR: &str = "BUS_PLANNER_ADDR";
const CACHE_CAPACITY_VAR: &str = "BUS_PLANNER_CACHE_CAPACITY";
const BATCH_SIZE_VAR: &str = "BUS_PLANNER_BATCH_SIZE";

const DEFAULT_DATASET: &str = "data.json";
const DEFAULT_TIMETABLES: &str = "tt";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

/// Where stop timetables are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimetableLocation {
    /// Base URL serving `tt/{stop}.json`
    Url(String),
    /// Directory holding `{stop}.json`
    Directory(PathBuf),
}

impl TimetableLocation {
    /// `http://` and `https://` values are URLs, anything else a directory.
    pub fn parse(value: &str) -> Self {
        if value.starts_with("http://") || value.starts_with("https://") {
            Self::Url(value.trim_end_matches('/').to_string())
        } else {
            Self::Directory(PathBuf::from(value))
        }
    }

    pub fn backend(&self) -> Result<TimetableBackend, FetchError> {
        Ok(match self {
            Self::Url(url) => TimetableBackend::Http(TimetableClient::new(
                TimetableConfig::new().with_base_url(url.clone()),
            )?),
            Self::Directory(dir) => TimetableBackend::Directory(DirectorySource::new(dir)),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dataset: PathBuf,
    pub timetables: TimetableLocation,
    pub addr: SocketAddr,
    pub cache: CacheConfig,
    pub planner: PlannerConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from any variable lookup. Unset or empty variables take their
    /// defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        let dataset = get(DATASET_VAR).unwrap_or_else(|| DEFAULT_DATASET.to_string());
        let timetables = get(TIMETABLES_VAR).unwrap_or_else(|| DEFAULT_TIMETABLES.to_string());
        let addr = get(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());

        let mut cache = CacheConfig::default();
        if let Some(value) = get(CACHE_CAPACITY_VAR) {
            cache.max_capacity = parse(CACHE_CAPACITY_VAR, "number", &value)?;
        }

        let mut planner = PlannerConfig::default();
        if let Some(value) = get(BATCH_SIZE_VAR) {
            let batch_size: usize = parse(BATCH_SIZE_VAR, "positive number", &value)?;
            if batch_size == 0 {
                return Err(invalid(BATCH_SIZE_VAR, "positive number", &value));
            }
            planner.batch_size = batch_size;
        }

        Ok(Self {
            dataset: PathBuf::from(dataset),
            timetables: TimetableLocation::parse(&timetables),
            addr: parse(ADDR_VAR, "socket address", &addr)?,
            cache,
            planner,
        })
    }
}

fn parse<T: std::str::FromStr>(
    var: &'static str,
    expected: &'static str,
    value: &str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| invalid(var, expected, value))
}

fn invalid(var: &'static str, expected: &'static str, value: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        expected,
        value: value.to_string(),
    }
}
