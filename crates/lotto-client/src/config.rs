use std::{
    fs,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{api::Game, parse_from_env, service::collect::RetryBudget, service::query::DateRange};

pub const DEFAULT_CONFIG_FILE: &str = "lotto.toml";

const DEFAULT_RESULTS_URL: &str = "https://www.nationallottery.co.za/index.php?task=results.redirectPageURL&amp;Itemid=265&amp;option=com_weaver&amp;controller=lotto-history";

/// Application configuration.
///
/// Every key is optional; missing keys fall back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct LottoConfig {
    pub source: SourceConfig,
    pub storage: StorageConfig,
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct SourceConfig {
    pub url: String,
    pub game: Game,
    pub start_draw: u32,
    pub end_draw: u32,
    pub timeout_ms: u64,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_RESULTS_URL.to_owned(),
            game: Game::Lotto,
            start_draw: 1500,
            end_draw: 2188,
            timeout_ms: 10_000,
            max_retries: 10,
            retry_delay_ms: 500,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_budget(&self) -> RetryBudget {
        RetryBudget {
            max_consecutive_failures: self.max_retries,
            retry_delay: Duration::from_millis(self.retry_delay_ms),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub data_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/lotto.csv"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub default_start: NaiveDate,
    pub default_end: NaiveDate,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 8050,
            default_start: NaiveDate::from_ymd_opt(2015, 8, 1).unwrap_or_default(),
            default_end: NaiveDate::from_ymd_opt(2020, 8, 1).unwrap_or_default(),
        }
    }
}

impl DashboardConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        let ip: IpAddr = self.host.parse().unwrap_or(IpAddr::V4(Ipv4Addr::LOCALHOST));
        SocketAddr::new(ip, self.port)
    }

    pub fn default_range(&self) -> DateRange {
        DateRange::new(self.default_start, self.default_end)
    }
}

impl LottoConfig {
    /// Load configuration from `path` (or `lotto.toml` / `$LOTTO_CONFIG`),
    /// then apply environment overrides.
    ///
    /// A missing default file is not an error; a missing explicit file is.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| parse_from_env::<PathBuf>("LOTTO_CONFIG"));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))?;
        log::debug!("Loaded config from: {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Some(host) = parse_from_env::<String>("LOTTO_HTTP_HOST") {
            self.dashboard.host = host;
        }
        if let Some(port) = parse_from_env::<u16>("LOTTO_HTTP_PORT") {
            self.dashboard.port = port;
        }
        if let Some(path) = parse_from_env::<PathBuf>("LOTTO_DATA_PATH") {
            self.storage.data_path = path;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.source.start_draw > self.source.end_draw {
            anyhow::bail!(
                "source.start_draw ({}) must not exceed source.end_draw ({})",
                self.source.start_draw,
                self.source.end_draw
            );
        }
        if self.source.max_retries == 0 {
            anyhow::bail!("source.max_retries must be at least 1");
        }
        if self.dashboard.default_start > self.dashboard.default_end {
            anyhow::bail!(
                "dashboard.default_start ({}) is after dashboard.default_end ({})",
                self.dashboard.default_start,
                self.dashboard.default_end
            );
        }
        Ok(())
    }
}
