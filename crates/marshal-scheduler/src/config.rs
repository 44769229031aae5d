use crate::round::RoundContext;
use anyhow::{Context as _, Result};
use derive_more::{Display, Error};
use marshal_base::PoolName;
use marshal_jobdb::JobSortOrder;
use marshal_util::{config::LogLevel, log};
use serde::Deserialize;
use slog::Logger;
use std::{collections::HashSet, io::Write, time::Duration};

#[derive(Debug, Display, Error)]
pub enum ConfigError {
    #[display("pool {pool} is configured more than once")]
    DuplicatePool { pool: PoolName },
}

/// How jobs are ordered in one pool.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PoolConfig {
    pub name: PoolName,

    /// Merge evicted and queued jobs by bid price instead of draining evicted jobs first.
    #[serde(default)]
    pub market_driven: bool,
}

impl PoolConfig {
    pub fn new(name: impl Into<PoolName>, market_driven: bool) -> Self {
        PoolConfig {
            name: name.into(),
            market_driven,
        }
    }

    /// The order queued jobs are read from the job store in.
    pub fn sort_order(&self) -> JobSortOrder {
        if self.market_driven {
            JobSortOrder::Price
        } else {
            JobSortOrder::FairShare
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SchedulingConfig {
    /// Minimum log level to output.
    #[serde(default)]
    pub log_level: LogLevel,

    /// How long a scheduling round may run before iteration stops.
    #[serde(default)]
    pub round_timeout_ms: Option<u64>,

    #[serde(default)]
    pub pools: Vec<PoolConfig>,
}

impl SchedulingConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("parsing scheduling config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for pool in &self.pools {
            if !seen.insert(&pool.name) {
                return Err(ConfigError::DuplicatePool {
                    pool: pool.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn pool(&self, name: &PoolName) -> Option<&PoolConfig> {
        self.pools.iter().find(|pool| pool.name == *name)
    }

    /// A logger writing to `out`, filtered at the configured level.
    pub fn logger(&self, out: impl Write + Send + 'static) -> Logger {
        log::writer_logger(self.log_level, out)
    }

    /// Run `f` with a terminal logger filtered at the configured level.
    pub fn run_with_logger<T>(&self, f: impl FnOnce(Logger) -> T) -> T {
        log::run_with_logger(self.log_level, f)
    }

    pub fn round_timeout(&self) -> Option<Duration> {
        self.round_timeout_ms.map(Duration::from_millis)
    }

    /// A context for a round starting now, with the configured timeout as its deadline.
    pub fn round_context(&self, log: Logger) -> RoundContext {
        let ctx = RoundContext::new(log);
        match self.round_timeout() {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}
