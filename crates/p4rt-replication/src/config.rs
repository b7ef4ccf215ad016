//! Configuration for the replication checker.
//!
//! Settings come from an optional YAML file and are then overridden by
//! command line flags:
//!
//! ```yaml
//! redis:
//!   host: 127.0.0.1
//!   port: 6379
//!   db: 0
//! table_name: P4RT_TABLE
//! log_level: info
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ReplicationError, ReplicationResult};
use crate::tables::APP_P4RT_TABLE_NAME;

/// Redis database index of APPL_DB.
pub const APPL_DB_INDEX: u8 = 0;

/// Default settings.
pub mod defaults {
    /// Default Redis host
    pub const REDIS_HOST: &str = "127.0.0.1";
    /// Default Redis port
    pub const REDIS_PORT: u16 = 6379;
    /// Default log level when RUST_LOG is unset
    pub const LOG_LEVEL: &str = "info";
}

/// Redis connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis server hostname or IP
    pub host: String,
    /// Redis server port
    pub port: u16,
    /// Database index
    pub db: u8,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self::appl_db(defaults::REDIS_HOST, defaults::REDIS_PORT)
    }
}

impl RedisConfig {
    /// Creates a new Redis configuration.
    pub fn new(host: impl Into<String>, port: u16, db: u8) -> Self {
        Self {
            host: host.into(),
            port,
            db,
        }
    }

    /// Creates an APPL_DB connection config.
    pub fn appl_db(host: impl Into<String>, port: u16) -> Self {
        Self::new(host, port, APPL_DB_INDEX)
    }

    /// Returns the Redis connection URI.
    pub fn uri(&self) -> String {
        format!("redis://{}:{}/{}", self.host, self.port, self.db)
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplicationConfig {
    pub redis: RedisConfig,
    /// APPL_DB table holding P4RT entries
    pub table_name: String,
    pub log_level: String,
}

impl Default for ReplicationConfig {
    fn default() -> Self {
        Self {
            redis: RedisConfig::default(),
            table_name: APP_P4RT_TABLE_NAME.to_string(),
            log_level: defaults::LOG_LEVEL.to_string(),
        }
    }
}

impl ReplicationConfig {
    /// Parses a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> ReplicationResult<Self> {
        serde_yaml::from_str(yaml).map_err(|e| ReplicationError::Config(e.to_string()))
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> ReplicationResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ReplicationError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&text)
    }

    /// Overrides the Redis host.
    pub fn with_redis_host(mut self, host: impl Into<String>) -> Self {
        self.redis.host = host.into();
        self
    }

    /// Overrides the Redis port.
    pub fn with_redis_port(mut self, port: u16) -> Self {
        self.redis.port = port;
        self
    }

    /// Overrides the APPL_DB index.
    pub fn with_db(mut self, db: u8) -> Self {
        self.redis.db = db;
        self
    }

    /// Overrides the table name.
    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }

    /// Overrides the log level.
    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }
}
