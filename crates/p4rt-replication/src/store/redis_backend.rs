//! Redis-backed APPL_DB table.
//!
//! APPL_DB stores each table entry as a hash at `<table>:<key>`, e.g.
//! `P4RT_TABLE:REPLICATION_IP_MULTICAST_TABLE:0x7`. [`RedisTable`] hides the
//! table prefix so callers work with table-relative keys only.

use std::collections::BTreeMap;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use super::{AppDbTable, StoreResult};
use crate::config::RedisConfig;
use crate::error::StoreError;
use crate::record::{FieldValue, Operation, TableRecord};
use crate::tables::APPL_DB_SEPARATOR;

/// Redis database connection.
pub struct RedisDatabase {
    config: RedisConfig,
    connection: ConnectionManager,
}

impl RedisDatabase {
    /// Connects to the database described by `config`.
    pub async fn connect(config: RedisConfig) -> StoreResult<Self> {
        let uri = config.uri();

        let client = redis::Client::open(uri.clone())
            .map_err(|e| StoreError::Connection(format!("{}: {}", uri, e)))?;

        let connection = client.get_connection_manager().await.map_err(|e| {
            StoreError::Connection(format!("Failed to create connection manager: {}", e))
        })?;

        info!("Connected to Redis: {} (db={})", config.host, config.db);

        Ok(Self { config, connection })
    }

    /// Returns the database configuration.
    pub fn config(&self) -> &RedisConfig {
        &self.config
    }

    /// Returns a handle to one table in this database.
    pub fn table(&self, table_name: impl Into<String>) -> RedisTable {
        RedisTable::new(self.connection.clone(), table_name)
    }
}

/// One APPL_DB table accessed through Redis.
pub struct RedisTable {
    connection: ConnectionManager,
    table_name: String,
}

impl RedisTable {
    /// Creates a table handle over an existing connection.
    pub fn new(connection: ConnectionManager, table_name: impl Into<String>) -> Self {
        Self {
            connection,
            table_name: table_name.into(),
        }
    }

    /// Returns the table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn redis_key(&self, key: &str) -> String {
        redis_key(&self.table_name, key)
    }
}

fn redis_key(table_name: &str, key: &str) -> String {
    format!("{}{}{}", table_name, APPL_DB_SEPARATOR, key)
}

fn table_key<'a>(table_name: &str, redis_key: &'a str) -> Option<&'a str> {
    redis_key
        .strip_prefix(table_name)
        .and_then(|rest| rest.strip_prefix(APPL_DB_SEPARATOR))
}

#[async_trait]
impl AppDbTable for RedisTable {
    async fn keys(&mut self) -> StoreResult<Vec<String>> {
        let pattern = format!("{}{}*", self.table_name, APPL_DB_SEPARATOR);
        let redis_keys: Vec<String> = self.connection.keys(&pattern).await?;

        let keys: Vec<String> = redis_keys
            .iter()
            .filter_map(|k| table_key(&self.table_name, k))
            .map(str::to_string)
            .collect();

        debug!("Read {} keys from table {}", keys.len(), self.table_name);
        Ok(keys)
    }

    async fn get(&mut self, key: &str) -> StoreResult<Vec<FieldValue>> {
        let redis_key = self.redis_key(key);
        let fvs: BTreeMap<String, String> = self.connection.hgetall(&redis_key).await?;
        Ok(fvs.into_iter().collect())
    }

    async fn apply(&mut self, record: &TableRecord) -> StoreResult<()> {
        let redis_key = self.redis_key(&record.key);

        match record.op {
            Operation::Set => {
                // Replace the whole hash in one transaction. A SET without
                // fields leaves the key absent: Redis has no empty hashes.
                let mut pipe = redis::pipe();
                pipe.atomic().del(&redis_key).ignore();
                if !record.fvs.is_empty() {
                    pipe.hset_multiple(&redis_key, record.fvs.as_slice()).ignore();
                }
                let _: () = pipe.query_async(&mut self.connection).await?;
            }
            Operation::Del => {
                let _: () = self.connection.del(&redis_key).await?;
            }
        }

        debug!("Applied {} to {}", record.op, redis_key);
        Ok(())
    }
}
