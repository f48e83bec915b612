//! PostgreSQL topic store for production use.
//!
//! ## Configuration
//!
//! All settings can be configured via environment variables:
//! - `DATABASE_URL`: PostgreSQL connection string (required)
//! - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 10)
//! - `DB_MIN_CONNECTIONS`: Minimum idle connections (default: 2)
//! - `DB_CONNECT_TIMEOUT_SECS`: Connection timeout (default: 10)
//! - `DB_IDLE_TIMEOUT_SECS`: Idle connection timeout (default: 300)
//! - `DB_MAX_LIFETIME_SECS`: Max connection lifetime (default: 1800)

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use std::time::Duration;
use uuid::Uuid;

use crate::types::{LogicalId, TopicId, TopicVersion};
use super::{PoolStats, TopicFilter, TopicQuery, TopicStore, VersionOrder};

/// DDL for the topic version table, one statement per entry.
pub const TOPIC_TABLE_SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS topic_versions (
        id                UUID PRIMARY KEY,
        logical_id        UUID NOT NULL,
        parent_logical_id UUID NULL,
        version           INTEGER NOT NULL CHECK (version >= 1),
        name              TEXT NOT NULL,
        content           TEXT NOT NULL,
        created_at        TIMESTAMPTZ NOT NULL,
        updated_at        TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_topic_versions_logical ON topic_versions (logical_id, version DESC)",
    "CREATE INDEX IF NOT EXISTS idx_topic_versions_parent ON topic_versions (parent_logical_id)",
];

const SELECT_COLUMNS: &str = "SELECT id, logical_id, parent_logical_id, version, name, content, created_at, updated_at FROM topic_versions";

/// Configuration for PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL.
    pub database_url: String,
    /// Maximum connections in pool (default: 10).
    pub max_connections: u32,
    /// Minimum idle connections to keep warm (default: 2).
    pub min_connections: u32,
    /// Connection acquire timeout in seconds (default: 10).
    pub connect_timeout_secs: u64,
    /// Idle connection timeout in seconds (default: 300 = 5 min).
    pub idle_timeout_secs: u64,
    /// Maximum connection lifetime in seconds (default: 1800 = 30 min).
    pub max_lifetime_secs: u64,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl PostgresConfig {
    /// Load configuration from environment variables with production defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgresql://localhost/topics".to_string()),
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            min_connections: env_or("DB_MIN_CONNECTIONS", 2),
            connect_timeout_secs: env_or("DB_CONNECT_TIMEOUT_SECS", 10),
            idle_timeout_secs: env_or("DB_IDLE_TIMEOUT_SECS", 300),
            max_lifetime_secs: env_or("DB_MAX_LIFETIME_SECS", 1800),
        }
    }
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// PostgreSQL topic store.
pub struct PostgresTopicStore {
    pool: PgPool,
}

impl PostgresTopicStore {
    /// Create a new store with the given configuration.
    pub async fn new(config: PostgresConfig) -> Result<Self, sqlx::Error> {
        tracing::info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            connect_timeout_secs = config.connect_timeout_secs,
            idle_timeout_secs = config.idle_timeout_secs,
            max_lifetime_secs = config.max_lifetime_secs,
            "Initializing PostgreSQL connection pool"
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .max_lifetime(Duration::from_secs(config.max_lifetime_secs))
            .test_before_acquire(true)
            .connect(&config.database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a store from environment variables.
    pub async fn from_env() -> Result<Self, sqlx::Error> {
        Self::new(PostgresConfig::from_env()).await
    }

    /// Create the topic table and its indexes if missing.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        for statement in TOPIC_TABLE_SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::info!("Topic schema ensured");
        Ok(())
    }

    fn parse_topic_row(row: &PgRow) -> Result<TopicVersion, sqlx::Error> {
        let id: Uuid = row.try_get("id")?;
        let logical_id: Uuid = row.try_get("logical_id")?;
        let parent_logical_id: Option<Uuid> = row.try_get("parent_logical_id")?;
        let version: i32 = row.try_get("version")?;

        Ok(TopicVersion {
            id: TopicId::new(id),
            logical_id: LogicalId::new(logical_id),
            parent_logical_id: parent_logical_id.map(LogicalId::new),
            version: u32::try_from(version).map_err(|e| sqlx::Error::ColumnDecode {
                index: "version".to_string(),
                source: Box::new(e),
            })?,
            name: row.try_get("name")?,
            content: row.try_get("content")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Render a query as SQL plus its single optional bind parameter.
    fn render(query: &TopicQuery) -> (String, Option<Uuid>) {
        let (clause, bind) = match query.filter {
            TopicFilter::All => ("", None),
            TopicFilter::Id(id) => (" WHERE id = $1", Some(id.as_uuid())),
            TopicFilter::LogicalId(lid) => (" WHERE logical_id = $1", Some(lid.as_uuid())),
            TopicFilter::ParentLogicalId(pid) => (" WHERE parent_logical_id = $1", Some(pid.as_uuid())),
        };

        let order = match query.order {
            Some(VersionOrder::Ascending) => " ORDER BY version ASC, created_at ASC",
            Some(VersionOrder::Descending) => " ORDER BY version DESC, created_at DESC",
            None => " ORDER BY created_at, id",
        };

        let mut sql = format!("{SELECT_COLUMNS}{clause}{order}");
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        (sql, bind)
    }
}

/// Error type for PostgreSQL store.
#[derive(Debug, thiserror::Error)]
pub enum PostgresError {
    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// Version number does not fit the column type.
    #[error("Version {0} exceeds storable range")]
    VersionOverflow(u32),
}

#[async_trait]
impl TopicStore for PostgresTopicStore {
    type Error = PostgresError;

    async fn insert(&self, record: TopicVersion) -> Result<(), Self::Error> {
        let version = i32::try_from(record.version)
            .map_err(|_| PostgresError::VersionOverflow(record.version))?;

        sqlx::query(
            r#"
            INSERT INTO topic_versions
                (id, logical_id, parent_logical_id, version, name, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#
        )
        .bind(record.id.as_uuid())
        .bind(record.logical_id.as_uuid())
        .bind(record.parent_logical_id.map(|p| p.as_uuid()))
        .bind(version)
        .bind(&record.name)
        .bind(&record.content)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &TopicId) -> Result<Option<TopicVersion>, Self::Error> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(Self::parse_topic_row(r)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self, query: &TopicQuery) -> Result<Vec<TopicVersion>, Self::Error> {
        let (sql, bind) = Self::render(query);
        let mut statement = sqlx::query(&sql);
        if let Some(value) = bind {
            statement = statement.bind(value);
        }

        let rows = statement.fetch_all(&self.pool).await?;
        rows.iter()
            .map(Self::parse_topic_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostgresError::from)
    }

    async fn find_current_children(
        &self,
        parent: &LogicalId,
    ) -> Result<Vec<TopicVersion>, Self::Error> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT ON (logical_id)
                   id, logical_id, parent_logical_id, version, name, content, created_at, updated_at
            FROM topic_versions
            WHERE parent_logical_id = $1
            ORDER BY logical_id ASC, version DESC
            "#
        )
        .bind(parent.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(Self::parse_topic_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PostgresError::from)
    }

    async fn is_healthy(&self) -> bool {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }

    fn pool_stats(&self) -> Option<PoolStats> {
        Some(PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle(),
            max: self.pool.options().get_max_connections(),
        })
    }
}
